//! What the header needs from, and hands back to, the host toolkit.

/// The scrollable list under the header.
pub trait ScrollHost {
    fn scroll_to(&mut self, offset: f32);
}

/// The search text field.
pub trait TextFieldHost {
    /// Drops keyboard focus. The host may report a blur back through
    /// [`SearchHeader::on_blur`](crate::SearchHeader::on_blur); a repeated blur
    /// is harmless.
    fn blur(&mut self);
}

/// Values the host applies to its views after every pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeaderOutputs {
    pub header_height: f32,
    pub content_padding_top: f32,
    pub input_margin_right: f32,
    pub cancel_translate_x: f32,
}
