use furl_core::TimingConfig;

use crate::error::ConfigError;

/// Geometry and timing of the collapsing search header.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderConfig {
    /// Header height with nothing scrolled and no focus.
    pub big_header_height: f32,
    /// Floor the header never shrinks below.
    pub collapsed_header_height: f32,
    /// Input right margin while the cancel button is hidden.
    pub margin_idle: f32,
    /// Input right margin while the cancel button is shown.
    pub margin_focused: f32,
    /// Cancel button offset while hidden.
    pub cancel_hidden: f32,
    /// Cancel button offset while shown.
    pub cancel_shown: f32,
    pub timing: TimingConfig,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            big_header_height: 140.0,
            collapsed_header_height: 72.0,
            margin_idle: 8.0,
            margin_focused: 84.0,
            cancel_hidden: 100.0,
            cancel_shown: -24.0,
            timing: TimingConfig::default(),
        }
    }
}

impl HeaderConfig {
    pub fn heights(big: f32, collapsed: f32) -> Self {
        Self {
            big_header_height: big,
            collapsed_header_height: collapsed,
            ..Self::default()
        }
    }

    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let collapsed = self.collapsed_header_height;
        let big = self.big_header_height;
        if !(collapsed > 0.0) {
            return Err(ConfigError::NonPositiveCollapsedHeight(collapsed));
        }
        if !(collapsed < big) {
            return Err(ConfigError::CollapsedNotBelowBig { collapsed, big });
        }
        if self.timing.duration.is_zero() {
            return Err(ConfigError::ZeroDuration);
        }
        Ok(())
    }
}
