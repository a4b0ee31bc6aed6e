#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    /// Symmetric ease-in-out built from `t^n`.
    InOutPoly(i32),
}

impl Default for Easing {
    fn default() -> Self {
        Self::QUINTIC_IN_OUT
    }
}

impl Easing {
    pub const QUINTIC_IN_OUT: Easing = Easing::InOutPoly(5);

    /// Maps progress in `[0, 1]` to eased progress. Out-of-range input is clamped.
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match *self {
            Easing::Linear => t,
            Easing::InOutPoly(n) => {
                if t < 0.5 {
                    (t * 2.0).powi(n) / 2.0
                } else {
                    1.0 - ((1.0 - t) * 2.0).powi(n) / 2.0
                }
            }
        }
    }
}
