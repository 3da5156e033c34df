use derive_more::{Deref, Display, Into};

/// Side length of one square label, which doubles as the touch target and
/// the stroke thickness of the track.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Deref, Into)]
pub struct UnitSize(f64);

impl UnitSize {
    pub const BASELINE: f64 = 32.0;

    /// Wraps a measured size, never going below the baseline.
    pub fn new(size: f64) -> Self {
        if size.is_finite() {
            Self(size.max(Self::BASELINE))
        } else {
            Self::default()
        }
    }

    /// Scales the baseline by the host's text-size multiplier and snaps the
    /// result to whole device pixels.
    pub fn scaled(font_scale: f64, display_scale: f64) -> Self {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(font_scale) || !valid(display_scale) {
            return Self::default();
        }
        let scaled = Self::BASELINE * font_scale;
        Self::new((scaled * display_scale).round() / display_scale)
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl Default for UnitSize {
    fn default() -> Self {
        Self(Self::BASELINE)
    }
}
