use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::f64::consts::PI;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    #[strum(to_string = "horizontal", serialize = "h", serialize = "row")]
    Horizontal,
    #[strum(to_string = "circular", serialize = "c", serialize = "round")]
    Circular,
    #[strum(to_string = "vertical", serialize = "v", serialize = "column")]
    Vertical,
}

/// Picks the display mode from the space on offer and the length of the scale.
///
/// Horizontal wins whenever the row fits. Otherwise the scale is bent onto a
/// `arc_fraction` circle if that circumference holds it (and, when
/// `circular_requires_compact` is set, only for compact portrait layouts).
/// Vertical is the fallback; it grows with the item count and always fits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutModeSelector {
    pub compact_width: f64,
    pub regular_width: f64,
    pub circular_requires_compact: bool,
    pub arc_fraction: f64,
}

impl Default for LayoutModeSelector {
    fn default() -> Self {
        Self {
            compact_width: 300.0,
            regular_width: 600.0,
            circular_requires_compact: true,
            arc_fraction: 0.75,
        }
    }
}

impl LayoutModeSelector {
    /// Reference width for hosts that have not measured their container yet.
    pub fn nominal_width(&self, compact: bool) -> f64 {
        if compact {
            self.compact_width
        } else {
            self.regular_width
        }
    }

    pub fn length_of_scale(unit_size: f64, item_count: u64) -> f64 {
        unit_size * item_count as f64
    }

    /// Arc length left for labels once one unit is reserved for the stroke.
    pub fn usable_circumference(&self, available_width: f64, unit_size: f64) -> f64 {
        (available_width - unit_size) * PI * self.arc_fraction
    }

    pub fn select(
        &self,
        available_width: f64,
        unit_size: f64,
        item_count: u64,
        compact: bool,
    ) -> DisplayMode {
        let length = Self::length_of_scale(unit_size, item_count);
        let circumference = self.usable_circumference(available_width, unit_size);

        let mode = if available_width >= length {
            DisplayMode::Horizontal
        } else if circumference >= length && (compact || !self.circular_requires_compact) {
            DisplayMode::Circular
        } else {
            DisplayMode::Vertical
        };

        log::debug!(
            "mode {} (width {:.1}, scale length {:.1}, arc {:.1}, compact {})",
            mode,
            available_width,
            length,
            circumference,
            compact
        );
        mode
    }
}
