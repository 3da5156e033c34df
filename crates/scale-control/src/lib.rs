//! Geometry and interaction engine for a selectable integer scale.
//!
//! The scale is a row, column or three-quarter ring of evenly spaced integer
//! labels with a movable selection indicator. This crate decides the layout,
//! maps taps and drags to values, and owns the selection; drawing is left to a
//! [`RenderAdapter`] supplied by the hosting toolkit.

pub mod adapter;
pub mod control;
pub mod geom;
pub mod geometry;
pub mod macros;
pub mod metrics;
pub mod mode;
pub mod protocol;
pub mod range;
pub mod selection;

pub use adapter::RenderAdapter;
pub use control::{Description, LabelLayout, ScaleControl, ScaleLayout, ViewMetrics};
pub use geom::{Point, Rect, Size};
pub use geometry::{DescriptionPlacement, HitTolerance, ScaleGeometry, SelectionFrame, TrackPath};
pub use metrics::UnitSize;
pub use mode::{DisplayMode, LayoutModeSelector};
pub use range::{RangeError, RangeModel};
pub use selection::{GestureOutcome, SelectionState};
