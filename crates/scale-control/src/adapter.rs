use crate::control::ScaleLayout;
use crate::geometry::SelectionFrame;

/// Bridge between a [`ScaleControl`](crate::ScaleControl) and one UI toolkit.
///
/// Implementations own the actual label, track and indicator primitives and
/// only copy positions out of what they are handed. They never decide
/// selection or layout themselves.
pub trait RenderAdapter {
    /// Called after every layout pass with the full, recomputed layout.
    fn apply_layout(&mut self, layout: &ScaleLayout);

    /// Moves (or hides, for `None`) the selection indicator.
    fn apply_selection(&mut self, frame: Option<&SelectionFrame>, animated: bool);

    /// The committed selection changed. Fired once per tap or finished drag.
    fn value_changed(&mut self, value: Option<i64>);

    /// The current drag was refused; reset the gesture recognizer.
    fn reject_gesture(&mut self) {}
}
