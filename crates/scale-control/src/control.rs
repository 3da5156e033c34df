use crate::adapter::RenderAdapter;
use crate::geom::{Point, Rect, Size};
use crate::geometry::{DescriptionPlacement, HitTolerance, ScaleGeometry, SelectionFrame, TrackPath};
use crate::metrics::UnitSize;
use crate::mode::{DisplayMode, LayoutModeSelector};
use crate::range::{RangeError, RangeModel};
use crate::selection::{GestureOutcome, SelectionState};
use derive_more::{AsRef, Deref, Display, From, Into};

/// Free text shown next to one end of the scale ("Not at all", "Very").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct Description(String);

crate::impl_string_newtype!(Description);

/// Inputs the hosting view measures on each layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewMetrics {
    pub available: Size,
    pub unit: UnitSize,
    /// Compact-width, regular-height environment (a phone held upright).
    pub compact: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub value: i64,
    pub text: String,
    pub frame: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaleLayout {
    pub mode: DisplayMode,
    pub content_size: Size,
    pub unit_size: f64,
    pub track: TrackPath,
    pub labels: Vec<LabelLayout>,
    pub minimum_description: Option<Description>,
    pub maximum_description: Option<Description>,
    pub description_placement: DescriptionPlacement,
}

impl ScaleLayout {
    fn build(geometry: &ScaleGeometry, control: &ScaleControl) -> Self {
        let labels = match control.range.check_count(control.label_limit) {
            Ok(()) => control
                .range
                .iter()
                .zip(0..geometry.count())
                .map(|(value, offset)| LabelLayout {
                    value,
                    text: value.to_string(),
                    frame: geometry.label_frame(offset),
                })
                .collect(),
            Err(e) => {
                log::warn!("Laying out without labels: {}", e);
                Vec::new()
            }
        };

        Self {
            mode: geometry.mode(),
            content_size: geometry.content_size(),
            unit_size: geometry.unit_size(),
            track: geometry.track(),
            labels,
            minimum_description: control.minimum_description.clone(),
            maximum_description: control.maximum_description.clone(),
            description_placement: geometry.description_placement(),
        }
    }
}

/// A selectable integer scale, minus the drawing.
///
/// Setters only record the new state. The owner calls [`update`] once it is
/// done mutating, which re-evaluates the display mode and rebuilds the layout;
/// `update` may be called any number of times with the same result.
///
/// [`update`]: ScaleControl::update
#[derive(Debug, Clone)]
pub struct ScaleControl {
    range: RangeModel,
    selection: SelectionState,
    minimum_description: Option<Description>,
    maximum_description: Option<Description>,
    selector: LayoutModeSelector,
    tolerance: HitTolerance,
    metrics: ViewMetrics,
    mode_override: Option<DisplayMode>,
    selector_inset: f64,
    label_limit: u64,
    animate_next: bool,
    geometry: ScaleGeometry,
    layout: ScaleLayout,
}

impl ScaleControl {
    pub const DEFAULT_SELECTOR_INSET: f64 = 2.0;
    /// Ranges with more values than this get a track but no labels.
    pub const DEFAULT_LABEL_LIMIT: u64 = 2000;

    pub fn new(range: RangeModel) -> Self {
        let metrics = ViewMetrics::default();
        let geometry = ScaleGeometry::new(
            DisplayMode::default(),
            range.count(),
            metrics.unit,
            metrics.available,
        );
        let mut control = Self {
            range,
            selection: SelectionState::default(),
            minimum_description: None,
            maximum_description: None,
            selector: LayoutModeSelector::default(),
            tolerance: HitTolerance::default(),
            metrics,
            mode_override: None,
            selector_inset: Self::DEFAULT_SELECTOR_INSET,
            label_limit: Self::DEFAULT_LABEL_LIMIT,
            animate_next: false,
            geometry,
            layout: ScaleLayout {
                mode: DisplayMode::default(),
                content_size: Size::default(),
                unit_size: metrics.unit.get(),
                track: geometry.track(),
                labels: Vec::new(),
                minimum_description: None,
                maximum_description: None,
                description_placement: geometry.description_placement(),
            },
        };
        control.update();
        control
    }

    pub fn with_bounds(minimum: i64, maximum: i64) -> Result<Self, RangeError> {
        RangeModel::new(minimum, maximum).map(Self::new)
    }

    pub fn range(&self) -> RangeModel {
        self.range
    }

    pub fn minimum_value(&self) -> i64 {
        self.range.lower()
    }

    pub fn set_minimum_value(&mut self, value: i64) {
        self.range.set_lower(value);
        self.selection.rebound(&self.range);
    }

    pub fn maximum_value(&self) -> i64 {
        self.range.upper()
    }

    pub fn set_maximum_value(&mut self, value: i64) {
        self.range.set_upper(value);
        self.selection.rebound(&self.range);
    }

    pub fn selected_value(&self) -> Option<i64> {
        self.selection.value()
    }

    /// Programmatic selection; clamped into range, never notifies.
    ///
    /// `animated` only affects how the next [`render`](Self::render) moves the
    /// indicator.
    pub fn set_selected_value(&mut self, value: Option<i64>, animated: bool) -> bool {
        let changed = self.selection.set(value, &self.range);
        self.animate_next |= changed && animated;
        changed
    }

    pub fn minimum_description(&self) -> Option<&Description> {
        self.minimum_description.as_ref()
    }

    pub fn set_minimum_description(&mut self, text: Option<Description>) {
        self.minimum_description = text;
    }

    pub fn maximum_description(&self) -> Option<&Description> {
        self.maximum_description.as_ref()
    }

    pub fn set_maximum_description(&mut self, text: Option<Description>) {
        self.maximum_description = text;
    }

    pub fn mode_override(&self) -> Option<DisplayMode> {
        self.mode_override
    }

    /// Pins the display mode, bypassing the selector. `None` restores it.
    pub fn set_mode_override(&mut self, mode: Option<DisplayMode>) {
        self.mode_override = mode;
    }

    pub fn set_selector(&mut self, selector: LayoutModeSelector) {
        self.selector = selector;
    }

    pub fn set_tolerance(&mut self, tolerance: HitTolerance) {
        self.tolerance = tolerance;
    }

    pub fn set_selector_inset(&mut self, inset: f64) {
        if inset.is_finite() {
            self.selector_inset = inset.max(0.0);
        }
    }

    pub fn label_limit(&self) -> u64 {
        self.label_limit
    }

    pub fn set_label_limit(&mut self, limit: u64) {
        self.label_limit = limit;
    }

    pub fn metrics(&self) -> ViewMetrics {
        self.metrics
    }

    pub fn set_metrics(&mut self, metrics: ViewMetrics) {
        self.metrics = metrics;
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.geometry.mode()
    }

    pub fn geometry(&self) -> &ScaleGeometry {
        &self.geometry
    }

    pub fn layout(&self) -> &ScaleLayout {
        &self.layout
    }

    /// Width fed to the mode selector: the measured one once the host has a
    /// real size, the nominal reference width before that.
    fn reference_width(&self) -> f64 {
        let width = self.metrics.available.width;
        if width.is_finite() && width > 0.0 {
            width
        } else {
            self.selector.nominal_width(self.metrics.compact)
        }
    }

    fn evaluate_display_mode(&self) -> DisplayMode {
        self.mode_override.unwrap_or_else(|| {
            self.selector.select(
                self.reference_width(),
                self.metrics.unit.get(),
                self.range.count(),
                self.metrics.compact,
            )
        })
    }

    /// Re-evaluates the display mode and rebuilds the layout from the current
    /// range, metrics and descriptions.
    pub fn update(&mut self) {
        let mode = self.evaluate_display_mode();
        if mode != self.geometry.mode() {
            log::info!("display mode {} -> {}", self.geometry.mode(), mode);
        }

        let available = Size::new(self.reference_width(), self.metrics.available.height);
        self.geometry = ScaleGeometry::new(mode, self.range.count(), self.metrics.unit, available);
        self.layout = ScaleLayout::build(&self.geometry, self);
    }

    /// Indicator for the current selection, `None` when nothing is selected.
    pub fn selection_frame(&self) -> Option<SelectionFrame> {
        self.selection
            .value()
            .and_then(|value| self.range.offset_of(value))
            .map(|offset| self.geometry.selection_frame(offset, self.selector_inset))
    }

    pub fn tap(&mut self, point: Point) -> GestureOutcome {
        let candidate = self.geometry.hit_test(point, &self.tolerance);
        log::trace!("tap at ({:.1}, {:.1}) -> {:?}", point.x, point.y, candidate);
        self.selection.tap(candidate, &self.range)
    }

    pub fn drag_began(&mut self, point: Point) -> GestureOutcome {
        let candidate = self.geometry.project(point);
        self.selection.drag_began(candidate, &self.range)
    }

    pub fn drag_moved(&mut self, point: Point) -> GestureOutcome {
        let candidate = self.geometry.project(point);
        self.selection.drag_moved(candidate, &self.range)
    }

    pub fn drag_ended(&mut self, point: Point) -> GestureOutcome {
        let candidate = self.geometry.project(point);
        self.selection.drag_ended(candidate, &self.range)
    }

    pub fn drag_cancelled(&mut self) -> GestureOutcome {
        self.selection.drag_cancelled()
    }

    /// Pushes the whole layout and the selection indicator to `adapter`.
    pub fn render(&mut self, adapter: &mut impl RenderAdapter) {
        adapter.apply_layout(&self.layout);
        let animated = std::mem::take(&mut self.animate_next);
        adapter.apply_selection(self.selection_frame().as_ref(), animated);
    }

    /// Forwards the consequences of a gesture to `adapter`.
    pub fn dispatch(&self, outcome: GestureOutcome, adapter: &mut impl RenderAdapter) {
        match outcome {
            GestureOutcome::Ignored => {}
            GestureOutcome::Rejected => adapter.reject_gesture(),
            GestureOutcome::Live(_) => {
                adapter.apply_selection(self.selection_frame().as_ref(), false);
            }
            GestureOutcome::Committed(value) => {
                adapter.apply_selection(self.selection_frame().as_ref(), true);
                adapter.value_changed(value);
            }
        }
    }
}

impl Default for ScaleControl {
    fn default() -> Self {
        Self::new(RangeModel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingAdapter {
        layouts: Vec<DisplayMode>,
        frames: Vec<(Option<Rect>, bool)>,
        changes: Vec<Option<i64>>,
        rejections: usize,
    }

    impl RenderAdapter for RecordingAdapter {
        fn apply_layout(&mut self, layout: &ScaleLayout) {
            self.layouts.push(layout.mode);
        }

        fn apply_selection(&mut self, frame: Option<&SelectionFrame>, animated: bool) {
            self.frames.push((frame.map(|f| f.rect), animated));
        }

        fn value_changed(&mut self, value: Option<i64>) {
            self.changes.push(value);
        }

        fn reject_gesture(&mut self) {
            self.rejections += 1;
        }
    }

    fn horizontal_control() -> ScaleControl {
        let mut control = ScaleControl::with_bounds(1, 10).unwrap();
        control.set_metrics(ViewMetrics {
            available: Size::new(320.0, 480.0),
            unit: UnitSize::default(),
            compact: false,
        });
        control.update();
        control
    }

    #[test]
    fn default_layout_is_usable() {
        let control = ScaleControl::default();
        assert_eq!(control.display_mode(), DisplayMode::Horizontal);
        assert_eq!(control.layout().labels.len(), 10);
        assert_eq!(control.layout().labels[0].text, "1");
        assert_eq!(control.layout().content_size, Size::new(600.0, 32.0));
        assert_eq!(control.selection_frame(), None);
    }

    #[test]
    fn bounds_setters_reclamp() {
        let mut control = horizontal_control();
        control.set_selected_value(Some(8), false);

        control.set_maximum_value(4);
        assert_eq!((control.minimum_value(), control.maximum_value()), (1, 4));
        assert_eq!(control.selected_value(), Some(4));

        control.set_minimum_value(9);
        assert_eq!((control.minimum_value(), control.maximum_value()), (9, 9));
        assert_eq!(control.selected_value(), Some(9));

        control.update();
        assert_eq!(control.layout().labels.len(), 1);
    }

    #[test]
    fn update_is_idempotent() {
        let mut control = horizontal_control();
        let before = control.layout().clone();
        control.update();
        control.update();
        assert_eq!(control.layout(), &before);
    }

    #[test]
    fn tap_commits_and_notifies() {
        let mut control = horizontal_control();
        let mut adapter = RecordingAdapter::default();

        let outcome = control.tap(Point::new(176.0, 16.0));
        control.dispatch(outcome, &mut adapter);
        assert_eq!(control.selected_value(), Some(6));
        assert_eq!(adapter.changes, vec![Some(6)]);

        let outcome = control.tap(Point::new(176.0, 48.0));
        control.dispatch(outcome, &mut adapter);
        assert_eq!(outcome, GestureOutcome::Ignored);
        assert_eq!(adapter.changes.len(), 1);
    }

    #[test]
    fn far_drag_signals_rejection() {
        let mut control = horizontal_control();
        let mut adapter = RecordingAdapter::default();
        control.set_selected_value(Some(2), false);

        let outcome = control.drag_began(Point::new(300.0, 16.0));
        control.dispatch(outcome, &mut adapter);
        assert_eq!(adapter.rejections, 1);
        assert_eq!(control.selected_value(), Some(2));
        assert!(adapter.changes.is_empty());
    }

    #[test]
    fn drag_notifies_once_at_release() {
        let mut control = horizontal_control();
        let mut adapter = RecordingAdapter::default();
        control.set_selected_value(Some(2), false);

        for x in [40.0, 90.0, 150.0, 250.0] {
            let outcome = if x == 40.0 {
                control.drag_began(Point::new(x, 16.0))
            } else {
                control.drag_moved(Point::new(x, 60.0))
            };
            control.dispatch(outcome, &mut adapter);
        }
        assert!(adapter.changes.is_empty());
        assert_eq!(control.selected_value(), Some(8));

        let outcome = control.drag_ended(Point::new(250.0, 60.0));
        control.dispatch(outcome, &mut adapter);
        assert_eq!(adapter.changes, vec![Some(8)]);
    }

    #[test]
    fn mode_follows_metrics() {
        let mut control = ScaleControl::with_bounds(1, 20).unwrap();
        control.set_metrics(ViewMetrics {
            available: Size::new(600.0, 800.0),
            unit: UnitSize::default(),
            compact: true,
        });
        control.update();
        assert_eq!(control.display_mode(), DisplayMode::Circular);
        assert_eq!(control.layout().content_size, Size::square(600.0));

        control.set_metrics(ViewMetrics {
            compact: false,
            ..control.metrics()
        });
        control.update();
        assert_eq!(control.display_mode(), DisplayMode::Vertical);
        assert_eq!(control.layout().content_size, Size::new(32.0, 640.0));

        control.set_mode_override(Some(DisplayMode::Horizontal));
        control.update();
        assert_eq!(control.display_mode(), DisplayMode::Horizontal);
    }

    #[test]
    fn single_value_circular_range() {
        let mut control = ScaleControl::with_bounds(5, 5).unwrap();
        control.set_mode_override(Some(DisplayMode::Circular));
        control.set_metrics(ViewMetrics {
            available: Size::new(200.0, 200.0),
            ..Default::default()
        });
        control.update();

        let label = &control.layout().labels[0];
        assert_eq!(label.value, 5);
        assert!(label.frame.origin.x.is_finite());

        let outcome = control.tap(label.frame.center());
        assert_eq!(outcome, GestureOutcome::Committed(Some(5)));
    }

    #[test]
    fn oversized_range_lays_out_without_labels() {
        let mut control = ScaleControl::with_bounds(0, i64::MAX).unwrap();
        assert!(control.layout().labels.is_empty());
        assert_eq!(control.display_mode(), DisplayMode::Vertical);

        control.set_selected_value(Some(3), false);
        assert!(control.selection_frame().is_some());

        control.set_maximum_value(30);
        control.set_label_limit(20);
        control.update();
        assert!(control.layout().labels.is_empty());

        control.set_label_limit(31);
        control.update();
        assert_eq!(control.layout().labels.len(), 31);
    }

    #[test]
    fn restarted_drag_does_not_strand_live_value() {
        let mut control = horizontal_control();
        let mut adapter = RecordingAdapter::default();
        control.set_selected_value(Some(6), false);

        for outcome in [
            control.drag_began(Point::new(200.0, 16.0)),
            control.drag_began(Point::new(300.0, 16.0)),
            control.drag_ended(Point::new(300.0, 16.0)),
        ] {
            control.dispatch(outcome, &mut adapter);
        }
        assert_eq!(control.selected_value(), Some(6));
        assert_eq!(adapter.rejections, 1);
        assert!(adapter.changes.is_empty());
    }

    #[test]
    fn render_consumes_animation_flag() {
        let mut control = horizontal_control();
        let mut adapter = RecordingAdapter::default();

        assert!(control.set_selected_value(Some(1), true));
        control.render(&mut adapter);
        control.render(&mut adapter);

        assert_eq!(adapter.layouts, vec![DisplayMode::Horizontal; 2]);
        let expected = Rect::from_center(Point::new(16.0, 16.0), Size::square(28.0));
        assert_eq!(adapter.frames, vec![(Some(expected), true), (Some(expected), false)]);
    }

    #[test]
    fn descriptions_reach_layout() {
        let mut control = horizontal_control();
        control.set_minimum_description(Some(Description::from("Never")));
        control.set_maximum_description(Some(Description::new("Always")));
        control.update();
        assert_eq!(
            control.layout().minimum_description.as_deref().map(String::as_str),
            Some("Never")
        );
        assert_eq!(control.maximum_description().map(|d| d.as_str()), Some("Always"));
    }
}
