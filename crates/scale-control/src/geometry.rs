//! Forward and inverse mapping between scale offsets and local coordinates.
//!
//! A [`ScaleGeometry`] is a read-only snapshot for one combination of display
//! mode, item count, unit size and available space. Hosts rebuild it whenever
//! one of those changes; nothing here is mutated incrementally.
//!
//! Offsets are 0-based positions from the lower bound of the range. Every
//! offset returned by the inverse mappings is already clamped into
//! `0..count`.

use crate::geom::{Point, Rect, Size};
use crate::metrics::UnitSize;
use crate::mode::DisplayMode;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Total sweep of the circular track: three quarters of a full turn.
pub const ARC_SWEEP: f64 = 1.5 * PI;
/// Screen angle of the first label (7:30 on a clock face).
pub const ARC_START_ANGLE: f64 = 0.75 * PI;
/// Screen angle of the last label (4:30 on a clock face).
pub const ARC_END_ANGLE: f64 = 0.25 * PI;
/// Offset from "straight up" to the start of the arc, used by hit testing.
const ARC_START_FROM_VERTICAL: f64 = 0.75 * PI;
/// Below this normalized radius a drag has no meaningful direction.
const CENTER_EPSILON: f64 = 1e-9;

/// Tolerance bands for tap hit testing.
///
/// Linear modes accept an off-axis fraction inside `[linear_min, linear_max]`,
/// i.e. slightly above or below the visual track. The circular mode accepts a
/// normalized radius strictly between `radial_inner` and `radial_outer`, which
/// leaves a dead zone in the middle of the ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitTolerance {
    pub linear_min: f64,
    pub linear_max: f64,
    pub radial_inner: f64,
    pub radial_outer: f64,
}

impl Default for HitTolerance {
    fn default() -> Self {
        Self {
            linear_min: -0.2,
            linear_max: 1.2,
            radial_inner: 0.5,
            radial_outer: 1.2,
        }
    }
}

/// Path the track stroke follows, in the same coordinates as the labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackPath {
    Line {
        start: Point,
        end: Point,
    },
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
    },
}

/// Where the minimum/maximum description texts go relative to the track box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DescriptionPlacement {
    /// One line under the track, minimum on the leading edge and maximum on
    /// the trailing edge.
    Below { top: f64 },
    /// Trailing the track, vertically centered on the first and last labels.
    BesideEnds {
        leading: f64,
        minimum_center_y: f64,
        maximum_center_y: f64,
    },
}

/// The selection indicator drawn behind the selected label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionFrame {
    pub rect: Rect,
    pub corner_radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleGeometry {
    mode: DisplayMode,
    count: u64,
    unit: f64,
    bounds: Size,
}

impl ScaleGeometry {
    /// Lays out `count` labels for `mode`.
    ///
    /// The track box depends on the mode: a horizontal track spans the
    /// available width and is one unit tall, a vertical track is one unit wide
    /// and one unit per label tall, and a circular track is a square as wide
    /// as the available width.
    pub fn new(mode: DisplayMode, count: u64, unit: UnitSize, available: Size) -> Self {
        let unit = unit.get();
        let count = count.max(1);
        let bounds = match mode {
            DisplayMode::Horizontal => Size::new(available.width, unit),
            DisplayMode::Vertical => Size::new(unit, unit * count as f64),
            DisplayMode::Circular => Size::square(available.width),
        };
        Self {
            mode,
            count,
            unit,
            bounds,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn unit_size(&self) -> f64 {
        self.unit
    }

    /// Size the host should give the track box.
    pub fn content_size(&self) -> Size {
        self.bounds
    }

    /// Center of `offset` along a linear track, as a fraction of its length.
    fn linear_fraction(&self, offset: u64) -> f64 {
        (offset as f64 + 0.5) / self.count as f64
    }

    /// Angle between neighbouring labels on the arc. A single label has no
    /// neighbour and sits at the start angle.
    pub fn angle_increment(&self) -> Option<f64> {
        (self.count > 1).then(|| ARC_SWEEP / (self.count - 1) as f64)
    }

    pub fn label_angle(&self, offset: u64) -> f64 {
        ARC_START_ANGLE + self.angle_increment().unwrap_or(0.0) * offset as f64
    }

    fn arc_center(&self) -> Point {
        Point::new(self.bounds.width / 2.0, self.bounds.height / 2.0)
    }

    fn arc_radius(&self) -> f64 {
        ((self.bounds.width - self.unit) / 2.0).max(0.0)
    }

    pub fn label_center(&self, offset: u64) -> Point {
        let offset = offset.min(self.count - 1);
        match self.mode {
            DisplayMode::Horizontal => Point::new(
                self.linear_fraction(offset) * self.bounds.width,
                self.unit / 2.0,
            ),
            DisplayMode::Vertical => Point::new(
                self.unit / 2.0,
                self.linear_fraction(offset) * self.bounds.height,
            ),
            DisplayMode::Circular => {
                let angle = self.label_angle(offset);
                let (center, radius) = (self.arc_center(), self.arc_radius());
                Point::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                )
            }
        }
    }

    pub fn label_frame(&self, offset: u64) -> Rect {
        Rect::from_center(self.label_center(offset), Size::square(self.unit))
    }

    pub fn labels(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.count).map(|offset| self.label_center(offset))
    }

    pub fn track(&self) -> TrackPath {
        let half = self.unit / 2.0;
        match self.mode {
            DisplayMode::Horizontal => TrackPath::Line {
                start: Point::new(half, half),
                end: Point::new(self.bounds.width - half, half),
            },
            DisplayMode::Vertical => TrackPath::Line {
                start: Point::new(half, half),
                end: Point::new(half, self.bounds.height - half),
            },
            DisplayMode::Circular => TrackPath::Arc {
                center: self.arc_center(),
                radius: self.arc_radius(),
                start_angle: ARC_START_ANGLE,
                end_angle: ARC_END_ANGLE,
                clockwise: true,
            },
        }
    }

    /// Indicator behind the label at `offset`, shrunk by `inset` on each side.
    ///
    /// On a horizontal track the indicator stretches to fill its whole slot;
    /// elsewhere it is a circle the size of a label.
    pub fn selection_frame(&self, offset: u64, inset: f64) -> SelectionFrame {
        let side = (self.unit - 2.0 * inset).max(0.0);
        let size = match self.mode {
            DisplayMode::Horizontal => Size::new(
                (self.bounds.width / self.count as f64 - 2.0 * inset).max(0.0),
                side,
            ),
            DisplayMode::Circular | DisplayMode::Vertical => Size::square(side),
        };
        SelectionFrame {
            rect: Rect::from_center(self.label_center(offset), size),
            corner_radius: size.width.min(size.height) / 2.0,
        }
    }

    pub fn description_placement(&self) -> DescriptionPlacement {
        match self.mode {
            DisplayMode::Horizontal | DisplayMode::Circular => DescriptionPlacement::Below {
                top: self.bounds.height,
            },
            DisplayMode::Vertical => DescriptionPlacement::BesideEnds {
                leading: self.bounds.width,
                minimum_center_y: self.unit / 2.0,
                maximum_center_y: self.bounds.height - self.unit / 2.0,
            },
        }
    }

    /// Maps a tap location to the offset it selects, if any.
    ///
    /// Taps too far off the track (outside the tolerance bands) miss.
    pub fn hit_test(&self, point: Point, tolerance: &HitTolerance) -> Option<u64> {
        let (fx, fy) = self.fractions(point)?;
        match self.mode {
            DisplayMode::Horizontal => self.linear_hit(fx, fy, tolerance),
            DisplayMode::Vertical => self.linear_hit(fy, fx, tolerance),
            DisplayMode::Circular => self.circular_hit(fx, fy, tolerance),
        }
    }

    /// Maps a drag location to an offset without any off-track rejection.
    ///
    /// Locations past either end pin to that end. Only a degenerate track or
    /// the exact center of a ring, where no direction exists, yield `None`.
    pub fn project(&self, point: Point) -> Option<u64> {
        let (fx, fy) = self.fractions(point)?;
        match self.mode {
            DisplayMode::Horizontal => Some(self.linear_offset(fx)),
            DisplayMode::Vertical => Some(self.linear_offset(fy)),
            DisplayMode::Circular => {
                let (radius, angle) = polar(fx, fy);
                if radius < CENTER_EPSILON {
                    return None;
                }
                Some(self.arc_offset(angle))
            }
        }
    }

    fn fractions(&self, point: Point) -> Option<(f64, f64)> {
        if !self.bounds.has_area() || !point.is_finite() {
            return None;
        }
        Some((point.x / self.bounds.width, point.y / self.bounds.height))
    }

    fn clamp_offset(&self, raw: f64) -> u64 {
        let last = (self.count - 1) as f64;
        raw.clamp(0.0, last) as u64
    }

    fn linear_offset(&self, axis_fraction: f64) -> u64 {
        self.clamp_offset((axis_fraction * self.count as f64).floor())
    }

    fn linear_hit(
        &self,
        axis_fraction: f64,
        off_axis_fraction: f64,
        tolerance: &HitTolerance,
    ) -> Option<u64> {
        (tolerance.linear_min..=tolerance.linear_max)
            .contains(&off_axis_fraction)
            .then(|| self.linear_offset(axis_fraction))
    }

    fn arc_offset(&self, angle_from_start: f64) -> u64 {
        let steps = (self.count - 1) as f64;
        self.clamp_offset((angle_from_start / ARC_SWEEP * steps).round())
    }

    fn circular_hit(&self, fx: f64, fy: f64, tolerance: &HitTolerance) -> Option<u64> {
        let (radius, angle) = polar(fx, fy);
        if radius <= tolerance.radial_inner || radius >= tolerance.radial_outer {
            return None;
        }

        let Some(increment) = self.angle_increment() else {
            return Some(0);
        };
        let half_segment = increment / 2.0;
        (-half_segment..=ARC_SWEEP + half_segment)
            .contains(&angle)
            .then(|| self.arc_offset(angle))
    }
}

/// Normalized radius and angle from the start of the arc for a point given as
/// fractions of the track box.
fn polar(fx: f64, fy: f64) -> (f64, f64) {
    let (x, y) = (fx * 2.0 - 1.0, fy * 2.0 - 1.0);
    let angle_from_vertical = x.atan2(-y);
    (x.hypot(y), angle_from_vertical + ARC_START_FROM_VERTICAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn horizontal_ten() -> ScaleGeometry {
        ScaleGeometry::new(
            DisplayMode::Horizontal,
            10,
            UnitSize::new(32.0),
            Size::new(320.0, 400.0),
        )
    }

    fn ring(count: u64) -> ScaleGeometry {
        ScaleGeometry::new(
            DisplayMode::Circular,
            count,
            UnitSize::new(32.0),
            Size::new(200.0, 400.0),
        )
    }

    /// Local point on `geometry`'s ring at normalized `radius` and `angle`
    /// measured from the start of the arc.
    fn ring_point(geometry: &ScaleGeometry, angle: f64, radius: f64) -> Point {
        let side = geometry.content_size().width;
        let from_vertical = angle - ARC_START_FROM_VERTICAL;
        let (x, y) = (radius * from_vertical.sin(), -radius * from_vertical.cos());
        Point::new((x + 1.0) / 2.0 * side, (y + 1.0) / 2.0 * side)
    }

    #[test]
    fn horizontal_centers_are_evenly_spaced() {
        let geometry = horizontal_ten();
        let xs: Vec<f64> = geometry.labels().map(|p| p.x).collect();
        assert_eq!(xs.len(), 10);
        for (i, x) in xs.iter().enumerate() {
            assert!((x - (16.0 + 32.0 * i as f64)).abs() < EPS);
        }
        assert!(geometry.labels().all(|p| p.y == 16.0));
    }

    #[test]
    fn horizontal_round_trip() {
        let geometry = horizontal_ten();
        let center = geometry.label_center(5);
        assert!((center.x - 176.0).abs() < EPS);

        let tap = Point::new(center.x, 0.5 * geometry.content_size().height);
        assert_eq!(geometry.hit_test(tap, &HitTolerance::default()), Some(5));
    }

    #[test]
    fn horizontal_off_axis_rejection() {
        let geometry = horizontal_ten();
        let center = geometry.label_center(5);
        let tolerance = HitTolerance::default();

        assert_eq!(geometry.hit_test(Point::new(center.x, 48.0), &tolerance), None);
        // Inside the 20% slack on either side.
        assert_eq!(geometry.hit_test(Point::new(center.x, -6.0), &tolerance), Some(5));
        assert_eq!(geometry.hit_test(Point::new(center.x, 38.0), &tolerance), Some(5));
        // Exactly on the band edges still counts.
        assert_eq!(geometry.hit_test(Point::new(center.x, 1.2 * 32.0), &tolerance), Some(5));
        assert_eq!(geometry.hit_test(Point::new(center.x, -0.2 * 32.0), &tolerance), Some(5));
    }

    #[test]
    fn linear_hits_clamp_along_axis() {
        let geometry = horizontal_ten();
        let tolerance = HitTolerance::default();
        assert_eq!(geometry.hit_test(Point::new(-40.0, 16.0), &tolerance), Some(0));
        assert_eq!(geometry.hit_test(Point::new(320.0, 16.0), &tolerance), Some(9));
        assert_eq!(geometry.hit_test(Point::new(1000.0, 16.0), &tolerance), Some(9));
        assert_eq!(geometry.hit_test(Point::new(31.9, 16.0), &tolerance), Some(0));
        assert_eq!(geometry.hit_test(Point::new(32.0, 16.0), &tolerance), Some(1));
    }

    #[test]
    fn vertical_swaps_axes() {
        let geometry = ScaleGeometry::new(
            DisplayMode::Vertical,
            5,
            UnitSize::new(40.0),
            Size::new(100.0, 100.0),
        );
        assert_eq!(geometry.content_size(), Size::new(40.0, 200.0));
        assert_eq!(geometry.label_center(0), Point::new(20.0, 20.0));
        assert_eq!(geometry.label_center(4), Point::new(20.0, 180.0));

        let tolerance = HitTolerance::default();
        assert_eq!(geometry.hit_test(Point::new(20.0, 130.0), &tolerance), Some(3));
        assert_eq!(geometry.hit_test(Point::new(60.0, 130.0), &tolerance), None);
        assert_eq!(geometry.project(Point::new(60.0, 130.0)), Some(3));
    }

    #[test]
    fn circular_labels_sit_on_the_arc() {
        let geometry = ring(5);
        let radius = (200.0 - 32.0) / 2.0;
        for (i, p) in geometry.labels().enumerate() {
            let angle = ARC_START_ANGLE + i as f64 * ARC_SWEEP / 4.0;
            assert!((p.x - (100.0 + radius * angle.cos())).abs() < EPS);
            assert!((p.y - (100.0 + radius * angle.sin())).abs() < EPS);
        }
        // First label lower-left, middle label on top, last label lower-right.
        let (first, middle, last) = (
            geometry.label_center(0),
            geometry.label_center(2),
            geometry.label_center(4),
        );
        assert!(first.x < 100.0 && first.y > 100.0);
        assert!((middle.x - 100.0).abs() < EPS && middle.y < 100.0);
        assert!(last.x > 100.0 && last.y > 100.0);
    }

    #[test]
    fn circular_round_trip() {
        let geometry = ring(7);
        let tolerance = HitTolerance::default();
        for offset in 0..7 {
            let center = geometry.label_center(offset);
            assert_eq!(geometry.hit_test(center, &tolerance), Some(offset));
            assert_eq!(geometry.project(center), Some(offset));
        }
    }

    #[test]
    fn circular_arc_ends() {
        let geometry = ring(5);
        let tolerance = HitTolerance::default();
        let half_segment = ARC_SWEEP / 4.0 / 2.0;

        let at = |angle: f64| geometry.hit_test(ring_point(&geometry, angle, 0.8), &tolerance);
        assert_eq!(at(0.0), Some(0));
        assert_eq!(at(ARC_SWEEP), Some(4));
        assert_eq!(at(-half_segment + 0.01), Some(0));
        assert_eq!(at(ARC_SWEEP + half_segment - 0.01), Some(4));
        assert_eq!(at(-half_segment - 0.01), None);
        assert_eq!(at(ARC_SWEEP + half_segment + 0.01), None);
    }

    #[test]
    fn circular_radial_band() {
        let geometry = ring(5);
        let tolerance = HitTolerance::default();
        let at = |radius: f64| geometry.hit_test(ring_point(&geometry, 0.0, radius), &tolerance);
        assert_eq!(at(0.3), None);
        assert_eq!(at(0.49), None);
        assert_eq!(at(0.51), Some(0));
        assert_eq!(at(1.19), Some(0));
        assert_eq!(at(1.21), None);
        assert_eq!(at(1.5), None);
    }

    #[test]
    fn circular_projection_pins_to_ends() {
        let geometry = ring(5);
        // Just right of six o'clock belongs to the end, just left to the start.
        assert_eq!(geometry.project(ring_point(&geometry, 1.74 * PI, 0.2)), Some(4));
        assert_eq!(geometry.project(ring_point(&geometry, -0.24 * PI, 2.0)), Some(0));
        assert_eq!(geometry.project(Point::new(100.0, 100.0)), None);
    }

    #[test]
    fn single_label_ring() {
        let geometry = ring(1);
        assert_eq!(geometry.angle_increment(), None);
        assert_eq!(geometry.label_angle(0), ARC_START_ANGLE);

        let center = geometry.label_center(0);
        assert!(center.x.is_finite() && center.y.is_finite());
        let radius = (200.0 - 32.0) / 2.0;
        assert!((center.x - (100.0 + radius * ARC_START_ANGLE.cos())).abs() < EPS);

        let tolerance = HitTolerance::default();
        assert_eq!(geometry.hit_test(center, &tolerance), Some(0));
        assert_eq!(geometry.hit_test(ring_point(&geometry, PI, 0.8), &tolerance), Some(0));
        assert_eq!(geometry.project(center), Some(0));
    }

    #[test]
    fn degenerate_bounds_never_hit() {
        let geometry = ScaleGeometry::new(
            DisplayMode::Horizontal,
            10,
            UnitSize::default(),
            Size::new(0.0, 0.0),
        );
        let tolerance = HitTolerance::default();
        assert_eq!(geometry.hit_test(Point::new(0.0, 16.0), &tolerance), None);
        assert_eq!(geometry.project(Point::new(0.0, 16.0)), None);

        let geometry = horizontal_ten();
        assert_eq!(geometry.hit_test(Point::new(f64::NAN, 16.0), &tolerance), None);
    }

    #[test]
    fn selection_frames() {
        let frame = horizontal_ten().selection_frame(0, 2.0);
        assert_eq!(frame.rect.size, Size::new(28.0, 28.0));
        assert_eq!(frame.rect.center(), Point::new(16.0, 16.0));
        assert_eq!(frame.corner_radius, 14.0);

        let wide = ScaleGeometry::new(
            DisplayMode::Horizontal,
            4,
            UnitSize::default(),
            Size::new(400.0, 0.0),
        );
        assert_eq!(wide.selection_frame(1, 2.0).rect.size, Size::new(96.0, 28.0));

        let frame = ring(5).selection_frame(2, 2.0);
        assert_eq!(frame.rect.size, Size::square(28.0));
    }

    #[test]
    fn tracks_and_descriptions() {
        assert_eq!(
            horizontal_ten().track(),
            TrackPath::Line {
                start: Point::new(16.0, 16.0),
                end: Point::new(304.0, 16.0),
            }
        );
        match ring(5).track() {
            TrackPath::Arc {
                center,
                radius,
                clockwise,
                ..
            } => {
                assert_eq!(center, Point::new(100.0, 100.0));
                assert_eq!(radius, 84.0);
                assert!(clockwise);
            }
            other => panic!("unexpected track {other:?}"),
        }

        let vertical = ScaleGeometry::new(
            DisplayMode::Vertical,
            3,
            UnitSize::default(),
            Size::default(),
        );
        assert_eq!(
            vertical.description_placement(),
            DescriptionPlacement::BesideEnds {
                leading: 32.0,
                minimum_center_y: 16.0,
                maximum_center_y: 80.0,
            }
        );
        assert_eq!(
            horizontal_ten().description_placement(),
            DescriptionPlacement::Below { top: 32.0 }
        );
    }

    #[test]
    fn test_tolerance_deserialization() {
        let tolerance: HitTolerance = serde_json::from_str(r#"{"radial_inner": 0.4}"#).unwrap();
        assert_eq!(tolerance.radial_inner, 0.4);
        assert_eq!(tolerance.linear_max, 1.2);
    }
}
