//! Interactive transform handles for the active layer.
//!
//! The gizmo owns the live [`AffineState`] of whichever layer has focus. It
//! answers two questions for the interaction controller:
//!
//! - which handle lies under a canvas-space point ([`TransformGizmo::hit_test`])
//! - how a pointer delta on a handle changes the placement
//!   ([`TransformGizmo::apply`], [`TransformGizmo::rotate_with_pointer`])
//!
//! Hit testing happens in object space, so it is exact for any rotation and
//! non-uniform scale.

mod handles;
mod rotation;

pub use handles::{handle_layout, Corner, Edge, Handle, HandleMetrics};
pub use rotation::RotationDrag;

use crate::affine::AffineState;
use crate::config::EditorConfig;
use crate::geometry::{normalize_angle, snap_angle, CanvasFrame, Point, Size};

/// Handle set bound to one layer's live placement.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformGizmo {
    state: AffineState,
    image: Size,
    canvas: CanvasFrame,
    metrics: HandleMetrics,
    corner_scale_factor: f64,
    snap_step: f64,
}

impl TransformGizmo {
    pub fn new(state: AffineState, image: Size, canvas: CanvasFrame, config: &EditorConfig) -> Self {
        Self {
            state,
            image,
            canvas,
            metrics: HandleMetrics::from_screen(config.screen_width, config.screen_height),
            corner_scale_factor: config.corner_scale_factor,
            snap_step: config.snap_step(),
        }
    }

    pub fn state(&self) -> &AffineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AffineState {
        &mut self.state
    }

    pub fn into_state(self) -> AffineState {
        self.state
    }

    pub fn image_size(&self) -> Size {
        self.image
    }

    pub fn canvas(&self) -> CanvasFrame {
        self.canvas
    }

    pub fn metrics(&self) -> &HandleMetrics {
        &self.metrics
    }

    /// Find what lies under a canvas-space point.
    ///
    /// Handles are tried in layout order (corners, edges, rotate) and the
    /// first within the hit radius wins. Otherwise a point inside the padded
    /// box is [`Handle::Body`].
    ///
    /// # Returns
    ///
    /// `None` when the point is outside the padded box and every handle.
    pub fn hit_test(&self, point: Point) -> Option<Handle> {
        let local = self.state.to_object_space(point, self.canvas);

        let on_handle = handle_layout(self.image, &self.metrics)
            .into_iter()
            .find(|(_, at)| local.distance(*at) <= self.metrics.hit_radius)
            .map(|(handle, _)| handle);
        if on_handle.is_some() {
            return on_handle;
        }

        let (hw, hh) = self.metrics.padded_half_extents(self.image);
        (local.x.abs() <= hw && local.y.abs() <= hh).then_some(Handle::Body)
    }

    /// Apply a pointer delta (canvas pixels since the previous sample).
    ///
    /// - `None`, [`Handle::Body`] and edge handles translate by the delta
    /// - corners scale multiplicatively by `1 + delta * factor * sign`;
    ///   with `constrain` both axes take the larger magnitude
    /// - [`Handle::Rotate`] is ignored here, see [`Self::rotate_with_pointer`]
    ///
    /// Corner deltas are read along the canvas axes even when the layer is
    /// rotated.
    pub fn apply(&mut self, handle: Option<Handle>, dx: f64, dy: f64, constrain: bool) {
        match handle {
            Some(Handle::Corner(corner)) => {
                let (sx, sy) = corner.direction();
                let mut fx = 1.0 + dx * self.corner_scale_factor * sx;
                let mut fy = 1.0 + dy * self.corner_scale_factor * sy;
                if constrain {
                    let uniform = fx.abs().max(fy.abs());
                    fx = uniform;
                    fy = uniform;
                }
                self.state.scale_by(fx, fy);
            }
            Some(Handle::Rotate) => {}
            Some(Handle::Edge(_)) | Some(Handle::Body) | None => self.state.translate(dx, dy),
        }
    }

    /// Advance a rotate drag with the pointer's absolute canvas position.
    ///
    /// Returns the next drag state. The first sample only arms tracking;
    /// later samples add the shortest arc from the previous pointer angle
    /// around the pivot. With `constrain` held the resulting rotation is
    /// snapped, but the unsnapped sweep keeps accumulating so slow drags
    /// still reach the next step.
    pub fn rotate_with_pointer(
        &mut self,
        drag: RotationDrag,
        pointer: Point,
        constrain: bool,
    ) -> RotationDrag {
        let angle = pointer.angle_from(self.state.pivot(self.canvas));
        match drag {
            RotationDrag::Armed => RotationDrag::Tracking {
                last_angle: angle,
                start_rotation: self.state.rotation(),
                swept: 0.0,
            },
            RotationDrag::Tracking {
                last_angle,
                start_rotation,
                swept,
            } => {
                let swept = swept + normalize_angle(angle - last_angle);
                let rotation = start_rotation + swept;
                if constrain {
                    self.state.set_rotation(snap_angle(rotation, self.snap_step));
                } else {
                    self.state.set_rotation(rotation);
                }
                RotationDrag::Tracking {
                    last_angle: angle,
                    start_rotation,
                    swept,
                }
            }
        }
    }

    /// Canvas-space box `(min, max)` covering everything the overlay draws.
    pub fn overlay_bounds(&self) -> (Point, Point) {
        let (hw, hh) = self.metrics.padded_half_extents(self.image);
        let reach = self.metrics.handle_size + self.metrics.border_width;
        let top = -hh - self.metrics.rotate_distance - reach;
        let local = [
            Point::new(-hw - reach, top),
            Point::new(hw + reach, top),
            Point::new(hw + reach, hh + reach),
            Point::new(-hw - reach, hh + reach),
        ];

        let m = self.state.object_to_canvas(self.canvas);
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in local.map(|p| m.apply(p)) {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        // antialiasing fringe
        (min - Point::new(2.0, 2.0), max + Point::new(2.0, 2.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_SCALE;

    fn gizmo_100() -> TransformGizmo {
        // Small screen so the metric floors apply: padding 16, hit radius 32.
        let config = EditorConfig {
            screen_width: 800,
            screen_height: 600,
            ..EditorConfig::default()
        };
        let canvas = CanvasFrame::new(400, 400).unwrap();
        TransformGizmo::new(AffineState::identity(), Size::new(100, 100), canvas, &config)
    }

    fn pointer_at_degrees(gizmo: &TransformGizmo, degrees: f64) -> Point {
        let pivot = gizmo.state().pivot(gizmo.canvas());
        let r = 100.0;
        let t = degrees.to_radians();
        Point::new(pivot.x + r * t.cos(), pivot.y + r * t.sin())
    }

    #[test]
    fn test_hit_top_left_corner() {
        let gizmo = gizmo_100();
        // Image spans 150..250; padded corner is at (134, 134).
        assert_eq!(
            gizmo.hit_test(Point::new(150.0, 150.0)),
            Some(Handle::Corner(Corner::TopLeft))
        );
        assert_eq!(
            gizmo.hit_test(Point::new(134.0, 134.0)),
            Some(Handle::Corner(Corner::TopLeft))
        );
    }

    #[test]
    fn test_hit_center_is_body() {
        let gizmo = gizmo_100();
        assert_eq!(gizmo.hit_test(Point::new(200.0, 200.0)), Some(Handle::Body));
    }

    #[test]
    fn test_hit_outside_is_none() {
        let gizmo = gizmo_100();
        assert_eq!(gizmo.hit_test(Point::new(5.0, 395.0)), None);
    }

    #[test]
    fn test_hit_rotate_handle() {
        let gizmo = gizmo_100();
        // Rotate handle sits at object (0, -66 - 48) = canvas (200, 86).
        assert_eq!(gizmo.hit_test(Point::new(200.0, 86.0)), Some(Handle::Rotate));
    }

    #[test]
    fn test_corner_wins_over_overlapping_edge() {
        let config = EditorConfig {
            screen_width: 800,
            screen_height: 600,
            ..EditorConfig::default()
        };
        let canvas = CanvasFrame::new(400, 400).unwrap();
        let gizmo =
            TransformGizmo::new(AffineState::identity(), Size::new(20, 20), canvas, &config);
        // Corner at object (-26,-26), top edge at (0,-26): the point midway
        // is 13 from both.
        let p = Point::new(200.0 - 13.0, 200.0 - 26.0);
        assert_eq!(gizmo.hit_test(p), Some(Handle::Corner(Corner::TopLeft)));
    }

    #[test]
    fn test_hit_follows_rotation() {
        let mut gizmo = gizmo_100();
        gizmo.state_mut().set_rotation(std::f64::consts::FRAC_PI_2);
        // A quarter turn clockwise moves the top-left corner to the top-right
        // on screen: object (-66,-66) -> canvas (266, 134).
        assert_eq!(
            gizmo.hit_test(Point::new(266.0, 134.0)),
            Some(Handle::Corner(Corner::TopLeft))
        );
    }

    #[test]
    fn test_hit_radius_in_object_space() {
        let mut gizmo = gizmo_100();
        gizmo.state_mut().set_uniform_scale(2.0);
        // Corner is at canvas (200 - 132, 200 - 132) = (68, 68). 50px away
        // on screen is 25 object units, still inside the 32 radius.
        assert_eq!(
            gizmo.hit_test(Point::new(68.0, 118.0)),
            Some(Handle::Corner(Corner::TopLeft))
        );
    }

    #[test]
    fn test_apply_body_translates() {
        let mut gizmo = gizmo_100();
        gizmo.apply(Some(Handle::Body), 12.0, -4.0, false);
        gizmo.apply(None, 1.0, 1.0, true);
        assert_eq!(gizmo.state().position(), Point::new(13.0, -3.0));
    }

    #[test]
    fn test_apply_edge_translates() {
        let mut gizmo = gizmo_100();
        gizmo.apply(Some(Handle::Edge(Edge::Right)), 5.0, 0.0, false);
        assert_eq!(gizmo.state().position(), Point::new(5.0, 0.0));
        assert_eq!(gizmo.state().scale_x(), 1.0);
    }

    #[test]
    fn test_apply_corner_scales_by_sign() {
        let mut gizmo = gizmo_100();
        // Dragging the bottom-right corner outward grows both axes.
        gizmo.apply(Some(Handle::Corner(Corner::BottomRight)), 20.0, 10.0, false);
        assert!((gizmo.state().scale_x() - 1.1).abs() < 1e-12);
        assert!((gizmo.state().scale_y() - 1.05).abs() < 1e-12);

        // Same delta on the top-left corner shrinks.
        let mut gizmo = gizmo_100();
        gizmo.apply(Some(Handle::Corner(Corner::TopLeft)), 20.0, 10.0, false);
        assert!((gizmo.state().scale_x() - 0.9).abs() < 1e-12);
        assert!((gizmo.state().scale_y() - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_apply_corner_constrained_is_uniform() {
        let mut gizmo = gizmo_100();
        gizmo.apply(Some(Handle::Corner(Corner::BottomRight)), 20.0, 10.0, true);
        assert!((gizmo.state().scale_x() - 1.1).abs() < 1e-12);
        assert_eq!(gizmo.state().scale_x(), gizmo.state().scale_y());
    }

    #[test]
    fn test_apply_corner_extreme_delta_hits_floor() {
        let mut gizmo = gizmo_100();
        gizmo.apply(Some(Handle::Corner(Corner::BottomRight)), -1.0e6, -200.0, false);
        assert_eq!(gizmo.state().scale_x(), MIN_SCALE);
        assert_eq!(gizmo.state().scale_y(), MIN_SCALE);
    }

    #[test]
    fn test_apply_rotate_is_noop() {
        let mut gizmo = gizmo_100();
        let before = *gizmo.state();
        gizmo.apply(Some(Handle::Rotate), 30.0, 30.0, false);
        assert_eq!(*gizmo.state(), before);
    }

    #[test]
    fn test_rotation_first_sample_only_arms() {
        let mut gizmo = gizmo_100();
        let p = pointer_at_degrees(&gizmo, 40.0);
        let drag = gizmo.rotate_with_pointer(RotationDrag::Armed, p, false);
        assert!(drag.is_tracking());
        assert_eq!(gizmo.state().rotation(), 0.0);
    }

    #[test]
    fn test_rotation_wraparound_across_seam() {
        let mut gizmo = gizmo_100();
        let mut drag = RotationDrag::Armed;

        drag = gizmo.rotate_with_pointer(drag, pointer_at_degrees(&gizmo, 179.0), false);
        let r0 = gizmo.state().rotation();

        drag = gizmo.rotate_with_pointer(drag, pointer_at_degrees(&gizmo, -179.0), false);
        let r1 = gizmo.state().rotation();
        assert!(((r1 - r0).to_degrees() - 2.0).abs() < 1e-6, "step was {}", (r1 - r0).to_degrees());

        drag = gizmo.rotate_with_pointer(drag, pointer_at_degrees(&gizmo, 178.0), false);
        let r2 = gizmo.state().rotation();
        assert!(((r2 - r1).to_degrees() + 3.0).abs() < 1e-6, "step was {}", (r2 - r1).to_degrees());

        // Net change across the seam: +2 then -3.
        assert!(((r2 - r0).to_degrees() + 1.0).abs() < 1e-6);
        assert!(drag.is_tracking());
    }

    #[test]
    fn test_rotation_constrained_snaps() {
        let mut gizmo = gizmo_100();
        let mut drag = gizmo.rotate_with_pointer(
            RotationDrag::Armed,
            pointer_at_degrees(&gizmo, 0.0),
            true,
        );
        drag = gizmo.rotate_with_pointer(drag, pointer_at_degrees(&gizmo, 20.0), true);
        assert!((gizmo.state().rotation().to_degrees() - 15.0).abs() < 1e-9);
        let _ = gizmo.rotate_with_pointer(drag, pointer_at_degrees(&gizmo, 28.0), true);
        assert!((gizmo.state().rotation().to_degrees() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_constrained_slow_drag_reaches_next_step() {
        let mut gizmo = gizmo_100();
        let mut drag = RotationDrag::Armed;
        for degrees in 0..=7 {
            drag = gizmo.rotate_with_pointer(drag, pointer_at_degrees(&gizmo, degrees as f64), true);
        }
        assert!(gizmo.state().rotation().abs() < 1e-9);
        for degrees in 8..=20 {
            drag = gizmo.rotate_with_pointer(drag, pointer_at_degrees(&gizmo, degrees as f64), true);
        }
        assert!((gizmo.state().rotation().to_degrees() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_pivot_follows_position() {
        let mut gizmo = gizmo_100();
        gizmo.state_mut().translate(50.0, -30.0);
        let mut drag = RotationDrag::Armed;
        drag = gizmo.rotate_with_pointer(drag, pointer_at_degrees(&gizmo, 0.0), false);
        let _ = gizmo.rotate_with_pointer(drag, pointer_at_degrees(&gizmo, 90.0), false);
        assert!((gizmo.state().rotation().to_degrees() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlay_bounds_contain_handles() {
        let gizmo = gizmo_100();
        let (min, max) = gizmo.overlay_bounds();
        // Rotate handle at (200, 86), padded box corners at 134 / 266.
        assert!(min.y < 86.0 - 16.0);
        assert!(min.x < 134.0 - 16.0 && max.x > 266.0 + 16.0);
        assert!(max.y > 266.0 + 16.0);
        // Far corner of the canvas is untouched.
        assert!(max.x < 400.0 && max.y < 400.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::config::MIN_SCALE;
    use proptest::prelude::*;

    fn corner_strategy() -> impl Strategy<Value = Corner> {
        prop::sample::select(Corner::ALL.to_vec())
    }

    proptest! {
        /// Property: any sequence of corner drags keeps both scales positive.
        #[test]
        fn prop_corner_drags_keep_scale_positive(
            drags in prop::collection::vec(
                (corner_strategy(), -5000.0f64..5000.0, -5000.0f64..5000.0, any::<bool>()),
                1..40,
            )
        ) {
            let canvas = CanvasFrame::new(640, 480).unwrap();
            let mut gizmo = TransformGizmo::new(
                AffineState::identity(),
                Size::new(120, 80),
                canvas,
                &EditorConfig::default(),
            );
            for (corner, dx, dy, constrain) in drags {
                gizmo.apply(Some(Handle::Corner(corner)), dx, dy, constrain);
                prop_assert!(gizmo.state().scale_x() >= MIN_SCALE);
                prop_assert!(gizmo.state().scale_y() >= MIN_SCALE);
            }
        }

        /// Property: each rotation step never exceeds half a turn.
        #[test]
        fn prop_rotation_step_is_minimal_arc(
            angles in prop::collection::vec(-720.0f64..720.0, 2..30)
        ) {
            let canvas = CanvasFrame::new(500, 500).unwrap();
            let mut gizmo = TransformGizmo::new(
                AffineState::identity(),
                Size::new(50, 50),
                canvas,
                &EditorConfig::default(),
            );
            let pivot = gizmo.state().pivot(canvas);
            let mut drag = RotationDrag::Armed;
            for deg in angles {
                let t = deg.to_radians();
                let p = Point::new(pivot.x + 80.0 * t.cos(), pivot.y + 80.0 * t.sin());
                let before = gizmo.state().rotation();
                drag = gizmo.rotate_with_pointer(drag, p, false);
                let step = gizmo.state().rotation() - before;
                prop_assert!(step.abs() <= std::f64::consts::PI + 1e-9);
            }
        }
    }
}
