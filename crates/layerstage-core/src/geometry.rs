//! Planar geometry shared by the gizmo, the layer stack and the compositor.
//!
//! # Coordinate System
//!
//! - Canvas space: pixels of the fixed-size canvas backing store, origin at the
//!   top-left corner, y pointing down
//! - Object space: pixels of a layer's own image, origin at the image center
//! - Positive rotation turns clockwise on screen (y-down), like a 2D canvas
//!
//! Layer placement is always expressed relative to the canvas center, never
//! its top-left origin; [`CanvasFrame::center`] is the single source of that
//! pivot.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

/// A point or displacement in 2D.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle of the vector from `pivot` to `self`, in radians.
    pub fn angle_from(self, pivot: Point) -> f64 {
        (self.y - pivot.y).atan2(self.x - pivot.x)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height.
    pub fn aspect_ratio(self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn half_extents(self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

/// The fixed canvas every layer is placed on.
///
/// Set once when a session opens and never resized afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasFrame {
    size: Size,
}

impl CanvasFrame {
    /// Returns `None` for a zero-sized canvas.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        let size = Size::new(width, height);
        (!size.is_empty()).then_some(Self { size })
    }

    pub fn size(self) -> Size {
        self.size
    }

    pub fn width(self) -> u32 {
        self.size.width
    }

    pub fn height(self) -> u32 {
        self.size.height
    }

    /// Geometric center, the pivot all layer positions are relative to.
    pub fn center(self) -> Point {
        let (cx, cy) = self.size.half_extents();
        Point::new(cx, cy)
    }
}

/// A 2D affine matrix in canvas convention.
///
/// ```text
/// | a  c  e |
/// | b  d  f |
/// | 0  0  1 |
/// ```
///
/// `translate`, `rotate` and `scale` append in the local (object) frame,
/// exactly like the corresponding calls on a 2D canvas context, so a chain of
/// calls reads in the same order as the drawing code it replaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self * other`: `other` is applied to points first.
    pub fn then(self, other: Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn translate(self, tx: f64, ty: f64) -> Affine {
        self.then(Affine::translation(tx, ty))
    }

    pub fn rotate(self, radians: f64) -> Affine {
        let (sin, cos) = radians.sin_cos();
        self.then(Affine {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        })
    }

    pub fn scale(self, sx: f64, sy: f64) -> Affine {
        self.then(Affine {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        })
    }

    pub fn apply(self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Convert to the rasteriser's single-precision transform.
    pub fn to_skia(self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_row(
            self.a as f32,
            self.b as f32,
            self.c as f32,
            self.d as f32,
            self.e as f32,
            self.f as f32,
        )
    }
}

/// Wrap an angle into `(-π, π]`.
///
/// Used both for display and for turning the difference of two `atan2`
/// samples into the shortest signed arc between them.
pub fn normalize_angle(radians: f64) -> f64 {
    let wrapped = radians.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Round an angle to the nearest multiple of `step`.
///
/// A non-positive step leaves the angle unchanged.
pub fn snap_angle(radians: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return radians;
    }
    (radians / step).round() * step
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_point_eq(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_canvas_frame_rejects_empty() {
        assert!(CanvasFrame::new(0, 10).is_none());
        assert!(CanvasFrame::new(10, 0).is_none());
        assert!(CanvasFrame::new(1, 1).is_some());
    }

    #[test]
    fn test_canvas_center() {
        let frame = CanvasFrame::new(200, 100).unwrap();
        assert_point_eq(frame.center(), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_translate_then_scale_order() {
        // Canvas semantics: the last call is applied to points first.
        let m = Affine::IDENTITY.translate(10.0, 0.0).scale(2.0, 2.0);
        assert_point_eq(m.apply(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));
    }

    #[test]
    fn test_rotate_quarter_turn_is_clockwise_on_screen() {
        let m = Affine::IDENTITY.rotate(PI / 2.0);
        // +x maps to +y (down) in a y-down frame.
        assert_point_eq(m.apply(Point::new(1.0, 0.0)), Point::new(0.0, 1.0));
    }

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(PI) - PI).abs() < EPS);
        assert!((normalize_angle(-PI) - PI).abs() < EPS);
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < EPS);
        assert!((normalize_angle(5.0 * TAU + 0.1) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_shortest_arc_across_seam() {
        let a = 179f64.to_radians();
        let b = (-179f64).to_radians();
        let arc = normalize_angle(b - a);
        assert!((arc - 2f64.to_radians()).abs() < 1e-9);
    }

    #[test]
    fn test_snap_angle() {
        let step = PI / 12.0;
        assert!((snap_angle(0.27, step) - step).abs() < EPS);
        assert!((snap_angle(0.1, step)).abs() < EPS);
        assert_eq!(snap_angle(0.3, 0.0), 0.3);
    }

    #[test]
    fn test_angle_from_pivot() {
        let pivot = Point::new(10.0, 10.0);
        assert!((Point::new(10.0, 20.0).angle_from(pivot) - PI / 2.0).abs() < EPS);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: normalised angles always land in (-π, π].
        #[test]
        fn prop_normalize_in_half_open_range(theta in -1000.0f64..1000.0) {
            let n = normalize_angle(theta);
            prop_assert!(n > -PI - 1e-12 && n <= PI + 1e-12, "{} -> {}", theta, n);
            // Same direction as the input.
            prop_assert!((n.sin() - theta.sin()).abs() < 1e-6);
            prop_assert!((n.cos() - theta.cos()).abs() < 1e-6);
        }
    }
}
