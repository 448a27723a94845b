//! Per-layer placement: position, rotation, scale and opacity.
//!
//! # Transform Order
//!
//! Object space to canvas space is always, in this order:
//!
//! 1. translate to the canvas center
//! 2. translate by `position`
//! 3. rotate by `rotation`
//! 4. scale by `(scale_x, scale_y)`
//! 5. translate by `(-width / 2, -height / 2)` of the image
//!
//! [`AffineState::forward`] is the only place this sequence is built; every
//! renderer and the hit tester derive their matrices from it.

use serde::Serialize;

use crate::config::MIN_SCALE;
use crate::geometry::{normalize_angle, Affine, CanvasFrame, Point, Size};

/// Placement of one layer on the canvas.
///
/// Fields are private so the scale floor and opacity range hold for every
/// value that exists. Setters silently drop non-finite input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AffineState {
    position: Point,
    rotation: f64,
    scale_x: f64,
    scale_y: f64,
    opacity: f64,
}

impl Default for AffineState {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineState {
    /// Centered, unrotated, unscaled and fully opaque.
    pub fn identity() -> Self {
        Self {
            position: Point::ORIGIN,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
        }
    }

    /// Centered and unrotated, scaled so the image fills `fill` of the canvas
    /// along its tighter dimension while keeping its aspect ratio.
    ///
    /// # Arguments
    ///
    /// * `image` - Natural image size
    /// * `canvas` - Target canvas
    /// * `fill` - Fraction of the canvas to occupy (0.8 in the default config)
    /// * `opacity` - Initial opacity, clamped to [0, 1]
    pub fn fitted(image: Size, canvas: CanvasFrame, fill: f64, opacity: f64) -> Self {
        let scale = fit_scale(image, canvas, fill);
        let mut state = Self::identity();
        state.set_scale(scale, scale);
        state.set_opacity(opacity);
        state
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Raw accumulated rotation in radians, not normalised.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotation wrapped into `(-π, π]`.
    pub fn display_rotation(&self) -> f64 {
        normalize_angle(self.rotation)
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn set_position(&mut self, position: Point) {
        if position.x.is_finite() && position.y.is_finite() {
            self.position = position;
        }
    }

    /// Additive pan in canvas pixels.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.set_position(Point::new(self.position.x + dx, self.position.y + dy));
    }

    pub fn set_rotation(&mut self, radians: f64) {
        if radians.is_finite() {
            self.rotation = radians;
        }
    }

    pub fn rotate_by(&mut self, radians: f64) {
        self.set_rotation(self.rotation + radians);
    }

    pub fn rotate_degrees(&mut self, degrees: f64) {
        self.rotate_by(degrees.to_radians());
    }

    /// Set both scale components, each floored at [`MIN_SCALE`].
    pub fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.scale_x = clamp_scale(scale_x, self.scale_x);
        self.scale_y = clamp_scale(scale_y, self.scale_y);
    }

    /// Multiply the current scale by the given factors.
    pub fn scale_by(&mut self, factor_x: f64, factor_y: f64) {
        self.set_scale(self.scale_x * factor_x, self.scale_y * factor_y);
    }

    pub fn set_uniform_scale(&mut self, scale: f64) {
        self.set_scale(scale, scale);
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        if opacity.is_finite() {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    /// Canvas-space point the layer rotates and scales around.
    pub fn pivot(&self, canvas: CanvasFrame) -> Point {
        canvas.center() + self.position
    }

    /// Object space (centered on the image) to canvas space, without the
    /// final image-centering translate. Overlays are drawn in this frame.
    pub fn object_to_canvas(&self, canvas: CanvasFrame) -> Affine {
        let center = canvas.center();
        Affine::translation(center.x, center.y)
            .translate(self.position.x, self.position.y)
            .rotate(self.rotation)
            .scale(self.scale_x, self.scale_y)
    }

    /// Image pixel space to canvas space.
    pub fn forward(&self, canvas: CanvasFrame, image: Size) -> Affine {
        let (half_w, half_h) = image.half_extents();
        self.object_to_canvas(canvas).translate(-half_w, -half_h)
    }

    /// Map a canvas-space point into object space (image center at origin,
    /// unscaled image pixels).
    pub fn to_object_space(&self, point: Point, canvas: CanvasFrame) -> Point {
        let local = point - self.pivot(canvas);
        let (sin, cos) = (-self.rotation).sin_cos();
        let rx = local.x * cos - local.y * sin;
        let ry = local.x * sin + local.y * cos;
        Point::new(rx / self.scale_x, ry / self.scale_y)
    }

    /// Rounded values for the info bar.
    pub fn readout(&self, canvas: CanvasFrame) -> TransformReadout {
        TransformReadout {
            canvas_width: canvas.width(),
            canvas_height: canvas.height(),
            scale_percent: (self.scale_x * 100.0).round() as i64,
            rotation_degrees: self.display_rotation().to_degrees().round() as i64,
            opacity_percent: (self.opacity * 100.0).round() as i64,
        }
    }
}

/// Uniform scale that fits `image` into `fill` of the canvas.
pub fn fit_scale(image: Size, canvas: CanvasFrame, fill: f64) -> f64 {
    if image.is_empty() {
        return 1.0;
    }
    let canvas_size = canvas.size();
    if image.aspect_ratio() > canvas_size.aspect_ratio() {
        canvas_size.width as f64 * fill / image.width as f64
    } else {
        canvas_size.height as f64 * fill / image.height as f64
    }
}

fn clamp_scale(value: f64, current: f64) -> f64 {
    if value.is_finite() {
        value.max(MIN_SCALE)
    } else {
        current
    }
}

/// Human-facing summary of the active layer's placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransformReadout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub scale_percent: i64,
    pub rotation_degrees: i64,
    pub opacity_percent: i64,
}
