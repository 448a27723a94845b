//! Editor tuning knobs.
//!
//! The host may pass a partial object (or nothing at all); every missing field
//! falls back to its default.

use serde::{Deserialize, Serialize};

/// Smallest scale component a layer can reach.
pub const MIN_SCALE: f64 = 0.0001;

/// Number of fixed per-layer mask slots in an export.
pub const MASK_SLOT_COUNT: usize = 10;

/// Edge length of the solid black image filling an unused mask slot.
pub const PLACEHOLDER_MASK_SIZE: u32 = 64;

/// Runtime configuration for an editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Display width in device pixels, feeds handle sizing.
    pub screen_width: u32,
    /// Display height in device pixels, feeds handle sizing.
    pub screen_height: u32,
    /// Scale change per pixel of corner drag.
    pub corner_scale_factor: f64,
    /// Rotation snap increment while the constrain modifier is held.
    pub snap_angle_degrees: f64,
    /// Relative scale change per wheel notch.
    pub wheel_scale_step: f64,
    /// Rotation per wheel notch with the rotate modifier held.
    pub wheel_rotation_degrees: f64,
    /// Fraction of the canvas a freshly activated layer fills.
    pub initial_fit: f64,
    /// Completion endpoint the wasm layer posts to.
    pub endpoint: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            screen_width: 1920,
            screen_height: 1080,
            corner_scale_factor: 0.005,
            snap_angle_degrees: 15.0,
            wheel_scale_step: 0.05,
            wheel_rotation_degrees: 5.0,
            initial_fit: 0.8,
            endpoint: "/canvas_pro/save".to_string(),
        }
    }
}

impl EditorConfig {
    /// Snap increment in radians.
    pub fn snap_step(&self) -> f64 {
        self.snap_angle_degrees.to_radians()
    }
}
