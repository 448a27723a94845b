//! The ordered layer stack and its focus model.
//!
//! # Focus
//!
//! Exactly one layer is active at any time. Its live placement is held by the
//! [`TransformGizmo`], not by the layer record; the record is only updated
//! when focus moves away (flush on switch). Layers that were never focused
//! render with the same fitted default they will get on first activation.
//!
//! # Identity
//!
//! Each layer carries a [`LayerSlot`] assigned once on load. Display order
//! may change freely; the slot never does, and exported masks are addressed
//! by it.

mod content;

pub use content::LayerImage;

use serde::Serialize;
use tracing::debug;

use crate::affine::AffineState;
use crate::config::{EditorConfig, MASK_SLOT_COUNT};
use crate::geometry::CanvasFrame;
use crate::gizmo::TransformGizmo;

/// Stable 1-based identity of a layer, `1..=MASK_SLOT_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LayerSlot(u8);

impl LayerSlot {
    pub fn new(slot: u8) -> Option<Self> {
        (1..=MASK_SLOT_COUNT as u8).contains(&slot).then_some(Self(slot))
    }

    /// From a 0-based position, as sent in layer descriptors.
    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index + 1).ok().and_then(Self::new)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Position in the fixed mask array.
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }
}

/// One image layer.
#[derive(Debug, Clone)]
pub struct Layer {
    name: String,
    slot: LayerSlot,
    image: LayerImage,
    initial_opacity: f64,
    transform: Option<AffineState>,
}

impl Layer {
    pub fn new(name: impl Into<String>, slot: LayerSlot, image: LayerImage, opacity: f64) -> Self {
        let initial_opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            name: name.into(),
            slot,
            image,
            initial_opacity,
            transform: None,
        }
    }

    /// Start with a recorded placement instead of the fitted default.
    #[cfg(test)]
    pub(crate) fn with_transform(mut self, transform: AffineState) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot(&self) -> LayerSlot {
        self.slot
    }

    pub fn image(&self) -> &LayerImage {
        &self.image
    }

    /// Placement recorded when this layer last lost focus.
    #[cfg(test)]
    pub(crate) fn stored_transform(&self) -> Option<&AffineState> {
        self.transform.as_ref()
    }

    /// Stored placement, or the fitted default for a layer never focused.
    pub fn resolved_transform(&self, canvas: CanvasFrame, fill: f64) -> AffineState {
        self.transform.unwrap_or_else(|| {
            AffineState::fitted(self.image.size(), canvas, fill, self.initial_opacity)
        })
    }
}

/// Ordered layers, back to front, plus the live gizmo of the active one.
#[derive(Debug, Clone)]
pub struct LayerStack {
    layers: Vec<Layer>,
    active: usize,
    gizmo: TransformGizmo,
    canvas: CanvasFrame,
    config: EditorConfig,
}

impl LayerStack {
    /// Build a stack with the first layer active.
    ///
    /// Returns `None` for an empty layer list.
    pub fn new(layers: Vec<Layer>, canvas: CanvasFrame, config: &EditorConfig) -> Option<Self> {
        let first = layers.first()?;
        let gizmo = bind_gizmo(first, canvas, config);
        Some(Self {
            layers,
            active: 0,
            gizmo,
            canvas,
            config: config.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn canvas(&self) -> CanvasFrame {
        self.canvas
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_layer(&self) -> &Layer {
        &self.layers[self.active]
    }

    pub fn gizmo(&self) -> &TransformGizmo {
        &self.gizmo
    }

    pub fn gizmo_mut(&mut self) -> &mut TransformGizmo {
        &mut self.gizmo
    }

    /// Placement a renderer must use for the layer at `index`.
    pub fn effective_transform(&self, index: usize) -> Option<AffineState> {
        if index == self.active {
            return Some(*self.gizmo.state());
        }
        self.layers
            .get(index)
            .map(|layer| layer.resolved_transform(self.canvas, self.config.initial_fit))
    }

    /// Layers in display order with the placement each should be drawn with.
    pub fn draw_list(&self) -> impl Iterator<Item = (&Layer, AffineState)> + '_ {
        self.layers.iter().enumerate().map(move |(i, layer)| {
            let state = if i == self.active {
                *self.gizmo.state()
            } else {
                layer.resolved_transform(self.canvas, self.config.initial_fit)
            };
            (layer, state)
        })
    }

    /// Move focus to another layer.
    ///
    /// The outgoing layer's live placement is stored first. Returns `false`
    /// when `index` is already active or out of range.
    pub fn switch_active(&mut self, index: usize) -> bool {
        if index == self.active {
            return false;
        }
        let Some(next) = self.layers.get(index) else {
            debug!(index, len = self.layers.len(), "ignoring switch to missing layer");
            return false;
        };

        let incoming = bind_gizmo(next, self.canvas, &self.config);
        let outgoing = std::mem::replace(&mut self.gizmo, incoming);
        self.layers[self.active].transform = Some(outgoing.into_state());

        debug!(from = self.active, to = index, "switched active layer");
        self.active = index;
        true
    }

    /// Store the live placement into the active layer without moving focus.
    pub fn flush_active(&mut self) {
        self.layers[self.active].transform = Some(*self.gizmo.state());
    }

    /// Move the layer at `from` to display position `to`.
    ///
    /// The active index follows the same logical layer. Returns `false` for
    /// out-of-range positions or a move onto itself.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.layers.len();
        if from >= len || to >= len {
            debug!(from, to, len, "ignoring out-of-range reorder");
            return false;
        }
        if from == to {
            return false;
        }

        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        self.active = remap_active(self.active, from, to);
        debug!(from, to, active = self.active, "reordered layers");
        true
    }

    /// Rotate the active layer by a number of degrees.
    pub fn rotate_active(&mut self, degrees: f64) {
        self.gizmo.state_mut().rotate_degrees(degrees);
    }

    /// Re-centre, un-rotate and re-fit the active layer. Opacity is kept.
    pub fn reset_active(&mut self) {
        let opacity = self.gizmo.state().opacity();
        let fitted = AffineState::fitted(
            self.gizmo.image_size(),
            self.canvas,
            self.config.initial_fit,
            opacity,
        );
        *self.gizmo.state_mut() = fitted;
    }

    /// Set a uniform scale on the active layer (floor-clamped).
    pub fn set_active_scale(&mut self, scale: f64) {
        self.gizmo.state_mut().set_uniform_scale(scale);
    }

    pub fn set_active_opacity(&mut self, opacity: f64) {
        self.gizmo.state_mut().set_opacity(opacity);
    }
}

fn bind_gizmo(layer: &Layer, canvas: CanvasFrame, config: &EditorConfig) -> TransformGizmo {
    let state = layer.resolved_transform(canvas, config.initial_fit);
    TransformGizmo::new(state, layer.image.size(), canvas, config)
}

fn remap_active(active: usize, from: usize, to: usize) -> usize {
    if active == from {
        to
    } else if from < active && active <= to {
        active - 1
    } else if from > active && active >= to {
        active + 1
    } else {
        active
    }
}
