//! One editing session, from activation to completion.
//!
//! The session owns every piece of editor state: decoded background, layer
//! stack, compositor and input controller. It moves through three phases:
//!
//! ```text
//! open --> Editing --commit--> Submitting --settle--> Closed
//!             \------cancel------------------------->/
//! ```
//!
//! Input handlers and commands only act while `Editing`.

mod event;
mod payload;

pub use event::{ActivationEvent, LayerDescriptor, WindowId};
pub use payload::{CompletionPayload, SubmissionError};

use image::RgbaImage;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::affine::TransformReadout;
use crate::config::{EditorConfig, MASK_SLOT_COUNT};
use crate::decode::{decode_image, DecodeError};
use crate::encode::EncodeError;
use crate::geometry::{CanvasFrame, Point};
use crate::interaction::{Action, InteractionController, Key, Modifiers};
use crate::layers::{Layer, LayerImage, LayerSlot, LayerStack};
use crate::render::{Compositor, Overlay, RenderError};

/// Errors raised by the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("Activation carried no layers")]
    NoLayers,

    #[error("Too many layers: {0} (at most 10)")]
    TooManyLayers(usize),

    #[error("Layer '{name}' has slot index {index}, outside 0..10")]
    InvalidSlot { name: String, index: usize },

    #[error("Layer '{name}' reuses slot index {index}")]
    DuplicateSlot { name: String, index: usize },

    #[error("Expected {expected} layer sources, got {actual}")]
    SourceCountMismatch { expected: usize, actual: usize },

    #[error("Background image failed to decode: {0}")]
    Background(#[source] DecodeError),

    #[error("Layer '{name}' failed to decode: {source}")]
    Layer {
        name: String,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Commit attempted after the session left the editing phase.
    #[error("Session is not editing")]
    NotEditing,
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Editing,
    Submitting,
    Closed,
}

/// Encoded image bytes fetched for an activation event.
#[derive(Debug, Clone, Default)]
pub struct SessionSources {
    pub background: Vec<u8>,
    /// One entry per layer descriptor, in descriptor order.
    pub layers: Vec<Vec<u8>>,
}

/// A live editor.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    window_id: WindowId,
    background: LayerImage,
    stack: LayerStack,
    compositor: Compositor,
    controller: InteractionController,
    phase: SessionPhase,
}

impl EditorSession {
    /// Decode every source and build the session.
    ///
    /// Nothing is kept if any image fails; the host shows nothing.
    ///
    /// # Arguments
    /// * `event` - The activation event
    /// * `sources` - Encoded bytes for the background and each layer
    /// * `config` - Editor tuning
    pub fn open(
        event: &ActivationEvent,
        sources: SessionSources,
        config: EditorConfig,
    ) -> Result<Self, SessionError> {
        let canvas = CanvasFrame::new(event.canvas_width, event.canvas_height).ok_or(
            SessionError::InvalidCanvas {
                width: event.canvas_width,
                height: event.canvas_height,
            },
        )?;
        let slots = resolve_slots(&event.layers)?;
        if sources.layers.len() != event.layers.len() {
            return Err(SessionError::SourceCountMismatch {
                expected: event.layers.len(),
                actual: sources.layers.len(),
            });
        }

        let background = decode_image(&sources.background).map_err(|e| {
            warn!(url = %event.back_image, error = %e, "background decode failed");
            SessionError::Background(e)
        })?;
        let background = LayerImage::from_decoded(&background)?;

        let mut layers = Vec::with_capacity(event.layers.len());
        for ((descriptor, slot), bytes) in event.layers.iter().zip(slots).zip(&sources.layers) {
            let decoded = decode_image(bytes).map_err(|e| {
                warn!(layer = %descriptor.name, url = %descriptor.url, error = %e, "layer decode failed");
                SessionError::Layer {
                    name: descriptor.name.clone(),
                    source: e,
                }
            })?;
            let image = LayerImage::from_decoded(&decoded)?;
            layers.push(Layer::new(
                descriptor.name.as_str(),
                slot,
                image,
                descriptor.opacity.unwrap_or(1.0),
            ));
        }

        let stack = LayerStack::new(layers, canvas, &config).ok_or(SessionError::NoLayers)?;
        let compositor = Compositor::new(canvas)?;
        let controller = InteractionController::new(&config);

        info!(
            window_id = %event.window_id,
            layers = stack.len(),
            width = canvas.width(),
            height = canvas.height(),
            "opened editor session"
        );

        Ok(Self {
            config,
            window_id: event.window_id.clone(),
            background,
            stack,
            compositor,
            controller,
            phase: SessionPhase::Editing,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_editing(&self) -> bool {
        self.phase == SessionPhase::Editing
    }

    pub fn window_id(&self) -> &WindowId {
        &self.window_id
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn canvas(&self) -> CanvasFrame {
        self.stack.canvas()
    }

    pub fn stack(&self) -> &LayerStack {
        &self.stack
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> Vec<Action> {
        if !self.is_editing() {
            return Vec::new();
        }
        self.controller
            .on_pointer_down(self.stack.gizmo(), Point::new(x, y))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Vec<Action> {
        if !self.is_editing() {
            return Vec::new();
        }
        self.controller
            .on_pointer_move(self.stack.gizmo_mut(), Point::new(x, y))
    }

    pub fn pointer_up(&mut self) -> Vec<Action> {
        if !self.is_editing() {
            return Vec::new();
        }
        self.controller.on_pointer_up()
    }

    pub fn wheel(&mut self, delta_y: f64, modifiers: Modifiers) -> Vec<Action> {
        if !self.is_editing() {
            return Vec::new();
        }
        self.controller
            .on_wheel(self.stack.gizmo_mut(), delta_y, modifiers)
    }

    pub fn key_down(&mut self, key: Key) -> Vec<Action> {
        if !self.is_editing() {
            return Vec::new();
        }
        self.controller.on_key_down(key)
    }

    pub fn key_up(&mut self, key: Key) -> Vec<Action> {
        if !self.is_editing() {
            return Vec::new();
        }
        self.controller.on_key_up(key)
    }

    /// Focus another layer. Any drag in progress is dropped.
    pub fn switch_active(&mut self, index: usize) -> Vec<Action> {
        if !self.is_editing() || !self.stack.switch_active(index) {
            return Vec::new();
        }
        self.controller.reset();
        vec![
            Action::ActiveLayerChanged {
                index,
                opacity: self.stack.gizmo().state().opacity(),
            },
            Action::RenderNeeded,
        ]
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> Vec<Action> {
        if !self.is_editing() || !self.stack.reorder(from, to) {
            return Vec::new();
        }
        vec![Action::RenderNeeded]
    }

    pub fn rotate(&mut self, degrees: f64) -> Vec<Action> {
        self.command(|stack| stack.rotate_active(degrees))
    }

    pub fn reset(&mut self) -> Vec<Action> {
        self.command(LayerStack::reset_active)
    }

    pub fn set_scale(&mut self, scale: f64) -> Vec<Action> {
        self.command(|stack| stack.set_active_scale(scale))
    }

    pub fn set_opacity(&mut self, opacity: f64) -> Vec<Action> {
        self.command(|stack| stack.set_active_opacity(opacity))
    }

    /// Numbers for the info bar.
    pub fn readout(&self) -> TransformReadout {
        self.stack.gizmo().state().readout(self.stack.canvas())
    }

    /// Redraw the preview with handles and return it as straight RGBA.
    ///
    /// Returns `None` once the session has left the editing phase.
    pub fn render_preview(&mut self) -> Option<RgbaImage> {
        if !self.is_editing() {
            return None;
        }
        self.compositor
            .render_preview(&self.background, &self.stack, Overlay::Visible);
        Some(self.compositor.preview_rgba())
    }

    /// Store the live placement, render the export and encode it.
    ///
    /// On success the session is `Submitting` until [`settle`](Self::settle)
    /// is called with the outcome of the completion call.
    pub fn commit(&mut self) -> Result<CompletionPayload, SessionError> {
        if !self.is_editing() {
            return Err(SessionError::NotEditing);
        }
        self.controller.reset();
        self.stack.flush_active();

        let bundle = self
            .compositor
            .render_export(&self.background, &self.stack)
            .inspect_err(|e| error!(error = %e, "export render failed"))?;
        let payload = CompletionPayload::from_export(&bundle)
            .inspect_err(|e| error!(error = %e, "export encoding failed"))?;

        self.phase = SessionPhase::Submitting;
        info!(window_id = %self.window_id, layers = self.stack.len(), "committed editor session");
        Ok(payload)
    }

    /// Record the outcome of a completion call. The session closes either way.
    pub fn settle(&mut self, outcome: Result<(), SubmissionError>) {
        match outcome {
            Ok(()) => debug!(window_id = %self.window_id, "completion delivered"),
            Err(e) => error!(window_id = %self.window_id, error = %e, "completion call failed"),
        }
        self.phase = SessionPhase::Closed;
    }

    /// Abandon the session.
    ///
    /// Returns the cancellation body to send, or `None` if the session was
    /// not editing.
    pub fn cancel(&mut self) -> Option<CompletionPayload> {
        if !self.is_editing() {
            return None;
        }
        self.controller.reset();
        self.phase = SessionPhase::Closed;
        info!(window_id = %self.window_id, "cancelled editor session");
        Some(CompletionPayload::cancelled())
    }

    fn command(&mut self, apply: impl FnOnce(&mut LayerStack)) -> Vec<Action> {
        if !self.is_editing() {
            return Vec::new();
        }
        apply(&mut self.stack);
        vec![Action::RenderNeeded]
    }
}

/// Validate layer count and derive each layer's slot.
fn resolve_slots(descriptors: &[LayerDescriptor]) -> Result<Vec<LayerSlot>, SessionError> {
    if descriptors.is_empty() {
        return Err(SessionError::NoLayers);
    }
    if descriptors.len() > MASK_SLOT_COUNT {
        return Err(SessionError::TooManyLayers(descriptors.len()));
    }

    let mut taken = [false; MASK_SLOT_COUNT];
    descriptors
        .iter()
        .enumerate()
        .map(|(position, descriptor)| {
            let index = descriptor.index.unwrap_or(position);
            let slot = LayerSlot::from_index(index).ok_or_else(|| SessionError::InvalidSlot {
                name: descriptor.name.clone(),
                index,
            })?;
            if std::mem::replace(&mut taken[slot.index()], true) {
                return Err(SessionError::DuplicateSlot {
                    name: descriptor.name.clone(),
                    index,
                });
            }
            Ok(slot)
        })
        .collect()
}
