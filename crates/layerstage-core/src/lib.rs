//! Layerstage Core - layer placement and compositing engine
//!
//! This crate holds everything the layer editor does that doesn't need a
//! browser: placement state and its transform, the on-canvas gizmo and its hit
//! testing, input handling, deterministic compositing of the preview and the
//! export, mask generation, and image decode/encode.
//!
//! The `layerstage-wasm` crate wraps [`session::EditorSession`] for the host page.

pub mod affine;
pub mod config;
pub mod decode;
pub mod encode;
pub mod geometry;
pub mod gizmo;
pub mod interaction;
pub mod layers;
pub mod mask;
pub mod render;
pub mod session;

pub use affine::{AffineState, TransformReadout};
pub use config::EditorConfig;
pub use geometry::{CanvasFrame, Point, Size};
pub use gizmo::{Handle, TransformGizmo};
pub use interaction::{Action, Cursor, InteractionController, Key, Modifiers};
pub use layers::{Layer, LayerImage, LayerSlot, LayerStack};
pub use render::{Compositor, ExportBundle, Overlay};
pub use session::{
    ActivationEvent, CompletionPayload, EditorSession, SessionError, SessionPhase, SessionSources,
    SubmissionError, WindowId,
};
