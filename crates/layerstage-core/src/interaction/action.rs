//! Side effects requested by input handling.

use serde::Serialize;

/// Pointer cursor, serialised as its CSS name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    #[default]
    Default,
    Move,
    Grab,
    Grabbing,
    NwResize,
    Crosshair,
}

/// Something the host should do after an input event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SetCursor { cursor: Cursor },
    /// Placement changed; redraw the preview.
    RenderNeeded,
    /// The user asked to abandon the session.
    CancelRequested,
    /// Focus moved; refresh bound widgets such as the opacity slider.
    ActiveLayerChanged { index: usize, opacity: f64 },
}
