//! Pointer, wheel and keyboard handling for the active layer.
//!
//! Handlers never touch presentation state directly. Each returns the
//! [`Action`]s the host should perform (cursor changes, redraws, cancel).
//!
//! ```text
//! Idle --down on corner/edge/rotate--> Scaling | Translating | Rotating --up--> Idle
//! Idle --down on body or nothing-----> Panning ---------------------------up--> Idle
//! ```

mod action;

pub use action::{Action, Cursor};

use serde::Serialize;
use tracing::trace;

use crate::config::EditorConfig;
use crate::geometry::Point;
use crate::gizmo::{Corner, Handle, RotationDrag, TransformGizmo};

/// Modifier keys sampled from an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Modifiers {
    /// Constrain: uniform corner scale, snapped rotation.
    pub shift: bool,
    /// Wheel rotates instead of scaling.
    pub alt: bool,
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Shift,
    Alt,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Shift" => Key::Shift,
            "Alt" => Key::Alt,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// What the current pointer session is doing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer went down off every handle.
    Panning { last: Point },
    /// Pointer went down on an edge handle.
    Translating { last: Point },
    Scaling { corner: Corner, last: Point },
    Rotating(RotationDrag),
}

#[cfg(test)]
impl DragState {
    pub(crate) fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }
}

/// Turns raw input into gizmo operations.
#[derive(Debug, Clone)]
pub struct InteractionController {
    drag: DragState,
    modifiers: Modifiers,
    cursor: Cursor,
    wheel_scale_step: f64,
    wheel_rotation_degrees: f64,
}

impl InteractionController {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            drag: DragState::Idle,
            modifiers: Modifiers::default(),
            cursor: Cursor::Default,
            wheel_scale_step: config.wheel_scale_step,
            wheel_rotation_degrees: config.wheel_rotation_degrees,
        }
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Abandon any in-progress drag, e.g. when focus moves to another layer.
    pub fn reset(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn on_pointer_down(&mut self, gizmo: &TransformGizmo, point: Point) -> Vec<Action> {
        let (drag, cursor) = match gizmo.hit_test(point) {
            Some(Handle::Corner(corner)) => (
                DragState::Scaling {
                    corner,
                    last: point,
                },
                Cursor::NwResize,
            ),
            Some(Handle::Edge(_)) => (DragState::Translating { last: point }, Cursor::Move),
            Some(Handle::Rotate) => (DragState::Rotating(RotationDrag::Armed), Cursor::Crosshair),
            Some(Handle::Body) | None => (DragState::Panning { last: point }, Cursor::Grabbing),
        };
        trace!(?drag, "pointer down");
        self.drag = drag;
        self.set_cursor(cursor).into_iter().collect()
    }

    pub fn on_pointer_move(&mut self, gizmo: &mut TransformGizmo, point: Point) -> Vec<Action> {
        let constrain = self.modifiers.shift;
        match self.drag {
            DragState::Idle => {
                let cursor = hover_cursor(gizmo.hit_test(point));
                self.set_cursor(cursor).into_iter().collect()
            }
            DragState::Panning { last } => {
                gizmo.apply(None, point.x - last.x, point.y - last.y, constrain);
                self.drag = DragState::Panning { last: point };
                vec![Action::RenderNeeded]
            }
            DragState::Translating { last } => {
                gizmo.apply(Some(Handle::Body), point.x - last.x, point.y - last.y, constrain);
                self.drag = DragState::Translating { last: point };
                vec![Action::RenderNeeded]
            }
            DragState::Scaling { corner, last } => {
                gizmo.apply(
                    Some(Handle::Corner(corner)),
                    point.x - last.x,
                    point.y - last.y,
                    constrain,
                );
                self.drag = DragState::Scaling {
                    corner,
                    last: point,
                };
                vec![Action::RenderNeeded]
            }
            DragState::Rotating(drag) => {
                let next = gizmo.rotate_with_pointer(drag, point, constrain);
                self.drag = DragState::Rotating(next);
                if drag.is_tracking() {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// End the pointer session; a rotate drag is forgotten entirely.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.drag = DragState::Idle;
        self.set_cursor(Cursor::Default).into_iter().collect()
    }

    /// Wheel step: scale by the configured percentage, or rotate with `alt`.
    ///
    /// Positive `delta_y` (scrolling down) shrinks or turns counter-clockwise.
    pub fn on_wheel(
        &mut self,
        gizmo: &mut TransformGizmo,
        delta_y: f64,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return Vec::new();
        }
        let down = delta_y > 0.0;
        let state = gizmo.state_mut();
        if modifiers.alt || self.modifiers.alt {
            let step = if down {
                -self.wheel_rotation_degrees
            } else {
                self.wheel_rotation_degrees
            };
            state.rotate_degrees(step);
        } else {
            let factor = if down {
                1.0 - self.wheel_scale_step
            } else {
                1.0 + self.wheel_scale_step
            };
            let scale = state.scale_x() * factor;
            state.set_uniform_scale(scale);
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: Key) -> Vec<Action> {
        match key {
            Key::Shift => self.modifiers.shift = true,
            Key::Alt => self.modifiers.alt = true,
            Key::Escape => return vec![Action::CancelRequested],
            Key::Other => {}
        }
        Vec::new()
    }

    pub fn on_key_up(&mut self, key: Key) -> Vec<Action> {
        match key {
            Key::Shift => self.modifiers.shift = false,
            Key::Alt => self.modifiers.alt = false,
            Key::Escape | Key::Other => {}
        }
        Vec::new()
    }

    fn set_cursor(&mut self, cursor: Cursor) -> Option<Action> {
        if self.cursor == cursor {
            return None;
        }
        self.cursor = cursor;
        Some(Action::SetCursor { cursor })
    }
}

/// Cursor shown while hovering, no button held.
pub fn hover_cursor(handle: Option<Handle>) -> Cursor {
    match handle {
        Some(Handle::Corner(_)) => Cursor::NwResize,
        Some(Handle::Rotate) => Cursor::Crosshair,
        // Edge drags translate like the body.
        Some(Handle::Edge(_)) | Some(Handle::Body) => Cursor::Move,
        None => Cursor::Grab,
    }
}
