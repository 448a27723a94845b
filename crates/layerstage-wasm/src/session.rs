//! The session handle the host page drives.
//!
//! Every input method returns an array of action objects, e.g.
//! `[{type: "set_cursor", cursor: "nw-resize"}, {type: "render_needed"}]`.
//! The host applies them: set the canvas cursor, redraw via
//! [`JsEditorSession::render_preview`], or call `cancel()`.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use layerstage_core::interaction::{Action, Key, Modifiers};
use layerstage_core::session::{EditorSession, SessionPhase};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use crate::submit::post_completion;
use crate::to_js_error;
use crate::types::JsSurface;

/// One row of the layer panel.
#[derive(Serialize)]
struct LayerRow<'a> {
    name: &'a str,
    slot: u8,
    active: bool,
}

/// A live editor session.
///
/// Shared with the in-flight completion future, which settles it once the
/// POST returns.
#[wasm_bindgen]
pub struct JsEditorSession {
    inner: Rc<RefCell<EditorSession>>,
}

impl JsEditorSession {
    pub(crate) fn new(session: EditorSession) -> Self {
        Self {
            inner: Rc::new(RefCell::new(session)),
        }
    }

    fn dispatch(
        &self,
        handle: impl FnOnce(&mut EditorSession) -> Vec<Action>,
    ) -> Result<JsValue, JsValue> {
        let actions = handle(&mut *self.inner.borrow_mut());
        serde_wasm_bindgen::to_value(&actions).map_err(to_js_error)
    }
}

#[wasm_bindgen]
impl JsEditorSession {
    pub fn pointer_down(&self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        self.dispatch(|s| s.pointer_down(x, y))
    }

    pub fn pointer_move(&self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        self.dispatch(|s| s.pointer_move(x, y))
    }

    pub fn pointer_up(&self) -> Result<JsValue, JsValue> {
        self.dispatch(|s| s.pointer_up())
    }

    /// Wheel step. `alt` rotates instead of scaling.
    pub fn wheel(&self, delta_y: f64, alt: bool) -> Result<JsValue, JsValue> {
        self.dispatch(|s| s.wheel(delta_y, Modifiers { shift: false, alt }))
    }

    /// # Arguments
    /// * `key` - `KeyboardEvent.key`
    pub fn key_down(&self, key: &str) -> Result<JsValue, JsValue> {
        let key = Key::from_dom(key);
        self.dispatch(|s| s.key_down(key))
    }

    pub fn key_up(&self, key: &str) -> Result<JsValue, JsValue> {
        let key = Key::from_dom(key);
        self.dispatch(|s| s.key_up(key))
    }

    pub fn switch_active(&self, index: usize) -> Result<JsValue, JsValue> {
        self.dispatch(|s| s.switch_active(index))
    }

    pub fn reorder(&self, from: usize, to: usize) -> Result<JsValue, JsValue> {
        self.dispatch(|s| s.reorder(from, to))
    }

    /// Rotate the active layer, e.g. `rotate(90)` or `rotate(-90)`.
    pub fn rotate(&self, degrees: f64) -> Result<JsValue, JsValue> {
        self.dispatch(|s| s.rotate(degrees))
    }

    pub fn reset(&self) -> Result<JsValue, JsValue> {
        self.dispatch(|s| s.reset())
    }

    /// Uniform scale factor; a percentage input passes `percent / 100`.
    pub fn set_scale(&self, scale: f64) -> Result<JsValue, JsValue> {
        self.dispatch(|s| s.set_scale(scale))
    }

    pub fn set_opacity(&self, opacity: f64) -> Result<JsValue, JsValue> {
        self.dispatch(|s| s.set_opacity(opacity))
    }

    /// `{canvas_width, canvas_height, scale_percent, rotation_degrees, opacity_percent}`
    pub fn readout(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.borrow().readout()).map_err(to_js_error)
    }

    /// Layers in display order (bottom first) as `{name, slot, active}`.
    pub fn layers(&self) -> Result<JsValue, JsValue> {
        let session = self.inner.borrow();
        let stack = session.stack();
        let rows: Vec<LayerRow<'_>> = stack
            .layers()
            .iter()
            .enumerate()
            .map(|(i, layer)| LayerRow {
                name: layer.name(),
                slot: layer.slot().get(),
                active: i == stack.active_index(),
            })
            .collect();
        serde_wasm_bindgen::to_value(&rows).map_err(to_js_error)
    }

    /// Redraw the preview. `undefined` once the session is no longer editing.
    pub fn render_preview(&self) -> Option<JsSurface> {
        self.inner.borrow_mut().render_preview().map(JsSurface::from)
    }

    /// Render and submit the export.
    ///
    /// Rejects immediately if the export can't be produced. Otherwise resolves
    /// to whether the completion endpoint accepted it; the session is closed
    /// in both cases.
    pub fn commit(&self) -> Result<Promise, JsValue> {
        let payload = self.inner.borrow_mut().commit().map_err(to_js_error)?;
        let endpoint = self.inner.borrow().config().endpoint.clone();
        let session = Rc::clone(&self.inner);

        Ok(future_to_promise(async move {
            let outcome = post_completion(&endpoint, &payload).await;
            let delivered = outcome.is_ok();
            session.borrow_mut().settle(outcome);
            Ok(JsValue::from_bool(delivered))
        }))
    }

    /// Close the session and notify the endpoint in the background.
    pub fn cancel(&self) {
        let Some(payload) = self.inner.borrow_mut().cancel() else {
            return;
        };
        let endpoint = self.inner.borrow().config().endpoint.clone();
        let session = Rc::clone(&self.inner);

        spawn_local(async move {
            let outcome = post_completion(&endpoint, &payload).await;
            session.borrow_mut().settle(outcome);
        });
    }

    pub fn is_editing(&self) -> bool {
        self.inner.borrow().is_editing()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.borrow().phase() == SessionPhase::Closed
    }
}
