//! Layerstage WASM - WebAssembly bindings for the layer editor
//!
//! This crate exposes [`layerstage_core::EditorSession`] to the host page. It
//! owns the browser-only pieces: fetching source images, posting the
//! completion payload, and console logging.
//!
//! # Module Structure
//!
//! - `load` - Activation handling and source fetching
//! - `session` - The `JsEditorSession` handle driven by DOM events
//! - `submit` - Completion POST
//! - `encode` - PNG data URL helper
//! - `types` - WASM-compatible wrapper types for surfaces
//!
//! # Usage
//!
//! ```typescript
//! import init, { open_session } from '@layerstage/wasm';
//!
//! await init();
//! const session = await open_session(event.detail, { screen_width: screen.width });
//! canvas.onpointermove = (e) => apply(session.pointer_move(e.offsetX, e.offsetY));
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;
use wasm_bindgen::prelude::*;

mod encode;
mod load;
mod session;
mod submit;
mod types;

pub use encode::encode_png_data_url;
pub use load::{event_targets, open_session};
pub use session::JsEditorSession;
pub use types::JsSurface;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(EnvFilter::new("info"));

    // A second start (e.g. module re-import) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Convert any displayable error into a JS string value.
pub(crate) fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}
