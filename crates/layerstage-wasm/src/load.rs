//! Activation handling: parse the event, fetch sources, open a session.

use futures::future::try_join_all;
use gloo::net::http::Request;
use layerstage_core::config::EditorConfig;
use layerstage_core::session::{ActivationEvent, EditorSession, SessionSources, WindowId};
use tracing::{debug, error};
use wasm_bindgen::prelude::*;

use crate::session::JsEditorSession;
use crate::to_js_error;

/// Open an editor for an activation event.
///
/// Fetches the background and every layer image, decodes them and builds the
/// session. Rejects if any fetch or decode fails; nothing is shown then.
///
/// # Arguments
///
/// * `event` - The activation event detail object
/// * `config` - Partial `EditorConfig` object, or `undefined` for defaults
#[wasm_bindgen]
pub async fn open_session(event: JsValue, config: JsValue) -> Result<JsEditorSession, JsValue> {
    let event: ActivationEvent = serde_wasm_bindgen::from_value(event).map_err(to_js_error)?;
    let config = parse_config(config)?;

    let sources = fetch_sources(&event).await.map_err(|e| {
        error!(error = %e, "failed to fetch editor sources");
        to_js_error(e)
    })?;
    let session = EditorSession::open(&event, sources, config).map_err(|e| {
        error!(error = %e, "failed to open editor session");
        to_js_error(e)
    })?;
    Ok(JsEditorSession::new(session))
}

/// Whether an activation event is addressed to one of the given node ids.
///
/// # Arguments
///
/// * `event` - The activation event detail object
/// * `known_ids` - Array of node ids (numbers or strings) owned by this page
#[wasm_bindgen]
pub fn event_targets(event: JsValue, known_ids: JsValue) -> Result<bool, JsValue> {
    let event: ActivationEvent = serde_wasm_bindgen::from_value(event).map_err(to_js_error)?;
    let known: Vec<WindowId> = serde_wasm_bindgen::from_value(known_ids).map_err(to_js_error)?;
    Ok(event.targets(&known))
}

fn parse_config(config: JsValue) -> Result<EditorConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(EditorConfig::default());
    }
    serde_wasm_bindgen::from_value(config).map_err(to_js_error)
}

/// Fetch every source concurrently, background first.
async fn fetch_sources(event: &ActivationEvent) -> Result<SessionSources, String> {
    let fetched = try_join_all(event.source_urls().map(fetch_bytes)).await?;
    split_sources(fetched)
}

fn split_sources(fetched: Vec<Vec<u8>>) -> Result<SessionSources, String> {
    let mut fetched = fetched.into_iter();
    let background = fetched
        .next()
        .ok_or_else(|| "no background image fetched".to_string())?;
    Ok(SessionSources {
        background,
        layers: fetched.collect(),
    })
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("GET {url} failed: {e}"))?;
    if !response.ok() {
        return Err(format!("GET {url} responded with status {}", response.status()));
    }
    let bytes = response
        .binary()
        .await
        .map_err(|e| format!("GET {url} body unreadable: {e}"))?;
    debug!(url, bytes = bytes.len(), "fetched source image");
    Ok(bytes)
}
