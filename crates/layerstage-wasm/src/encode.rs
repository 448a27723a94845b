//! PNG data URL helper.
//!
//! The session encodes its own export; this is for hosts that want to turn
//! an arbitrary RGBA buffer (e.g. a preview snapshot) into a data URL.

use layerstage_core::encode::{encode_png, to_data_url};
use wasm_bindgen::prelude::*;

use crate::to_js_error;

/// Encode straight RGBA pixels as a `data:image/png;base64,` URL.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Errors
///
/// Returns an error if the pixel data length doesn't match width * height * 4
/// or either dimension is zero.
#[wasm_bindgen]
pub fn encode_png_data_url(pixels: &[u8], width: u32, height: u32) -> Result<String, JsValue> {
    let png = encode_png(pixels, width, height).map_err(to_js_error)?;
    Ok(to_data_url(&png))
}
