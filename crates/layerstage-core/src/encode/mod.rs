//! Image encoding for export.
//!
//! This module provides functionality for:
//! - Encoding RGBA surfaces to PNG
//! - Packaging PNG bytes as `data:image/png;base64,` URLs for the completion call
//!
//! # Examples
//!
//! ```ignore
//! use layerstage_core::encode::encode_data_url;
//!
//! let mask = image::RgbaImage::new(64, 64);
//! let url = encode_data_url(&mask).unwrap();
//! assert!(url.starts_with("data:image/png;base64,"));
//! ```

mod data_url;
mod png;

pub use data_url::{encode_data_url, to_data_url};
pub use png::{encode_png, encode_rgba_image, EncodeError};
