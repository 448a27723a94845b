//! Image decoding for layer and background sources.
//!
//! Bytes fetched by the host are sniffed (PNG or JPEG), decoded, turned
//! upright according to their EXIF orientation and widened to straight RGBA.
//! Decoding happens once per source when a session opens; a failure on any
//! source aborts the session before anything is drawn.

mod raster;
mod types;

pub use raster::decode_image;
pub use types::{DecodeError, DecodedImage, Orientation};
