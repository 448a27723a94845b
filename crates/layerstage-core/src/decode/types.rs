//! Decoded source images and decode failures.

use thiserror::Error;

/// Why a source image could not be used.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Neither PNG nor JPEG.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// Recognised container, but the data is broken or cut short.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// Decoded to zero width or height.
    #[error("Image has no pixels")]
    EmptyImage,
}

/// EXIF orientation tag (1-8). Unknown values read as `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    /// Mirrored across the main diagonal.
    Transpose,
    Rotate90CW,
    /// Mirrored across the anti-diagonal.
    Transverse,
    Rotate270CW,
}

impl From<u32> for Orientation {
    fn from(tag: u32) -> Self {
        match tag {
            2 => Self::FlipHorizontal,
            3 => Self::Rotate180,
            4 => Self::FlipVertical,
            5 => Self::Transpose,
            6 => Self::Rotate90CW,
            7 => Self::Transverse,
            8 => Self::Rotate270CW,
            _ => Self::Normal,
        }
    }
}

/// A decoded image with straight (non-premultiplied) RGBA pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }
}
