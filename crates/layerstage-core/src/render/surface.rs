//! Pixmap allocation and conversion between premultiplied and straight RGBA.

use image::RgbaImage;
use tiny_skia::Pixmap;

use super::RenderError;

/// Allocate a transparent surface.
pub fn new_surface(width: u32, height: u32) -> Result<Pixmap, RenderError> {
    Pixmap::new(width, height).ok_or(RenderError::SurfaceAllocation { width, height })
}

/// Build a premultiplied surface from straight RGBA bytes.
pub fn surface_from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Pixmap, RenderError> {
    let mut pixmap = new_surface(width, height)?;
    let expected = pixmap.data().len();
    if rgba.len() != expected {
        return Err(RenderError::PixelData {
            expected,
            actual: rgba.len(),
        });
    }
    let data = pixmap.data_mut();
    data.copy_from_slice(rgba);
    premultiply_rgba_in_place(data);
    Ok(pixmap)
}

/// Straight RGBA copy of a surface, as a canvas `getImageData` would return.
pub fn to_straight_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut bytes = pixmap.data().to_vec();
    unpremultiply_rgba_in_place(&mut bytes);
    // Length always matches width * height * 4 for a live pixmap.
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), bytes)
        .unwrap_or_else(|| RgbaImage::new(pixmap.width(), pixmap.height()))
}

fn premultiply_rgba_in_place(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(4) {
        let alpha = pixel[3] as u16;
        pixel[0] = ((pixel[0] as u16 * alpha + 127) / 255) as u8;
        pixel[1] = ((pixel[1] as u16 * alpha + 127) / 255) as u8;
        pixel[2] = ((pixel[2] as u16 * alpha + 127) / 255) as u8;
    }
}

fn unpremultiply_rgba_in_place(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(4) {
        let alpha = pixel[3];
        if alpha == 0 {
            pixel[..3].fill(0);
            continue;
        }
        let alpha = alpha as u16;
        for channel in &mut pixel[..3] {
            *channel = ((*channel as u16 * 255 + alpha / 2) / alpha).min(255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sized_surface_fails() {
        assert!(matches!(
            new_surface(0, 5),
            Err(RenderError::SurfaceAllocation { width: 0, height: 5 })
        ));
    }

    #[test]
    fn test_surface_from_rgba_premultiplies() {
        let pixmap = surface_from_rgba(1, 1, &[200, 100, 0, 128]).unwrap();
        assert_eq!(pixmap.data(), &[100, 50, 0, 128]);
    }

    #[test]
    fn test_surface_from_rgba_length_mismatch() {
        let result = surface_from_rgba(2, 2, &[0; 4]);
        assert!(matches!(result, Err(RenderError::PixelData { expected: 16, actual: 4 })));
    }

    #[test]
    fn test_opaque_round_trip_is_exact() {
        let rgba = [12, 34, 56, 255, 255, 0, 128, 255];
        let pixmap = surface_from_rgba(2, 1, &rgba).unwrap();
        assert_eq!(to_straight_rgba(&pixmap).as_raw(), &rgba.to_vec());
    }

    #[test]
    fn test_transparent_pixels_are_zeroed() {
        let pixmap = surface_from_rgba(1, 1, &[255, 255, 255, 0]).unwrap();
        assert_eq!(to_straight_rgba(&pixmap).as_raw(), &vec![0, 0, 0, 0]);
    }
}
