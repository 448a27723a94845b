//! Rasterised layer content.

use tiny_skia::{Pixmap, PixmapRef};

use crate::decode::DecodedImage;
use crate::geometry::Size;
use crate::render::surface::surface_from_rgba;
use crate::render::RenderError;

/// An image ready to be drawn: premultiplied RGBA at its natural size.
#[derive(Debug, Clone)]
pub struct LayerImage {
    pixmap: Pixmap,
}

impl LayerImage {
    pub fn from_decoded(image: &DecodedImage) -> Result<Self, RenderError> {
        let pixmap = surface_from_rgba(image.width, image.height, &image.pixels)?;
        Ok(Self { pixmap })
    }

    /// Solid colour image, given as straight RGBA.
    #[cfg(test)]
    pub(crate) fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, RenderError> {
        let mut pixmap = crate::render::surface::new_surface(width, height)?;
        let [r, g, b, a] = rgba;
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        Ok(Self { pixmap })
    }

    pub fn size(&self) -> Size {
        Size::new(self.pixmap.width(), self.pixmap.height())
    }

    pub fn pixmap(&self) -> PixmapRef<'_> {
        self.pixmap.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decoded() {
        let decoded = DecodedImage::from_rgba_image(image::RgbaImage::from_pixel(
            3,
            2,
            image::Rgba([255, 0, 0, 255]),
        ));
        let image = LayerImage::from_decoded(&decoded).unwrap();
        assert_eq!(image.size(), Size::new(3, 2));
        assert_eq!(&image.pixmap().data()[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_filled_is_premultiplied() {
        let image = LayerImage::filled(1, 1, [255, 255, 255, 0]).unwrap();
        assert_eq!(image.pixmap().data(), &[0, 0, 0, 0]);
    }
}
