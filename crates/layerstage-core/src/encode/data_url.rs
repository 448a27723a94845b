//! `data:` URL packaging for encoded images.

use base64::{engine::general_purpose, Engine as _};
use image::RgbaImage;

use super::{encode_rgba_image, EncodeError};

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Wrap PNG bytes in a `data:image/png;base64,` URL.
pub fn to_data_url(png: &[u8]) -> String {
    let b64 = general_purpose::STANDARD.encode(png);
    format!("{}{}", PNG_DATA_URL_PREFIX, b64)
}

/// Encode an RGBA surface straight to a PNG data URL.
pub fn encode_data_url(image: &RgbaImage) -> Result<String, EncodeError> {
    let png = encode_rgba_image(image)?;
    Ok(to_data_url(&png))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_payload() {
        let url = to_data_url(&[0x89, b'P', b'N', b'G']);
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_encode_data_url_decodes_back() {
        let img = RgbaImage::from_pixel(4, 4, image::Rgba([200, 100, 50, 128]));
        let url = encode_data_url(&img).unwrap();
        let payload = url.strip_prefix(PNG_DATA_URL_PREFIX).unwrap();
        let bytes = general_purpose::STANDARD.decode(payload).unwrap();
        let back = image::load_from_memory(&bytes).unwrap().into_rgba8();
        assert_eq!(back, img);
    }
}
