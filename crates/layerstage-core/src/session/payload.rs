//! Body of the completion call and the ways it can fail.

use serde::Serialize;
use thiserror::Error;

use crate::encode::{encode_data_url, EncodeError};
use crate::render::ExportBundle;

/// JSON body posted to the completion endpoint.
///
/// A commit carries every surface as a PNG data URL; a cancel carries only
/// `confirmed: false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_masks: Option<Vec<String>>,
    pub confirmed: bool,
}

impl CompletionPayload {
    /// Encode an export for submission.
    pub fn from_export(bundle: &ExportBundle) -> Result<Self, EncodeError> {
        let layer_masks = bundle
            .layer_masks
            .iter()
            .map(encode_data_url)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            image: Some(encode_data_url(&bundle.composite)?),
            mask: Some(encode_data_url(&bundle.mask)?),
            layer_masks: Some(layer_masks),
            confirmed: true,
        })
    }

    pub fn cancelled() -> Self {
        Self {
            image: None,
            mask: None,
            layer_masks: None,
            confirmed: false,
        }
    }
}

/// The completion call did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The endpoint answered outside the 2xx range.
    #[error("Completion endpoint responded with status {0}")]
    Status(u16),

    /// The request never got a response.
    #[error("Completion request failed: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::placeholder_mask;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_cancel_body() {
        let json = serde_json::to_string(&CompletionPayload::cancelled()).unwrap();
        assert_eq!(json, r#"{"confirmed":false}"#);
    }

    #[test]
    fn test_commit_body_shape() {
        let bundle = ExportBundle {
            composite: RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255])),
            mask: RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])),
            layer_masks: std::array::from_fn(|_| placeholder_mask()),
        };
        let payload = CompletionPayload::from_export(&bundle).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["confirmed"], true);
        assert!(json["image"].as_str().unwrap().starts_with("data:image/png;base64,"));
        assert!(json["mask"].as_str().unwrap().starts_with("data:image/png;base64,"));
        assert_eq!(json["layer_masks"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn test_submission_error_display() {
        assert_eq!(
            SubmissionError::Status(500).to_string(),
            "Completion endpoint responded with status 500"
        );
    }
}
