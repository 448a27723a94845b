//! The activation event that opens an editor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the node instance that asked for the editor.
///
/// Hosts send it as a JSON number or a string; both compare by text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WindowId {
    Number(u64),
    Text(String),
}

impl WindowId {
    /// Same id regardless of how it was encoded.
    pub fn matches(&self, other: &WindowId) -> bool {
        match (self, other) {
            (WindowId::Number(a), WindowId::Number(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowId::Number(n) => write!(f, "{}", n),
            WindowId::Text(s) => f.write_str(s.trim()),
        }
    }
}

/// One layer as described by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub name: String,
    pub url: String,
    /// Initial opacity, 1.0 when absent.
    #[serde(default)]
    pub opacity: Option<f64>,
    /// 0-based original slot; the array position when absent.
    #[serde(default)]
    pub index: Option<usize>,
}

/// Request to show the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationEvent {
    /// Background image URL.
    pub back_image: String,
    pub layers: Vec<LayerDescriptor>,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub window_id: WindowId,
}

impl ActivationEvent {
    /// Whether this event is addressed to one of the host's instances.
    pub fn targets(&self, known: &[WindowId]) -> bool {
        known.iter().any(|id| id.matches(&self.window_id))
    }

    /// Every URL the host must fetch, background first.
    pub fn source_urls(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.back_image.as_str()).chain(self.layers.iter().map(|l| l.url.as_str()))
    }
}
