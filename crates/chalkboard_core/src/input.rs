//! Input types for model requests.

use crate::MediaSource;
use serde::{Deserialize, Serialize};

/// Supported input types to the generative model.
///
/// # Examples
///
/// ```
/// use chalkboard_core::{Input, MediaSource};
///
/// // Text input
/// let text = Input::Text("Hello, world!".to_string());
///
/// // Image input with URL
/// let image = Input::Image {
///     mime: Some("image/png".to_string()),
///     source: MediaSource::Url("https://example.com/image.png".to_string()),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Input {
    /// Plain text input.
    Text(String),

    /// Image input (PNG, JPEG, WebP, etc.).
    Image {
        /// MIME type, e.g., "image/png" or "image/jpeg"
        mime: Option<String>,
        /// Media source (URL, base64, or raw bytes)
        source: MediaSource,
    },

    /// Audio input (MP3, WAV, WebM, etc.).
    Audio {
        /// MIME type, e.g., "audio/wav" or "audio/webm"
        mime: Option<String>,
        /// Media source (URL, base64, or raw bytes)
        source: MediaSource,
    },

    /// Video input (MP4, WebM, etc.).
    Video {
        /// MIME type, e.g., "video/mp4" or "video/webm"
        mime: Option<String>,
        /// Media source (URL, base64, or raw bytes)
        source: MediaSource,
    },
}

impl Input {
    /// Borrow the text content, if this is a text input.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Input::Text(text) => Some(text),
            _ => None,
        }
    }
}
