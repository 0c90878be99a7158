//! Media source types and the data-URI codec.
//!
//! Generated media crosses the wire as `data:<mimetype>;base64,<data>` URIs.
//! This module owns both directions of that contract.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chalkboard_error::{ChalkboardResult, JsonError};
use serde::{Deserialize, Serialize};

/// Where media content is sourced from.
///
/// # Examples
///
/// ```
/// use chalkboard_core::MediaSource;
///
/// let url = MediaSource::Url("https://example.com/image.png".to_string());
/// let base64 = MediaSource::Base64("iVBORw0KGgo...".to_string());
/// let binary = MediaSource::Binary(vec![0x89, 0x50, 0x4E, 0x47]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaSource {
    /// URL to fetch the content from
    Url(String),
    /// Base64-encoded content
    Base64(String),
    /// Raw binary data
    Binary(Vec<u8>),
}

/// Encode binary media as a `data:<mimetype>;base64,<data>` URI.
///
/// # Examples
///
/// ```
/// use chalkboard_core::encode_data_uri;
///
/// let uri = encode_data_uri("image/png", &[0x89, 0x50]);
/// assert!(uri.starts_with("data:image/png;base64,"));
/// ```
pub fn encode_data_uri(mime: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(data))
}

/// Decode a `data:<mimetype>;base64,<data>` URI into its MIME type and bytes.
///
/// # Errors
///
/// Returns an error if the prefix is malformed or the payload is not valid
/// base64.
///
/// # Examples
///
/// ```
/// use chalkboard_core::{decode_data_uri, encode_data_uri};
///
/// let uri = encode_data_uri("audio/wav", b"RIFF");
/// let (mime, data) = decode_data_uri(&uri).unwrap();
/// assert_eq!(mime, "audio/wav");
/// assert_eq!(data, b"RIFF");
/// ```
pub fn decode_data_uri(uri: &str) -> ChalkboardResult<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| JsonError::new(format!("Not a data URI: {}", preview(uri))))?;

    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| JsonError::new(format!("Missing ';base64,' marker: {}", preview(uri))))?;

    if mime.is_empty() {
        return Err(JsonError::new("Empty MIME type in data URI").into());
    }

    let data = STANDARD
        .decode(payload)
        .map_err(|e| JsonError::new(format!("Invalid base64 payload: {}", e)))?;

    Ok((mime.to_string(), data))
}

/// Clip long URIs out of error messages.
fn preview(uri: &str) -> String {
    uri.chars().take(48).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_round_trip() {
        let uri = encode_data_uri("video/mp4", &[0x00, 0x01, 0x02, 0xFF]);
        let (mime, data) = decode_data_uri(&uri).unwrap();
        assert_eq!(mime, "video/mp4");
        assert_eq!(data, vec![0x00, 0x01, 0x02, 0xFF]);
    }

    #[test]
    fn rejects_missing_prefix() {
        assert!(decode_data_uri("http://example.com/a.png").is_err());
    }

    #[test]
    fn rejects_missing_base64_marker() {
        assert!(decode_data_uri("data:image/png,rawdata").is_err());
    }

    #[test]
    fn rejects_empty_mime() {
        assert!(decode_data_uri("data:;base64,AAAA").is_err());
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(decode_data_uri("data:image/png;base64,!!!").is_err());
    }
}
