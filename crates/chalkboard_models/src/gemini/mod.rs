//! Google Gemini API implementations.

mod client;
mod extract;
mod live;
mod live_protocol;
mod rest;

pub use client::GeminiClient;
pub use extract::extract_json;
pub use live::{GeminiLiveClient, LiveEvent, LiveSession};

/// Result type for Gemini-specific operations.
pub type GeminiResult<T> = std::result::Result<T, chalkboard_error::GeminiError>;
