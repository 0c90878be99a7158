//! Gemini provider integration for Chalkboard.
//!
//! This crate implements the Chalkboard capability traits against the Google
//! Gemini API: text generation through the `gemini-rust` SDK, structured
//! output, tool calling, image generation, speech synthesis, and Veo video
//! jobs through the REST API, and the bidirectional Live API over WebSocket.

#![forbid(unsafe_code)]

mod gemini;

pub use gemini::{
    GeminiClient, GeminiLiveClient, GeminiResult, LiveEvent, LiveSession, extract_json,
};
