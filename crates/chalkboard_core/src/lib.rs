//! Core data types for the Chalkboard educator AI workspace.
//!
//! This crate provides the foundation data types used across all Chalkboard
//! interfaces: generation requests and responses, multimodal inputs and
//! outputs, media sources, and the data-URI codec used on the wire.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod input;
mod media;
mod message;
mod output;
mod request;
mod role;
mod telemetry;
mod wav;

pub use input::Input;
pub use media::{MediaSource, decode_data_uri, encode_data_uri};
pub use message::{Message, MessageBuilder};
pub use output::{Output, ToolCall};
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse};
pub use role::Role;
pub use telemetry::init_telemetry;
pub use wav::pcm_to_wav;
