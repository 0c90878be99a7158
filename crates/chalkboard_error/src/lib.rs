//! Error types for the Chalkboard workspace.
//!
//! This crate provides the foundation error types used across the Chalkboard
//! ecosystem.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use chalkboard_error::{ChalkboardResult, HttpError};
//!
//! fn fetch_data() -> ChalkboardResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod flow;
mod gemini;
mod http;
mod json;
mod live;
mod rate_limit;
mod roster;
mod schema;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{ChalkboardError, ChalkboardErrorKind, ChalkboardResult};
pub use flow::{FlowError, FlowErrorKind};
pub use gemini::{GeminiError, GeminiErrorKind};
pub use http::HttpError;
pub use json::JsonError;
pub use live::{LiveError, LiveErrorKind};
pub use rate_limit::{RateLimitError, RateLimitErrorKind};
pub use roster::{RosterError, RosterErrorKind};
pub use schema::{SchemaError, SchemaErrorKind};
