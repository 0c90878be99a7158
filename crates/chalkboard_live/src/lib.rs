//! Realtime voice bridge for Chalkboard.
//!
//! Bridges browser WebSocket clients to the Gemini Live API: JSON control
//! messages and raw audio frames flow in from the client, model text,
//! audio, and turn events flow back out. Every accepted connection gets its
//! own upstream session, tracked in a [`SessionRegistry`] keyed by session
//! id, so simultaneous users never share state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bridge;
mod protocol;
mod registry;

pub use bridge::LiveBridge;
pub use protocol::{ClientEvent, ServerEvent};
pub use registry::{SessionInfo, SessionRegistry};
