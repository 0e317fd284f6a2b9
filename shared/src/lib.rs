//! Shared types for the posthog-wasm host
//!
//! This crate contains the data structures that cross the host/plugin
//! boundary: the client configuration, events, the client handle, and the
//! request envelopes sent to each plugin export.

pub mod protocol;
pub mod types;

// Re-export commonly used types
pub use protocol::{CaptureRequest, FlushRequest};
pub use types::{config::*, event::*, handle::*};
