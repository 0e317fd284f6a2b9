//! Host/plugin call contract
//!
//! The plugin is an Extism module exporting three functions. Each takes a
//! JSON body and returns raw bytes:
//!
//! | export          | input                       | output                      |
//! |-----------------|-----------------------------|-----------------------------|
//! | `create_client` | [`ClientConfig`] JSON        | 4-byte big-endian handle    |
//! | `capture`       | [`CaptureRequest`] JSON      | ignored                     |
//! | `flush`         | [`FlushRequest`] JSON        | ignored                     |
//!
//! [`ClientConfig`]: crate::types::config::ClientConfig

pub mod wire;

pub use wire::{CaptureRequest, FlushRequest};

/// Export creating a client and returning its handle
pub const CREATE_CLIENT_EXPORT: &str = "create_client";

/// Export buffering one event for a client
pub const CAPTURE_EXPORT: &str = "capture";

/// Export sending a client's buffered events
pub const FLUSH_EXPORT: &str = "flush";

/// Every export the host calls
pub const REQUIRED_EXPORTS: [&str; 3] = [CREATE_CLIENT_EXPORT, CAPTURE_EXPORT, FLUSH_EXPORT];
