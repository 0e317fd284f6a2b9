//! posthog-wasm host runtime
//!
//! Loads a prebuilt telemetry plugin with Extism and forwards client calls
//! to it as JSON. The plugin owns batching, retries and delivery; this crate
//! only marshals requests, invokes exports and decodes the client handle.

pub mod client;
pub mod error;
pub mod plugin;
pub mod runtime;
pub mod settings;

pub use client::{capture_once, PosthogClient};
pub use error::{HostError, Result};
pub use plugin::{ExtismPlugin, PluginCall, PluginFailure};
pub use runtime::{ModuleExports, ModuleInspector};
pub use settings::PluginSettings;
