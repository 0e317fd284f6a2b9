//! Data types exchanged with the telemetry plugin

pub mod config;
pub mod event;
pub mod handle;
