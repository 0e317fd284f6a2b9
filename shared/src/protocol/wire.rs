//! Request envelopes sent to the plugin exports.
//!
//! Requests borrow their payload: they only live for the duration of one
//! call and are serialized straight to JSON.

use crate::types::{event::PosthogEvent, handle::ClientHandle};
use serde::Serialize;

/// Body of a `capture` call
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CaptureRequest<'a> {
    pub handle: ClientHandle,
    pub event: &'a PosthogEvent,
}

/// Body of a `flush` call.
///
/// Carries only the handle. Older hosts reused the capture envelope here and
/// sent an empty `event` alongside the handle; plugins read `handle` alone,
/// so the narrower body is accepted by both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlushRequest {
    pub handle: ClientHandle,
}

impl<'a> CaptureRequest<'a> {
    pub fn new(handle: ClientHandle, event: &'a PosthogEvent) -> Self {
        Self { handle, event }
    }
}

impl FlushRequest {
    pub fn new(handle: ClientHandle) -> Self {
        Self { handle }
    }
}
