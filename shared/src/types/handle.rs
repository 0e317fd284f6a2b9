//! Client handle returned by the plugin

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bytes the plugin uses to encode a handle
pub const HANDLE_LEN: usize = 4;

/// Opaque identifier of a client instance inside the plugin.
///
/// Serialized as a bare integer so it can be embedded in request bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientHandle(u32);

/// The `create_client` response was too short to contain a handle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("client handle needs {} bytes, plugin returned {len}", HANDLE_LEN)]
pub struct HandleDecodeError {
    pub len: usize,
}

impl ClientHandle {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Decode a handle from the first four bytes of `bytes` (big-endian).
    /// Bytes past the fourth are ignored.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, HandleDecodeError> {
        let prefix: [u8; HANDLE_LEN] = bytes
            .get(..HANDLE_LEN)
            .and_then(|b| b.try_into().ok())
            .ok_or(HandleDecodeError { len: bytes.len() })?;
        Ok(Self(u32::from_be_bytes(prefix)))
    }

    pub fn to_be_bytes(self) -> [u8; HANDLE_LEN] {
        self.0.to_be_bytes()
    }
}

impl From<u32> for ClientHandle {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
