//! Host-side handle on a telemetry client living inside the plugin

use crate::error::{HostError, Result};
use crate::plugin::{ExtismPlugin, PluginCall};
use posthog_wasm_shared::protocol::{CAPTURE_EXPORT, CREATE_CLIENT_EXPORT, FLUSH_EXPORT};
use posthog_wasm_shared::{
    CaptureRequest, ClientConfig, ClientHandle, FlushRequest, PosthogEvent, HANDLE_LEN,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Telemetry client. Owns the plugin and the handle `create_client`
/// returned; every later call is correlated through that handle.
pub struct PosthogClient<P = ExtismPlugin> {
    plugin: P,
    handle: ClientHandle,
}

impl<P: PluginCall> PosthogClient<P> {
    /// Create a client inside `plugin`.
    ///
    /// The config is consumed by the call and not kept on the host.
    pub fn create(mut plugin: P, config: ClientConfig) -> Result<Self> {
        let body = to_json("client config", &config)?;
        let response = invoke(&mut plugin, CREATE_CLIENT_EXPORT, &body)?;

        let handle = ClientHandle::from_be_bytes(&response)?;
        if response.len() > HANDLE_LEN {
            warn!(
                "create_client returned {} bytes, using the first {}",
                response.len(),
                HANDLE_LEN
            );
        }

        info!("Created telemetry client {}", handle);
        Ok(Self { plugin, handle })
    }

    pub fn handle(&self) -> ClientHandle {
        self.handle
    }

    /// Hand one event to the plugin. The response body is discarded.
    pub fn capture(&mut self, event: &PosthogEvent) -> Result<()> {
        let body = to_json("capture request", &CaptureRequest::new(self.handle, event))?;
        invoke(&mut self.plugin, CAPTURE_EXPORT, &body)?;
        debug!("Captured '{}' on client {}", event.event, self.handle);
        Ok(())
    }

    /// Ask the plugin to deliver everything buffered for this client.
    pub fn flush(&mut self) -> Result<()> {
        let body = to_json("flush request", &FlushRequest::new(self.handle))?;
        invoke(&mut self.plugin, FLUSH_EXPORT, &body)?;
        debug!("Flushed client {}", self.handle);
        Ok(())
    }
}

/// Create a client, capture `event`, then flush, stopping at the first
/// failure. Returns the client's handle.
pub fn capture_once<P: PluginCall>(
    plugin: P,
    config: ClientConfig,
    event: &PosthogEvent,
) -> Result<ClientHandle> {
    let mut client = PosthogClient::create(plugin, config)?;
    client.capture(event)?;
    client.flush()?;
    Ok(client.handle())
}

fn to_json<T: Serialize>(what: &'static str, value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|source| HostError::Serialize { what, source })
}

fn invoke<P: PluginCall>(plugin: &mut P, export: &'static str, body: &[u8]) -> Result<Vec<u8>> {
    plugin.call(export, body).map_err(|failure| HostError::Call {
        export,
        exit_code: failure.exit_code,
        message: failure.message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::PluginFailure;

    /// Answers every call with a fixed response
    struct Fixed(Vec<u8>);

    impl PluginCall for Fixed {
        fn call(
            &mut self,
            _export: &str,
            _input: &[u8],
        ) -> std::result::Result<Vec<u8>, PluginFailure> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_create_decodes_handle() {
        let client = PosthogClient::create(Fixed(vec![0, 0, 1, 0]), ClientConfig::default())
            .unwrap();
        assert_eq!(client.handle().get(), 256);
    }

    #[test]
    fn test_create_rejects_short_response() {
        let err = PosthogClient::create(Fixed(vec![1]), ClientConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, HostError::Handle(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_create_uses_prefix_of_long_response() {
        let client = PosthogClient::create(Fixed(vec![0, 0, 0, 5, 9, 9]), ClientConfig::default())
            .unwrap();
        assert_eq!(client.handle(), ClientHandle::new(5));
    }
}
