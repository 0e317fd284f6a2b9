//! Client configuration passed to the plugin's `create_client` export

use serde::{Deserialize, Serialize};

/// Configuration for a telemetry client living inside the plugin.
///
/// Neither field is validated on the host; an empty API key or host is
/// forwarded as-is and left for the plugin to reject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Project API key
    pub api_key: String,

    /// Destination host (e.g. `https://us.i.posthog.com`)
    pub host: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host: host.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_field_names() {
        let config = ClientConfig::new("phc_key", "https://eu.i.posthog.com");
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(
            value,
            json!({ "api_key": "phc_key", "host": "https://eu.i.posthog.com" })
        );
    }

    #[test]
    fn test_empty_config_is_serialized() {
        let json = serde_json::to_string(&ClientConfig::default()).unwrap();
        assert_eq!(json, r#"{"api_key":"","host":""}"#);

        let back: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ClientConfig::default());
    }
}
