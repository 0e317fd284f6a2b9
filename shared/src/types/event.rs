//! Telemetry event definitions
//!
//! Events are handed to the plugin whole; the host never inspects or
//! validates property values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Property bag attached to an event
pub type Properties = Map<String, Value>;

/// A single telemetry event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PosthogEvent {
    /// Event name (e.g. `$pageview`)
    pub event: String,

    /// Arbitrary JSON properties
    #[serde(default)]
    pub properties: Properties,
}

impl PosthogEvent {
    /// Create an event with no properties
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            properties: Properties::new(),
        }
    }

    /// Add or overwrite a property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set the `distinct_id` property used by PostHog to identify the actor
    pub fn with_distinct_id(self, distinct_id: impl Into<String>) -> Self {
        self.with_property("distinct_id", distinct_id.into())
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}
