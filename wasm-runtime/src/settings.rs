//! Plugin loading settings and Extism manifest construction

use crate::error::{HostError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Plugin path used when neither a flag nor `POSTHOG_WASM_PLUGIN` is given
pub const DEFAULT_PLUGIN_PATH: &str = "./posthog_wasm.wasm";

/// How the plugin module is located and sandboxed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Path to the compiled plugin module
    pub wasm_path: PathBuf,

    /// Hosts the plugin may reach over HTTP (`*` allows any)
    pub allowed_hosts: Vec<String>,

    /// Expose WASI to the plugin
    pub enable_wasi: bool,

    /// Per-call timeout enforced by the runtime (None = unlimited)
    pub timeout_ms: Option<u64>,

    /// Upper bound on linear memory, in 64 KiB pages (None = runtime default)
    pub memory_max_pages: Option<u32>,

    /// Check the module's exports before instantiating it
    pub verify_exports: bool,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            wasm_path: std::env::var_os("POSTHOG_WASM_PLUGIN")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PLUGIN_PATH)),
            allowed_hosts: vec!["*".to_string()],
            enable_wasi: true,
            timeout_ms: None,
            memory_max_pages: None,
            verify_exports: true,
        }
    }
}

impl PluginSettings {
    /// Settings for a plugin at `path`, everything else default
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            wasm_path: path.into(),
            ..Default::default()
        }
    }

    /// Parse settings from TOML. `origin` names the source in errors.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self> {
        let settings: Self = toml::from_str(contents).map_err(|e| HostError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        settings.validate(origin)?;
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| HostError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Validate settings
    pub fn validate(&self, origin: &Path) -> Result<()> {
        let invalid = |message: &str| HostError::Config {
            path: origin.to_path_buf(),
            message: message.to_string(),
        };

        if self.wasm_path.as_os_str().is_empty() {
            return Err(invalid("wasm_path must not be empty"));
        }
        if self.allowed_hosts.is_empty() {
            return Err(invalid("allowed_hosts must list at least one host"));
        }
        if self.timeout_ms == Some(0) {
            return Err(invalid("timeout_ms must be greater than 0"));
        }
        if self.memory_max_pages == Some(0) {
            return Err(invalid("memory_max_pages must be greater than 0"));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Build the Extism manifest for this plugin
    pub fn manifest(&self) -> extism::Manifest {
        let mut manifest = extism::Manifest::new([extism::Wasm::file(&self.wasm_path)]);
        for host in &self.allowed_hosts {
            manifest = manifest.with_allowed_host(host.as_str());
        }
        if let Some(timeout) = self.timeout() {
            manifest = manifest.with_timeout(timeout);
        }
        if let Some(pages) = self.memory_max_pages {
            manifest = manifest.with_memory_max(pages);
        }
        manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = PluginSettings::with_path("plugin.wasm");
        assert_eq!(settings.wasm_path, PathBuf::from("plugin.wasm"));
        assert_eq!(settings.allowed_hosts, vec!["*".to_string()]);
        assert!(settings.enable_wasi);
        assert!(settings.verify_exports);
        assert_eq!(settings.timeout(), None);
        assert!(settings.validate(Path::new("<defaults>")).is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = PluginSettings::from_toml_str(
            r#"
            wasm_path = "/opt/plugins/posthog.wasm"
            timeout_ms = 2500
            "#,
            Path::new("inline.toml"),
        )
        .unwrap();

        assert_eq!(settings.wasm_path, PathBuf::from("/opt/plugins/posthog.wasm"));
        assert_eq!(settings.timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(settings.allowed_hosts, vec!["*".to_string()]);
        assert!(settings.enable_wasi);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let origin = Path::new("bad.toml");

        let err = PluginSettings::from_toml_str("allowed_hosts = []", origin).unwrap_err();
        assert!(matches!(err, HostError::Config { .. }));
        assert!(err.to_string().contains("allowed_hosts"));

        let err = PluginSettings::from_toml_str("timeout_ms = 0", origin).unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));

        let err = PluginSettings::from_toml_str("wasm_path = 12", origin).unwrap_err();
        assert!(matches!(err, HostError::Config { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "wasm_path = \"custom.wasm\"").unwrap();
        writeln!(file, "allowed_hosts = [\"eu.i.posthog.com\"]").unwrap();
        writeln!(file, "verify_exports = false").unwrap();

        let settings = PluginSettings::from_toml_file(file.path()).unwrap();
        assert_eq!(settings.wasm_path, PathBuf::from("custom.wasm"));
        assert_eq!(settings.allowed_hosts, vec!["eu.i.posthog.com".to_string()]);
        assert!(!settings.verify_exports);
    }

    #[test]
    fn test_missing_file() {
        let err = PluginSettings::from_toml_file(Path::new("/nonexistent/posthog.toml"))
            .unwrap_err();
        assert!(matches!(err, HostError::Config { .. }));
    }

    #[test]
    fn test_manifest_carries_sandbox_options() {
        let settings = PluginSettings {
            timeout_ms: Some(1000),
            ..PluginSettings::with_path("plugin.wasm")
        };
        let manifest = settings.manifest();

        assert_eq!(manifest.allowed_hosts, Some(vec!["*".to_string()]));
        assert_eq!(manifest.timeout_ms, Some(1000));
        assert_eq!(manifest.wasm.len(), 1);
    }
}
