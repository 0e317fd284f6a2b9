//! Plugin instance backed by Extism.
//!
//! The client talks to the plugin through [`PluginCall`] so the call
//! sequence can be driven without a compiled module.

use crate::error::{HostError, Result};
use crate::runtime::ModuleInspector;
use crate::settings::PluginSettings;
use tracing::{debug, info};

/// A failed export call as reported by the plugin runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginFailure {
    /// Exit status reported by the module
    pub exit_code: i32,
    pub message: String,
}

/// Invoke a named plugin export with raw input bytes.
pub trait PluginCall {
    fn call(&mut self, export: &str, input: &[u8]) -> std::result::Result<Vec<u8>, PluginFailure>;
}

impl<P: PluginCall + ?Sized> PluginCall for &mut P {
    fn call(&mut self, export: &str, input: &[u8]) -> std::result::Result<Vec<u8>, PluginFailure> {
        (**self).call(export, input)
    }
}

/// Instantiated Extism plugin
pub struct ExtismPlugin {
    plugin: extism::Plugin,
}

impl ExtismPlugin {
    /// Load and instantiate the plugin described by `settings`.
    ///
    /// When `verify_exports` is set the module is compiled once with
    /// wasmtime first and rejected if any required export is missing.
    pub fn load(settings: &PluginSettings) -> Result<Self> {
        let path = &settings.wasm_path;

        if settings.verify_exports {
            ModuleInspector::new()?.verify_file(path)?;
        }

        let plugin = extism::PluginBuilder::new(settings.manifest())
            .with_wasi(settings.enable_wasi)
            .build()
            .map_err(|e| HostError::Load {
                path: path.to_path_buf(),
                message: format!("{e:#}"),
            })?;

        info!("Loaded plugin {}", path.display());
        Ok(Self { plugin })
    }
}

impl PluginCall for ExtismPlugin {
    /// `extism::Plugin::call` rejects a non-zero return code as well as traps
    /// and guest-set errors; the status is recovered from its message.
    fn call(&mut self, export: &str, input: &[u8]) -> std::result::Result<Vec<u8>, PluginFailure> {
        debug!("Calling {} with {} bytes", export, input.len());
        let output: std::result::Result<Vec<u8>, extism::Error> = self.plugin.call(export, input);
        output.map_err(|err| {
            let message = format!("{err:#}");
            PluginFailure {
                exit_code: exit_code_from_message(&message).unwrap_or(1),
                message,
            }
        })
    }
}

/// Status in an Extism "non-zero exit code" error, e.g.
/// `Returned non-zero exit code: 7`. Traps and guest errors carry none.
fn exit_code_from_message(message: &str) -> Option<i32> {
    let lower = message.to_ascii_lowercase();
    let rest = &message[lower.find("exit code")? + "exit code".len()..];
    let digits = rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
    let end = digits
        .char_indices()
        .skip(1)
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    digits[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_from_message() {
        assert_eq!(
            exit_code_from_message("Returned non-zero exit code: 7"),
            Some(7)
        );
        assert_eq!(exit_code_from_message("plugin exit code 12 (flush)"), Some(12));
        assert_eq!(exit_code_from_message("Exit code: -3"), Some(-3));
    }

    #[test]
    fn test_messages_without_status() {
        assert_eq!(exit_code_from_message("wasm trap: unreachable"), None);
        assert_eq!(exit_code_from_message("exit code unknown"), None);
        assert_eq!(exit_code_from_message("exit code unset, see line 5"), None);
    }
}
