//! Error type for every host-side failure

use posthog_wasm_shared::HandleDecodeError;
use std::path::PathBuf;

/// Errors raised while loading the plugin or calling into it
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("failed to serialize {what}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("plugin export `{export}` failed with exit code {exit_code}: {message}")]
    Call {
        export: &'static str,
        exit_code: i32,
        message: String,
    },

    #[error("invalid create_client response")]
    Handle(#[from] HandleDecodeError),

    #[error("failed to load plugin {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    #[error("failed to initialize WASM engine: {message}")]
    Engine { message: String },

    #[error("failed to compile WASM module {}: {message}", path.display())]
    Compile { path: PathBuf, message: String },

    #[error("WASM module {} is missing exports: {}", path.display(), missing.join(", "))]
    MissingExports { path: PathBuf, missing: Vec<String> },

    #[error("invalid plugin settings in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl HostError {
    /// Process exit status for this error.
    ///
    /// A failing plugin call forwards the module's status when it fits in
    /// `1..=255`; everything else is 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            HostError::Call { exit_code, .. } => u8::try_from(*exit_code)
                .ok()
                .filter(|code| *code != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }
}

pub type Result<T, E = HostError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn call_error(exit_code: i32) -> HostError {
        HostError::Call {
            export: "capture",
            exit_code,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_call_error_forwards_status() {
        assert_eq!(call_error(7).exit_code(), 7);
        assert_eq!(call_error(255).exit_code(), 255);
    }

    #[test]
    fn test_out_of_range_status_maps_to_one() {
        assert_eq!(call_error(0).exit_code(), 1);
        assert_eq!(call_error(-1).exit_code(), 1);
        assert_eq!(call_error(300).exit_code(), 1);
    }

    #[test]
    fn test_local_errors_exit_one() {
        let err = HostError::from(HandleDecodeError { len: 2 });
        assert_eq!(err.exit_code(), 1);

        let err = HostError::MissingExports {
            path: PathBuf::from("plugin.wasm"),
            missing: vec!["flush".to_string()],
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_string(),
            "WASM module plugin.wasm is missing exports: flush"
        );
    }

    #[test]
    fn test_engine_error_names_no_module() {
        let err = HostError::Engine {
            message: "unsupported feature".to_string(),
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_string(),
            "failed to initialize WASM engine: unsupported feature"
        );
    }
}
