//! Pre-flight inspection of plugin modules.
//!
//! Compiles the module with wasmtime (without instantiating it) and checks
//! that the exports the host calls are present, so a wrong or outdated
//! `.wasm` file is reported by name instead of failing on the first call.

use crate::error::{HostError, Result};
use posthog_wasm_shared::protocol::REQUIRED_EXPORTS;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;
use wasmtime::{Config, Engine, ExternType, Module};

/// Function exports found in a compiled module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleExports {
    functions: BTreeSet<String>,
}

impl ModuleExports {
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(String::as_str)
    }

    /// Names from `required` that the module does not export, in order
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| !self.contains(name))
            .collect()
    }
}

/// Compiles modules to read their export tables.
pub struct ModuleInspector {
    engine: Engine,
}

impl ModuleInspector {
    pub fn new() -> Result<Self> {
        let mut config = Config::new();
        config.wasm_bulk_memory(true);
        config.wasm_threads(false);

        let engine = Engine::new(&config).map_err(|e| HostError::Engine {
            message: format!("{e:#}"),
        })?;
        Ok(Self { engine })
    }

    /// List function exports of a module given as binary or WAT text.
    /// `origin` names the module in errors.
    pub fn exports(&self, wasm: &[u8], origin: &Path) -> Result<ModuleExports> {
        let module = Module::new(&self.engine, wasm).map_err(|e| HostError::Compile {
            path: origin.to_path_buf(),
            message: format!("{e:#}"),
        })?;

        let functions = module
            .exports()
            .filter(|export| matches!(export.ty(), ExternType::Func(_)))
            .map(|export| export.name().to_string())
            .collect();

        Ok(ModuleExports { functions })
    }

    /// Verify `wasm` exports every function the host calls
    pub fn verify(&self, wasm: &[u8], origin: &Path) -> Result<ModuleExports> {
        let exports = self.exports(wasm, origin)?;
        let missing = exports.missing(&REQUIRED_EXPORTS);
        if !missing.is_empty() {
            return Err(HostError::MissingExports {
                path: origin.to_path_buf(),
                missing: missing.into_iter().map(String::from).collect(),
            });
        }

        debug!(
            "Module {} exports {} functions",
            origin.display(),
            exports.functions.len()
        );
        Ok(exports)
    }

    /// Read a module from disk and verify its exports
    pub fn verify_file(&self, path: &Path) -> Result<ModuleExports> {
        let wasm = std::fs::read(path).map_err(|e| HostError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.verify(&wasm, path)
    }
}
