//! Lumo API - Loading orchestration layer
//!
//! Provides the import entry points, including:
//! - Explicit contexts via `RunConfig::build_context` (recommended for
//!   library users; each context is isolated)
//! - A process-global context for CLI convenience, implicitly initialized
//!   with defaults on first use
//! - Structured error reporting (`ErrorReport`)

use std::path::{Path, PathBuf};

// Re-export config
pub mod config;
pub use config::{context, init, is_initialized, RunConfig};

// Re-export error reporting
pub mod error;
pub use error::ErrorReport;

// Re-export core types
pub use lumo_config;
pub use lumo_core::{
    AttributeNotFound, ImportContext, ImportError, Module, ModuleKey, ModuleRuntime,
    ScriptRuntime, Stage, Value, WaitConfig,
};

/// Load a module through the process-global context
///
/// The context is implicitly initialized with defaults if `init` was never
/// called.
///
/// # Arguments
/// * `script` - module reference, relative or absolute, suffix optional
/// * `prefix` - name registered via `register_prefix`
/// * `reload` - reload the module if its source changed on disk
pub fn load(script: &str, prefix: Option<&str>, reload: bool) -> Result<Module, ImportError> {
    context().load(script, prefix, reload)
}

/// Register a path prefix on the process-global context
///
/// First writer wins unless `force` is set.
pub fn register_prefix(name: &str, path: &Path, force: bool) -> bool {
    context().register_prefix(name, path, force)
}

/// Look up a registered path prefix on the process-global context
pub fn lookup_prefix(name: &str) -> Option<PathBuf> {
    context().lookup_prefix(name)
}

/// Set the startup path baseline of the process-global context
///
/// Idempotent; only the first call takes effect. `None` uses the process
/// CWD. Any load initializes the baseline implicitly if this was never
/// called.
pub fn init_startup(path: Option<&Path>) -> bool {
    context().init(path)
}
