//! API 层配置
//!
//! 包含装载配置 RunConfig 和全局单例上下文（供 CLI 使用）

use lumo_config::WaitConfig;
use lumo_core::{ImportContext, ModuleRuntime, ScriptRuntime};
use lumo_log::Logger;
use lumo_vfs::{NativeFileSystem, VirtualFileSystem};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;

/// Loading configuration
#[derive(Clone)]
pub struct RunConfig {
    /// Startup path baseline; `None` falls back to the process CWD
    pub startup_path: Option<PathBuf>,
    /// Placeholder wait tuning
    pub wait: WaitConfig,
    /// Logger
    pub logger: Arc<Logger>,
    /// File system backend
    pub fs: Arc<dyn VirtualFileSystem>,
    /// Compile/execute facility
    pub runtime: Arc<dyn ModuleRuntime>,
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("startup_path", &self.startup_path)
            .field("wait", &self.wait)
            .finish()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            startup_path: None,
            wait: WaitConfig::default(),
            logger: Logger::noop(),
            fs: Arc::new(NativeFileSystem::new()),
            runtime: Arc::new(ScriptRuntime::new()),
        }
    }
}

impl RunConfig {
    /// Build an explicit import context from this configuration
    pub fn build_context(&self) -> ImportContext {
        let mut builder = ImportContext::builder()
            .fs(Arc::clone(&self.fs))
            .runtime(Arc::clone(&self.runtime))
            .logger(Arc::clone(&self.logger))
            .wait(self.wait.clone());
        if let Some(path) = &self.startup_path {
            builder = builder.startup_path(path);
        }
        builder.build()
    }
}

// Global context singleton for CLI convenience
static GLOBAL_CONTEXT: OnceCell<ImportContext> = OnceCell::new();

/// Initialize the global context from a configuration
///
/// First caller wins; later calls are no-ops.
///
/// # Returns
/// Whether this call installed the context
pub fn init(config: RunConfig) -> bool {
    GLOBAL_CONTEXT.set(config.build_context()).is_ok()
}

/// Get the global context, initializing it with defaults on first use
pub fn context() -> &'static ImportContext {
    GLOBAL_CONTEXT.get_or_init(|| RunConfig::default().build_context())
}

/// Check if the global context is initialized
pub fn is_initialized() -> bool {
    GLOBAL_CONTEXT.get().is_some()
}
