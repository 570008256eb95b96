//! Lumo Core - Module import machinery (pure logic over injected seams)
//!
//! Contains path resolution, the prefix registry, the staleness cache,
//! module placeholders, and the load orchestrator. File access goes through
//! `lumo_vfs`; compilation and execution go through the `ModuleRuntime`
//! seam; logging goes through an injected `lumo_log` logger.
//!
//! Configuration is passed explicitly via parameters, not via global state.

pub mod error;
pub mod import;
pub mod module;
pub mod runtime;
pub mod value;

// Re-export common types
pub use error::{AttributeNotFound, ImportError};
pub use import::resolve::ModuleKey;
pub use import::{ImportContext, ImportContextBuilder};
pub use module::Module;
pub use runtime::{ImportHost, ModuleRuntime, Namespace, RuntimeFault, ScriptRuntime};
pub use value::Value;

// Re-export config types from lumo-config
pub use lumo_config::{Stage, WaitConfig};
