//! Lumo Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Lumo crates.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning for waits performed by module placeholders.
///
/// The defaults come from the loader's historical behavior (1 ms poll,
/// 2 s ceiling); treat them as tunables, not invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Poll interval in milliseconds while waiting for a binding to appear
    pub poll_interval_ms: u64,
    /// Overall ceiling in milliseconds before an attribute access gives up
    pub timeout_ms: u64,
}

impl WaitConfig {
    /// Poll interval as a `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Overall ceiling as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Fast-failing configuration, suitable for tests
    pub fn fast() -> Self {
        Self {
            poll_interval_ms: 1,
            timeout_ms: 50,
        }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1,
            timeout_ms: 2000,
        }
    }
}

/// Load pipeline stage enum for stage-specific error reporting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Resolve,
    Stat,
    Compile,
    Execute,
}

impl Stage {
    /// Get the string name of the stage
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Resolve => "resolve",
            Stage::Stat => "stat",
            Stage::Compile => "compile",
            Stage::Execute => "execute",
        }
    }
}

/// Log level vocabulary for project files
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Get the string name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
