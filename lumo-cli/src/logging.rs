//! CLI 日志初始化

use lumo_config::LogLevel;
use lumo_log::{Level, LogConfig, Logger};
use std::sync::Arc;

/// Parse log level string
pub fn parse_log_level(s: &str) -> Option<LogLevel> {
    match s.to_lowercase().as_str() {
        "silent" => Some(LogLevel::Error), // silent = only errors
        "error" => Some(LogLevel::Error),
        "warn" => Some(LogLevel::Warn),
        "info" => Some(LogLevel::Info),
        "debug" => Some(LogLevel::Debug),
        "trace" => Some(LogLevel::Trace),
        _ => None,
    }
}

/// 根据项目配置初始化 logger
///
/// 日志走 stderr，避免和绑定输出混在一起；可选追加到文件。
pub fn init_logger(level: Option<LogLevel>, file: Option<&str>) -> Arc<Logger> {
    let level = to_log_level(level.unwrap_or(LogLevel::Warn));
    let mut config = LogConfig::new(level).with_stderr();
    if let Some(path) = file {
        config = config.with_file(path);
    }
    let (logger, _memory) = config.init();
    logger
}

fn to_log_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Trace => Level::Trace,
        LogLevel::Debug => Level::Debug,
        LogLevel::Info => Level::Info,
        LogLevel::Warn => Level::Warn,
        LogLevel::Error => Level::Error,
    }
}
