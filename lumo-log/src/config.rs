//! 日志配置
//!
//! 提供便捷的日志初始化配置。

use crate::logger::{LogSink, MemorySink, StderrSink, StdoutSink};
use crate::record::Record;
use crate::{Level, Logger};
use std::io::Write;
use std::sync::Arc;

/// 文件sink
struct FileSink {
    file: std::sync::Mutex<std::fs::File>,
}

impl FileSink {
    /// 创建文件sink（追加模式）
    fn new(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        Ok(FileSink {
            file: std::sync::Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn write(&self, record: &Record) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", record.format());
        }
    }
}

/// 日志输出目标配置
#[derive(Clone, Debug, PartialEq)]
pub enum OutputConfig {
    /// 输出到标准输出
    Stdout,
    /// 输出到标准错误
    Stderr,
    /// 输出到文件（路径）
    File(String),
    /// 输出到内存缓冲（容量）
    Memory(usize),
}

/// 日志配置
///
/// 用于一键初始化日志系统
///
/// # 示例
///
/// ```
/// use lumo_log::{LogConfig, Level};
///
/// let config = LogConfig::new(Level::Debug).with_memory(1000);
/// let (logger, buffer) = config.init();
/// assert!(buffer.is_some());
/// ```
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// 日志级别
    pub level: Level,
    /// 输出目标列表
    pub outputs: Vec<OutputConfig>,
}

impl LogConfig {
    /// 创建默认配置（指定级别，无输出）
    pub fn new(level: Level) -> Self {
        LogConfig {
            level,
            outputs: Vec::new(),
        }
    }

    /// 开发环境推荐配置
    ///
    /// - Debug 级别
    /// - 输出到 stdout
    /// - 内存缓冲 10000 条（用于崩溃转储）
    pub fn dev() -> Self {
        LogConfig {
            level: Level::Debug,
            outputs: vec![OutputConfig::Stdout, OutputConfig::Memory(10000)],
        }
    }

    /// 生产环境推荐配置
    ///
    /// - Warn 级别
    /// - 输出到 stderr
    /// - 内存缓冲 1000 条
    pub fn production() -> Self {
        LogConfig {
            level: Level::Warn,
            outputs: vec![OutputConfig::Stderr, OutputConfig::Memory(1000)],
        }
    }

    /// 测试环境配置（静默）
    ///
    /// - Error 级别
    /// - 无输出
    pub fn test() -> Self {
        LogConfig {
            level: Level::Error,
            outputs: Vec::new(),
        }
    }

    /// 添加 stdout 输出
    pub fn with_stdout(mut self) -> Self {
        if !self.outputs.contains(&OutputConfig::Stdout) {
            self.outputs.push(OutputConfig::Stdout);
        }
        self
    }

    /// 添加 stderr 输出
    pub fn with_stderr(mut self) -> Self {
        if !self.outputs.contains(&OutputConfig::Stderr) {
            self.outputs.push(OutputConfig::Stderr);
        }
        self
    }

    /// 添加文件输出
    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.outputs.push(OutputConfig::File(path.into()));
        self
    }

    /// 添加内存缓冲输出
    pub fn with_memory(mut self, capacity: usize) -> Self {
        self.outputs.push(OutputConfig::Memory(capacity));
        self
    }

    /// 初始化日志系统
    ///
    /// 返回 (logger, Option<memory_sink>)
    /// 如果配置了内存缓冲，会返回它（用于崩溃转储和测试断言）
    pub fn init(self) -> (Arc<Logger>, Option<Arc<MemorySink>>) {
        let logger = Logger::new(self.level);
        let mut memory: Option<Arc<MemorySink>> = None;

        for output in self.outputs {
            match output {
                OutputConfig::Stdout => {
                    logger.add_sink(StdoutSink);
                }
                OutputConfig::Stderr => {
                    logger.add_sink(StderrSink);
                }
                OutputConfig::File(path) => {
                    if let Ok(sink) = FileSink::new(&path) {
                        logger.add_sink(sink);
                    }
                }
                OutputConfig::Memory(capacity) => {
                    let sink = MemorySink::new(capacity);
                    memory = Some(Arc::clone(&sink));
                    logger.add_sink(sink);
                }
            }
        }

        (logger, memory)
    }
}
