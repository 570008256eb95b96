//! 日志器实现

use crate::record::{Level, Record};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

/// 日志输出目标trait
pub trait LogSink: Send + Sync {
    /// 写入日志记录
    fn write(&self, record: &Record);
}

/// 日志器配置和状态
pub struct Logger {
    /// 当前日志级别（原子存储）
    level: AtomicU8,
    /// 输出目标列表
    sinks: Mutex<Vec<Box<dyn LogSink>>>,
}

impl Logger {
    /// 创建新的日志器
    pub fn new(level: Level) -> Arc<Self> {
        Arc::new(Logger {
            level: AtomicU8::new(level as u8),
            sinks: Mutex::new(Vec::new()),
        })
    }

    /// 添加输出目标
    pub fn with_sink<S: LogSink + 'static>(self: Arc<Self>, sink: S) -> Arc<Self> {
        self.add_sink(sink);
        self
    }

    /// 添加 sink（内部方法，用于 config）
    pub fn add_sink<S: LogSink + 'static>(&self, sink: S) {
        if let Ok(mut sinks) = self.sinks.lock() {
            sinks.push(Box::new(sink));
        }
    }

    /// 动态设置日志级别
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// 获取当前日志级别
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed)).unwrap_or(Level::Info)
    }

    /// 检查指定级别是否启用
    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// 记录日志（内部方法，一般通过宏调用）
    #[inline(never)]
    pub fn log(&self, level: Level, target: &'static str, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }

        let record = Record::new(level, target, message);

        if let Ok(sinks) = self.sinks.lock() {
            for sink in sinks.iter() {
                sink.write(&record);
            }
        }
    }

    /// 创建禁用日志的no-op日志器（用于测试或禁用场景）
    pub fn noop() -> Arc<Self> {
        // Error级别，且没有任何sink
        Self::new(Level::Error)
    }
}

/// 标准输出sink
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write(&self, record: &Record) {
        println!("{}", record.format());
    }
}

/// 标准错误sink
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write(&self, record: &Record) {
        eprintln!("{}", record.format());
    }
}

/// 容量受限的内存sink
///
/// 满了覆盖最旧记录，用于测试断言和崩溃转储。
pub struct MemorySink {
    records: Mutex<VecDeque<Record>>,
    capacity: usize,
}

impl MemorySink {
    /// 创建指定容量的内存sink
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(MemorySink {
            records: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        })
    }

    /// 取出全部记录的快照
    pub fn dump_records(&self) -> Vec<Record> {
        match self.records.lock() {
            Ok(records) => records.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// 当前记录数
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for Arc<MemorySink> {
    fn write(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            if records.len() == self.capacity {
                records.pop_front();
            }
            records.push_back(record.clone());
        }
    }
}
