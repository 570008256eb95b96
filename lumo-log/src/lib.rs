//! lumo-log - 结构化日志系统
//!
//! 为 Lumo 装载器和运行时设计的结构化日志系统，特点：
//! - **显式传递**：无全局 logger，配置通过代码传入
//! - **可插拔输出**：stdout / stderr / 文件 / 内存缓冲
//! - **非阻塞倾向**：sink 写入失败静默忽略，日志不拖垮主流程
//!
//! # 快速开始
//!
//! ```ignore
//! use lumo_log::{LogConfig, debug};
//!
//! let (logger, buffer) = LogConfig::dev().init();
//! debug!(logger, "装载器启动");
//! ```

mod config;
mod logger;
mod macros;
mod record;

pub use config::{LogConfig, OutputConfig};
pub use logger::{LogSink, Logger, MemorySink, StderrSink, StdoutSink};
pub use record::{Level, Record};

// 宏通过 #[macro_export] 自动导出到 crate 根：
// trace!, debug!, info!, warn!, error!, log!
