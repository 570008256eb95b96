//! 导入错误类型
//!
//! 解析类错误（前缀、路径）属于调用方编程错误，立即失败不重试；
//! 编译/执行错误对调用方统一表现为导入失败，但保留阶段区分用于诊断。

use lumo_config::Stage;
use lumo_vfs::VfsError;
use std::path::PathBuf;
use thiserror::Error;

/// 导入失败
#[derive(Error, Debug)]
pub enum ImportError {
    /// 引用了从未注册的路径前缀
    #[error("path prefix '{name}' was never registered")]
    UnregisteredPrefix { name: String },

    /// 解析出的键没有对应的源码文件
    #[error("module source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// 文件系统操作失败（非"不存在"）
    #[error("filesystem error on '{}': {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: VfsError,
    },

    /// 源码编译失败
    #[error("failed to compile '{}': {message}", path.display())]
    Compile { path: PathBuf, message: String },

    /// 顶层执行失败
    #[error("failed to execute '{}': {message}", path.display())]
    Execution { path: PathBuf, message: String },
}

impl ImportError {
    /// 出错的装载阶段
    pub fn stage(&self) -> Stage {
        match self {
            ImportError::UnregisteredPrefix { .. } => Stage::Resolve,
            ImportError::SourceNotFound { .. } | ImportError::Filesystem { .. } => Stage::Stat,
            ImportError::Compile { .. } => Stage::Compile,
            ImportError::Execution { .. } => Stage::Execute,
        }
    }

    /// 涉及的文件路径（如果有）
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ImportError::UnregisteredPrefix { .. } => None,
            ImportError::SourceNotFound { path }
            | ImportError::Filesystem { path, .. }
            | ImportError::Compile { path, .. }
            | ImportError::Execution { path, .. } => Some(path),
        }
    }
}

/// 占位模块在等待窗口内未能解析出请求的绑定
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no attribute '{name}' in module '{module}' after {waited_ms}ms")]
pub struct AttributeNotFound {
    /// 模块键
    pub module: String,
    /// 请求的绑定名
    pub name: String,
    /// 实际等待时长（毫秒）
    pub waited_ms: u64,
}
