//! API 错误报告
//!
//! 把核心错误整理成结构化报告，CLI 直接打印，工具侧可转 JSON。

use lumo_core::{AttributeNotFound, ImportError};

/// 结构化错误报告
///
/// 上层应用（CLI、Web、LSP）可以根据自己的需求格式化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// 出错阶段: resolve, stat, compile, execute, attribute
    pub stage: &'static str,
    /// 涉及的文件路径（如果有）
    pub path: Option<String>,
    /// 人类可读的错误消息
    pub message: String,
}

impl ErrorReport {
    /// 从导入错误构建报告
    pub fn from_import(err: &ImportError) -> Self {
        ErrorReport {
            stage: err.stage().as_str(),
            path: err.path().map(|p| p.display().to_string()),
            message: err.to_string(),
        }
    }

    /// 从占位属性错误构建报告
    pub fn from_attribute(err: &AttributeNotFound) -> Self {
        ErrorReport {
            stage: "attribute",
            path: Some(err.module.clone()),
            message: err.to_string(),
        }
    }

    /// 转换为 JSON 格式（工具集成使用）
    ///
    /// 不依赖 serde，手动构建 JSON 字符串。
    pub fn to_json(&self) -> String {
        let path = match &self.path {
            Some(p) => format!("\"{}\"", escape_json(p)),
            None => "null".to_string(),
        };
        format!(
            r#"{{"stage":"{}","path":{},"message":"{}"}}"#,
            self.stage,
            path,
            escape_json(&self.message)
        )
    }

    /// 简洁格式（适合终端）
    pub fn to_short(&self) -> String {
        format!("{}: {}", self.stage, self.message)
    }
}

impl From<&ImportError> for ErrorReport {
    fn from(err: &ImportError) -> Self {
        Self::from_import(err)
    }
}

impl std::fmt::Display for ErrorReport {
    /// 默认的 CLI 友好格式
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "[{}] import error at '{}': {}", self.stage, path, self.message),
            None => write!(f, "[{}] import error: {}", self.stage, self.message),
        }
    }
}

/// 简单的 JSON 字符串转义
fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
