//! CLI 配置
//!
//! `lumo.json` 项目文件的结构定义

use std::collections::BTreeMap;

/// lumo.json 结构
#[derive(Debug, serde::Deserialize)]
pub struct ProjectConfig {
    /// 入口模块引用（相对项目目录）
    pub entry: String,
    /// 前缀注册：名字 -> 路径
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
    /// 装载器调优
    pub loader: Option<LoaderSection>,
}

/// 装载器配置节
#[derive(Debug, Default, serde::Deserialize)]
pub struct LoaderSection {
    /// 源码变更时是否重新装载（默认 true）
    pub reload: Option<bool>,
    /// 日志级别: "silent", "error", "warn", "info", "debug", "trace"
    pub log_level: Option<String>,
    /// 日志文件路径（追加写入）
    pub log_file: Option<String>,
    /// 占位等待的轮询间隔（毫秒）
    pub poll_interval_ms: Option<u64>,
    /// 占位等待的总时限（毫秒）
    pub attr_timeout_ms: Option<u64>,
}
