//! 源码新鲜度缓存
//!
//! 记录每个源码文件上一次成功装载时观察到的修改时间。只有成功装载
//! 才写入记录：失败的装载不更新缓存，下一次请求会重新尝试。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

/// 按源码路径记录最近一次成功装载的 mtime
#[derive(Debug, Default)]
pub struct StatCache {
    records: Mutex<HashMap<PathBuf, SystemTime>>,
}

impl StatCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入成功装载后的 mtime（仅在提交阶段调用）
    pub fn record(&self, path: &Path, mtime: SystemTime) {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.insert(path.to_path_buf(), mtime);
    }

    /// 查询记录的 mtime
    pub fn recorded(&self, path: &Path) -> Option<SystemTime> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .copied()
    }

    /// 已缓存的模块是否过期
    ///
    /// 仅当存在先前记录、且记录严格早于 `current` 时为真。
    /// 没有记录（首次装载）不算过期。
    pub fn is_stale(&self, path: &Path, current: SystemTime) -> bool {
        match self.recorded(path) {
            Some(previous) => previous < current,
            None => false,
        }
    }

    /// 记录条数
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
