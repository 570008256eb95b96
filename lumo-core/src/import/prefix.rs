//! 路径前缀注册表
//!
//! 短名字到绝对路径前缀的映射，调用方可以用注册过的别名代替路径
//! 发起导入。默认首个注册者生效：各模块在装载时尝试建立自己的默认
//! 前缀，不会覆盖已经定制好的环境；`force` 可显式覆盖。

use crate::import::resolve;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// 前缀注册表
#[derive(Debug, Default)]
pub struct PrefixRegistry {
    entries: RwLock<HashMap<String, PathBuf>>,
}

impl PrefixRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册前缀
    ///
    /// 路径折算为绝对路径后存储。名字已存在且未指定 `force` 时
    /// 本次调用静默不生效。
    ///
    /// # Returns
    /// 本次注册是否写入
    pub fn register(&self, name: &str, path: &Path, force: bool) -> bool {
        let abs = resolve::absolutize(path);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if force || !entries.contains_key(name) {
            entries.insert(name.to_string(), abs);
            true
        } else {
            false
        }
    }

    /// 查询前缀
    ///
    /// # Returns
    /// 注册的绝对路径；未注册返回 `None`，由调用方决定如何失败
    pub fn lookup(&self, name: &str) -> Option<PathBuf> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    /// 名字是否已注册
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(name)
    }

    /// 已注册的前缀数量
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
