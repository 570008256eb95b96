//! 装载中模块集合
//!
//! 记录正在编译/执行的模块键与起始时刻。占位对象的属性访问在这里
//! 等待装载窗口结束；生产者在每次撤销登记时唤醒全部等待者。
//! 登记必须在所有退出路径上撤销（成功或失败），否则后续装载方会
//! 一直挂在占位对象上——用 RAII 守卫保证。

use crate::import::resolve::ModuleKey;
use std::collections::HashMap;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Instant;

/// 装载中的模块键集合
#[derive(Debug, Default)]
pub struct InFlightSet {
    entries: Mutex<HashMap<ModuleKey, Instant>>,
    settled: Condvar,
}

impl InFlightSet {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个键开始装载
    ///
    /// # Returns
    /// 键此前不在集合中则为 true
    pub fn begin(&self, key: &ModuleKey) -> bool {
        let mut entries = self.lock();
        entries.insert(key.clone(), Instant::now()).is_none()
    }

    /// 撤销登记并唤醒所有等待者
    pub fn finish(&self, key: &ModuleKey) {
        let mut entries = self.lock();
        entries.remove(key);
        self.settled.notify_all();
    }

    /// 键是否在装载中
    pub fn contains(&self, key: &ModuleKey) -> bool {
        self.lock().contains_key(key)
    }

    /// 装载开始时刻（如果在装载中）
    pub fn started_at(&self, key: &ModuleKey) -> Option<Instant> {
        self.lock().get(key).copied()
    }

    /// 当前装载中的键数量
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 等待指定键离开集合
    ///
    /// 在条件变量上等待而不是轮询。到达 `deadline` 后直接返回，
    /// 调用方继续走自己的有界重试。
    pub fn wait_until_settled(&self, key: &ModuleKey, deadline: Instant) {
        let mut entries = self.lock();
        while entries.contains_key(key) {
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            let (guard, _timeout) = self
                .settled
                .wait_timeout(entries, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            entries = guard;
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ModuleKey, Instant>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// 装载登记守卫
///
/// 无论装载以何种方式结束，都会撤销登记并唤醒等待者。
pub struct InFlightGuard<'a> {
    set: &'a InFlightSet,
    key: ModuleKey,
}

impl<'a> InFlightGuard<'a> {
    pub fn new(set: &'a InFlightSet, key: ModuleKey) -> Self {
        Self { set, key }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.finish(&self.key);
    }
}
