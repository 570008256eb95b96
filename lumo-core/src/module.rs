//! 模块占位对象
//!
//! 每个模块键在首次请求时就创建占位对象，并作为该键对所有调用方的
//! 唯一代表存活整个进程生命周期。装载完成后绑定在原对象上合并，
//! 因此互相导入的两个模块各自拿到的句柄始终有效。
//!
//! 属性访问的行为（§ 对应装载窗口）：
//! - 绑定已存在：立即返回，不等待
//! - 键在装载中：在条件变量上等待装载结束（共享总时限）
//! - 绑定仍缺失：按轮询间隔有界重试，超时报 `AttributeNotFound`

use crate::error::AttributeNotFound;
use crate::import::in_flight::InFlightSet;
use crate::import::resolve::ModuleKey;
use crate::runtime::Namespace;
use crate::value::Value;
use lumo_config::WaitConfig;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Instant;

/// 模块句柄
///
/// 克隆共享同一底层对象；相等性即对象同一性。
#[derive(Clone)]
pub struct Module {
    inner: Arc<ModuleInner>,
}

struct ModuleInner {
    key: ModuleKey,
    bindings: RwLock<BTreeMap<String, Value>>,
    /// 是否已有一次成功装载的结果
    committed: AtomicBool,
    in_flight: Arc<InFlightSet>,
    wait: WaitConfig,
}

impl Module {
    pub(crate) fn new(key: ModuleKey, in_flight: Arc<InFlightSet>, wait: WaitConfig) -> Self {
        Self {
            inner: Arc::new(ModuleInner {
                key,
                bindings: RwLock::new(BTreeMap::new()),
                committed: AtomicBool::new(false),
                in_flight,
                wait,
            }),
        }
    }

    /// 模块键
    pub fn key(&self) -> &ModuleKey {
        &self.inner.key
    }

    /// 是否已完成过一次成功装载
    pub fn is_committed(&self) -> bool {
        self.inner.committed.load(Ordering::Acquire)
    }

    pub(crate) fn set_committed(&self, committed: bool) {
        self.inner.committed.store(committed, Ordering::Release);
    }

    /// 读取绑定
    ///
    /// 绑定存在时立即返回；模块在装载中则等待装载结束，之后在
    /// 有界窗口内轮询重试，超时报 `AttributeNotFound`。
    pub fn get(&self, name: &str) -> Result<Value, AttributeNotFound> {
        if let Some(value) = self.read_binding(name) {
            return Ok(value);
        }

        let started = Instant::now();
        let deadline = started + self.inner.wait.timeout();

        self.inner
            .in_flight
            .wait_until_settled(&self.inner.key, deadline);

        loop {
            if let Some(value) = self.read_binding(name) {
                return Ok(value);
            }
            if Instant::now() >= deadline {
                return Err(AttributeNotFound {
                    module: self.inner.key.to_string(),
                    name: name.to_string(),
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }
            thread::sleep(self.inner.wait.poll_interval());
        }
    }

    /// 非阻塞读取绑定
    pub fn try_get(&self, name: &str) -> Option<Value> {
        self.read_binding(name)
    }

    /// 当前全部绑定的快照（按名字排序）
    pub fn bindings(&self) -> Vec<(String, Value)> {
        let bindings = self
            .inner
            .bindings
            .read()
            .unwrap_or_else(|e| e.into_inner());
        bindings
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// 当前绑定数量
    pub fn len(&self) -> usize {
        self.inner
            .bindings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// 是否还没有任何绑定
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 用执行结果整体替换绑定表
    ///
    /// 在原对象上原地替换：重载后被删除的名字不得残留。
    pub(crate) fn merge(&self, namespace: Namespace) {
        let mut bindings = self
            .inner
            .bindings
            .write()
            .unwrap_or_else(|e| e.into_inner());
        bindings.clear();
        bindings.extend(namespace);
    }

    fn read_binding(&self, name: &str) -> Option<Value> {
        self.inner
            .bindings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }
}

impl PartialEq for Module {
    /// 句柄相等即底层对象同一
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Module: {}", self.inner.key)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("key", &self.inner.key)
            .field("committed", &self.is_committed())
            .field("bindings", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::resolve;
    use std::path::Path;
    use std::time::Duration;

    fn test_key(name: &str) -> ModuleKey {
        resolve::resolve(name, None, None, Path::new("/app"))
    }

    fn test_module(name: &str) -> Module {
        Module::new(
            test_key(name),
            Arc::new(InFlightSet::new()),
            WaitConfig::fast(),
        )
    }

    #[test]
    fn test_new_module_is_empty() {
        let module = test_module("a");
        assert!(module.is_empty());
        assert!(!module.is_committed());
        assert_eq!(module.try_get("anything"), None);
    }

    #[test]
    fn test_merge_and_get() {
        let module = test_module("a");
        module.merge(vec![
            ("x".to_string(), Value::Int(1)),
            ("y".to_string(), Value::Str("hi".to_string())),
        ]);

        assert_eq!(module.len(), 2);
        assert_eq!(module.get("x").unwrap(), Value::Int(1));
        assert_eq!(module.get("y").unwrap(), Value::Str("hi".to_string()));
    }

    #[test]
    fn test_merge_replaces_contents() {
        let module = test_module("a");
        module.merge(vec![
            ("old".to_string(), Value::Int(1)),
            ("kept".to_string(), Value::Int(2)),
        ]);
        module.merge(vec![("kept".to_string(), Value::Int(3))]);

        assert_eq!(module.try_get("old"), None);
        assert_eq!(module.get("kept").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_get_missing_times_out() {
        let module = test_module("a");
        module.merge(vec![("x".to_string(), Value::Int(1))]);

        let started = Instant::now();
        let err = module.get("missing").unwrap_err();
        let elapsed = started.elapsed();

        assert_eq!(err.name, "missing");
        assert!(err.module.contains("/app/a"));
        assert!(elapsed >= Duration::from_millis(WaitConfig::fast().timeout_ms));
    }

    #[test]
    fn test_get_waits_for_in_flight_load() {
        let in_flight = Arc::new(InFlightSet::new());
        let key = test_key("slow");
        let module = Module::new(
            key.clone(),
            Arc::clone(&in_flight),
            WaitConfig {
                poll_interval_ms: 1,
                timeout_ms: 500,
            },
        );

        in_flight.begin(&key);

        let producer = {
            let module = module.clone();
            let in_flight = Arc::clone(&in_flight);
            let key = key.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                module.merge(vec![("late".to_string(), Value::Int(7))]);
                in_flight.finish(&key);
            })
        };

        let value = module.get("late").unwrap();
        assert_eq!(value, Value::Int(7));
        producer.join().unwrap();
    }

    #[test]
    fn test_identity_equality() {
        let module = test_module("a");
        let clone = module.clone();
        let other = test_module("a");

        assert_eq!(module, clone);
        assert_ne!(module, other);
    }

    #[test]
    fn test_display() {
        let module = test_module("a");
        assert_eq!(module.to_string(), "Module: /app/a");
    }
}
