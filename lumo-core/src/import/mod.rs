//! 导入编排
//!
//! 把路径解析、前缀注册、新鲜度检测和占位模块装配成完整的装载流程，
//! 并维护进程级缓存。所有全局可变状态都收在 `ImportContext` 里，
//! 显式构建、显式注入，测试各自拿一个干净的上下文。
//!
//! # 单键装载流程
//! 1. 解析引用为规范键（坏前缀立即失败）
//! 2. stat 源码文件；要求重载且已过期时先作废制品、撤销缓存提交
//! 3. 缓存命中（已提交或装载中）直接返回既有句柄
//! 4. 登记装载中、占位对象入缓存——同键并发装载只会选出一个胜者
//! 5. 编译并执行，产出顶层绑定
//! 6. 绑定合并进占位对象（不替换对象本身）
//! 7. 记录 mtime、撤销装载登记
//!
//! 登记的撤销由 RAII 守卫兜底，失败路径同样生效。

pub mod in_flight;
pub mod prefix;
pub mod resolve;
pub mod stat;

use crate::error::ImportError;
use crate::module::Module;
use crate::runtime::{ImportHost, ModuleRuntime, Namespace, RuntimeFault, ScriptRuntime};
use in_flight::{InFlightGuard, InFlightSet};
use lumo_config::WaitConfig;
use lumo_log::{debug, error, warn, Logger};
use lumo_vfs::{NativeFileSystem, VfsError, VirtualFileSystem};
use prefix::PrefixRegistry;
use resolve::ModuleKey;
use stat::StatCache;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// 进程级导入上下文
///
/// 持有模块缓存、前缀注册表、新鲜度缓存与装载中集合，以及注入的
/// 文件系统、运行时和 logger。可在线程间共享。
pub struct ImportContext {
    fs: Arc<dyn VirtualFileSystem>,
    runtime: Arc<dyn ModuleRuntime>,
    logger: Arc<Logger>,
    wait: WaitConfig,
    startup: OnceLock<PathBuf>,
    prefixes: PrefixRegistry,
    modules: Mutex<HashMap<ModuleKey, Module>>,
    stats: StatCache,
    in_flight: Arc<InFlightSet>,
}

impl ImportContext {
    /// 开始构建上下文
    pub fn builder() -> ImportContextBuilder {
        ImportContextBuilder::default()
    }

    /// 设定启动路径基线
    ///
    /// 幂等：只有首次调用生效。`None` 取进程当前目录。
    /// 任何入口在基线未设置时都会隐式调用一次。
    ///
    /// # Returns
    /// 本次调用是否真正写入
    pub fn init(&self, path: Option<&Path>) -> bool {
        let value = match path {
            Some(p) => resolve::absolutize(p),
            None => default_startup(),
        };
        self.startup.set(value).is_ok()
    }

    /// 启动路径是否已初始化
    pub fn is_initialized(&self) -> bool {
        self.startup.get().is_some()
    }

    /// 当前启动路径（未初始化则先隐式初始化）
    pub fn startup_path(&self) -> &Path {
        self.startup.get_or_init(default_startup)
    }

    /// 注册路径前缀
    ///
    /// # Returns
    /// 本次注册是否写入（名字已存在且未 `force` 时为 false）
    pub fn register_prefix(&self, name: &str, path: &Path, force: bool) -> bool {
        let written = self.prefixes.register(name, path, force);
        if written {
            debug!(
                self.logger,
                "registered prefix '{}' -> {}",
                name,
                path.display()
            );
        } else {
            debug!(self.logger, "prefix '{}' already registered, kept", name);
        }
        written
    }

    /// 查询路径前缀
    pub fn lookup_prefix(&self, name: &str) -> Option<PathBuf> {
        self.prefixes.lookup(name)
    }

    /// 装载模块
    ///
    /// # Arguments
    /// * `script` - 模块引用（相对或绝对路径，后缀可省略）
    /// * `prefix` - 已注册前缀名；未注册立即失败，不触碰文件系统
    /// * `reload` - 源码比缓存新时是否重新装载
    pub fn load(
        &self,
        script: &str,
        prefix: Option<&str>,
        reload: bool,
    ) -> Result<Module, ImportError> {
        self.load_from(script, prefix, reload, None)
    }

    fn load_from(
        &self,
        script: &str,
        prefix: Option<&str>,
        reload: bool,
        caller_dir: Option<&Path>,
    ) -> Result<Module, ImportError> {
        // 1. Resolve
        let prefix_root = match prefix {
            Some(name) => Some(self.prefixes.lookup(name).ok_or_else(|| {
                ImportError::UnregisteredPrefix {
                    name: name.to_string(),
                }
            })?),
            None => None,
        };
        let key = resolve::resolve(
            script,
            caller_dir,
            prefix_root.as_deref(),
            self.startup_path(),
        );
        let source_path = key.source_path();
        debug!(self.logger, "load '{}' -> {}", script, key);

        // 2. StatCheck
        let mtime = self
            .fs
            .modified(&source_path)
            .map_err(|e| fs_error(&source_path, e))?;

        if reload && self.stats.is_stale(&source_path, mtime) {
            // 装载中的键不逐出，避免并发重载打断胜者的合并
            if !self.in_flight.contains(&key) {
                self.invalidate(&key);
            }
        }

        // 3 + 4. CacheHit / InFlightRegister：胜者在 modules 锁内选出
        let (module, winner) = {
            let mut modules = lock(&self.modules);
            match modules.get(&key) {
                Some(existing) if existing.is_committed() || self.in_flight.contains(&key) => {
                    (existing.clone(), false)
                }
                Some(existing) => {
                    let module = existing.clone();
                    self.in_flight.begin(&key);
                    (module, true)
                }
                None => {
                    let module =
                        Module::new(key.clone(), Arc::clone(&self.in_flight), self.wait.clone());
                    modules.insert(key.clone(), module.clone());
                    self.in_flight.begin(&key);
                    (module, true)
                }
            }
        };
        if !winner {
            return Ok(module);
        }

        // 守卫保证登记在成功与失败路径上都被撤销
        let _guard = InFlightGuard::new(&self.in_flight, key.clone());

        // 5. CompileAndExecute
        let namespace = self.compile_and_execute(&key, &source_path)?;

        // 6. Merge
        module.merge(namespace);
        module.set_committed(true);

        // 7. Commit
        self.stats.record(&source_path, mtime);
        debug!(self.logger, "loaded {}", key);

        Ok(module)
    }

    /// 过期逐出：先删制品（否则旧制品会抢在新源码之前被装载），
    /// 再撤销缓存条目的提交状态。占位对象本身保留，重载结果仍合并
    /// 到同一个对象上。
    fn invalidate(&self, key: &ModuleKey) {
        let artifact = key.artifact_path();
        debug!(self.logger, "stale module, invalidating: {}", key);
        if self.fs.is_file(&artifact) {
            if let Err(e) = self.fs.remove_file(&artifact) {
                warn!(
                    self.logger,
                    "could not remove stale artifact '{}': {}",
                    artifact.display(),
                    e
                );
            }
        }
        if let Some(module) = lock(&self.modules).get(key) {
            module.set_committed(false);
        }
    }

    fn compile_and_execute(
        &self,
        key: &ModuleKey,
        source_path: &Path,
    ) -> Result<Namespace, ImportError> {
        let source = self
            .fs
            .read_file(source_path)
            .map_err(|e| fs_error(source_path, e))?;

        let artifact = key.artifact_path();
        if let Err(fault) = self.runtime.compile(&source, &artifact, self.fs.as_ref()) {
            error!(
                self.logger,
                "failed to compile '{}': {}",
                source_path.display(),
                fault
            );
            return Err(fault_error(source_path, fault));
        }

        // 嵌套导入以本模块所在目录为调用方位置
        let host = ScopedHost {
            ctx: self,
            caller_dir: key
                .as_path()
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };
        match self.runtime.execute(&artifact, self.fs.as_ref(), &host) {
            Ok(namespace) => Ok(namespace),
            Err(fault) => {
                error!(
                    self.logger,
                    "failed to execute '{}': {}",
                    source_path.display(),
                    fault
                );
                Err(fault_error(source_path, fault))
            }
        }
    }
}

impl std::fmt::Debug for ImportContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportContext")
            .field("startup", &self.startup.get())
            .field("modules", &lock(&self.modules).len())
            .field("prefixes", &self.prefixes.len())
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

/// 执行期导入回调：带上当前模块的目录作为调用方位置
struct ScopedHost<'a> {
    ctx: &'a ImportContext,
    caller_dir: PathBuf,
}

impl ImportHost for ScopedHost<'_> {
    fn import(&self, script: &str, prefix: Option<&str>) -> Result<Module, ImportError> {
        self.ctx
            .load_from(script, prefix, true, Some(&self.caller_dir))
    }
}

/// 上下文构建器
///
/// 缺省注入本机文件系统、行式脚本运行时和 no-op logger。
#[derive(Default)]
pub struct ImportContextBuilder {
    fs: Option<Arc<dyn VirtualFileSystem>>,
    runtime: Option<Arc<dyn ModuleRuntime>>,
    logger: Option<Arc<Logger>>,
    wait: Option<WaitConfig>,
    startup: Option<PathBuf>,
}

impl ImportContextBuilder {
    /// 注入文件系统
    pub fn fs(mut self, fs: Arc<dyn VirtualFileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// 注入编译/执行设施
    pub fn runtime(mut self, runtime: Arc<dyn ModuleRuntime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// 注入 logger
    pub fn logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// 设置占位等待参数
    pub fn wait(mut self, wait: WaitConfig) -> Self {
        self.wait = Some(wait);
        self
    }

    /// 预设启动路径基线
    pub fn startup_path(mut self, path: impl AsRef<Path>) -> Self {
        self.startup = Some(path.as_ref().to_path_buf());
        self
    }

    /// 构建上下文
    pub fn build(self) -> ImportContext {
        let ctx = ImportContext {
            fs: self.fs.unwrap_or_else(|| Arc::new(NativeFileSystem::new())),
            runtime: self.runtime.unwrap_or_else(|| Arc::new(ScriptRuntime::new())),
            logger: self.logger.unwrap_or_else(Logger::noop),
            wait: self.wait.unwrap_or_default(),
            startup: OnceLock::new(),
            prefixes: PrefixRegistry::new(),
            modules: Mutex::new(HashMap::new()),
            stats: StatCache::new(),
            in_flight: Arc::new(InFlightSet::new()),
        };
        if let Some(path) = self.startup {
            ctx.init(Some(&path));
        }
        ctx
    }
}

fn default_startup() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn fs_error(path: &Path, err: VfsError) -> ImportError {
    match err {
        VfsError::NotFound { .. } => ImportError::SourceNotFound {
            path: path.to_path_buf(),
        },
        other => ImportError::Filesystem {
            path: path.to_path_buf(),
            source: other,
        },
    }
}

fn fault_error(path: &Path, fault: RuntimeFault) -> ImportError {
    match fault {
        RuntimeFault::Compile(message) => ImportError::Compile {
            path: path.to_path_buf(),
            message,
        },
        RuntimeFault::Execution(message) => ImportError::Execution {
            path: path.to_path_buf(),
            message,
        },
    }
}
