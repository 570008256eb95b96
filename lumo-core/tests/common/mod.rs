#![allow(dead_code)]
//! 测试辅助工具
//!
//! 统一构造内存文件系统和快速超时的导入上下文，外加几个用于观察
//! 装载行为的运行时包装。

use lumo_config::WaitConfig;
use lumo_core::{
    ImportContext, ImportHost, ModuleRuntime, Namespace, RuntimeFault, ScriptRuntime,
};
use lumo_vfs::{MemoryFileSystem, VirtualFileSystem};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 构造预置文件的内存文件系统
pub fn memory_fs(files: &[(&str, &str)]) -> MemoryFileSystem {
    MemoryFileSystem::with_files(
        files
            .iter()
            .map(|(path, content)| (*path, content.as_bytes().to_vec())),
    )
}

/// 用指定运行时构造上下文（启动路径 /app，快速超时）
pub fn context_with(fs: MemoryFileSystem, runtime: Arc<dyn ModuleRuntime>) -> ImportContext {
    ImportContext::builder()
        .fs(Arc::new(fs))
        .runtime(runtime)
        .wait(WaitConfig {
            poll_interval_ms: 1,
            timeout_ms: 200,
        })
        .startup_path("/app")
        .build()
}

/// 脚本运行时 + 内存文件系统的标准组合
pub fn script_context(files: &[(&str, &str)]) -> (ImportContext, MemoryFileSystem) {
    let fs = memory_fs(files);
    let ctx = context_with(fs.clone(), Arc::new(ScriptRuntime::new()));
    (ctx, fs)
}

/// 统计编译/执行次数的运行时包装
pub struct CountingRuntime {
    inner: ScriptRuntime,
    compiles: AtomicUsize,
    executions: AtomicUsize,
}

impl CountingRuntime {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: ScriptRuntime::new(),
            compiles: AtomicUsize::new(0),
            executions: AtomicUsize::new(0),
        })
    }

    pub fn compile_count(&self) -> usize {
        self.compiles.load(Ordering::SeqCst)
    }

    pub fn execution_count(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

impl ModuleRuntime for CountingRuntime {
    fn compile(
        &self,
        source: &[u8],
        artifact: &Path,
        fs: &dyn VirtualFileSystem,
    ) -> Result<(), RuntimeFault> {
        self.compiles.fetch_add(1, Ordering::SeqCst);
        self.inner.compile(source, artifact, fs)
    }

    fn execute(
        &self,
        artifact: &Path,
        fs: &dyn VirtualFileSystem,
        host: &dyn ImportHost,
    ) -> Result<Namespace, RuntimeFault> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        self.inner.execute(artifact, fs, host)
    }
}

/// 执行前先睡一段时间的运行时包装（拉长装载窗口）
pub struct SlowRuntime {
    inner: ScriptRuntime,
    delay: Duration,
}

impl SlowRuntime {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: ScriptRuntime::new(),
            delay,
        })
    }
}

impl ModuleRuntime for SlowRuntime {
    fn compile(
        &self,
        source: &[u8],
        artifact: &Path,
        fs: &dyn VirtualFileSystem,
    ) -> Result<(), RuntimeFault> {
        self.inner.compile(source, artifact, fs)
    }

    fn execute(
        &self,
        artifact: &Path,
        fs: &dyn VirtualFileSystem,
        host: &dyn ImportHost,
    ) -> Result<Namespace, RuntimeFault> {
        std::thread::sleep(self.delay);
        self.inner.execute(artifact, fs, host)
    }
}

/// 执行总是失败的运行时包装（可带延迟）
pub struct FailingRuntime {
    delay: Duration,
}

impl FailingRuntime {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self { delay })
    }
}

impl ModuleRuntime for FailingRuntime {
    fn compile(
        &self,
        _source: &[u8],
        _artifact: &Path,
        _fs: &dyn VirtualFileSystem,
    ) -> Result<(), RuntimeFault> {
        Ok(())
    }

    fn execute(
        &self,
        _artifact: &Path,
        _fs: &dyn VirtualFileSystem,
        _host: &dyn ImportHost,
    ) -> Result<Namespace, RuntimeFault> {
        std::thread::sleep(self.delay);
        Err(RuntimeFault::Execution("synthetic failure".to_string()))
    }
}
