//! 编译执行设施的接口
//!
//! 模块源码如何编译成制品、制品如何执行出顶层绑定，由外部设施承担；
//! 核心只负责解析、缓存与编排。执行期通过 `ImportHost` 回调发起嵌套
//! 导入，循环导入因此能重入编排器。

use crate::error::ImportError;
use crate::module::Module;
use crate::value::Value;
use lumo_vfs::VirtualFileSystem;
use std::path::Path;
use thiserror::Error;

mod script;

pub use script::ScriptRuntime;

/// 执行模块得到的顶层绑定（按出现顺序）
pub type Namespace = Vec<(String, Value)>;

/// 执行期导入回调
///
/// 模块顶层代码通过它发起嵌套导入，编排器负责带上正确的调用方位置。
pub trait ImportHost {
    /// 导入一个模块，返回其句柄（装载中返回占位对象）
    fn import(&self, script: &str, prefix: Option<&str>) -> Result<Module, ImportError>;
}

/// 编译/执行设施
pub trait ModuleRuntime: Send + Sync {
    /// 把源码编译为制品文件，经由 `fs` 写到 `artifact`
    fn compile(
        &self,
        source: &[u8],
        artifact: &Path,
        fs: &dyn VirtualFileSystem,
    ) -> Result<(), RuntimeFault>;

    /// 执行制品，产出模块顶层绑定
    fn execute(
        &self,
        artifact: &Path,
        fs: &dyn VirtualFileSystem,
        host: &dyn ImportHost,
    ) -> Result<Namespace, RuntimeFault>;
}

/// 设施故障
///
/// 编译期与执行期的区分只服务于诊断；对装载调用方两者都是导入失败。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeFault {
    /// 源码无法编译
    #[error("{0}")]
    Compile(String),

    /// 制品执行中途失败
    #[error("{0}")]
    Execution(String),
}
