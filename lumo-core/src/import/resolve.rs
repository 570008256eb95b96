//! 导入路径解析
//!
//! 把任意形式的模块引用折算成唯一的规范绝对键。
//!
//! # 解析规则
//! - 带前缀：先把引用拼到注册的前缀路径后面
//! - 结果为绝对路径：目录 + 文件名即为键
//! - 结果为相对路径：依次拼接 调用方目录、引用目录、文件名；
//!   调用方目录本身是相对路径或为空时，以进程启动路径为根
//! - 文件名末尾的源码后缀在成键前剥掉，定位文件时再补回
//!
//! 同一个模块不论从哪里、以什么形式引用，都得到同一个键；
//! 同一相对引用从不同调用方发出时各自得到正确的不同键。

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// 模块源码文件后缀
pub const SOURCE_SUFFIX: &str = "lumo";

/// 编译制品文件后缀（源码后缀 + "c"）
pub const ARTIFACT_SUFFIX: &str = "lumoc";

/// 模块的规范绝对键（剥去源码后缀的绝对路径）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleKey(PathBuf);

impl ModuleKey {
    /// 键的路径形式
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// 对应的源码文件路径（补回源码后缀）
    ///
    /// 不能用 `with_extension`：键本身可能含点号（如 `a.b`），
    /// 后缀必须追加而不是替换。
    pub fn source_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.{}", self.0.display(), SOURCE_SUFFIX))
    }

    /// 对应的编译制品路径
    pub fn artifact_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.{}", self.0.display(), ARTIFACT_SUFFIX))
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// 解析模块引用为规范键
///
/// # Arguments
/// * `requested` - 模块引用（相对或绝对路径，后缀可带可不带）
/// * `caller_dir` - 调用方源码所在目录；顶层调用传 `None`
/// * `prefix_root` - 已注册前缀对应的绝对路径（如果引用带前缀）
/// * `startup` - 进程启动路径基线
pub fn resolve(
    requested: &str,
    caller_dir: Option<&Path>,
    prefix_root: Option<&Path>,
    startup: &Path,
) -> ModuleKey {
    let requested_path = match prefix_root {
        Some(root) => root.join(requested),
        None => PathBuf::from(requested),
    };

    let dir = requested_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let base = requested_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = strip_source_suffix(&base).to_string();

    let joined = if requested_path.is_absolute() {
        join_part(dir, Path::new(&base))
    } else {
        // 空目录按"无目录成分"处理，直接落到启动路径
        let caller = caller_dir.filter(|c| !c.as_os_str().is_empty());
        let root = match caller {
            Some(c) if c.is_absolute() => c.to_path_buf(),
            Some(c) => join_part(startup.to_path_buf(), c),
            None => startup.to_path_buf(),
        };
        join_part(join_part(root, &dir), Path::new(&base))
    };

    ModuleKey(normalize(&joined))
}

/// 剥掉末尾的源码后缀（如果有）
fn strip_source_suffix(name: &str) -> &str {
    match name.strip_suffix(SOURCE_SUFFIX) {
        Some(stem) => stem.strip_suffix('.').unwrap_or(name),
        None => name,
    }
}

fn join_part(mut base: PathBuf, part: &Path) -> PathBuf {
    if !part.as_os_str().is_empty() {
        base.push(part);
    }
    base
}

/// 词法规范化：消去 `.` 与 `..`，不访问文件系统
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal =
                    matches!(out.components().next_back(), Some(Component::Normal(_)));
                if last_is_normal {
                    out.pop();
                } else if !matches!(out.components().next_back(), Some(Component::RootDir)) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// 相对路径折算为绝对路径（以进程 CWD 为根），再做词法规范化
pub(crate) fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        normalize(&cwd.join(path))
    }
}
