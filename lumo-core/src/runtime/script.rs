//! 参考运行时：行式绑定脚本
//!
//! 一个刻意精简的模块格式，供 CLI 和端到端测试完整走通装载流程：
//!
//! ```text
//! # 注释与空行忽略
//! import "util/text"            # 绑定 `text` 为模块句柄
//! import "util/text" as t      # 别名绑定
//! answer = 42                   # int / float / string / true / false
//! greeting = t.prefix           # 经模块绑定读取对方属性
//! ```
//!
//! 编译把源码解析成操作列表，写出带魔数和版本号的 JSON 制品；
//! 执行读回制品逐条重放。源码问题是编译故障，未知名字、对非模块
//! 取属性、嵌套导入失败都是执行故障。

use crate::error::ImportError;
use crate::runtime::{ImportHost, ModuleRuntime, Namespace, RuntimeFault};
use crate::value::Value;
use lumo_vfs::VirtualFileSystem;
use serde::{Deserialize, Serialize};
use std::path::Path;

const ARTIFACT_MAGIC: &str = "LUMC";
const ARTIFACT_VERSION: u32 = 1;

/// 编译制品：魔数 + 版本 + 操作列表
#[derive(Debug, Serialize, Deserialize)]
struct Artifact {
    magic: String,
    version: u32,
    program: Vec<Op>,
}

/// 单条顶层操作
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Op {
    /// 导入模块并绑定句柄
    Import { script: String, binding: String },
    /// 字面量绑定
    Literal { name: String, value: Literal },
    /// 从已绑定的模块读取属性
    Attr {
        name: String,
        module: String,
        attr: String,
    },
}

/// 可序列化的字面量（制品里不能出现模块句柄）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Bool(b) => Value::Bool(b),
            Literal::Int(i) => Value::Int(i),
            Literal::Float(x) => Value::Float(x),
            Literal::Str(s) => Value::Str(s),
        }
    }
}

/// 行式脚本运行时
#[derive(Debug, Clone, Default)]
pub struct ScriptRuntime;

impl ScriptRuntime {
    /// 创建运行时
    pub fn new() -> Self {
        Self
    }

    fn parse(source: &str) -> Result<Vec<Op>, String> {
        let mut program = Vec::new();
        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix("import ") {
                program.push(parse_import(rest.trim(), line_no)?);
            } else if let Some((name, rhs)) = line.split_once('=') {
                let name = name.trim();
                if !is_identifier(name) {
                    return Err(format!("line {line_no}: invalid binding name '{name}'"));
                }
                program.push(parse_binding(name, rhs.trim(), line_no)?);
            } else {
                return Err(format!("line {line_no}: expected binding or import"));
            }
        }
        Ok(program)
    }
}

fn parse_import(rest: &str, line_no: usize) -> Result<Op, String> {
    let rest = rest
        .strip_prefix('"')
        .ok_or_else(|| format!("line {line_no}: import path must be quoted"))?;
    let close = rest
        .find('"')
        .ok_or_else(|| format!("line {line_no}: unterminated import path"))?;
    let script = &rest[..close];
    if script.is_empty() {
        return Err(format!("line {line_no}: empty import path"));
    }

    let remainder = rest[close + 1..].trim();
    let binding = if remainder.is_empty() {
        default_binding(script).ok_or_else(|| {
            format!("line {line_no}: cannot derive a binding name from '{script}', use `as`")
        })?
    } else if let Some(alias) = remainder.strip_prefix("as ") {
        let alias = alias.trim();
        if !is_identifier(alias) {
            return Err(format!("line {line_no}: invalid alias '{alias}'"));
        }
        alias.to_string()
    } else {
        return Err(format!("line {line_no}: unexpected '{remainder}' after import"));
    };

    Ok(Op::Import {
        script: script.to_string(),
        binding,
    })
}

fn parse_binding(name: &str, rhs: &str, line_no: usize) -> Result<Op, String> {
    if let Some(quoted) = rhs.strip_prefix('"') {
        return match quoted.strip_suffix('"') {
            Some(inner) if !quoted.is_empty() => Ok(Op::Literal {
                name: name.to_string(),
                value: Literal::Str(inner.to_string()),
            }),
            _ => Err(format!("line {line_no}: unterminated string")),
        };
    }
    if rhs == "true" || rhs == "false" {
        return Ok(Op::Literal {
            name: name.to_string(),
            value: Literal::Bool(rhs == "true"),
        });
    }
    if let Ok(i) = rhs.parse::<i64>() {
        return Ok(Op::Literal {
            name: name.to_string(),
            value: Literal::Int(i),
        });
    }
    if let Ok(x) = rhs.parse::<f64>() {
        return Ok(Op::Literal {
            name: name.to_string(),
            value: Literal::Float(x),
        });
    }
    if let Some((module, attr)) = rhs.split_once('.') {
        if is_identifier(module) && is_identifier(attr) {
            return Ok(Op::Attr {
                name: name.to_string(),
                module: module.to_string(),
                attr: attr.to_string(),
            });
        }
    }
    Err(format!("line {line_no}: cannot parse value '{rhs}'"))
}

/// 从导入路径推导默认绑定名（文件名去掉源码后缀）
fn default_binding(script: &str) -> Option<String> {
    let stripped = script.strip_suffix(".lumo").unwrap_or(script);
    let name = Path::new(stripped).file_name()?.to_string_lossy().into_owned();
    is_identifier(&name).then_some(name)
}

/// 截掉行尾注释；字符串字面量内的 `#` 不算注释
fn strip_comment(raw: &str) -> &str {
    let mut in_string = false;
    for (i, c) in raw.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &raw[..i],
            _ => {}
        }
    }
    raw
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn bind(namespace: &mut Namespace, name: &str, value: Value) {
    match namespace.iter_mut().find(|(n, _)| n == name) {
        Some(slot) => slot.1 = value,
        None => namespace.push((name.to_string(), value)),
    }
}

fn lookup<'a>(namespace: &'a Namespace, name: &str) -> Option<&'a Value> {
    namespace
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, value)| value)
}

impl ModuleRuntime for ScriptRuntime {
    fn compile(
        &self,
        source: &[u8],
        artifact: &Path,
        fs: &dyn VirtualFileSystem,
    ) -> Result<(), RuntimeFault> {
        let text = std::str::from_utf8(source)
            .map_err(|e| RuntimeFault::Compile(format!("source is not valid utf-8: {e}")))?;
        let program = Self::parse(text).map_err(RuntimeFault::Compile)?;

        let artifact_body = Artifact {
            magic: ARTIFACT_MAGIC.to_string(),
            version: ARTIFACT_VERSION,
            program,
        };
        let bytes = serde_json::to_vec(&artifact_body)
            .map_err(|e| RuntimeFault::Compile(format!("cannot encode artifact: {e}")))?;
        fs.write_file(artifact, &bytes)
            .map_err(|e| RuntimeFault::Compile(format!("cannot write artifact: {e}")))?;
        Ok(())
    }

    fn execute(
        &self,
        artifact: &Path,
        fs: &dyn VirtualFileSystem,
        host: &dyn ImportHost,
    ) -> Result<Namespace, RuntimeFault> {
        let bytes = fs
            .read_file(artifact)
            .map_err(|e| RuntimeFault::Execution(format!("cannot read artifact: {e}")))?;
        let parsed: Artifact = serde_json::from_slice(&bytes)
            .map_err(|e| RuntimeFault::Execution(format!("malformed artifact: {e}")))?;
        if parsed.magic != ARTIFACT_MAGIC || parsed.version != ARTIFACT_VERSION {
            return Err(RuntimeFault::Execution(format!(
                "artifact header mismatch: {}/{}",
                parsed.magic, parsed.version
            )));
        }

        let mut namespace: Namespace = Vec::new();
        for op in parsed.program {
            match op {
                Op::Import { script, binding } => {
                    let module = host.import(&script, None).map_err(|e| {
                        RuntimeFault::Execution(format!("import \"{script}\" failed: {e}"))
                    })?;
                    bind(&mut namespace, &binding, Value::Module(module));
                }
                Op::Literal { name, value } => {
                    bind(&mut namespace, &name, value.into());
                }
                Op::Attr { name, module, attr } => {
                    let value = lookup(&namespace, &module)
                        .ok_or_else(|| RuntimeFault::Execution(format!("unknown name '{module}'")))?;
                    let target = value.as_module().ok_or_else(|| {
                        RuntimeFault::Execution(format!(
                            "'{module}' is not a module (found {})",
                            value.type_name()
                        ))
                    })?;
                    let resolved = target
                        .get(&attr)
                        .map_err(|e| RuntimeFault::Execution(e.to_string()))?;
                    bind(&mut namespace, &name, resolved);
                }
            }
        }
        Ok(namespace)
    }
}
