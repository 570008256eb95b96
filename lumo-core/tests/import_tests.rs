//! 装载流程端到端测试：键的同一性、缓存、重载与错误路径

mod common;

use common::{context_with, memory_fs, script_context, CountingRuntime};
use lumo_core::{ImportError, Value};
use lumo_vfs::VirtualFileSystem;
use std::path::Path;
use std::time::Duration;

#[test]
fn test_equivalent_references_share_one_module() {
    let counting = CountingRuntime::new();
    let fs = memory_fs(&[("/app/lib/util.lumo", "tool = \"hammer\"\n")]);
    let ctx = context_with(fs, counting.clone());
    ctx.register_prefix("lib", Path::new("/app/lib"), false);

    let absolute = ctx.load("/app/lib/util", None, true).unwrap();
    let relative = ctx.load("lib/util.lumo", None, true).unwrap();
    let prefixed = ctx.load("util", Some("lib"), true).unwrap();

    assert_eq!(absolute, relative);
    assert_eq!(relative, prefixed);
    assert_eq!(counting.execution_count(), 1);
    assert_eq!(
        absolute.get("tool").unwrap(),
        Value::Str("hammer".to_string())
    );
}

#[test]
fn test_unchanged_module_loaded_once() {
    let counting = CountingRuntime::new();
    let fs = memory_fs(&[("/app/main.lumo", "x = 1\n")]);
    let ctx = context_with(fs, counting.clone());

    let first = ctx.load("main", None, true).unwrap();
    let second = ctx.load("main", None, true).unwrap();

    assert_eq!(first, second);
    assert_eq!(counting.execution_count(), 1);
    assert_eq!(counting.compile_count(), 1);
}

#[test]
fn test_reload_after_source_change() {
    let counting = CountingRuntime::new();
    let fs = memory_fs(&[("/app/main.lumo", "x = 1\n")]);
    let ctx = context_with(fs.clone(), counting.clone());
    let source = Path::new("/app/main.lumo");

    let first = ctx.load("main", None, true).unwrap();
    assert_eq!(first.get("x").unwrap(), Value::Int(1));

    // 改写源码并把 mtime 拨快，确保新鲜度判定是确定性的
    fs.write_file(source, b"x = 2\ny = 3\n").unwrap();
    let newer = fs.modified(source).unwrap() + Duration::from_secs(10);
    fs.touch(source, newer).unwrap();

    let second = ctx.load("main", None, true).unwrap();

    // 同一对象、原地更新
    assert_eq!(first, second);
    assert_eq!(counting.execution_count(), 2);
    assert_eq!(second.get("x").unwrap(), Value::Int(2));
    assert_eq!(second.get("y").unwrap(), Value::Int(3));
    assert_eq!(first.get("x").unwrap(), Value::Int(2));
}

#[test]
fn test_reload_removes_dropped_bindings() {
    let (ctx, fs) = script_context(&[("/app/main.lumo", "old = 1\nkept = 2\n")]);
    let source = Path::new("/app/main.lumo");

    let module = ctx.load("main", None, true).unwrap();
    assert_eq!(module.get("old").unwrap(), Value::Int(1));

    fs.write_file(source, b"kept = 2\n").unwrap();
    let newer = fs.modified(source).unwrap() + Duration::from_secs(10);
    fs.touch(source, newer).unwrap();

    ctx.load("main", None, true).unwrap();
    assert_eq!(module.try_get("old"), None);
    assert_eq!(module.get("kept").unwrap(), Value::Int(2));
}

#[test]
fn test_reload_false_keeps_stale_module() {
    let counting = CountingRuntime::new();
    let fs = memory_fs(&[("/app/main.lumo", "x = 1\n")]);
    let ctx = context_with(fs.clone(), counting.clone());
    let source = Path::new("/app/main.lumo");

    ctx.load("main", None, true).unwrap();

    fs.write_file(source, b"x = 2\n").unwrap();
    let newer = fs.modified(source).unwrap() + Duration::from_secs(10);
    fs.touch(source, newer).unwrap();

    let module = ctx.load("main", None, false).unwrap();
    assert_eq!(module.get("x").unwrap(), Value::Int(1));
    assert_eq!(counting.execution_count(), 1);
}

#[test]
fn test_artifact_written_and_refreshed() {
    let (ctx, fs) = script_context(&[("/app/main.lumo", "x = 1\n")]);
    let source = Path::new("/app/main.lumo");
    let artifact = Path::new("/app/main.lumoc");

    ctx.load("main", None, true).unwrap();
    assert!(fs.is_file(artifact));

    // 人为破坏制品，过期后装载必须先作废再重编译
    fs.write_file(artifact, b"garbage").unwrap();
    fs.write_file(source, b"x = 2\n").unwrap();
    let newer = fs.modified(source).unwrap() + Duration::from_secs(10);
    fs.touch(source, newer).unwrap();

    let module = ctx.load("main", None, true).unwrap();
    assert_eq!(module.get("x").unwrap(), Value::Int(2));

    let rebuilt = fs.read_file(artifact).unwrap();
    assert!(rebuilt.starts_with(b"{"));
}

#[test]
fn test_unregistered_prefix() {
    let (ctx, _fs) = script_context(&[("/app/util.lumo", "x = 1\n")]);

    let err = ctx.load("util", Some("lib"), true).unwrap_err();
    assert!(matches!(err, ImportError::UnregisteredPrefix { name } if name == "lib"));

    // 注册后同一调用成功
    ctx.register_prefix("lib", Path::new("/app"), false);
    assert!(ctx.load("util", Some("lib"), true).is_ok());
}

#[test]
fn test_prefix_first_writer_wins_then_force() {
    let (ctx, _fs) = script_context(&[]);

    ctx.register_prefix("lib", Path::new("/x/lib"), false);
    ctx.register_prefix("lib", Path::new("/y/lib"), false);
    assert_eq!(
        ctx.lookup_prefix("lib"),
        Some(std::path::PathBuf::from("/x/lib"))
    );

    ctx.register_prefix("lib", Path::new("/y/lib"), true);
    assert_eq!(
        ctx.lookup_prefix("lib"),
        Some(std::path::PathBuf::from("/y/lib"))
    );
}

#[test]
fn test_missing_source_fails_fast() {
    let (ctx, _fs) = script_context(&[]);

    let err = ctx.load("ghost", None, true).unwrap_err();
    assert!(
        matches!(err, ImportError::SourceNotFound { path } if path == Path::new("/app/ghost.lumo"))
    );
}

#[test]
fn test_compile_error_then_retry_succeeds() {
    let counting = CountingRuntime::new();
    let fs = memory_fs(&[("/app/main.lumo", "this is not a script\n")]);
    let ctx = context_with(fs.clone(), counting.clone());

    let err = ctx.load("main", None, true).unwrap_err();
    assert!(matches!(err, ImportError::Compile { .. }));
    assert_eq!(counting.compile_count(), 1);

    // 失败不落盘 stat 记录，源码修好后下一次调用重试
    fs.write_file(Path::new("/app/main.lumo"), b"x = 1\n").unwrap();

    let module = ctx.load("main", None, true).unwrap();
    assert_eq!(module.get("x").unwrap(), Value::Int(1));
    assert_eq!(counting.compile_count(), 2);
    assert_eq!(counting.execution_count(), 1);
}

#[test]
fn test_failed_nested_import_is_execution_error() {
    let (ctx, _fs) = script_context(&[("/app/main.lumo", "import \"missing\"\n")]);

    let err = ctx.load("main", None, true).unwrap_err();
    match err {
        ImportError::Execution { path, message } => {
            assert_eq!(path, Path::new("/app/main.lumo"));
            assert!(message.contains("\"missing\""));
        }
        other => panic!("expected execution error, got: {other}"),
    }
}

#[test]
fn test_nested_relative_import() {
    let (ctx, _fs) = script_context(&[
        ("/app/pkg/main.lumo", "import \"helper\"\nvalue = helper.base\n"),
        ("/app/pkg/helper.lumo", "base = 10\n"),
    ]);

    let module = ctx.load("pkg/main", None, true).unwrap();
    assert_eq!(module.get("value").unwrap(), Value::Int(10));

    // 嵌套导入与直接装载拿到同一个模块对象
    let helper = ctx.load("pkg/helper", None, true).unwrap();
    let bound = module.get("helper").unwrap();
    assert_eq!(bound.as_module(), Some(&helper));
}

#[test]
fn test_import_walks_up_with_dotdot() {
    let (ctx, _fs) = script_context(&[
        ("/app/pkg/main.lumo", "import \"../shared/cfg\"\nport = cfg.port\n"),
        ("/app/shared/cfg.lumo", "port = 8080\n"),
    ]);

    let module = ctx.load("pkg/main", None, true).unwrap();
    assert_eq!(module.get("port").unwrap(), Value::Int(8080));
}

#[test]
fn test_module_bindings_snapshot() {
    let (ctx, _fs) = script_context(&[("/app/main.lumo", "b = 2\na = 1\n")]);

    let module = ctx.load("main", None, true).unwrap();
    let bindings = module.bindings();
    let names: Vec<&str> = bindings.iter().map(|(name, _)| name.as_str()).collect();

    // 快照按名字排序
    assert_eq!(names, vec!["a", "b"]);
}
