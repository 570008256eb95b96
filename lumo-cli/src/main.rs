//! Lumo CLI - Command line interface
//!
//! Project-based module loading - all configuration from lumo.json

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;

mod config;
mod logging;

use config::{LoaderSection, ProjectConfig};
use lumo_api::{ErrorReport, RunConfig, WaitConfig};

#[derive(Parser)]
#[command(
    name = "lumo",
    about = "Lumo module loader - project-based loading",
    version = "0.1.0"
)]
struct Cli {
    /// Configuration file path (default: ./lumo.json)
    #[arg(value_name = "CONFIG", default_value = "lumo.json")]
    config: PathBuf,

    /// Disable reload-on-change for this run
    #[arg(long)]
    no_reload: bool,

    /// Print the loaded bindings as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    // Read lumo.json
    let project = match read_project(&cli.config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let loader = project.loader.unwrap_or_default();

    // Logger from project config
    let level = loader.log_level.as_deref().and_then(logging::parse_log_level);
    let logger = logging::init_logger(level, loader.log_file.as_deref());

    // 所有相对引用以项目目录为根
    let project_dir = project_dir(&cli.config);

    let run_config = RunConfig {
        startup_path: Some(project_dir),
        wait: build_wait_config(&loader),
        logger,
        ..RunConfig::default()
    };
    lumo_api::init(run_config);

    // Register prefixes from the project file (first writer wins)
    for (name, path) in &project.prefixes {
        lumo_api::register_prefix(name, Path::new(path), false);
    }

    let reload = !cli.no_reload && loader.reload.unwrap_or(true);

    match lumo_api::load(&project.entry, None, reload) {
        Ok(module) => {
            if cli.json {
                print_bindings_json(&module);
            } else {
                print_bindings(&module);
            }
        }
        Err(e) => {
            let report = ErrorReport::from_import(&e);
            if cli.json {
                eprintln!("{}", report.to_json());
            } else {
                eprintln!("{}", report);
            }
            process::exit(1);
        }
    }
}

/// Read and parse lumo.json
fn read_project(path: &Path) -> Result<ProjectConfig, String> {
    if !path.exists() {
        return Err(format!(
            "未找到 '{}'\n\n当前目录不是一个 Lumo 项目。\n提示: 创建 '{}' 文件并指定 'entry' 字段",
            path.display(),
            path.display()
        ));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("无法读取 '{}': {}", path.display(), e))?;

    let project: ProjectConfig = serde_json::from_str(&content)
        .map_err(|e| format!("解析 '{}' 失败: {}", path.display(), e))?;

    if project.entry.is_empty() {
        return Err(format!("'{}' 中的 'entry' 字段不能为空", path.display()));
    }

    Ok(project)
}

/// Directory containing the project file, as an absolute path
fn project_dir(config_path: &Path) -> PathBuf {
    let dir = config_path.parent().unwrap_or(Path::new("."));
    if dir.as_os_str().is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(dir)
    }
}

/// Wait tuning from the loader section, defaults preserved
fn build_wait_config(loader: &LoaderSection) -> WaitConfig {
    let defaults = WaitConfig::default();
    WaitConfig {
        poll_interval_ms: loader.poll_interval_ms.unwrap_or(defaults.poll_interval_ms),
        timeout_ms: loader.attr_timeout_ms.unwrap_or(defaults.timeout_ms),
    }
}

fn print_bindings(module: &lumo_api::Module) {
    for (name, value) in module.bindings() {
        println!("{} = {}", name, value);
    }
}

fn print_bindings_json(module: &lumo_api::Module) {
    use serde_json::json;

    let entries: Vec<serde_json::Value> = module
        .bindings()
        .iter()
        .map(|(name, value)| {
            json!({
                "name": name,
                "type": value.type_name(),
                "value": value.to_string(),
            })
        })
        .collect();

    let output = json!({
        "module": module.key().to_string(),
        "bindings": entries,
    });
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
