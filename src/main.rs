// src/main.rs
use anyhow::{Context, Result};
use param_caster::ResolveError;
use param_caster::config::{CONFIG_FILE, load_config};
use param_caster::models::print_params_pretty;
use param_caster::param_resolver::resolve;
use param_caster::run_dir::create_run_dir;
use param_caster::snapshot::write_params_snapshot;
use param_caster::validation::check_param_kinds;
use param_caster::yaml_parser::parse_params_file;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "param_caster=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // 加载配置文件
    let config = load_config(CONFIG_FILE)?;
    info!("Params file: {}", config.general.params_file);

    // 参考参数字典
    let reference = parse_params_file(Path::new(&config.general.params_file))?;

    // 命令行覆盖文件参数
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let run = match resolve(&reference, &argv) {
        Ok(run) => run,
        Err(ResolveError::HelpRequested(help)) => {
            println!("{}", help);
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to resolve command-line parameters"),
    };

    check_param_kinds(&run.params, &config.validation.expected_kinds)
        .context("Parameter type check failed")?;

    print_params_pretty(&run.params)?;

    // 创建运行目录并保存参数快照
    let run_dir = create_run_dir(&config.general, &run.metadata)?;
    let snapshot_path = write_params_snapshot(
        &run_dir,
        &config.snapshot.file_name,
        &run.params,
        config.snapshot.style,
    )?;

    println!("Run directory: {}", run_dir.display());
    println!("Params snapshot: {}", snapshot_path.display());
    println!(
        "Run index: {}, description: {}",
        run.metadata.index,
        run.metadata.description.as_deref().unwrap_or("-")
    );

    Ok(())
}
