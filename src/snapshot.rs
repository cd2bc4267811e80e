// src/snapshot.rs
use crate::models::{ParamMap, SnapshotStyle, params_to_json};
use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::info;

/// 将最终参数渲染为快照文本，风格由调用方显式指定
pub fn render_snapshot(params: &ParamMap, style: SnapshotStyle) -> Result<String> {
    match style {
        SnapshotStyle::Block => {
            let mapping: Mapping = params
                .iter()
                .map(|(k, v)| (Value::String(k.clone()), v.to_yaml_value()))
                .collect();
            serde_yaml::to_string(&Value::Mapping(mapping))
                .context("Failed to serialize params snapshot as YAML")
        }
        // JSON 是合法的YAML流风格
        SnapshotStyle::Flow => {
            let mut text = serde_json::to_string(&params_to_json(params))
                .context("Failed to serialize params snapshot as JSON")?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// 在运行目录中写入参数快照，返回文件路径
pub fn write_params_snapshot(
    run_dir: &Path,
    file_name: &str,
    params: &ParamMap,
    style: SnapshotStyle,
) -> Result<PathBuf> {
    let path = run_dir.join(file_name);
    let text = render_snapshot(params, style)?;
    std::fs::write(&path, text)
        .with_context(|| format!("Failed to write params snapshot: {}", path.display()))?;

    info!(path = %path.display(), ?style, "wrote params snapshot");
    Ok(path)
}
