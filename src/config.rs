use crate::models::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

pub const CONFIG_FILE: &str = "param_caster.toml";

pub fn load_config(config_path: &str) -> Result<Config> {
    // 检查配置文件是否存在，如果不存在则创建默认配置
    if !Path::new(config_path).exists() {
        create_default_config(config_path)?;
        info!("Created default config file at {}", config_path);
    }

    // 读取配置文件内容
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path))?;

    // 解析TOML配置
    let config: Config = toml::from_str(&config_content)
        .with_context(|| format!("Failed to parse config file: {}", config_path))?;

    Ok(config)
}

fn create_default_config(config_path: &str) -> Result<()> {
    let default_config = r#"[general]
params_file = "params.yaml"
results_dir = "~/RESULTS"
sim_name = "EntNet-babi"

[snapshot]
file_name = "sim_config.yaml"
style = "block"

[validation.expected_kinds]
seed = "int"
dataset_id = "str"
"#;

    fs::write(config_path, default_config)
        .with_context(|| format!("Failed to create default config file: {}", config_path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ParamKind, SnapshotStyle};
    use tempfile::tempdir;

    #[test]
    fn test_load_config_creates_default() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        let path_str = path.to_str().unwrap();

        let config = load_config(path_str).unwrap();
        assert!(path.exists());
        assert_eq!(config.general.params_file, "params.yaml");
        assert_eq!(config.snapshot.style, SnapshotStyle::Block);
        assert_eq!(config.validation.expected_kinds.get("seed"), Some(&ParamKind::Int));
    }

    #[test]
    fn test_load_config_invalid() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "[general]\nparams_file = 3\n").unwrap();
        assert!(load_config(path.to_str().unwrap()).is_err());
    }
}
