use crate::models::param_value::ParamKind;
use serde::Deserialize;
use std::collections::BTreeMap;

/// 启动器配置结构
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub general: GeneralConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// 通用配置
#[derive(Debug, Deserialize, Default)]
pub struct GeneralConfig {
    pub params_file: String,
    pub results_dir: String,
    pub sim_name: String,
}

/// 参数快照配置
#[derive(Debug, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_snapshot_file")]
    pub file_name: String,
    #[serde(default)]
    pub style: SnapshotStyle,
}

/// 快照的输出风格，作为显式选项传给写入函数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStyle {
    // 每行一个键的块风格YAML
    #[default]
    Block,
    // 单行流风格
    Flow,
}

/// 参数类型断言配置
#[derive(Debug, Deserialize, Default)]
pub struct ValidationConfig {
    #[serde(default)]
    pub expected_kinds: BTreeMap<String, ParamKind>,
}

fn default_snapshot_file() -> String {
    "sim_config.yaml".to_string()
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            file_name: default_snapshot_file(),
            style: SnapshotStyle::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let text = r#"
[general]
params_file = "my_main_params.yaml"
results_dir = "RESULTS"
sim_name = "EntNet-babi"

[snapshot]
style = "flow"

[validation.expected_kinds]
seed = "int"
clip_gradients = "float"
"#;

        let config: Config = toml::from_str(text).expect("Failed to deserialize config");

        assert_eq!(config.general.params_file, "my_main_params.yaml");
        assert_eq!(config.general.sim_name, "EntNet-babi");
        assert_eq!(config.snapshot.file_name, "sim_config.yaml");
        assert_eq!(config.snapshot.style, SnapshotStyle::Flow);
        assert_eq!(config.validation.expected_kinds.get("seed"), Some(&ParamKind::Int));
        assert_eq!(
            config.validation.expected_kinds.get("clip_gradients"),
            Some(&ParamKind::Float)
        );
    }

    #[test]
    fn test_optional_sections_default() {
        let text = r#"
[general]
params_file = "params.yaml"
results_dir = "out"
sim_name = "demo"
"#;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.snapshot.style, SnapshotStyle::Block);
        assert!(config.validation.expected_kinds.is_empty());
    }
}
