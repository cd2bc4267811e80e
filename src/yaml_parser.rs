// src/yaml_parser.rs
use crate::models::{ParamEntry, ParamReference, ParamValue, ScalarValue};
use anyhow::{Context, Result, bail};
use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

/// 标记"默认值就是 None"的YAML标签，未加标签的 null 表示必填参数
const NONE_TAG: &str = "none";

/// 解析参数文件到参考参数字典
// ————————————————————————————————————————————————————————————————————————
// 核心解析函数
// ————————————————————————————————————————————————————————————————————————
pub fn parse_params_file(file_path: &Path) -> Result<ParamReference> {
    let contents = std::fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read params file: {}", file_path.display()))?;

    let reference = parse_params_str(&contents)
        .with_context(|| format!("Failed to parse params file: {}", file_path.display()))?;

    debug!(
        path = %file_path.display(),
        entries = reference.len(),
        "loaded reference params"
    );
    Ok(reference)
}

pub fn parse_params_str(contents: &str) -> Result<ParamReference> {
    let yaml_value: Value = serde_yaml::from_str(contents).context("Invalid YAML")?;

    let mut reference = ParamReference::new();
    match yaml_value {
        Value::Mapping(map) => {
            for (key, val) in &map {
                let key_str = key
                    .as_str()
                    .ok_or_else(|| anyhow::anyhow!("Non-string key in mapping: {:?}", key))?;
                reference.insert(key_str, yaml_value_to_entry(key_str, val)?);
            }
        }
        // 空文件
        Value::Null => {}
        other => bail!("Params file must contain a mapping, found {:?}", other),
    }
    Ok(reference)
}

// ————————————————————————————————————————————————————————————————————————
// 顶层值 → 参考条目：只允许标量、标量列表和 null
// ————————————————————————————————————————————————————————————————————————
fn yaml_value_to_entry(key: &str, value: &Value) -> Result<ParamEntry> {
    match value {
        Value::Null => Ok(ParamEntry::Required),
        Value::Tagged(tagged) if tagged.tag == NONE_TAG && tagged.value.is_null() => {
            Ok(ParamEntry::Default(ParamValue::Scalar(ScalarValue::Null)))
        }
        Value::Sequence(seq) => {
            let list: Result<Vec<ScalarValue>> =
                seq.iter().map(|v| yaml_value_to_scalar(key, v)).collect();
            Ok(ParamEntry::Default(ParamValue::List(list?)))
        }
        Value::Mapping(_) => bail!("Parameter '{}' is a nested mapping; only flat params are supported", key),
        _ => Ok(ParamEntry::Default(ParamValue::Scalar(yaml_value_to_scalar(key, value)?))),
    }
}

fn yaml_value_to_scalar(key: &str, value: &Value) -> Result<ScalarValue> {
    match value {
        Value::String(s) => Ok(ScalarValue::Str(s.clone())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(ScalarValue::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(ScalarValue::Float(f))
            } else {
                bail!("Unsupported number format for '{}': {}", key, n)
            }
        }
        Value::Bool(b) => Ok(ScalarValue::Bool(*b)),
        Value::Null => Ok(ScalarValue::Null),
        _ => bail!("Unexpected YAML value for '{}': {:?}", key, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_params_file() {
        let yaml_content = r#"
data_dir: null
dataset_id: qa1
seed: 7
batch_size: 32
clip_gradients: 40.0
grad_noise: !none null
bidirectional: false
layer_sizes: [64, 32]
"#;

        let temp_dir = tempdir().unwrap();
        let test_file = temp_dir.path().join("params.yaml");
        std::fs::write(&test_file, yaml_content).unwrap();

        let reference = parse_params_file(&test_file).unwrap();
        assert_eq!(reference.len(), 8);

        assert_eq!(reference.get("data_dir"), Some(&ParamEntry::Required));
        assert_eq!(
            reference.get("dataset_id"),
            Some(&ParamEntry::Default(ScalarValue::Str("qa1".to_string()).into()))
        );
        assert_eq!(
            reference.get("seed"),
            Some(&ParamEntry::Default(ScalarValue::Int(7).into()))
        );
        assert_eq!(
            reference.get("clip_gradients"),
            Some(&ParamEntry::Default(ScalarValue::Float(40.0).into()))
        );
        assert_eq!(
            reference.get("grad_noise"),
            Some(&ParamEntry::Default(ScalarValue::Null.into()))
        );
        assert_eq!(
            reference.get("bidirectional"),
            Some(&ParamEntry::Default(ScalarValue::Bool(false).into()))
        );
        assert_eq!(
            reference.get("layer_sizes"),
            Some(&ParamEntry::Default(ParamValue::List(vec![
                ScalarValue::Int(64),
                ScalarValue::Int(32),
            ])))
        );
    }

    #[test]
    fn test_nested_mapping_rejected() {
        let result = parse_params_str("trainer:\n  devices: 1\n");
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("trainer"), "{}", message);
    }

    #[test]
    fn test_nested_list_rejected() {
        assert!(parse_params_str("grid: [[1, 2], [3]]\n").is_err());
    }

    #[test]
    fn test_empty_file() {
        assert!(parse_params_str("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        assert!(parse_params_file(Path::new("/nonexistent/params.yaml")).is_err());
    }
}
