use crate::models::{GeneralConfig, RunMetadata};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

/// 没有描述时使用的目录名
const UNTITLED_RUN: &str = "untitled";

/// 展开结果目录开头的 `~/`
pub fn expand_home(dir: &str) -> PathBuf {
    match (dir.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(dir),
    }
}

/// 运行目录：<results_dir>/<sim_name>/<description>/version_<index>
pub fn run_dir_path(general: &GeneralConfig, metadata: &RunMetadata) -> PathBuf {
    expand_home(&general.results_dir)
        .join(&general.sim_name)
        .join(metadata.description.as_deref().unwrap_or(UNTITLED_RUN))
        .join(format!("version_{}", metadata.index))
}

/// 从目录名中提取 "version_" 后的部分（如 "version_42" → "42"）
fn extract_index_str_from_path(path: &Path) -> Option<String> {
    path.file_name().and_then(|name| {
        name.to_string_lossy()
            .strip_prefix("version_")
            .map(|s| s.to_string())
    })
}

/// 从目录路径中提取运行编号
fn extract_run_index(path: &Path) -> Option<i64> {
    extract_index_str_from_path(path).and_then(|s| s.parse().ok())
}

/// 检查条目是否为 "version_{number}" 目录
fn is_run_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && extract_run_index(entry.path()).is_some()
}

/// 列出描述目录下已有的运行编号，按编号排序
pub fn find_existing_runs(description_dir: &Path) -> Vec<i64> {
    if !description_dir.is_dir() {
        return Vec::new();
    }

    let mut indices: Vec<i64> = WalkDir::new(description_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(is_run_dir)
        .filter_map(|entry| extract_run_index(entry.path()))
        .collect();

    indices.sort_unstable();
    indices
}

/// 创建本次运行的目录，已存在的编号不会被复用
pub fn create_run_dir(general: &GeneralConfig, metadata: &RunMetadata) -> Result<PathBuf> {
    let run_dir = run_dir_path(general, metadata);

    if let Some(description_dir) = run_dir.parent() {
        let existing = find_existing_runs(description_dir);
        if existing.contains(&metadata.index) {
            warn!(dir = %run_dir.display(), "run directory already exists");
            anyhow::bail!(
                "Run '{}' already exists (taken indices: {:?}); pass a different -i/--index",
                run_dir.display(),
                existing
            );
        }
    }

    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("Failed to create run directory: {}", run_dir.display()))?;
    info!(dir = %run_dir.display(), "created run directory");
    Ok(run_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn general(results_dir: &Path) -> GeneralConfig {
        GeneralConfig {
            params_file: "params.yaml".to_string(),
            results_dir: results_dir.to_string_lossy().to_string(),
            sim_name: "EntNet-babi".to_string(),
        }
    }

    #[test]
    fn test_run_dir_path() {
        let general = general(Path::new("/results"));
        let metadata = RunMetadata::new(2, Some("seed_7_bAbI".to_string()));
        assert_eq!(
            run_dir_path(&general, &metadata),
            PathBuf::from("/results/EntNet-babi/seed_7_bAbI/version_2")
        );

        let untitled = RunMetadata::new(0, None);
        assert_eq!(
            run_dir_path(&general, &untitled),
            PathBuf::from("/results/EntNet-babi/untitled/version_0")
        );
    }

    #[test]
    fn test_extract_run_index() {
        assert_eq!(extract_run_index(Path::new("runs/version_123")), Some(123));
        assert_eq!(extract_run_index(Path::new("runs/version_abc")), None);
        assert_eq!(extract_run_index(Path::new("runs/other")), None);
    }

    #[test]
    fn test_find_existing_runs() {
        let temp_dir = tempdir().unwrap();
        for i in [5, 0, 10] {
            fs::create_dir(temp_dir.path().join(format!("version_{}", i))).unwrap();
        }
        fs::create_dir(temp_dir.path().join("version_config")).unwrap();
        fs::write(temp_dir.path().join("version_7"), "not a dir").unwrap();

        assert_eq!(find_existing_runs(temp_dir.path()), vec![0, 5, 10]);
        assert!(find_existing_runs(&temp_dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_create_run_dir_refuses_reuse() {
        let temp_dir = tempdir().unwrap();
        let general = general(temp_dir.path());
        let metadata = RunMetadata::new(1, Some("bar".to_string()));

        let run_dir = create_run_dir(&general, &metadata).unwrap();
        assert!(run_dir.is_dir());
        assert!(run_dir.ends_with("EntNet-babi/bar/version_1"));

        let err = create_run_dir(&general, &metadata).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        assert!(create_run_dir(&general, &RunMetadata::new(2, Some("bar".to_string()))).is_ok());
    }

    #[test]
    fn test_expand_home_plain_path() {
        assert_eq!(expand_home("/abs/results"), PathBuf::from("/abs/results"));
        assert_eq!(expand_home("relative"), PathBuf::from("relative"));
    }
}
