// models.rs - 作为模块目录入口文件（Rust 2018+ 风格）
// 导出所有子模块
pub mod config;
pub mod metadata;
pub mod param_value;
pub mod reference;

// 重新导出常用类型
pub use config::{Config, GeneralConfig, SnapshotConfig, SnapshotStyle, ValidationConfig};
pub use metadata::RunMetadata;
pub use param_value::{ParamKind, ParamMap, ParamValue, ScalarValue, params_to_json, print_params_pretty};
pub use reference::{ParamEntry, ParamReference, option_flag};
