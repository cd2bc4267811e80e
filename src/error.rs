use crate::models::ParamKind;
use thiserror::Error;

/// 单个解释器的转换失败
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CastError {
    /// 文本不属于该种类，组合推断器会继续尝试下一个解释器
    #[error("'{raw}' is not a {kind} value")]
    Mismatch { kind: ParamKind, raw: String },

    #[error("'{0}' is not a list")]
    NotAList(String),

    #[error("autocast list must be all same type: '{raw}'")]
    Heterogeneous { raw: String },

    #[error("integer '{raw}' does not fit in 64 bits")]
    OutOfRange { raw: String },
}

/// 参数解析阶段的致命错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("missing required parameter '{name}' (pass --{flag} <VALUE>)")]
    MissingRequired { name: String, flag: String },

    #[error("invalid value '{raw}' for --{flag}: expected {expected}")]
    TypeCoercion {
        flag: String,
        raw: String,
        expected: ParamKind,
    },

    #[error("invalid value '{raw}' for --{flag}: list elements must all have the same type")]
    HeterogeneousList { flag: String, raw: String },

    #[error("invalid value '{raw}' for --{flag}: integer does not fit in 64 bits")]
    IntegerOutOfRange { flag: String, raw: String },

    #[error("conflicting option --{flag}: used by parameters {names:?}")]
    ConflictingOption { flag: String, names: Vec<String> },

    #[error("{0}")]
    InvalidArguments(String),

    #[error("{0}")]
    HelpRequested(String),

    #[error("cannot build run description: parameter '{0}' is missing")]
    MissingSlugField(String),

    #[error("parameter '{0}' is not defined")]
    UnknownParameter(String),

    #[error("parameter '{name}' should be {expected}, got {actual} ({value})")]
    KindMismatch {
        name: String,
        expected: ParamKind,
        actual: ParamKind,
        value: String,
    },
}
