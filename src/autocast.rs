// src/autocast.rs
//! 不求值地推断命令行文本的类型。
//!
//! 每个解释器要么成功，要么返回 `CastError::Mismatch`；组合推断器按固定
//! 优先级依次尝试，第一个成功的结果胜出。这样字符串参数不需要加引号。
use crate::error::CastError;
use crate::models::{ParamKind, ParamValue, ScalarValue};
use std::num::IntErrorKind;
use tracing::trace;

/// 单个标量解释器
pub type Caster = fn(&str) -> Result<ScalarValue, CastError>;

/// 标量推断的优先级顺序，列表元素也复用同一组解释器
const SCALAR_CASTERS: [Caster; 5] = [boolify, intify, floatify, noneify, stringify];

fn mismatch(kind: ParamKind, raw: &str) -> CastError {
    CastError::Mismatch {
        kind,
        raw: raw.to_string(),
    }
}

pub fn boolify(raw: &str) -> Result<ScalarValue, CastError> {
    match raw {
        "True" | "true" | "Yes" | "yes" => Ok(ScalarValue::Bool(true)),
        "False" | "false" | "No" | "no" => Ok(ScalarValue::Bool(false)),
        _ => Err(mismatch(ParamKind::Bool, raw)),
    }
}

/// 超出 i64 范围的整数字面量返回 `OutOfRange`，不会退回浮点数
pub fn intify(raw: &str) -> Result<ScalarValue, CastError> {
    raw.parse::<i64>().map(ScalarValue::Int).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => CastError::OutOfRange {
            raw: raw.to_string(),
        },
        _ => mismatch(ParamKind::Int, raw),
    })
}

pub fn floatify(raw: &str) -> Result<ScalarValue, CastError> {
    raw.parse::<f64>()
        .map(ScalarValue::Float)
        .map_err(|_| mismatch(ParamKind::Float, raw))
}

pub fn noneify(raw: &str) -> Result<ScalarValue, CastError> {
    if raw == "None" {
        Ok(ScalarValue::Null)
    } else {
        Err(mismatch(ParamKind::Null, raw))
    }
}

pub fn stringify(raw: &str) -> Result<ScalarValue, CastError> {
    Ok(ScalarValue::Str(raw.to_string()))
}

/// 给定种类对应的解释器
pub fn caster_for(kind: ParamKind) -> Option<Caster> {
    match kind {
        ParamKind::Bool => Some(boolify),
        ParamKind::Int => Some(intify),
        ParamKind::Float => Some(floatify),
        ParamKind::Null => Some(noneify),
        ParamKind::Str => Some(stringify),
        ParamKind::List => None,
    }
}

/// 首个成功的解释器；`Mismatch` 之外的错误直接返回
fn select_caster(raw: &str) -> Result<Caster, CastError> {
    for caster in SCALAR_CASTERS {
        match caster(raw) {
            Ok(_) => return Ok(caster),
            Err(CastError::Mismatch { .. }) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(stringify)
}

/// 按优先级推断单个标量，字符串兜底
pub fn infer_scalar(raw: &str) -> Result<ScalarValue, CastError> {
    select_caster(raw)?(raw)
}

/// 用同一个解释器转换所有逗号分隔的元素
fn cast_elements(raw: &str, caster: Caster) -> Result<Vec<ScalarValue>, CastError> {
    raw.split(',').map(caster).collect()
}

fn is_out_of_range(error: &CastError) -> bool {
    matches!(error, CastError::OutOfRange { .. })
}

/// 将逗号分隔的文本转换为同类型元素的列表。
///
/// 元素类型由第一个元素决定，后续元素都用同一个解释器转换；
/// 任意元素转换失败时整个列表失败，错误与"不是列表"区分开。
pub fn listify(raw: &str) -> Result<Vec<ScalarValue>, CastError> {
    if !raw.contains(',') {
        return Err(CastError::NotAList(raw.to_string()));
    }

    let first = raw.split(',').next().unwrap_or_default();
    cast_elements(raw, select_caster(first)?).map_err(|e| {
        if is_out_of_range(&e) {
            e
        } else {
            CastError::Heterogeneous {
                raw: raw.to_string(),
            }
        }
    })
}

/// 推断命令行文本的类型：bool → int → float → None → list → str
pub fn infer(raw: &str) -> Result<ParamValue, CastError> {
    for caster in &SCALAR_CASTERS[..4] {
        match caster(raw) {
            Ok(value) => {
                trace!(raw, kind = %value.kind(), "inferred scalar");
                return Ok(ParamValue::Scalar(value));
            }
            Err(CastError::Mismatch { .. }) => {}
            Err(e) => return Err(e),
        }
    }

    match listify(raw) {
        Ok(list) => return Ok(ParamValue::List(list)),
        Err(CastError::NotAList(_)) => {}
        Err(e) => return Err(e),
    }

    Ok(ParamValue::Scalar(ScalarValue::Str(raw.to_string())))
}

/// 将文本转换为默认值的类型，不做猜测
pub fn coerce(default: &ParamValue, raw: &str) -> Result<ParamValue, CastError> {
    match default {
        // None 默认值没有固定类型
        ParamValue::Scalar(ScalarValue::Null) => infer(raw),
        ParamValue::Scalar(scalar) => {
            let caster = caster_for(scalar.kind()).unwrap_or(stringify);
            caster(raw).map(ParamValue::Scalar)
        }
        ParamValue::List(items) => match items.first() {
            Some(first) => {
                let caster = caster_for(first.kind()).unwrap_or(stringify);
                cast_elements(raw, caster).map(ParamValue::List).map_err(|e| {
                    if is_out_of_range(&e) {
                        e
                    } else {
                        mismatch(ParamKind::List, raw)
                    }
                })
            }
            None => match listify(raw) {
                Ok(list) => Ok(ParamValue::List(list)),
                Err(CastError::NotAList(_)) => Ok(ParamValue::List(vec![infer_scalar(raw)?])),
                Err(e) if is_out_of_range(&e) => Err(e),
                Err(_) => Err(mismatch(ParamKind::List, raw)),
            },
        },
    }
}
