use crate::error::ResolveError;
use crate::models::{ParamKind, ParamMap};
use std::collections::BTreeMap;

/// 简单类型断言：每个指定的参数必须存在且种类一致
pub fn check_param_kinds(
    params: &ParamMap,
    expected: &BTreeMap<String, ParamKind>,
) -> Result<(), ResolveError> {
    for (name, kind) in expected {
        let value = params
            .get(name)
            .ok_or_else(|| ResolveError::UnknownParameter(name.clone()))?;
        if value.kind() != *kind {
            return Err(ResolveError::KindMismatch {
                name: name.clone(),
                expected: *kind,
                actual: value.kind(),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScalarValue;

    #[test]
    fn test_check_param_kinds() {
        let mut params = ParamMap::new();
        params.insert("seed".to_string(), ScalarValue::Int(7).into());
        params.insert("data_dir".to_string(), ScalarValue::Str("/data".to_string()).into());

        let mut expected = BTreeMap::new();
        expected.insert("seed".to_string(), ParamKind::Int);
        expected.insert("data_dir".to_string(), ParamKind::Str);
        assert!(check_param_kinds(&params, &expected).is_ok());

        expected.insert("seed".to_string(), ParamKind::Float);
        assert_eq!(
            check_param_kinds(&params, &expected),
            Err(ResolveError::KindMismatch {
                name: "seed".to_string(),
                expected: ParamKind::Float,
                actual: ParamKind::Int,
                value: "7".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_parameter() {
        let mut expected = BTreeMap::new();
        expected.insert("lr_max".to_string(), ParamKind::Float);
        assert_eq!(
            check_param_kinds(&ParamMap::new(), &expected),
            Err(ResolveError::UnknownParameter("lr_max".to_string()))
        );
    }
}
