use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;
use std::fmt;

/// 参数值类型枚举，只支持一层列表（不允许嵌套）
#[derive(Clone, PartialEq)]
pub enum ParamValue {
    // ————————————————————————————————————————————————————————————————————————
    // 标量参数值：布尔、整数、浮点数、None、字符串
    // ————————————————————————————————————————————————————————————————————————
    Scalar(ScalarValue),
    // ————————————————————————————————————————————————————————————————————————
    // 标量列表，推断得到的列表中所有元素类型相同
    // ————————————————————————————————————————————————————————————————————————
    List(Vec<ScalarValue>),
}

/// 标量参数值类型，用于List中
#[derive(Clone, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Null,
    Str(String),
}

/// 参数值的种类，封闭集合 {bool, int, float, null, list, str}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Bool,
    Int,
    Float,
    Null,
    List,
    Str,
}

/// 最终参数映射，按参数名排序
pub type ParamMap = BTreeMap<String, ParamValue>;

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Bool => "bool",
            ParamKind::Int => "int",
            ParamKind::Float => "float",
            ParamKind::Null => "null",
            ParamKind::List => "list",
            ParamKind::Str => "str",
        };
        f.write_str(name)
    }
}

impl ScalarValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ScalarValue::Bool(_) => ParamKind::Bool,
            ScalarValue::Int(_) => ParamKind::Int,
            ScalarValue::Float(_) => ParamKind::Float,
            ScalarValue::Null => ParamKind::Null,
            ScalarValue::Str(_) => ParamKind::Str,
        }
    }

    /// 渲染成命令行文本，保证能被同种类的解释器重新解析
    pub fn to_cli_string(&self) -> String {
        match self {
            ScalarValue::Bool(b) => b.to_string(),
            ScalarValue::Int(n) => n.to_string(),
            ScalarValue::Float(x) => {
                let s = x.to_string();
                // 整数值的浮点数保留小数点，例如 1.0
                if x.is_finite() && !s.contains(['.', 'e', 'E']) {
                    format!("{}.0", s)
                } else {
                    s
                }
            }
            ScalarValue::Null => "None".to_string(),
            ScalarValue::Str(s) => s.clone(),
        }
    }

    /// 描述串中的写法，与 Python 的 `str()` 一致（True、None、nan）
    pub fn to_slug_string(&self) -> String {
        match self {
            ScalarValue::Bool(true) => "True".to_string(),
            ScalarValue::Bool(false) => "False".to_string(),
            ScalarValue::Float(x) if x.is_nan() => "nan".to_string(),
            _ => self.to_cli_string(),
        }
    }

    /// 列表元素的写法，字符串带单引号
    fn to_slug_item(&self) -> String {
        match self {
            ScalarValue::Str(s) => format!("'{}'", s),
            _ => self.to_slug_string(),
        }
    }

    pub fn to_yaml_value(&self) -> YamlValue {
        match self {
            ScalarValue::Bool(b) => YamlValue::Bool(*b),
            ScalarValue::Int(n) => YamlValue::Number((*n).into()),
            ScalarValue::Float(x) => YamlValue::Number((*x).into()),
            ScalarValue::Null => YamlValue::Null,
            ScalarValue::Str(s) => YamlValue::String(s.clone()),
        }
    }
}

/// 为ScalarValue实现Debug trait，使用Display的格式
impl fmt::Debug for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cli_string())
    }
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Scalar(scalar) => scalar.kind(),
            ParamValue::List(_) => ParamKind::List,
        }
    }

    /// 列表渲染为逗号分隔文本，与列表推断互逆
    pub fn to_cli_string(&self) -> String {
        match self {
            ParamValue::Scalar(scalar) => scalar.to_cli_string(),
            ParamValue::List(list) => {
                let items: Vec<String> = list.iter().map(|item| item.to_cli_string()).collect();
                items.join(",")
            }
        }
    }

    pub fn to_slug_string(&self) -> String {
        match self {
            ParamValue::Scalar(scalar) => scalar.to_slug_string(),
            ParamValue::List(list) => {
                let items: Vec<String> = list.iter().map(|item| item.to_slug_item()).collect();
                format!("[{}]", items.join(", "))
            }
        }
    }

    pub fn to_yaml_value(&self) -> YamlValue {
        match self {
            ParamValue::Scalar(scalar) => scalar.to_yaml_value(),
            ParamValue::List(list) => {
                YamlValue::Sequence(list.iter().map(|item| item.to_yaml_value()).collect())
            }
        }
    }
}

impl From<ScalarValue> for ParamValue {
    fn from(value: ScalarValue) -> Self {
        ParamValue::Scalar(value)
    }
}

/// 为ParamValue实现Debug trait，使用Display的格式
impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Scalar(scalar) => write!(f, "{}", scalar),
            ParamValue::List(list) => {
                let items: Vec<String> = list.iter().map(|item| item.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

impl From<&ScalarValue> for JsonValue {
    fn from(val: &ScalarValue) -> Self {
        match val {
            ScalarValue::Str(s) => JsonValue::String(s.clone()),
            ScalarValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            ScalarValue::Int(i) => JsonValue::Number((*i).into()),
            ScalarValue::Bool(b) => JsonValue::Bool(*b),
            ScalarValue::Null => JsonValue::Null,
        }
    }
}

impl From<&ParamValue> for JsonValue {
    fn from(val: &ParamValue) -> Self {
        match val {
            ParamValue::Scalar(scalar) => scalar.into(),
            ParamValue::List(list) => {
                JsonValue::Array(list.iter().map(|item| item.into()).collect())
            }
        }
    }
}

/// 将参数映射转换为JSON对象
pub fn params_to_json(params: &ParamMap) -> JsonValue {
    params
        .iter()
        .map(|(k, v)| (k.clone(), v.into()))
        .collect::<serde_json::Map<_, _>>()
        .into()
}

/// 将参数映射格式化为美观的JSON字符串并打印到控制台
///
/// # 参数
/// * `params` - 最终参数映射
///
/// # 返回值
/// * `Result<(), serde_json::Error>` - 序列化失败时返回错误
pub fn print_params_pretty(params: &ParamMap) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(&params_to_json(params))?);
    Ok(())
}
