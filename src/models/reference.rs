use crate::models::param_value::{ParamMap, ParamValue};
use std::collections::BTreeMap;

/// 参考参数条目：必须在命令行给出，或带有固定类型的默认值
#[derive(Debug, Clone, PartialEq)]
pub enum ParamEntry {
    // 命令行必填，类型由文本推断
    Required,
    // 可选，类型固定为默认值的类型
    Default(ParamValue),
}

/// 参考参数字典，同时驱动配置文件和命令行解析
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamReference {
    entries: BTreeMap<String, ParamEntry>,
}

impl ParamReference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: &str) -> Self {
        self.insert(name, ParamEntry::Required);
        self
    }

    pub fn with_default(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.insert(name, ParamEntry::Default(value.into()));
        self
    }

    pub fn insert(&mut self, name: &str, entry: ParamEntry) {
        self.entries.insert(name.to_string(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&ParamEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有带默认值条目组成的映射（必填条目没有可保留的默认值）
    pub fn defaults(&self) -> ParamMap {
        self.entries
            .iter()
            .filter_map(|(name, entry)| match entry {
                ParamEntry::Default(value) => Some((name.clone(), value.clone())),
                ParamEntry::Required => None,
            })
            .collect()
    }
}

/// 参数名对应的命令行选项，下划线替换为连字符
pub fn option_flag(name: &str) -> String {
    name.replace('_', "-")
}
