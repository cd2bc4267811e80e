/// 运行元数据，每次进程调用创建一次，之后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunMetadata {
    pub index: i64,
    pub description: Option<String>,
}

impl RunMetadata {
    /// 空描述视为没有描述
    pub fn new(index: i64, description: Option<String>) -> Self {
        Self {
            index,
            description: description.filter(|d| !d.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_description_is_dropped() {
        assert_eq!(RunMetadata::new(3, Some(String::new())).description, None);
        assert_eq!(
            RunMetadata::new(0, Some("bar".to_string())).description.as_deref(),
            Some("bar")
        );
    }
}
