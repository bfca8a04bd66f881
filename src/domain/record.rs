//! 表记录抽象
//!
//! 每张后端表对应一个 `Record` 类型及其 `Draft`（创建/更新载荷），
//! 通用仓储和通用 admin handlers 都基于这两个 trait 工作

use serde::{de::DeserializeOwned, Serialize};

use super::validation::ValidationErrors;

/// 后端表中的一行
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// 表名
    const TABLE: &'static str;
    /// 主键列
    const KEY: &'static str = "id";
    /// 默认排序（PostgREST `order` 语法）
    const ORDER: &'static str = "sort_order.asc";

    /// 创建/更新载荷
    type Draft: Draft;

    /// 主键值
    fn key(&self) -> String;

    /// 更新前是否需要读取当前行，为 true 时仓储会先调用 `retain_on_update`
    const RETAINS_ON_UPDATE: bool = false;

    /// 路径中的主键格式是否合法，默认要求 UUID
    fn is_valid_key(key: &str) -> bool {
        uuid::Uuid::parse_str(key).is_ok()
    }

    /// 用当前行补全更新载荷中缺省的字段
    fn retain_on_update(&self, _draft: &mut Self::Draft) {}
}

/// 表单载荷
pub trait Draft: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// 写入前的规范化（去空白、补默认值）
    fn normalize(&mut self) {}

    /// 表单校验
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// 去掉首尾空白，空串变为 None
pub(crate) fn trim_opt(value: &mut Option<String>) {
    if let Some(v) = value.as_mut() {
        let trimmed = v.trim();
        if trimmed.len() != v.len() {
            *v = trimmed.to_string();
        }
    }
    if value.as_deref().map_or(false, str::is_empty) {
        *value = None;
    }
}

/// 去掉首尾空白
pub(crate) fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// 规范化标签类列表：去空白、去空项、按不区分大小写去重
pub(crate) fn normalize_list(values: &mut Vec<String>) {
    let mut seen: Vec<String> = Vec::with_capacity(values.len());
    values.retain_mut(|v| {
        trim(v);
        let lower = v.to_lowercase();
        if v.is_empty() || seen.contains(&lower) {
            false
        } else {
            seen.push(lower);
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_opt() {
        let mut v = Some("  https://x.dev ".to_string());
        trim_opt(&mut v);
        assert_eq!(v.as_deref(), Some("https://x.dev"));

        let mut empty = Some("   ".to_string());
        trim_opt(&mut empty);
        assert_eq!(empty, None);
    }

    #[test]
    fn test_normalize_list() {
        let mut tags = vec![
            " Rust ".to_string(),
            "rust".to_string(),
            "".to_string(),
            "Axum".to_string(),
        ];
        normalize_list(&mut tags);
        assert_eq!(tags, vec!["Rust".to_string(), "Axum".to_string()]);
    }
}
