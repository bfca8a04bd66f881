//! PostgREST 查询参数构造

use std::fmt::Display;

/// 表查询参数
///
/// 生成 `select=*&is_published=eq.true&order=sort_order.asc&limit=1` 这类参数，
/// 由 reqwest 负责 URL 编码
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    /// `select=*`
    pub fn new() -> Self {
        Self {
            params: vec![("select".to_string(), "*".to_string())],
        }
    }

    /// 等值过滤 `column=eq.value`
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.params.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    /// 排序，语法同 PostgREST（如 `created_at.desc`）
    pub fn order(mut self, order: &str) -> Self {
        self.params.retain(|(k, _)| k != "order");
        self.params.push(("order".to_string(), order.to_string()));
        self
    }

    /// 限制条数
    pub fn limit(mut self, limit: usize) -> Self {
        self.params.retain(|(k, _)| k != "limit");
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.params
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}
