//! 列表过滤与分页的公共部分

use serde::Serialize;

/// 每页默认条数
pub const DEFAULT_PER_PAGE: usize = 10;

/// 每页最大条数
pub const MAX_PER_PAGE: usize = 50;

/// 分页结果
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// 从完整列表中切出一页（page 从 1 开始）
    pub fn paginate(all: Vec<T>, page: Option<usize>, per_page: Option<usize>) -> Self {
        let per_page = per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        let page = page.unwrap_or(1).max(1);
        let total = all.len();
        let total_pages = total.div_ceil(per_page);

        let items = all
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        Self {
            items,
            page,
            per_page,
            total,
            total_pages,
        }
    }

    /// 转换每一项
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// 不区分大小写的子串匹配，任一字段命中即可
pub fn matches_query<'a>(query: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// 不区分大小写的列表成员检查
pub fn contains_ci(values: &[String], wanted: &str) -> bool {
    let wanted = wanted.trim().to_lowercase();
    values.iter().any(|v| v.to_lowercase() == wanted)
}

/// 去重（不区分大小写，保留首次出现的写法）并排序
pub fn distinct_sorted<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if !out.iter().any(|existing| existing.to_lowercase() == value.to_lowercase()) {
            out.push(value.to_string());
        }
    }
    out.sort_by_key(|v| v.to_lowercase());
    out
}
