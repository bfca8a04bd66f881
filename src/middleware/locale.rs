//! 请求语言解析
//!
//! 顺序：`?lang=` 查询参数 → `locale` cookie → `Accept-Language` → 配置的默认语言

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header, request::Parts},
};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::env::constants::LOCALE_COOKIE;
use crate::domain::locale::Locale;
use crate::state::AppState;

use super::cookie::cookie_value;

#[derive(Debug, Deserialize)]
struct LangParam {
    lang: Option<String>,
}

/// 当前请求的语言
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestLocale(pub Locale);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequestLocale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequestLocale(resolve_locale(parts, state.config.default_locale)))
    }
}

/// 解析请求语言
pub fn resolve_locale(parts: &Parts, default: Locale) -> Locale {
    // 查询串无法解析时忽略，由 handler 自己的 Query extractor 报错
    let from_query = Query::<LangParam>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(param)| param.lang)
        .and_then(|lang| Locale::parse(&lang));

    from_query
        .or_else(|| cookie_value(&parts.headers, LOCALE_COOKIE).and_then(|v| Locale::parse(&v)))
        .or_else(|| {
            parts
                .headers
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
                .and_then(Locale::from_accept_language)
        })
        .unwrap_or(default)
}
