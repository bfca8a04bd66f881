//! 语言切换 API
//!
//! 包含 /api/locale 端点

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::env::constants::{LOCALE_COOKIE, LOCALE_COOKIE_MAX_AGE_SECS};
use crate::domain::locale::Locale;
use crate::error::{ApiError, ApiResult};
use crate::middleware::cookie::SetCookie;
use crate::middleware::extract::Json;
use crate::middleware::RequestLocale;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetLocaleRequest {
    pub locale: String,
}

#[derive(Debug, Serialize)]
pub struct LocaleResponse {
    pub locale: Locale,
}

/// 创建语言路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/locale", get(current_locale).post(set_locale))
}

/// 当前语言
///
/// GET /api/locale
async fn current_locale(RequestLocale(locale): RequestLocale) -> impl IntoResponse {
    Json(LocaleResponse { locale })
}

/// 切换语言，写入 cookie
///
/// POST /api/locale
async fn set_locale(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetLocaleRequest>,
) -> ApiResult<impl IntoResponse> {
    let locale = Locale::parse(&request.locale)
        .ok_or_else(|| ApiError::bad_request(format!("Unsupported locale: {}", request.locale)))?;

    let cookie = SetCookie {
        name: LOCALE_COOKIE,
        value: locale.as_str(),
        max_age_secs: LOCALE_COOKIE_MAX_AGE_SECS,
        http_only: false,
        secure: state.config.cookie_secure,
    }
    .to_header()
    .ok_or_else(|| ApiError::internal("Failed to build locale cookie"))?;

    tracing::debug!(locale = %locale, "Locale switched");
    Ok(([(header::SET_COOKIE, cookie)], Json(LocaleResponse { locale })))
}
