//! 健康检查
//!
//! 包含 /health, /status 端点

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::config::env::constants::VERSION;
use crate::domain::locale::Locale;
use crate::middleware::extract::Json;
use crate::state::AppState;

/// 健康检查响应
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    timestamp: String,
    uptime_secs: i64,
    backend_url: String,
    backend_key_configured: bool,
    default_locale: Locale,
    locales: [Locale; 2],
}

/// 创建健康检查路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(health_check))
}

/// 健康检查 - 返回状态、版本、运行时间等信息
///
/// GET /health, GET /status
/// 无需认证
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        service: "portfolio-cms",
        version: VERSION,
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_secs: state.uptime_secs(),
        backend_url: state.backend.base_url().to_string(),
        backend_key_configured: !state.config.anon_key.is_empty(),
        default_locale: state.config.default_locale,
        locales: Locale::ALL,
    })
}
