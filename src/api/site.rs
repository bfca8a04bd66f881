//! 服务、站点设置与联系表单 API（公开）
//!
//! 包含 /api/services, /api/settings, /api/contact 端点

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::domain::contact::{ContactDraft, ContactMessage};
use crate::domain::service::{Service, ServiceView};
use crate::domain::settings::{public_map, SiteSetting};
use crate::error::ApiResult;
use crate::infra::backend::Auth;
use crate::infra::query::Query;
use crate::middleware::extract::Json;
use crate::middleware::RequestLocale;
use crate::state::AppState;

/// 创建站点路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/services", get(list_services))
        .route("/api/settings", get(public_settings))
        .route("/api/contact", post(submit_contact))
}

/// 启用中的服务
///
/// GET /api/services
async fn list_services(
    RequestLocale(locale): RequestLocale,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let services = state
        .repo::<Service>()
        .list(Query::new().eq("is_active", true), Auth::Anon)
        .await?;
    let views: Vec<ServiceView> = services
        .iter()
        .map(|s| ServiceView::localize(s, locale))
        .collect();
    Ok(Json(views))
}

/// 公开的站点设置
///
/// GET /api/settings
async fn public_settings(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let settings = state
        .repo::<SiteSetting>()
        .list(Query::new().eq("is_public", true), Auth::Anon)
        .await?;
    Ok(Json(public_map(settings)))
}

/// 提交联系表单
///
/// POST /api/contact
async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ContactDraft>,
) -> ApiResult<impl IntoResponse> {
    // 访客只有插入权限，不读回记录
    state.repo::<ContactMessage>().submit(draft, Auth::Anon).await?;
    tracing::info!("Contact message received");
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "success": true }))))
}
