//! API 模块
//!
//! HTTP handlers 和路由组装

pub mod admin;
pub mod auth;
pub mod blog;
pub mod health;
pub mod locale;
pub mod profile;
pub mod projects;
pub mod site;

use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// 构建完整的 API 路由
///
/// 配置了静态目录时，未匹配的路径交给静态文件服务
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        // Health & Status
        .merge(health::router())
        // Locale
        .merge(locale::router())
        // Public content
        .merge(profile::router())
        .merge(projects::router())
        .merge(blog::router())
        .merge(site::router())
        // Auth
        .merge(auth::router())
        // Admin
        .merge(admin::router(state.config.max_upload_bytes));

    if let Some(dir) = &state.config.static_dir {
        app = app.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    app
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
