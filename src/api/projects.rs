//! 项目 API（公开）
//!
//! 包含 /api/projects 端点，只返回已发布的项目

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use std::sync::Arc;

use crate::domain::project::{categories, Project, ProjectCard, ProjectDetail, ProjectFilter};
use crate::error::{ApiError, ApiResult};
use crate::infra::backend::Auth;
use crate::infra::query::Query;
use crate::middleware::extract::{Json, Path, Query as QueryParams};
use crate::middleware::RequestLocale;
use crate::state::AppState;

/// 创建项目路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/projects", get(list_projects))
        .route("/api/projects/categories", get(list_categories))
        .route("/api/projects/:slug", get(get_project))
}

async fn published(state: &AppState) -> ApiResult<Vec<Project>> {
    state
        .repo::<Project>()
        .list(Query::new().eq("is_published", true), Auth::Anon)
        .await
}

/// 已发布项目列表，支持 category / tech / featured / q 过滤
///
/// GET /api/projects
async fn list_projects(
    RequestLocale(locale): RequestLocale,
    State(state): State<Arc<AppState>>,
    QueryParams(filter): QueryParams<ProjectFilter>,
) -> ApiResult<impl IntoResponse> {
    let projects = filter.apply(published(&state).await?);
    let cards: Vec<ProjectCard> = projects
        .iter()
        .map(|p| ProjectCard::localize(p, locale))
        .collect();
    Ok(Json(cards))
}

/// 项目分类
///
/// GET /api/projects/categories
async fn list_categories(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let projects = published(&state).await?;
    Ok(Json(categories(&projects)))
}

/// 项目详情
///
/// GET /api/projects/:slug
async fn get_project(
    RequestLocale(locale): RequestLocale,
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let project = state
        .repo::<Project>()
        .find_one(
            Query::new().eq("slug", &slug).eq("is_published", true),
            Auth::Anon,
        )
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Project '{}'", slug)))?;

    Ok(Json(ProjectDetail::localize(&project, locale)))
}
