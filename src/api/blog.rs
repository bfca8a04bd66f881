//! 博客 API（公开）
//!
//! 包含 /api/blog 端点，只返回已发布的文章

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use std::sync::Arc;

use crate::domain::blog::{tags, BlogFilter, BlogPost, BlogPostCard, BlogPostDetail};
use crate::error::{ApiError, ApiResult};
use crate::infra::backend::Auth;
use crate::infra::query::Query;
use crate::middleware::extract::{Json, Path, Query as QueryParams};
use crate::middleware::RequestLocale;
use crate::state::AppState;

/// 创建博客路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/blog", get(list_posts))
        .route("/api/blog/tags", get(list_tags))
        .route("/api/blog/:slug", get(get_post))
}

async fn published(state: &AppState) -> ApiResult<Vec<BlogPost>> {
    state
        .repo::<BlogPost>()
        .list(Query::new().eq("is_published", true), Auth::Anon)
        .await
}

/// 文章列表（分页）
///
/// GET /api/blog?tag=&q=&page=&per_page=
async fn list_posts(
    RequestLocale(locale): RequestLocale,
    State(state): State<Arc<AppState>>,
    QueryParams(filter): QueryParams<BlogFilter>,
) -> ApiResult<impl IntoResponse> {
    let page = filter
        .apply(published(&state).await?)
        .map(|post| BlogPostCard::localize(&post, locale));
    Ok(Json(page))
}

/// 全部标签
///
/// GET /api/blog/tags
async fn list_tags(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let posts = published(&state).await?;
    Ok(Json(tags(&posts)))
}

/// 文章详情
///
/// GET /api/blog/:slug
async fn get_post(
    RequestLocale(locale): RequestLocale,
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let post = state
        .repo::<BlogPost>()
        .find_one(
            Query::new().eq("slug", &slug).eq("is_published", true),
            Auth::Anon,
        )
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Post '{}'", slug)))?;

    Ok(Json(BlogPostDetail::localize(&post, locale)))
}
