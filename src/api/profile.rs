//! 个人资料 API
//!
//! 包含 /api/profile 端点

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use std::sync::Arc;

use crate::domain::profile::{group_skills, AboutPage, Profile, ProfileView, Skill, TimelineEntry, TimelineView};
use crate::error::ApiResult;
use crate::infra::backend::Auth;
use crate::infra::query::Query;
use crate::middleware::extract::Json;
use crate::middleware::RequestLocale;
use crate::state::AppState;

/// 创建个人资料路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/profile", get(about))
}

/// 本地化的资料、技能分组和经历时间线
///
/// GET /api/profile
async fn about(
    RequestLocale(locale): RequestLocale,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let profiles = state.repo::<Profile>();
    let skills = state.repo::<Skill>();
    let timeline = state.repo::<TimelineEntry>();

    let (profile, skills, timeline) = tokio::try_join!(
        profiles.find_one(Query::new(), Auth::Anon),
        skills.list_all(Auth::Anon),
        timeline.list_all(Auth::Anon),
    )?;

    Ok(Json(AboutPage {
        locale,
        profile: profile.map(|p| ProfileView::localize(&p, locale)),
        skills: group_skills(skills),
        timeline: timeline
            .iter()
            .map(|entry| TimelineView::localize(entry, locale))
            .collect(),
    }))
}
