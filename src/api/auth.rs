//! 登录 / 注销 API
//!
//! 包含 /api/auth/* 端点，认证本身完全交给后端认证服务

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::env::constants::ACCESS_TOKEN_COOKIE;
use crate::error::{ApiError, ApiResult};
use crate::infra::backend::AuthUser;
use crate::middleware::auth::extract_token;
use crate::middleware::cookie::{clear_cookie, SetCookie};
use crate::middleware::extract::Json;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// 未返回有效期时 cookie 的默认有效期（秒）
const DEFAULT_SESSION_SECS: u64 = 3600;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: AuthUser,
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_in: u64,
}

/// 创建认证路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

/// 邮箱密码登录
///
/// POST /api/auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let session = state.backend.sign_in(email, &request.password).await?;

    if !state.config.is_admin_email(session.user.email.as_deref()) {
        tracing::warn!(user_id = %session.user.id, "Non-admin sign-in rejected");
        if let Err(e) = state.backend.sign_out(&session.access_token).await {
            tracing::warn!(error = %e, "Failed to revoke non-admin session");
        }
        return Err(ApiError::forbidden());
    }

    let expires_in = session.expires_in.unwrap_or(DEFAULT_SESSION_SECS);
    let cookie = SetCookie {
        name: ACCESS_TOKEN_COOKIE,
        value: &session.access_token,
        max_age_secs: expires_in,
        http_only: true,
        secure: state.config.cookie_secure,
    }
    .to_header()
    .ok_or_else(|| ApiError::internal("Backend returned an access token that cannot be stored in a cookie"))?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            user: session.user,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            expires_in,
        }),
    ))
}

/// 注销：撤销后端会话并清除 cookie
///
/// POST /api/auth/logout
async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    if let Some(token) = extract_token(&headers) {
        // token 已过期时后端会拒绝，本地 cookie 照样清除
        if let Err(e) = state.backend.sign_out(&token).await {
            tracing::warn!(error = %e, "Backend sign-out failed");
        }
    }

    let cleared = clear_cookie(ACCESS_TOKEN_COOKIE)
        .unwrap_or_else(|| HeaderValue::from_static("access_token=; Path=/; Max-Age=0"));
    Ok((
        [(header::SET_COOKIE, cleared)],
        Json(serde_json::json!({ "success": true })),
    ))
}

/// 当前管理员
///
/// GET /api/auth/me
async fn me(admin: RequireAdmin) -> impl IntoResponse {
    Json(admin.user)
}
