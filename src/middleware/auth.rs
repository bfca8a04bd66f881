//! 管理员认证中间件
//!
//! 提供 `RequireAdmin` extractor，替代每个 admin handler 中重复的 token 校验逻辑

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, header::HeaderMap, request::Parts},
};
use std::sync::Arc;

use crate::config::env::constants::ACCESS_TOKEN_COOKIE;
use crate::error::ApiError;
use crate::infra::backend::{Auth, AuthUser};
use crate::state::AppState;

use super::cookie::cookie_value;

/// 管理员认证 Extractor
///
/// 从 `Authorization: Bearer` 或 `access_token` cookie 中取 token，
/// 交给后端认证服务校验，并检查管理员邮箱名单
///
/// # Example
///
/// ```ignore
/// async fn protected_handler(
///     admin: RequireAdmin,
///     State(state): State<Arc<AppState>>,
/// ) -> impl IntoResponse {
///     // 用 admin.auth() 作为后端请求凭据
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin {
    pub user: AuthUser,
    pub access_token: String,
}

impl RequireAdmin {
    /// 以该管理员身份访问后端
    pub fn auth(&self) -> Auth<'_> {
        Auth::User(&self.access_token)
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let access_token = extract_token(&parts.headers).ok_or_else(|| {
            tracing::warn!("Missing access token");
            ApiError::unauthorized()
        })?;

        let user = match state.backend.get_user(&access_token).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Access token rejected by backend");
                return Err(ApiError::unauthorized());
            }
        };

        if !state.config.is_admin_email(user.email.as_deref()) {
            tracing::warn!(user_id = %user.id, email = ?user.email, "User is not an admin");
            return Err(ApiError::forbidden());
        }

        Ok(RequireAdmin { user, access_token })
    }
}

/// 读取 access token
///
/// `Authorization: Bearer <token>` 优先，其次是 cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            let (scheme, token) = v.trim().split_once(' ')?;
            if scheme.eq_ignore_ascii_case("bearer") {
                Some(token.trim().to_string())
            } else {
                None
            }
        })
        .filter(|t| !t.is_empty());

    bearer.or_else(|| cookie_value(headers, ACCESS_TOKEN_COOKIE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_token(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_extract_cookie_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token=from-cookie"));
        assert_eq!(extract_token(&headers), Some("from-cookie".to_string()));
    }

    #[test]
    fn test_extract_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_token(&headers), None);
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }
}
