//! 托管后端 HTTP Client
//!
//! 封装与后端服务（PostgREST 表接口、GoTrue 认证、对象存储）的全部 HTTP 交互，复用连接池。
//! 后端返回的错误信息原样透传，不做重试

use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::query::Query;

/// 后端错误
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// 网络错误
    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// 后端返回非成功状态码，`message` 为后端自己的错误文本
    #[error("{message}")]
    Api { status: u16, message: String },
    /// 响应无法解析
    #[error("Unexpected backend response: {0}")]
    Decode(String),
    /// URL 配置错误
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    /// 从错误响应体中提取后端的错误文本
    ///
    /// 依次尝试 `message`、`msg`、`error_description`、`error` 字段，否则使用原始响应体
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                ["message", "msg", "error_description", "error"]
                    .iter()
                    .find_map(|field| v.get(field).and_then(|m| m.as_str()).map(str::to_string))
            })
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                let raw = body.trim();
                if raw.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                } else {
                    raw.to_string()
                }
            });

        BackendError::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// 后端返回的 HTTP 状态码（如果有）
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            BackendError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// 请求使用的凭据
#[derive(Clone, Copy, Debug)]
pub enum Auth<'a> {
    /// 匿名 key（公开读取、联系表单）
    Anon,
    /// 已登录用户的 access token（管理操作）
    User(&'a str),
}

/// 登录会话
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: AuthUser,
}

/// 认证用户
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// 后端客户端
///
/// 封装所有与后端的 HTTP 交互，包括：
/// - 表查询与写入 (select / insert / update / upsert / delete)
/// - 认证 (sign_in / get_user / sign_out)
/// - 对象存储 (upload / public_url)
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl BackendClient {
    /// 创建新的后端客户端
    ///
    /// # Arguments
    /// * `base_url` - 后端根地址，如 `https://xyz.supabase.co`
    /// * `anon_key` - 匿名 API key
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, BackendError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        url::Url::parse(&base_url).map_err(|e| BackendError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            base_url,
            anon_key: anon_key.to_string(),
        })
    }

    /// 后端根地址
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, url: &str, auth: Auth<'_>) -> RequestBuilder {
        let token = match auth {
            Auth::Anon => self.anon_key.as_str(),
            Auth::User(token) => token,
        };
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// 发送请求；非 2xx 转为 [`BackendError::Api`]，返回响应体文本
    async fn send(&self, request: RequestBuilder) -> Result<String, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            let err = BackendError::from_response(status, &body);
            warn!(status = %status, error = %err, "Backend returned non-success status");
            Err(err)
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    // ========== 表操作 ==========

    /// 查询多行
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
        auth: Auth<'_>,
    ) -> Result<Vec<T>, BackendError> {
        debug!(table = %table, query = ?query.pairs(), "Selecting rows");
        let request = self
            .request(Method::GET, &self.rest_url(table), auth)
            .query(query.pairs());
        self.send_json(request).await
    }

    /// 查询单行，不存在时返回 None
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
        auth: Auth<'_>,
    ) -> Result<Option<T>, BackendError> {
        let rows: Vec<T> = self.select(table, &query.clone().limit(1), auth).await?;
        Ok(rows.into_iter().next())
    }

    /// 插入一行，返回插入后的记录
    pub async fn insert<T: DeserializeOwned, D: Serialize + ?Sized>(
        &self,
        table: &str,
        draft: &D,
        auth: Auth<'_>,
    ) -> Result<T, BackendError> {
        let request = self
            .request(Method::POST, &self.rest_url(table), auth)
            .header("Prefer", "return=representation")
            .json(draft);
        let rows: Vec<T> = self.send_json(request).await?;
        info!(table = %table, "Inserted row");
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("insert returned no rows".to_string()))
    }

    /// 插入一行，不要求返回记录
    ///
    /// 用于匿名写入：行级权限只允许插入、不允许读回时使用
    pub async fn insert_minimal<D: Serialize + ?Sized>(
        &self,
        table: &str,
        draft: &D,
        auth: Auth<'_>,
    ) -> Result<(), BackendError> {
        let request = self
            .request(Method::POST, &self.rest_url(table), auth)
            .header("Prefer", "return=minimal")
            .json(draft);
        self.send(request).await?;
        info!(table = %table, "Inserted row");
        Ok(())
    }

    /// 按键更新一行，不存在时返回 None
    pub async fn update<T: DeserializeOwned, D: Serialize + ?Sized>(
        &self,
        table: &str,
        key_column: &str,
        key: &str,
        draft: &D,
        auth: Auth<'_>,
    ) -> Result<Option<T>, BackendError> {
        let filter = Query::new().eq(key_column, key);
        let request = self
            .request(Method::PATCH, &self.rest_url(table), auth)
            .header("Prefer", "return=representation")
            .query(filter.pairs())
            .json(draft);
        let rows: Vec<T> = self.send_json(request).await?;
        info!(table = %table, key = %key, updated = !rows.is_empty(), "Updated row");
        Ok(rows.into_iter().next())
    }

    /// 插入或按 `on_conflict` 列合并
    pub async fn upsert<T: DeserializeOwned, D: Serialize + ?Sized>(
        &self,
        table: &str,
        on_conflict: &str,
        draft: &D,
        auth: Auth<'_>,
    ) -> Result<T, BackendError> {
        let request = self
            .request(Method::POST, &self.rest_url(table), auth)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .query(&[("on_conflict", on_conflict)])
            .json(draft);
        let rows: Vec<T> = self.send_json(request).await?;
        info!(table = %table, on_conflict = %on_conflict, "Upserted row");
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("upsert returned no rows".to_string()))
    }

    /// 按键删除，返回是否删除了记录
    pub async fn delete(
        &self,
        table: &str,
        key_column: &str,
        key: &str,
        auth: Auth<'_>,
    ) -> Result<bool, BackendError> {
        let filter = Query::new().eq(key_column, key);
        let request = self
            .request(Method::DELETE, &self.rest_url(table), auth)
            .header("Prefer", "return=representation")
            .query(filter.pairs());
        let rows: Vec<serde_json::Value> = self.send_json(request).await?;
        info!(table = %table, key = %key, deleted = rows.len(), "Deleted rows");
        Ok(!rows.is_empty())
    }

    // ========== 认证 ==========

    /// 邮箱密码登录
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let url = format!("{}/auth/v1/token", self.base_url);
        let request = self
            .request(Method::POST, &url, Auth::Anon)
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }));
        let session: Session = self.send_json(request).await?;
        info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    /// 根据 access token 获取用户
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, BackendError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let request = self.request(Method::GET, &url, Auth::User(access_token));
        self.send_json(request).await
    }

    /// 注销会话
    pub async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let request = self.request(Method::POST, &url, Auth::User(access_token));
        self.send(request).await?;
        Ok(())
    }

    // ========== 对象存储 ==========

    /// 上传对象
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        auth: Auth<'_>,
    ) -> Result<(), BackendError> {
        let url = self.object_url(&["object", bucket], path)?;
        let size = bytes.len();
        let request = self
            .request(Method::POST, &url, auth)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes);
        self.send(request).await?;
        info!(bucket = %bucket, path = %path, size = size, "Uploaded object");
        Ok(())
    }

    /// 公开访问 URL
    pub fn public_url(&self, bucket: &str, path: &str) -> Result<String, BackendError> {
        self.object_url(&["object", "public", bucket], path)
    }

    /// `{base}/storage/v1/{prefix...}/{path}`，各段做百分号编码
    fn object_url(&self, prefix: &[&str], path: &str) -> Result<String, BackendError> {
        let mut url = url::Url::parse(&self.base_url)
            .map_err(|e| BackendError::InvalidUrl(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| BackendError::InvalidUrl(self.base_url.clone()))?;
            segments.pop_if_empty();
            segments.extend(["storage", "v1"]);
            segments.extend(prefix);
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_postgrest() {
        let err = BackendError::from_response(
            StatusCode::CONFLICT,
            r#"{"code":"23505","details":null,"hint":null,"message":"duplicate key value violates unique constraint \"projects_slug_key\""}"#,
        );
        assert_eq!(err.status(), Some(409));
        assert_eq!(
            err.to_string(),
            "duplicate key value violates unique constraint \"projects_slug_key\""
        );
    }

    #[test]
    fn test_error_message_from_auth() {
        let err = BackendError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(err.to_string(), "Invalid login credentials");

        let err = BackendError::from_response(StatusCode::UNAUTHORIZED, r#"{"msg":"JWT expired"}"#);
        assert_eq!(err.to_string(), "JWT expired");
    }

    #[test]
    fn test_error_message_fallbacks() {
        let err = BackendError::from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "upstream down");

        let err = BackendError::from_response(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.to_string(), "Service Unavailable");
    }

    #[test]
    fn test_public_url_encodes_segments() {
        let client = BackendClient::new("https://abc.supabase.co/", "anon").unwrap();
        assert_eq!(client.base_url(), "https://abc.supabase.co");
        assert_eq!(
            client.public_url("portfolio", "projects/2024/05/ảnh bìa.png").unwrap(),
            "https://abc.supabase.co/storage/v1/object/public/portfolio/projects/2024/05/%E1%BA%A3nh%20b%C3%ACa.png"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            BackendClient::new("not a url", "anon"),
            Err(BackendError::InvalidUrl(_))
        ));
    }
}
