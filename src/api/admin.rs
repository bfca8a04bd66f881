//! 管理后台 API
//!
//! 所有端点都需要 `RequireAdmin`，以管理员自己的 token 访问后端：
//! - /api/admin/{table}       各内容表的 CRUD
//! - /api/admin/contacts      联系消息（只读、标记已读、删除）
//! - /api/admin/settings      站点设置
//! - /api/admin/upload        图片上传

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::contact::{ContactMessage, ContactReadPatch};
use crate::domain::profile::{Profile, Skill, TimelineEntry};
use crate::domain::settings::{SettingDraft, SiteSetting};
use crate::domain::{BlogPost, Project, Record, Service};
use crate::error::{ApiError, ApiResult};
use crate::middleware::extract::{Json, Path};
use crate::middleware::RequireAdmin;
use crate::services::upload::{upload_image, UploadRequest, UploadedFile};
use crate::state::AppState;

/// multipart 表单除文件外的额外开销
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// 创建管理后台路由
pub fn router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .merge(resource::<Profile>())
        .merge(resource::<Skill>())
        .merge(resource::<TimelineEntry>())
        .merge(resource::<Project>())
        .merge(resource::<BlogPost>())
        .merge(resource::<Service>())
        // Contacts
        .route("/api/admin/contacts", get(list::<ContactMessage>))
        .route(
            "/api/admin/contacts/:id",
            get(get_one::<ContactMessage>).delete(remove::<ContactMessage>),
        )
        .route("/api/admin/contacts/:id/read", put(mark_contact_read))
        // Settings
        .route("/api/admin/settings", get(list::<SiteSetting>))
        .route(
            "/api/admin/settings/:key",
            get(get_one::<SiteSetting>)
                .put(put_setting)
                .delete(remove::<SiteSetting>),
        )
        // Upload
        .route(
            "/api/admin/upload",
            post(upload).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
            )),
        )
}

/// 一张内容表的标准 CRUD 路由
fn resource<T: Record>() -> Router<Arc<AppState>> {
    let collection = format!("/api/admin/{}", T::TABLE);
    let item = format!("/api/admin/{}/:id", T::TABLE);

    Router::new()
        .route(&collection, get(list::<T>).post(create::<T>))
        .route(
            &item,
            get(get_one::<T>).put(update::<T>).delete(remove::<T>),
        )
}

/// 列表（含未发布）
///
/// GET /api/admin/{table}
async fn list<T: Record>(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<T>>> {
    Ok(Json(state.repo::<T>().list_all(admin.auth()).await?))
}

/// 详情
///
/// GET /api/admin/{table}/:id
async fn get_one<T: Record>(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<T>> {
    Ok(Json(state.repo::<T>().get(&id, admin.auth()).await?))
}

/// 新建
///
/// POST /api/admin/{table}
async fn create<T: Record>(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<T::Draft>,
) -> ApiResult<(StatusCode, Json<T>)> {
    let record = state.repo::<T>().create(draft, admin.auth()).await?;
    tracing::info!(table = T::TABLE, key = %record.key(), user_id = %admin.user.id, "Record created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// 更新
///
/// PUT /api/admin/{table}/:id
async fn update<T: Record>(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<T::Draft>,
) -> ApiResult<Json<T>> {
    let record = state.repo::<T>().update(&id, draft, admin.auth()).await?;
    tracing::info!(table = T::TABLE, key = %id, user_id = %admin.user.id, "Record updated");
    Ok(Json(record))
}

/// 删除
///
/// DELETE /api/admin/{table}/:id
async fn remove<T: Record>(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.repo::<T>().delete(&id, admin.auth()).await?;
    tracing::info!(table = T::TABLE, key = %id, user_id = %admin.user.id, "Record deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 标记联系消息已读 / 未读
///
/// PUT /api/admin/contacts/:id/read
async fn mark_contact_read(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ContactReadPatch>,
) -> ApiResult<Json<ContactMessage>> {
    let message = state
        .repo::<ContactMessage>()
        .patch(&id, &patch, admin.auth())
        .await?;
    Ok(Json(message))
}

#[derive(Debug, Deserialize)]
struct PutSettingRequest {
    #[serde(default)]
    value: Value,
    /// 未提供时保持原有可见性
    #[serde(default)]
    is_public: Option<bool>,
}

/// 写入站点设置（不存在则创建）
///
/// PUT /api/admin/settings/:key
async fn put_setting(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(request): Json<PutSettingRequest>,
) -> ApiResult<Json<SiteSetting>> {
    let draft = SettingDraft {
        key,
        value: request.value,
        is_public: request.is_public,
        updated_at: chrono::Utc::now(),
    };
    let setting = state.repo::<SiteSetting>().upsert(draft, admin.auth()).await?;
    tracing::info!(key = %setting.key, user_id = %admin.user.id, "Setting saved");
    Ok(Json(setting))
}

/// 上传图片
///
/// POST /api/admin/upload（multipart: `file`，可选 `folder`）
async fn upload(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<UploadedFile>)> {
    let mut multipart = multipart?;
    let mut request = UploadRequest {
        folder: None,
        file_name: None,
        content_type: None,
        bytes: Vec::new(),
    };
    let mut has_file = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                request.file_name = field.file_name().map(str::to_string);
                request.content_type = field.content_type().map(str::to_string);
                request.bytes = field.bytes().await?.to_vec();
                has_file = true;
            }
            "folder" => {
                request.folder = Some(field.text().await?);
            }
            _ => {}
        }
    }

    if !has_file {
        return Err(ApiError::bad_request("Missing 'file' field"));
    }

    let uploaded = upload_image(
        &state.backend,
        &state.config.storage_bucket,
        state.config.max_upload_bytes,
        request,
        &admin.access_token,
    )
    .await?;

    tracing::info!(path = %uploaded.path, size = uploaded.size, user_id = %admin.user.id, "Image uploaded");
    Ok((StatusCode::CREATED, Json(uploaded)))
}
