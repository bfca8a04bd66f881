//! 图片上传
//!
//! 校验类型与大小，生成对象路径 `{folder}/{yyyy}/{mm}/{uuid}.{ext}`，
//! 上传到对象存储后返回公开 URL

use chrono::{Datelike, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::infra::backend::{Auth, BackendClient};

/// 默认目录
pub const DEFAULT_FOLDER: &str = "misc";

/// 允许的图片类型及扩展名
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
    ("image/svg+xml", "svg"),
];

/// 上传结果
#[derive(Debug, Serialize)]
pub struct UploadedFile {
    pub path: String,
    pub url: String,
    pub size: usize,
    pub content_type: String,
}

/// 待上传的文件
#[derive(Debug)]
pub struct UploadRequest {
    pub folder: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// 根据 content type（缺失时按文件名）得到规范类型和扩展名
pub fn resolve_type(content_type: Option<&str>, file_name: Option<&str>) -> Option<(&'static str, &'static str)> {
    let by_type = content_type.and_then(|ct| {
        let ct = ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        ALLOWED_TYPES.iter().find(|(t, _)| *t == ct).copied()
    });

    by_type.or_else(|| {
        let ext = file_name?.rsplit_once('.')?.1.to_ascii_lowercase();
        let ext = if ext == "jpeg" { "jpg".to_string() } else { ext };
        ALLOWED_TYPES.iter().find(|(_, e)| *e == ext).copied()
    })
}

/// 目录名只允许 `[a-z0-9-]`，空则使用默认目录
pub fn sanitize_folder(folder: Option<&str>) -> ApiResult<String> {
    match folder.map(str::trim).filter(|f| !f.is_empty()) {
        None => Ok(DEFAULT_FOLDER.to_string()),
        Some(f) if f.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-') => {
            Ok(f.to_string())
        }
        Some(f) => Err(ApiError::bad_request(format!(
            "Invalid folder '{}': use lowercase letters, digits and '-'",
            f
        ))),
    }
}

/// 生成对象路径
pub fn object_path(folder: &str, ext: &str) -> String {
    let now = Utc::now();
    format!(
        "{}/{:04}/{:02}/{}.{}",
        folder,
        now.year(),
        now.month(),
        Uuid::new_v4(),
        ext
    )
}

/// 上传图片并返回公开 URL
pub async fn upload_image(
    backend: &BackendClient,
    bucket: &str,
    max_bytes: usize,
    request: UploadRequest,
    access_token: &str,
) -> ApiResult<UploadedFile> {
    if request.bytes.is_empty() {
        return Err(ApiError::bad_request("File is empty"));
    }
    if request.bytes.len() > max_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "File is {} bytes, the limit is {} bytes",
            request.bytes.len(),
            max_bytes
        )));
    }

    let (content_type, ext) = resolve_type(request.content_type.as_deref(), request.file_name.as_deref())
        .ok_or_else(|| ApiError::bad_request("Only PNG, JPEG, WebP, GIF and SVG images are allowed"))?;
    let folder = sanitize_folder(request.folder.as_deref())?;
    let path = object_path(&folder, ext);
    let size = request.bytes.len();

    backend
        .upload(bucket, &path, request.bytes, content_type, Auth::User(access_token))
        .await?;
    let url = backend.public_url(bucket, &path)?;

    Ok(UploadedFile {
        path,
        url,
        size,
        content_type: content_type.to_string(),
    })
}
