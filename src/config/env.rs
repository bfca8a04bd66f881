//! 环境变量配置加载

use std::env;
use std::path::PathBuf;
use tracing::warn;

use crate::domain::locale::Locale;

/// 环境配置
#[derive(Clone, Debug)]
pub struct EnvConfig {
    /// 后端根地址
    pub backend_url: String,
    /// 后端匿名 key
    pub anon_key: String,
    /// 对象存储 bucket
    pub storage_bucket: String,
    /// 服务监听端口
    pub port: u16,
    /// 默认语言
    pub default_locale: Locale,
    /// 允许进入管理后台的邮箱（为空表示任何已登录用户）
    pub admin_emails: Vec<String>,
    /// 静态资源目录（可选）
    pub static_dir: Option<PathBuf>,
    /// Cookie 是否带 Secure 标记
    pub cookie_secure: bool,
    /// 上传文件大小上限（字节）
    pub max_upload_bytes: usize,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        // 后端地址 - 支持旧名称兼容
        let backend_url = load_with_fallback("BACKEND_URL", "SUPABASE_URL")
            .unwrap_or_else(|| "http://localhost:54321".to_string());

        let anon_key = load_with_fallback("BACKEND_ANON_KEY", "SUPABASE_ANON_KEY")
            .unwrap_or_else(|| {
                warn!("BACKEND_ANON_KEY is not set, backend requests will be rejected");
                String::new()
            });

        let storage_bucket =
            env::var("STORAGE_BUCKET").unwrap_or_else(|_| "portfolio".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        let default_locale = env::var("DEFAULT_LOCALE")
            .ok()
            .and_then(|v| Locale::parse(&v))
            .unwrap_or_default();

        let admin_emails = env::var("ADMIN_EMAILS")
            .map(|v| parse_email_list(&v))
            .unwrap_or_default();

        let static_dir = env::var("STATIC_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let cookie_secure = env::var("COOKIE_SECURE")
            .ok()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(constants::DEFAULT_MAX_UPLOAD_BYTES);

        Self {
            backend_url,
            anon_key,
            storage_bucket,
            port,
            default_locale,
            admin_emails,
            static_dir,
            cookie_secure,
            max_upload_bytes,
        }
    }

    /// 邮箱是否允许访问管理后台
    pub fn is_admin_email(&self, email: Option<&str>) -> bool {
        if self.admin_emails.is_empty() {
            return true;
        }
        email.map_or(false, |e| {
            let e = e.trim().to_lowercase();
            self.admin_emails.iter().any(|allowed| *allowed == e)
        })
    }
}

/// 逗号分隔的邮箱列表，统一小写
fn parse_email_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// 加载环境变量，支持 fallback
fn load_with_fallback(primary: &str, fallback: &str) -> Option<String> {
    env::var(primary).ok().or_else(|| env::var(fallback).ok())
}

/// 常量
pub mod constants {
    /// 语言 cookie 名称
    pub const LOCALE_COOKIE: &str = "locale";

    /// 登录 token cookie 名称
    pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

    /// 语言 cookie 有效期（秒）
    pub const LOCALE_COOKIE_MAX_AGE_SECS: u64 = 365 * 24 * 3600; // 1 年

    /// 默认上传上限
    pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024; // 5 MiB

    /// 版本号
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
