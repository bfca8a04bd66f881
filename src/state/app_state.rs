//! 应用状态

use chrono::{DateTime, Utc};

use crate::config::env::EnvConfig;
use crate::infra::backend::{BackendClient, BackendError};
use crate::services::repository::Repository;
use crate::domain::Record;

/// 应用状态
///
/// 启动后只读，所有请求共享
pub struct AppState {
    /// 环境配置
    pub config: EnvConfig,
    /// 后端客户端
    pub backend: BackendClient,
    /// 服务启动时间
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// 根据配置创建应用状态
    pub fn new(config: EnvConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config.backend_url, &config.anon_key)?;

        tracing::info!(
            backend_url = %backend.base_url(),
            anon_key_len = config.anon_key.len(),
            storage_bucket = %config.storage_bucket,
            port = config.port,
            default_locale = %config.default_locale,
            admin_emails = config.admin_emails.len(),
            static_dir = ?config.static_dir,
            "Loaded configuration"
        );

        Ok(Self {
            config,
            backend,
            started_at: Utc::now(),
        })
    }

    /// 某张表的仓储
    pub fn repo<T: Record>(&self) -> Repository<'_, T> {
        Repository::new(&self.backend)
    }

    /// 运行时长（秒）
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_backend_url() {
        let config = EnvConfig {
            backend_url: "not a url".to_string(),
            anon_key: "anon".to_string(),
            storage_bucket: "portfolio".to_string(),
            port: 3000,
            default_locale: crate::domain::Locale::Vi,
            admin_emails: Vec::new(),
            static_dir: None,
            cookie_secure: false,
            max_upload_bytes: 1024,
        };
        assert!(matches!(AppState::new(config), Err(BackendError::InvalidUrl(_))));
    }
}
