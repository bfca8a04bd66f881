//! 站点设置（键值对）

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{trim, Draft, Record};
use super::validation::ValidationErrors;

/// 站点设置（`site_settings` 表，主键为 `key`）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SiteSetting {
    pub key: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub is_public: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for SiteSetting {
    const TABLE: &'static str = "site_settings";
    const KEY: &'static str = "key";
    const ORDER: &'static str = "key.asc";
    type Draft = SettingDraft;

    fn key(&self) -> String {
        self.key.clone()
    }

    fn is_valid_key(key: &str) -> bool {
        is_valid_setting_key(key)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettingDraft {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Value,
    /// 为空时不写入该列：新建取表默认值（不公开），更新保留原值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Draft for SettingDraft {
    fn normalize(&mut self) {
        trim(&mut self.key);
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !is_valid_setting_key(&self.key) {
            errors.add("key", "must contain only lowercase letters, digits, '_' and '.'");
        }
        errors.into_result()
    }
}

/// 设置键：小写字母、数字、下划线、点
pub fn is_valid_setting_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'.')
}

/// 公开设置转为 key → value 映射
pub fn public_map(settings: Vec<SiteSetting>) -> BTreeMap<String, Value> {
    settings
        .into_iter()
        .filter(|s| s.is_public)
        .map(|s| (s.key, s.value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setting(key: &str, value: Value, is_public: bool) -> SiteSetting {
        SiteSetting {
            key: key.to_string(),
            value,
            is_public,
            updated_at: None,
        }
    }

    #[test]
    fn test_public_map_hides_private() {
        let map = public_map(vec![
            setting("site.title", json!({"vi": "Trang cá nhân", "en": "Portfolio"}), true),
            setting("smtp.password", json!("secret"), false),
            setting("social.github", json!("https://github.com/me"), true),
        ]);
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("smtp.password"));
        assert_eq!(map["social.github"], json!("https://github.com/me"));
    }

    #[test]
    fn test_draft_omits_unset_visibility() {
        let draft = SettingDraft {
            key: "site.title".to_string(),
            value: json!("Portfolio"),
            is_public: None,
            updated_at: Utc::now(),
        };
        let body = serde_json::to_value(&draft).unwrap();
        assert!(body.get("is_public").is_none());
        assert_eq!(body["value"], json!("Portfolio"));

        let draft = SettingDraft {
            is_public: Some(true),
            ..draft
        };
        assert_eq!(serde_json::to_value(&draft).unwrap()["is_public"], json!(true));
    }

    #[test]
    fn test_setting_key() {
        assert!(is_valid_setting_key("site.title"));
        assert!(is_valid_setting_key("hero_image_2"));
        assert!(!is_valid_setting_key("Site Title"));
        assert!(!is_valid_setting_key(""));
    }
}
