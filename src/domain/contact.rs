//! 联系表单消息

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::{trim, trim_opt, Draft, Record};
use super::validation::{is_valid_email, ValidationErrors};

/// 消息正文最大长度（字符）
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// 联系消息（`contacts` 表）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for ContactMessage {
    const TABLE: &'static str = "contacts";
    const ORDER: &'static str = "created_at.desc";
    type Draft = ContactDraft;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

/// 访客提交的联系表单
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContactDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl Draft for ContactDraft {
    fn normalize(&mut self) {
        trim(&mut self.name);
        trim(&mut self.email);
        trim(&mut self.message);
        trim_opt(&mut self.subject);
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        if self.email.is_empty() {
            errors.add("email", "is required");
        } else if !is_valid_email(&self.email) {
            errors.add("email", "is not a valid email address");
        }
        errors.require("message", &self.message);
        if self.message.chars().count() > MAX_MESSAGE_CHARS {
            errors.add("message", format!("must be at most {} characters", MAX_MESSAGE_CHARS));
        }
        errors.into_result()
    }
}

/// 已读标记
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactReadPatch {
    pub is_read: bool,
}
