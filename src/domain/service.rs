//! 提供的服务

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::locale::{pick_owned, Locale};
use super::record::{trim, trim_opt, Draft, Record};
use super::validation::ValidationErrors;

/// 服务（`services` 表）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    #[serde(default)]
    pub title_vi: String,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub description_vi: String,
    #[serde(default)]
    pub description_en: String,
    pub icon: Option<String>,
    pub price_from: Option<f64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl Record for Service {
    const TABLE: &'static str = "services";
    type Draft = ServiceDraft;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceDraft {
    #[serde(default)]
    pub title_vi: String,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub description_vi: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub price_from: Option<f64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_active() -> bool {
    true
}

impl Draft for ServiceDraft {
    fn normalize(&mut self) {
        trim(&mut self.title_vi);
        trim(&mut self.title_en);
        trim_opt(&mut self.icon);
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_either("title", &self.title_vi, &self.title_en);
        errors.require_either("description", &self.description_vi, &self.description_en);
        if let Some(price) = self.price_from {
            if !price.is_finite() || price < 0.0 {
                errors.add("price_from", "must be a non-negative number");
            }
        }
        errors.into_result()
    }
}

/// 本地化后的服务
#[derive(Debug, Serialize)]
pub struct ServiceView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub price_from: Option<f64>,
}

impl ServiceView {
    pub fn localize(service: &Service, locale: Locale) -> Self {
        Self {
            id: service.id,
            title: pick_owned(locale, &service.title_vi, &service.title_en),
            description: pick_owned(locale, &service.description_vi, &service.description_en),
            icon: service.icon.clone(),
            price_from: service.price_from,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults_to_active() {
        let draft: ServiceDraft = serde_json::from_value(serde_json::json!({
            "title_en": "API design",
            "description_en": "REST and GraphQL"
        }))
        .unwrap();
        assert!(draft.is_active);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let draft: ServiceDraft = serde_json::from_value(serde_json::json!({
            "title_vi": "Tư vấn",
            "description_vi": "Tư vấn kiến trúc",
            "price_from": -1.0
        }))
        .unwrap();
        let err = draft.validate().unwrap_err();
        assert_eq!(err.errors[0].field, "price_from");
    }
}
