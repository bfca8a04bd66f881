//! 个人资料、技能、经历时间线

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::locale::{pick_opt, pick_owned, Locale};
use super::record::{trim, trim_opt, Draft, Record};
use super::validation::{is_valid_email, ValidationErrors};

/// 个人资料（`profiles` 表，通常只有一行）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    #[serde(default)]
    pub headline_vi: String,
    #[serde(default)]
    pub headline_en: String,
    #[serde(default)]
    pub bio_vi: String,
    #[serde(default)]
    pub bio_en: String,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location_vi: Option<String>,
    pub location_en: Option<String>,
    pub resume_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Profile {
    const TABLE: &'static str = "profiles";
    const ORDER: &'static str = "updated_at.desc.nullslast";
    type Draft = ProfileDraft;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileDraft {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub headline_vi: String,
    #[serde(default)]
    pub headline_en: String,
    #[serde(default)]
    pub bio_vi: String,
    #[serde(default)]
    pub bio_en: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location_vi: Option<String>,
    #[serde(default)]
    pub location_en: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Draft for ProfileDraft {
    fn normalize(&mut self) {
        trim(&mut self.full_name);
        for field in [
            &mut self.avatar_url,
            &mut self.email,
            &mut self.phone,
            &mut self.location_vi,
            &mut self.location_en,
            &mut self.resume_url,
            &mut self.github_url,
            &mut self.linkedin_url,
        ] {
            trim_opt(field);
        }
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("full_name", &self.full_name);
        errors.require_either("headline", &self.headline_vi, &self.headline_en);
        if let Some(email) = self.email.as_deref() {
            if !is_valid_email(email) {
                errors.add("email", "is not a valid email address");
            }
        }
        errors.url("avatar_url", self.avatar_url.as_deref());
        errors.url("resume_url", self.resume_url.as_deref());
        errors.url("github_url", self.github_url.as_deref());
        errors.url("linkedin_url", self.linkedin_url.as_deref());
        errors.into_result()
    }
}

/// 技能（`skills` 表）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: i32,
    pub icon: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

impl Record for Skill {
    const TABLE: &'static str = "skills";
    type Draft = SkillDraft;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

impl Draft for SkillDraft {
    fn normalize(&mut self) {
        trim(&mut self.name);
        trim(&mut self.category);
        trim_opt(&mut self.icon);
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        if !(0..=100).contains(&self.level) {
            errors.add("level", "must be between 0 and 100");
        }
        errors.into_result()
    }
}

/// 时间线条目类型
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineKind {
    #[default]
    Work,
    Education,
}

/// 经历（`timeline` 表）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: Uuid,
    #[serde(default)]
    pub kind: TimelineKind,
    #[serde(default)]
    pub title_vi: String,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub organization: String,
    pub description_vi: Option<String>,
    pub description_en: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl Record for TimelineEntry {
    const TABLE: &'static str = "timeline";
    const ORDER: &'static str = "start_date.desc";
    type Draft = TimelineDraft;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimelineDraft {
    #[serde(default)]
    pub kind: TimelineKind,
    #[serde(default)]
    pub title_vi: String,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub description_vi: Option<String>,
    #[serde(default)]
    pub description_en: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl Draft for TimelineDraft {
    fn normalize(&mut self) {
        trim(&mut self.title_vi);
        trim(&mut self.title_en);
        trim(&mut self.organization);
        trim_opt(&mut self.description_vi);
        trim_opt(&mut self.description_en);
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_either("title", &self.title_vi, &self.title_en);
        errors.require("organization", &self.organization);
        if self.start_date.is_none() {
            errors.add("start_date", "is required");
        }
        if let Some(end) = self.end_date {
            if self.is_current {
                errors.add("end_date", "must be empty for a current position");
            } else if self.start_date.map_or(false, |start| end < start) {
                errors.add("end_date", "must not be before start_date");
            }
        }
        errors.into_result()
    }
}

/// 本地化后的个人资料
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub full_name: String,
    pub headline: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub resume_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
}

impl ProfileView {
    pub fn localize(profile: &Profile, locale: Locale) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            headline: pick_owned(locale, &profile.headline_vi, &profile.headline_en),
            bio: pick_owned(locale, &profile.bio_vi, &profile.bio_en),
            avatar_url: profile.avatar_url.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            location: pick_opt(
                locale,
                profile.location_vi.as_deref(),
                profile.location_en.as_deref(),
            ),
            resume_url: profile.resume_url.clone(),
            github_url: profile.github_url.clone(),
            linkedin_url: profile.linkedin_url.clone(),
        }
    }
}

/// 按分类分组的技能
#[derive(Debug, Serialize)]
pub struct SkillGroup {
    pub category: String,
    pub skills: Vec<Skill>,
}

/// 技能按分类分组，分组顺序与首次出现顺序一致
pub fn group_skills(skills: Vec<Skill>) -> Vec<SkillGroup> {
    let mut groups: Vec<SkillGroup> = Vec::new();
    for skill in skills {
        let category = if skill.category.is_empty() {
            "other".to_string()
        } else {
            skill.category.clone()
        };
        match groups.iter_mut().find(|g| g.category == category) {
            Some(group) => group.skills.push(skill),
            None => groups.push(SkillGroup {
                category,
                skills: vec![skill],
            }),
        }
    }
    groups
}

/// 本地化后的时间线条目
#[derive(Debug, Serialize)]
pub struct TimelineView {
    pub id: Uuid,
    pub kind: TimelineKind,
    pub title: String,
    pub organization: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
}

impl TimelineView {
    pub fn localize(entry: &TimelineEntry, locale: Locale) -> Self {
        Self {
            id: entry.id,
            kind: entry.kind,
            title: pick_owned(locale, &entry.title_vi, &entry.title_en),
            organization: entry.organization.clone(),
            description: pick_opt(
                locale,
                entry.description_vi.as_deref(),
                entry.description_en.as_deref(),
            ),
            start_date: entry.start_date,
            end_date: entry.end_date,
            is_current: entry.is_current,
        }
    }
}

/// 公开的 "关于我" 页面数据
#[derive(Debug, Serialize)]
pub struct AboutPage {
    pub locale: Locale,
    pub profile: Option<ProfileView>,
    pub skills: Vec<SkillGroup>,
    pub timeline: Vec<TimelineView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(name: &str, category: &str) -> Skill {
        Skill {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: category.to_string(),
            level: 80,
            icon: None,
            sort_order: 0,
        }
    }

    fn timeline_draft() -> TimelineDraft {
        TimelineDraft {
            kind: TimelineKind::Work,
            title_vi: "Kỹ sư phần mềm".to_string(),
            title_en: String::new(),
            organization: "Acme".to_string(),
            description_vi: None,
            description_en: None,
            start_date: NaiveDate::from_ymd_opt(2021, 3, 1),
            end_date: None,
            is_current: true,
            sort_order: 0,
        }
    }

    #[test]
    fn test_group_skills_keeps_first_seen_order() {
        let groups = group_skills(vec![
            skill("Rust", "backend"),
            skill("React", "frontend"),
            skill("Postgres", "backend"),
            skill("Figma", ""),
        ]);
        let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(names, vec!["backend", "frontend", "other"]);
        assert_eq!(groups[0].skills.len(), 2);
    }

    #[test]
    fn test_skill_level_range() {
        let mut draft = SkillDraft {
            name: "Rust".to_string(),
            category: "backend".to_string(),
            level: 101,
            icon: None,
            sort_order: 0,
        };
        assert!(draft.validate().is_err());
        draft.level = 100;
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_timeline_current_has_no_end_date() {
        let mut draft = timeline_draft();
        assert!(draft.validate().is_ok());

        draft.end_date = NaiveDate::from_ymd_opt(2023, 1, 1);
        let err = draft.validate().unwrap_err();
        assert_eq!(err.errors[0].field, "end_date");
    }

    #[test]
    fn test_timeline_end_before_start() {
        let mut draft = timeline_draft();
        draft.is_current = false;
        draft.end_date = NaiveDate::from_ymd_opt(2020, 1, 1);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_timeline_missing_start_date_is_field_error() {
        let draft: TimelineDraft = serde_json::from_value(serde_json::json!({
            "title_en": "Engineer",
            "organization": "Acme"
        }))
        .unwrap();
        let err = draft.validate().unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].field, "start_date");
    }

    #[test]
    fn test_profile_missing_name_is_field_error() {
        let draft: ProfileDraft =
            serde_json::from_value(serde_json::json!({ "headline_vi": "Kỹ sư" })).unwrap();
        let err = draft.validate().unwrap_err();
        assert_eq!(err.errors[0].field, "full_name");
    }

    #[test]
    fn test_profile_draft_validation() {
        let mut draft: ProfileDraft = serde_json::from_value(serde_json::json!({
            "full_name": "  Nguyễn Văn A ",
            "headline_en": "Backend engineer",
            "email": "not-an-email",
            "github_url": "   "
        }))
        .unwrap();
        draft.normalize();
        assert_eq!(draft.full_name, "Nguyễn Văn A");
        assert_eq!(draft.github_url, None);

        let err = draft.validate().unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].field, "email");
    }

    #[test]
    fn test_profile_view_falls_back() {
        let profile = Profile {
            id: Uuid::new_v4(),
            full_name: "Nguyễn Văn A".to_string(),
            headline_vi: "Kỹ sư backend".to_string(),
            headline_en: String::new(),
            bio_vi: "Xin chào".to_string(),
            bio_en: "Hello".to_string(),
            avatar_url: None,
            email: None,
            phone: None,
            location_vi: Some("Hà Nội".to_string()),
            location_en: Some("Hanoi".to_string()),
            resume_url: None,
            github_url: None,
            linkedin_url: None,
            updated_at: None,
        };
        let view = ProfileView::localize(&profile, Locale::En);
        assert_eq!(view.headline, "Kỹ sư backend");
        assert_eq!(view.bio, "Hello");
        assert_eq!(view.location.as_deref(), Some("Hanoi"));
    }
}
