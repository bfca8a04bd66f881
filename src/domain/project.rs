//! 项目作品

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::listing::{contains_ci, distinct_sorted, matches_query};
use super::locale::{pick_owned, Locale};
use super::record::{normalize_list, trim, trim_opt, Draft, Record};
use super::validation::{is_valid_slug, slugify, ValidationErrors};

/// 项目（`projects` 表）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub slug: String,
    #[serde(default)]
    pub title_vi: String,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub summary_vi: String,
    #[serde(default)]
    pub summary_en: String,
    #[serde(default)]
    pub content_vi: String,
    #[serde(default)]
    pub content_en: String,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub category: String,
    pub demo_url: Option<String>,
    pub repo_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub sort_order: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Project {
    const TABLE: &'static str = "projects";
    type Draft = ProjectDraft;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectDraft {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title_vi: String,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub summary_vi: String,
    #[serde(default)]
    pub summary_en: String,
    #[serde(default)]
    pub content_vi: String,
    #[serde(default)]
    pub content_en: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl Draft for ProjectDraft {
    fn normalize(&mut self) {
        trim(&mut self.title_vi);
        trim(&mut self.title_en);
        trim(&mut self.category);
        trim(&mut self.slug);
        trim_opt(&mut self.cover_image);
        trim_opt(&mut self.demo_url);
        trim_opt(&mut self.repo_url);
        normalize_list(&mut self.tech_stack);
        if self.slug.is_empty() {
            // 英文标题优先，生成的 slug 更易读
            let source = if self.title_en.is_empty() {
                &self.title_vi
            } else {
                &self.title_en
            };
            self.slug = slugify(source);
        }
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_either("title", &self.title_vi, &self.title_en);
        if !is_valid_slug(&self.slug) {
            errors.add("slug", "must contain only lowercase letters, digits and single hyphens");
        }
        errors.url("demo_url", self.demo_url.as_deref());
        errors.url("repo_url", self.repo_url.as_deref());
        errors.into_result()
    }
}

/// 公开列表的过滤条件
#[derive(Debug, Default, Deserialize)]
pub struct ProjectFilter {
    pub category: Option<String>,
    pub tech: Option<String>,
    pub featured: Option<bool>,
    pub q: Option<String>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.trim().is_empty()) {
            if !project.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }
        if let Some(tech) = self.tech.as_deref().filter(|t| !t.trim().is_empty()) {
            if !contains_ci(&project.tech_stack, tech) {
                return false;
            }
        }
        if let Some(featured) = self.featured {
            if project.is_featured != featured {
                return false;
            }
        }
        match self.q.as_deref() {
            Some(q) => matches_query(
                q,
                [
                    project.title_vi.as_str(),
                    project.title_en.as_str(),
                    project.summary_vi.as_str(),
                    project.summary_en.as_str(),
                ],
            ),
            None => true,
        }
    }

    pub fn apply(&self, projects: Vec<Project>) -> Vec<Project> {
        projects.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// 已发布项目的分类列表
pub fn categories(projects: &[Project]) -> Vec<String> {
    distinct_sorted(projects.iter().map(|p| p.category.as_str()))
}

/// 列表卡片
#[derive(Debug, Serialize)]
pub struct ProjectCard {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub cover_image: Option<String>,
    pub tech_stack: Vec<String>,
    pub category: String,
    pub is_featured: bool,
}

impl ProjectCard {
    pub fn localize(project: &Project, locale: Locale) -> Self {
        Self {
            id: project.id,
            slug: project.slug.clone(),
            title: pick_owned(locale, &project.title_vi, &project.title_en),
            summary: pick_owned(locale, &project.summary_vi, &project.summary_en),
            cover_image: project.cover_image.clone(),
            tech_stack: project.tech_stack.clone(),
            category: project.category.clone(),
            is_featured: project.is_featured,
        }
    }
}

/// 详情页
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub card: ProjectCard,
    pub content: String,
    pub demo_url: Option<String>,
    pub repo_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ProjectDetail {
    pub fn localize(project: &Project, locale: Locale) -> Self {
        Self {
            card: ProjectCard::localize(project, locale),
            content: pick_owned(locale, &project.content_vi, &project.content_en),
            demo_url: project.demo_url.clone(),
            repo_url: project.repo_url.clone(),
            created_at: project.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title_en: &str, category: &str, tech: &[&str], featured: bool) -> Project {
        Project {
            id: Uuid::new_v4(),
            slug: slugify(title_en),
            title_vi: format!("Dự án {}", title_en),
            title_en: title_en.to_string(),
            summary_vi: String::new(),
            summary_en: format!("{} summary", title_en),
            content_vi: String::new(),
            content_en: String::new(),
            cover_image: None,
            tech_stack: tech.iter().map(|t| t.to_string()).collect(),
            category: category.to_string(),
            demo_url: None,
            repo_url: None,
            is_featured: featured,
            is_published: true,
            sort_order: 0,
            created_at: None,
        }
    }

    fn fixtures() -> Vec<Project> {
        vec![
            project("Portfolio CMS", "Web", &["Rust", "Axum"], true),
            project("Mobile Wallet", "Mobile", &["Kotlin"], false),
            project("Data Pipeline", "web", &["rust", "Postgres"], false),
        ]
    }

    #[test]
    fn test_filter_by_category_is_case_insensitive() {
        let filter = ProjectFilter {
            category: Some("WEB".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(fixtures()).len(), 2);
    }

    #[test]
    fn test_filter_by_tech_and_featured() {
        let filter = ProjectFilter {
            tech: Some("RUST".to_string()),
            featured: Some(false),
            ..Default::default()
        };
        let result = filter.apply(fixtures());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title_en, "Data Pipeline");
    }

    #[test]
    fn test_filter_by_query_searches_both_languages() {
        let filter = ProjectFilter {
            q: Some("dự án mobile".to_string()),
            ..Default::default()
        };
        let result = filter.apply(fixtures());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, "Mobile");
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = ProjectFilter {
            category: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(fixtures()).len(), 3);
    }

    #[test]
    fn test_categories() {
        assert_eq!(categories(&fixtures()), vec!["Mobile", "Web"]);
    }

    #[test]
    fn test_draft_generates_slug() {
        let mut draft: ProjectDraft = serde_json::from_value(serde_json::json!({
            "title_vi": "Trang cá nhân",
            "tech_stack": ["Rust", " rust ", ""]
        }))
        .unwrap();
        draft.normalize();
        assert_eq!(draft.slug, "trang-ca-nhan");
        assert_eq!(draft.tech_stack, vec!["Rust".to_string()]);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_draft_rejects_bad_slug() {
        let mut draft: ProjectDraft = serde_json::from_value(serde_json::json!({
            "title_en": "Portfolio",
            "slug": "Not A Slug",
            "repo_url": "github.com/x"
        }))
        .unwrap();
        draft.normalize();
        let err = draft.validate().unwrap_err();
        let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["slug", "repo_url"]);
    }

    #[test]
    fn test_detail_localizes_with_fallback() {
        let p = project("Portfolio CMS", "Web", &[], true);
        let detail = ProjectDetail::localize(&p, Locale::Vi);
        assert_eq!(detail.card.title, "Dự án Portfolio CMS");
        // summary_vi 为空，回退英文
        assert_eq!(detail.card.summary, "Portfolio CMS summary");
    }
}
