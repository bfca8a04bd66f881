//! 博客文章

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::listing::{contains_ci, distinct_sorted, matches_query, Page};
use super::locale::{pick_owned, Locale};
use super::record::{normalize_list, trim, trim_opt, Draft, Record};
use super::validation::{is_valid_slug, slugify, ValidationErrors};

/// 阅读速度（词/分钟）
const WORDS_PER_MINUTE: usize = 200;

/// 博客文章（`blog_posts` 表）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub slug: String,
    #[serde(default)]
    pub title_vi: String,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub excerpt_vi: String,
    #[serde(default)]
    pub excerpt_en: String,
    #[serde(default)]
    pub content_vi: String,
    #[serde(default)]
    pub content_en: String,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for BlogPost {
    const TABLE: &'static str = "blog_posts";
    const ORDER: &'static str = "published_at.desc.nullsfirst,created_at.desc";
    const RETAINS_ON_UPDATE: bool = true;
    type Draft = BlogPostDraft;

    fn key(&self) -> String {
        self.id.to_string()
    }

    /// 编辑时未传发布时间则沿用原值，避免重新发布
    fn retain_on_update(&self, draft: &mut BlogPostDraft) {
        if draft.published_at.is_none() {
            draft.published_at = self.published_at;
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlogPostDraft {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title_vi: String,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub excerpt_vi: String,
    #[serde(default)]
    pub excerpt_en: String,
    #[serde(default)]
    pub content_vi: String,
    #[serde(default)]
    pub content_en: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Draft for BlogPostDraft {
    fn normalize(&mut self) {
        trim(&mut self.title_vi);
        trim(&mut self.title_en);
        trim(&mut self.slug);
        trim_opt(&mut self.cover_image);
        normalize_list(&mut self.tags);
        if self.slug.is_empty() {
            let source = if self.title_en.is_empty() {
                &self.title_vi
            } else {
                &self.title_en
            };
            self.slug = slugify(source);
        }
        if self.is_published && self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_either("title", &self.title_vi, &self.title_en);
        errors.require_either("content", &self.content_vi, &self.content_en);
        if !is_valid_slug(&self.slug) {
            errors.add("slug", "must contain only lowercase letters, digits and single hyphens");
        }
        errors.into_result()
    }
}

/// 预计阅读时间（分钟），至少 1 分钟
pub fn reading_time_minutes(content: &str) -> usize {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// 公开列表的过滤与分页参数
#[derive(Debug, Default, Deserialize)]
pub struct BlogFilter {
    pub tag: Option<String>,
    pub q: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl BlogFilter {
    pub fn matches(&self, post: &BlogPost) -> bool {
        if let Some(tag) = self.tag.as_deref().filter(|t| !t.trim().is_empty()) {
            if !contains_ci(&post.tags, tag) {
                return false;
            }
        }
        match self.q.as_deref() {
            Some(q) => matches_query(
                q,
                [
                    post.title_vi.as_str(),
                    post.title_en.as_str(),
                    post.excerpt_vi.as_str(),
                    post.excerpt_en.as_str(),
                ],
            ),
            None => true,
        }
    }

    /// 过滤后分页
    pub fn apply(&self, posts: Vec<BlogPost>) -> Page<BlogPost> {
        let matched: Vec<BlogPost> = posts.into_iter().filter(|p| self.matches(p)).collect();
        Page::paginate(matched, self.page, self.per_page)
    }
}

/// 全部标签
pub fn tags(posts: &[BlogPost]) -> Vec<String> {
    distinct_sorted(posts.iter().flat_map(|p| p.tags.iter().map(String::as_str)))
}

/// 列表卡片
#[derive(Debug, Serialize)]
pub struct BlogPostCard {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub reading_time_minutes: usize,
}

impl BlogPostCard {
    pub fn localize(post: &BlogPost, locale: Locale) -> Self {
        let content = pick_owned(locale, &post.content_vi, &post.content_en);
        Self {
            id: post.id,
            slug: post.slug.clone(),
            title: pick_owned(locale, &post.title_vi, &post.title_en),
            excerpt: pick_owned(locale, &post.excerpt_vi, &post.excerpt_en),
            cover_image: post.cover_image.clone(),
            tags: post.tags.clone(),
            published_at: post.published_at,
            reading_time_minutes: reading_time_minutes(&content),
        }
    }
}

/// 详情页
#[derive(Debug, Serialize)]
pub struct BlogPostDetail {
    #[serde(flatten)]
    pub card: BlogPostCard,
    pub content: String,
}

impl BlogPostDetail {
    pub fn localize(post: &BlogPost, locale: Locale) -> Self {
        Self {
            card: BlogPostCard::localize(post, locale),
            content: pick_owned(locale, &post.content_vi, &post.content_en),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title_en: &str, tags: &[&str]) -> BlogPost {
        BlogPost {
            id: Uuid::new_v4(),
            slug: slugify(title_en),
            title_vi: String::new(),
            title_en: title_en.to_string(),
            excerpt_vi: "Tóm tắt".to_string(),
            excerpt_en: "Excerpt".to_string(),
            content_vi: String::new(),
            content_en: "word ".repeat(450),
            cover_image: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_published: true,
            published_at: None,
            created_at: None,
        }
    }

    #[test]
    fn test_update_keeps_stored_publication_date() {
        let mut stored = post("Hello", &[]);
        let original = "2024-01-15T08:00:00Z".parse::<DateTime<Utc>>().unwrap();
        stored.published_at = Some(original);

        let mut draft: BlogPostDraft = serde_json::from_value(serde_json::json!({
            "title_en": "Hello again",
            "content_en": "Edited",
            "is_published": true
        }))
        .unwrap();
        stored.retain_on_update(&mut draft);
        draft.normalize();
        assert_eq!(draft.published_at, Some(original));
    }

    #[test]
    fn test_first_publish_is_stamped() {
        let mut draft: BlogPostDraft = serde_json::from_value(serde_json::json!({
            "title_en": "Hello",
            "content_en": "Body",
            "is_published": true
        }))
        .unwrap();
        post("Hello", &[]).retain_on_update(&mut draft);
        draft.normalize();
        assert!(draft.published_at.is_some());
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time_minutes(""), 1);
        assert_eq!(reading_time_minutes(&"a ".repeat(200)), 1);
        assert_eq!(reading_time_minutes(&"a ".repeat(201)), 2);
    }

    #[test]
    fn test_filter_by_tag_then_paginate() {
        let posts: Vec<BlogPost> = (0..12)
            .map(|i| {
                let tags: &[&str] = if i % 2 == 0 { &["Rust"] } else { &["Life"] };
                post(&format!("Post {}", i), tags)
            })
            .collect();

        let filter = BlogFilter {
            tag: Some("rust".to_string()),
            per_page: Some(4),
            page: Some(2),
            ..Default::default()
        };
        let page = filter.apply(posts);
        assert_eq!(page.total, 6);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title_en, "Post 8");
    }

    #[test]
    fn test_tags_distinct() {
        let posts = vec![post("A", &["Rust", "axum"]), post("B", &["rust", "Life"])];
        assert_eq!(tags(&posts), vec!["axum", "Life", "Rust"]);
    }

    #[test]
    fn test_publishing_stamps_date() {
        let mut draft: BlogPostDraft = serde_json::from_value(serde_json::json!({
            "title_vi": "Bài viết đầu tiên",
            "content_vi": "Nội dung",
            "is_published": true
        }))
        .unwrap();
        draft.normalize();
        assert_eq!(draft.slug, "bai-viet-dau-tien");
        assert!(draft.published_at.is_some());
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_draft_requires_content() {
        let mut draft: BlogPostDraft = serde_json::from_value(serde_json::json!({
            "title_en": "Empty"
        }))
        .unwrap();
        draft.normalize();
        assert!(draft.published_at.is_none());
        let err = draft.validate().unwrap_err();
        assert_eq!(err.errors[0].field, "content");
    }

    #[test]
    fn test_card_reading_time_uses_localized_content() {
        let card = BlogPostCard::localize(&post("Long read", &[]), Locale::Vi);
        // content_vi 为空，回退英文 450 词
        assert_eq!(card.reading_time_minutes, 3);
        assert_eq!(card.title, "Long read");
        assert_eq!(card.excerpt, "Tóm tắt");
    }
}
