//! 领域模型模块
//!
//! 纯数据结构，不依赖 axum/tokio

pub mod blog;
pub mod contact;
pub mod listing;
pub mod locale;
pub mod profile;
pub mod project;
pub mod record;
pub mod service;
pub mod settings;
pub mod validation;

// Re-exports for convenience
pub use blog::{BlogFilter, BlogPost, BlogPostCard, BlogPostDetail, BlogPostDraft};
pub use contact::{ContactDraft, ContactMessage, ContactReadPatch};
pub use listing::Page;
pub use locale::Locale;
pub use profile::{AboutPage, Profile, ProfileView, Skill, TimelineEntry, TimelineView};
pub use project::{Project, ProjectCard, ProjectDetail, ProjectDraft, ProjectFilter};
pub use record::{Draft, Record};
pub use service::{Service, ServiceView};
pub use settings::{SettingDraft, SiteSetting};
pub use validation::ValidationErrors;
