//! 请求级 extractors
//!
//! 管理员认证、语言解析、cookie 工具、统一 rejection 的 JSON / Query / Path

pub mod auth;
pub mod cookie;
pub mod extract;
pub mod locale;

pub use auth::RequireAdmin;
pub use locale::RequestLocale;
