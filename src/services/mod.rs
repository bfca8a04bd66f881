//! 服务层模块
//!
//! 包含表仓储与上传逻辑

pub mod repository;
pub mod upload;

pub use repository::Repository;
