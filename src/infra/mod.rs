//! 基础设施层
//!
//! 后端 REST / 认证 / 存储客户端

pub mod backend;
pub mod query;

pub use backend::{Auth, BackendClient, BackendError};
pub use query::Query;
