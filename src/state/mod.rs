//! 运行时状态模块
//!
//! 管理共享的应用状态

pub mod app_state;

pub use app_state::AppState;
