//! # Perk 服务
//!
//! 基于 Axum 的优惠（perk）资源 CRUD 服务，分层如下：
//! - `app`: 路由、处理器、请求校验与业务服务
//! - `core`: 统一错误映射、响应包装、请求日志中间件
//! - `infrastructure`: 日志初始化、数据库连接与存储后端
//! - `config`: 配置加载

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::build_router;
pub use app::perk::model::{Category, NewPerk, Perk, PerkPatch};
pub use app::perk::store::{PerkStore, StoreError, StoreResult};
pub use crate::core::error::CoreError;
