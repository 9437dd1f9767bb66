//! 核心响应处理模块

use serde::Serialize;

/// 单个资源的包装：`{"perk": {...}}`
#[derive(Debug, Serialize)]
pub struct PerkEnvelope<T> {
    pub perk: T,
}

impl<T> PerkEnvelope<T> {
    pub fn new(perk: T) -> Self {
        Self { perk }
    }
}

/// 删除成功的应答：`{"ok": true}`
#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: &'static str,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(storage: &'static str) -> Self {
        Self {
            status: "healthy",
            storage,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
