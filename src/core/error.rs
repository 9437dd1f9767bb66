//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub const PERK_NOT_FOUND: &str = "Perk not found";
pub const DUPLICATE_PERK: &str = "Duplicate perk for this merchant";

/// 核心错误类型
///
/// 处理器只返回这一种错误，由 [`IntoResponse`] 统一映射为状态码。
#[derive(Debug, Error)]
pub enum CoreError {
    /// 请求体或查询参数不符合 schema
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// 存储层唯一约束冲突（仅在创建时识别）
    #[error("{0}")]
    DuplicateKey(String),
    /// 存储层暂不可用（健康检查）
    #[error("{0}")]
    Unavailable(String),
    /// 其余未分类错误，交给统一的 500 处理
    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn perk_not_found() -> Self {
        Self::NotFound(PERK_NOT_FOUND.to_string())
    }

    pub fn duplicate_perk() -> Self {
        Self::DuplicateKey(DUPLICATE_PERK.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::DuplicateKey(_) => StatusCode::CONFLICT,
            CoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CoreError::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, message) = match self {
            CoreError::Validation(msg) => ("VALIDATION_ERROR", msg),
            CoreError::NotFound(msg) => ("NOT_FOUND", msg),
            CoreError::DuplicateKey(msg) => ("DUPLICATE_KEY", msg),
            CoreError::Unavailable(msg) => ("SERVICE_UNAVAILABLE", msg),
            CoreError::Unclassified(err) => {
                error!("Unhandled error: {:#}", err);
                (
                    "INTERNAL_SERVER_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let error_response = ErrorResponse {
            error: error_code.to_string(),
            message,
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, axum::Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: CoreError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn maps_each_kind_to_its_status() {
        let (status, body) = body_json(CoreError::validation("\"title\" is required")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "\"title\" is required");
        assert_eq!(body["code"], 400);

        let (status, body) = body_json(CoreError::perk_not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], PERK_NOT_FOUND);

        let (status, body) = body_json(CoreError::duplicate_perk()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "DUPLICATE_KEY");
    }

    #[tokio::test]
    async fn unclassified_errors_hide_the_cause() {
        let err = CoreError::from(anyhow::anyhow!("connection reset by peer"));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }
}
