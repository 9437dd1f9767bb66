//! Perk 处理器

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, RawQuery, State,
    },
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{
    model::Perk,
    service::PerkService,
    validation::{validate_create, validate_update},
};
use crate::core::{
    error::CoreError,
    response::{Ack, HealthResponse, PerkEnvelope},
};

#[derive(Clone)]
pub struct AppState {
    pub perk_service: PerkService,
}

/// `GET /perks` 的查询参数
#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
}

/// 非 UUID 的标识不可能对应任何记录，按不存在处理
fn parse_perk_id(raw: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(raw).map_err(|_| CoreError::perk_not_found())
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, CoreError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| CoreError::validation(rejection.body_text()))
}

/// 没有查询串时列出全部；带查询串时必须给出 `title`
pub async fn list_perks(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
    query: Result<Query<TitleQuery>, QueryRejection>,
) -> Result<Json<Vec<Perk>>, CoreError> {
    if raw_query.is_none() {
        return Ok(Json(state.perk_service.list_perks().await?));
    }

    let Query(query) = query.map_err(|rejection| CoreError::validation(rejection.body_text()))?;
    let title = query
        .title
        .filter(|title| !title.is_empty())
        .ok_or_else(|| CoreError::validation("title query parameter is required"))?;

    Ok(Json(state.perk_service.find_by_title(&title).await?))
}

pub async fn get_perk(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PerkEnvelope<Perk>>, CoreError> {
    let id = parse_perk_id(&id)?;
    let perk = state.perk_service.get_perk(id).await?;
    Ok(Json(PerkEnvelope::new(perk)))
}

pub async fn create_perk(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<PerkEnvelope<Perk>>), CoreError> {
    let new_perk = validate_create(json_body(payload)?)?;
    let perk = state.perk_service.create_perk(new_perk).await?;
    Ok((StatusCode::CREATED, Json(PerkEnvelope::new(perk))))
}

pub async fn update_perk(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PerkEnvelope<Perk>>, CoreError> {
    // 先校验请求体，再看记录是否存在
    let patch = validate_update(json_body(payload)?)?;
    let id = parse_perk_id(&id)?;
    let perk = state.perk_service.update_perk(id, patch).await?;
    Ok(Json(PerkEnvelope::new(perk)))
}

pub async fn delete_perk(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, CoreError> {
    let id = parse_perk_id(&id)?;
    state.perk_service.delete_perk(id).await?;
    Ok(Json(Ack::ok()))
}

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, CoreError> {
    state.perk_service.health_check().await?;
    Ok(Json(HealthResponse::healthy(state.perk_service.backend_name())))
}
