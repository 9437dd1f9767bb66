//! 应用层

pub mod perk;

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::core::middleware::request_logging_middleware;
use perk::{handler::AppState, service::PerkService, store::PerkStore};

/// 组装路由与中间件
pub fn build_router(store: Arc<dyn PerkStore>) -> Router {
    let state = AppState {
        perk_service: PerkService::new(store),
    };

    Router::new()
        .route("/health", get(perk::handler::health_check))
        .merge(perk::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
