//! Perk 资源：模型、校验、服务与 HTTP 处理器

pub mod handler;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

use axum::{routing::get, Router};

use handler::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/perks", get(handler::list_perks).post(handler::create_perk))
        .route(
            "/perks/:id",
            get(handler::get_perk)
                .patch(handler::update_perk)
                .delete(handler::delete_perk),
        )
}
