#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use perk_service::build_router;
use perk_service::infrastructure::memory_store::InMemoryPerkStore;
use std::sync::Arc;
use tower::ServiceExt;

pub fn app() -> Router {
    build_router(Arc::new(InMemoryPerkStore::new()))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("response")
}

pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    json_request("POST", uri, body)
}

pub fn patch_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    json_request("PATCH", uri, body)
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn get(uri: &str) -> Request<Body> {
    empty_request("GET", uri)
}

pub fn delete(uri: &str) -> Request<Body> {
    empty_request("DELETE", uri)
}
