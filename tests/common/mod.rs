//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use noui_api::config::ApiConfig;
use noui_api::HttpServer;

/// A router over a fresh server with default configuration.
pub fn app() -> Router {
    HttpServer::new(ApiConfig::default()).router()
}

pub fn app_with(config: ApiConfig) -> Router {
    HttpServer::new(config).router()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(path: &str, client: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .header("x-forwarded-for", client)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(path: &str, client: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("x-forwarded-for", client)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn header_str<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}
