//! Shared helpers for router integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use confhub_axum::bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap};
use confhub_axum::routes::create_router;

/// Router over an in-memory store, plus the notifier for observing events.
pub async fn test_app() -> (Router, tokio::sync::broadcast::Receiver<confhub_core::ParameterChangeEvent>) {
    let ctx: AxumContext = bootstrap(&ServerConfig::with_defaults().with_in_memory_store())
        .await
        .expect("in-memory bootstrap");
    let events = ctx.notifier.receiver();
    (create_router(ctx, &CorsConfig::AllowAll), events)
}

pub fn request(method: &str, uri: &str, user: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("userId", user);
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send and expect 200 with a JSON body.
pub async fn send_ok(app: &Router, req: Request<Body>) -> serde_json::Value {
    let response = send(app, req).await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

/// Sort a JSON array of `{name, value}` objects by name.
pub fn sorted_by_name(value: serde_json::Value) -> Vec<serde_json::Value> {
    let mut items = value.as_array().cloned().unwrap_or_default();
    items.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));
    items
}
