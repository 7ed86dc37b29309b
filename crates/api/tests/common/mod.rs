#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};
use serde_json::json;

use agora_api::auth::token::JwtConfig;
use agora_api::config::{ServerConfig, StorageBackend};
use agora_api::router::build_app_router;
use agora_api::state::AppState;
use agora_events::EventBus;
use agora_service::{Repositories, Services};

pub const COMMUNITY: i64 = 1;
pub const AUTHOR: i64 = 10;
pub const EDITOR: i64 = 11;
pub const READER: i64 = 12;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` backed by in-memory storage.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        storage: StorageBackend::Memory,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            leeway_secs: 0,
        },
    }
}

/// Build the full application router over a fresh in-memory store, using the
/// same middleware stack as production.
pub fn build_test_app() -> Router {
    let config = test_config();
    let state = AppState::new(
        Services::new(Repositories::in_memory()),
        None,
        Arc::new(config.clone()),
        Arc::new(EventBus::default()),
    );
    build_app_router(state, &config)
}

/// Sign a token the way the external identity provider would.
pub fn signed_token(user_id: i64, exp: u64, secret: &str) -> String {
    encode(
        &Header::default(),
        &json!({ "sub": user_id, "exp": exp }),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// A bearer token for `user_id` valid for fifteen minutes.
pub fn token(user_id: i64) -> String {
    signed_token(user_id, get_current_timestamp() + 900, TEST_SECRET)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user_id: Option<i64>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("authorization", format!("Bearer {}", token(user_id)));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: Router, uri: &str, user_id: i64) -> Response<Body> {
    send(app, Method::GET, uri, Some(user_id), None).await
}

/// GET with a raw `Authorization` header value.
pub async fn get_with_authorization(app: Router, uri: &str, value: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", value)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(
    app: Router,
    uri: &str,
    user_id: i64,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(user_id), Some(body)).await
}

/// POST without a body (publish, like, restore).
pub async fn post_empty(app: Router, uri: &str, user_id: i64) -> Response<Body> {
    send(app, Method::POST, uri, Some(user_id), None).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    user_id: i64,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(user_id), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, user_id: i64) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(user_id), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create and publish a post by [`AUTHOR`], returning its id.
pub async fn published_post(app: &Router, title: &str, content: &str) -> i64 {
    let response = post_json(
        app.clone(),
        &format!("/api/v1/communities/{COMMUNITY}/posts"),
        AUTHOR,
        serde_json::json!({ "title": title, "content": content }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    post_empty(app.clone(), &format!("/api/v1/posts/{id}/publish"), AUTHOR).await;
    id
}

/// Create a comment on `post_id`, returning its id.
pub async fn comment(
    app: &Router,
    post_id: i64,
    user_id: i64,
    content: &str,
    parent_id: Option<i64>,
) -> i64 {
    let response = post_json(
        app.clone(),
        &format!("/api/v1/posts/{post_id}/comments"),
        user_id,
        serde_json::json!({ "content": content, "parent_id": parent_id }),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
