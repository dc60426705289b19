// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use rewear::config::Config;
use rewear::db::{FirestoreDb, MemoryDb};
use rewear::middleware::auth::create_jwt;
use rewear::models::{Item, ItemStatus, User};
use rewear::routes::create_router;
use rewear::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const T0: &str = "2026-01-01T00:00:00.000Z";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app backed by in-memory storage.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();
    create_test_app_with_config(config)
}

fn create_test_app_with_config(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, Arc::new(MemoryDb::new())));
    (create_router(state.clone()), state)
}

/// Insert a user directly, bypassing password hashing.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState, id: &str, points: u32, is_admin: bool) -> User {
    let user = User {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        password_hash: "not-a-real-hash".to_string(),
        first_name: id.to_string(),
        last_name: "Tester".to_string(),
        avatar_url: None,
        bio: None,
        location: None,
        points,
        rating: 5.0,
        total_swaps: 0,
        is_admin,
        created_at: T0.to_string(),
        updated_at: T0.to_string(),
    };
    state.db.put_user(&user).await.unwrap();
    user
}

/// Insert an item directly with the given status and price.
#[allow(dead_code)]
pub async fn seed_item(
    state: &AppState,
    id: &str,
    owner: &str,
    status: ItemStatus,
    points: u32,
) -> Item {
    let item = Item {
        id: id.to_string(),
        user_id: owner.to_string(),
        title: format!("Item {}", id),
        description: "Vintage denim jacket".to_string(),
        category: "Outerwear".to_string(),
        garment_type: "Jacket".to_string(),
        size: "M".to_string(),
        condition: "Good".to_string(),
        points,
        tags: vec!["denim".to_string()],
        images: vec![],
        status,
        available: true,
        views: 0,
        likes: 0,
        rejection_reason: None,
        created_at: T0.to_string(),
        updated_at: T0.to_string(),
    };
    state.db.put_item(&item).await.unwrap();
    item
}

/// Bearer token for a user ID, signed with the test key.
#[allow(dead_code)]
pub fn bearer(state: &AppState, user_id: &str) -> String {
    format!(
        "Bearer {}",
        create_jwt(user_id, &state.config.jwt_signing_key).unwrap()
    )
}

/// Build a JSON request, optionally authenticated.
#[allow(dead_code)]
pub fn json_request(
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and decode the response body.
///
/// Empty bodies decode as `Null`; non-JSON bodies (extractor rejections)
/// come back as a JSON string.
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}
