// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Security headers middleware.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Headers sent on every response.
const STATIC_HEADERS: [(&str, &str); 5] = [
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "DENY"),
    (
        "Content-Security-Policy",
        "default-src 'none'; frame-ancestors 'none'",
    ),
    ("Referrer-Policy", "strict-origin-when-cross-origin"),
    ("Cache-Control", "no-store"),
];

const HSTS: &str = "max-age=31536000; includeSubDomains";

/// Add security headers to all responses.
///
/// HSTS is only sent when the frontend is served over HTTPS.
pub async fn add_security_headers(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in STATIC_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    if state.config.secure_cookies() {
        headers.insert("Strict-Transport-Security", HeaderValue::from_static(HSTS));
    }

    response
}
