// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Email/password authentication routes.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::config::Config;
use crate::error::Result;
use crate::middleware::auth::{create_jwt, AUTH_COOKIE, SESSION_TTL_SECS};
use crate::models::{User, UserProfile};
use crate::services::SignUp;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/signup", post(sign_up))
        .route("/api/auth/signin", post(sign_in))
        .route("/api/auth/signout", post(sign_out))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
}

#[derive(Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Session returned after sign-up or sign-in.
///
/// The token is also set as an HTTP-only cookie; it is repeated in the body
/// for clients that send it as a bearer token.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

fn session_cookie(config: &Config, token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies())
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64))
        .build()
}

fn start_session(state: &AppState, jar: CookieJar, user: &User) -> Result<(CookieJar, Json<AuthResponse>)> {
    let token = create_jwt(&user.id, &state.config.jwt_signing_key)?;
    let jar = jar.add(session_cookie(&state.config, token.clone()));

    Ok((
        jar,
        Json(AuthResponse {
            user: UserProfile::from(user),
            token,
        }),
    ))
}

/// Register a new account and start a session.
async fn sign_up(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<SignUpRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    body.validate()?;

    let user = state
        .accounts
        .sign_up(SignUp {
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
        })
        .await?;

    let (jar, response) = start_session(&state, jar, &user)?;
    Ok((StatusCode::CREATED, jar, response))
}

async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<SignInRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    body.validate()?;

    let user = state.accounts.sign_in(&body.email, &body.password).await?;
    start_session(&state, jar, &user)
}

/// Clear the session cookie. Removal attributes match creation attributes.
async fn sign_out(State(state): State<Arc<AppState>>, jar: CookieJar) -> (StatusCode, CookieJar) {
    let removal = Cookie::build((AUTH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookies())
        .build();

    (StatusCode::NO_CONTENT, jar.remove(removal))
}
