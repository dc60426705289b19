// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! API routes for the signed-in user's own account.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Item, UserProfile};
use crate::services::ProfileUpdate;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).patch(update_me))
        .route("/api/me/items", get(get_my_items))
}

// ─── User Profile ────────────────────────────────────────────

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let user = state.accounts.get_user(&user.user_id).await?;
    Ok(Json(UserProfile::from(&user)))
}

/// Profile fields the user may change. Absent fields are left alone; an
/// empty string clears an optional field.
#[derive(Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,
    #[validate(length(max = 2048))]
    pub avatar_url: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>> {
    body.validate()?;

    let updated = state
        .accounts
        .update_profile(
            &user.user_id,
            ProfileUpdate {
                first_name: body.first_name,
                last_name: body.last_name,
                avatar_url: body.avatar_url,
                bio: body.bio,
                location: body.location,
            },
        )
        .await?;

    Ok(Json(UserProfile::from(&updated)))
}

// ─── My Listings ─────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MyItemsResponse {
    pub items: Vec<Item>,
}

/// Every listing the user owns, including pending and rejected ones.
async fn get_my_items(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MyItemsResponse>> {
    let items = state.items.items_for_user(&user.user_id).await?;
    Ok(Json(MyItemsResponse { items }))
}
