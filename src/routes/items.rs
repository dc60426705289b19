// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Catalogue routes: browsing is public, mutations need a session.

use crate::error::Result;
use crate::middleware::auth::{optional_user, AuthUser};
use crate::models::{Item, ItemWithOwner, Report};
use crate::services::{BrowseFilters, NewItem};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Routes readable without a session.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/items", get(list_items))
        .route("/api/items/featured", get(featured_items))
        .route("/api/items/{id}", get(get_item))
}

/// Routes that need an authenticated user.
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/items", post(create_item))
        .route("/api/items/{id}", delete(delete_item))
        .route("/api/items/{id}/like", post(toggle_like))
        .route("/api/items/{id}/report", post(report_item))
}

// ─── Browsing ────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ItemsQuery {
    category: Option<String>,
    condition: Option<String>,
    size: Option<String>,
    search: Option<String>,
    /// 1-based page number
    page: Option<usize>,
    limit: Option<usize>,
}

/// Paginated catalogue response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ItemsResponse {
    pub items: Vec<ItemWithOwner>,
    pub page: usize,
    pub limit: usize,
    /// Whether another page may follow
    pub has_more: bool,
}

async fn list_items(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ItemsQuery>,
) -> Result<Json<ItemsResponse>> {
    let filters = BrowseFilters {
        category: params.category,
        condition: params.condition,
        size: params.size,
        search: params.search,
        page: params.page,
        limit: params.limit,
    };
    let (page, limit) = filters.page_and_limit();

    let items = state.items.browse(filters).await?;
    let has_more = items.len() == limit;

    Ok(Json(ItemsResponse {
        items,
        page,
        limit,
        has_more,
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FeaturedResponse {
    pub items: Vec<ItemWithOwner>,
}

async fn featured_items(State(state): State<Arc<AppState>>) -> Result<Json<FeaturedResponse>> {
    let items = state.items.featured().await?;
    Ok(Json(FeaturedResponse { items }))
}

async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<ItemWithOwner>> {
    let viewer = optional_user(&jar, &headers, &state.config.jwt_signing_key);
    Ok(Json(state.items.view_item(&id, viewer.as_deref()).await?))
}

// ─── Listing management ──────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub garment_type: String,
    #[validate(length(min = 1, max = 20))]
    pub size: String,
    #[validate(length(min = 1, max = 20))]
    pub condition: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub tags: Vec<String>,
}

async fn create_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>)> {
    body.validate()?;

    let item = state
        .items
        .create_item(
            &user.user_id,
            NewItem {
                title: body.title,
                description: body.description,
                category: body.category,
                garment_type: body.garment_type,
                size: body.size,
                condition: body.condition,
                tags: body.tags,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.items.delete_item(&id, &user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Engagement ──────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LikeResponse {
    pub liked: bool,
    pub likes: u32,
}

async fn toggle_like(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>> {
    let like = state.items.toggle_like(&id, &user.user_id).await?;
    Ok(Json(LikeResponse {
        liked: like.liked,
        likes: like.likes,
    }))
}

#[derive(Deserialize, Validate)]
pub struct ReportRequest {
    #[validate(length(min = 1, max = 200))]
    pub reason: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

async fn report_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<ReportRequest>,
) -> Result<(StatusCode, Json<Report>)> {
    body.validate()?;

    let report = state
        .items
        .report_item(&id, &user.user_id, &body.reason, body.description)
        .await?;

    Ok((StatusCode::CREATED, Json(report)))
}
