// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Admin moderation routes.

use crate::error::Result;
use crate::models::{Item, ItemWithOwner};
use crate::services::{AdminStats, ModerationAction};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Admin routes. Both `require_auth` and `require_admin` are applied in
/// routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/stats", get(get_stats))
        .route(
            "/api/admin/items/pending",
            get(get_pending_items).post(moderate_item),
        )
        .route("/api/admin/items/{id}", delete(remove_item))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<AdminStats>> {
    Ok(Json(state.admin.stats().await?))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PendingItemsResponse {
    pub items: Vec<ItemWithOwner>,
}

async fn get_pending_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PendingItemsResponse>> {
    let items = state.admin.pending_items().await?;
    Ok(Json(PendingItemsResponse { items }))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ModerateRequest {
    #[validate(length(min = 1))]
    pub item_id: String,
    pub action: ModerationAction,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ModerateResponse {
    pub item: Item,
}

/// Approve or reject a pending listing.
async fn moderate_item(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ModerateRequest>,
) -> Result<Json<ModerateResponse>> {
    body.validate()?;

    let item = match body.action {
        ModerationAction::Approve => state.admin.approve_item(&body.item_id).await?,
        ModerationAction::Reject => state.admin.reject_item(&body.item_id, body.reason).await?,
    };

    Ok(Json(ModerateResponse { item }))
}

async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.admin.remove_item(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
