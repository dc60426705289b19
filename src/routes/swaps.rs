// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Swap and redemption routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Item, Swap, SwapStatus, SwapType};
use crate::services::SwapRequest;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Swap routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/swaps",
            get(list_swaps).post(create_swap).patch(update_swap),
        )
        .route("/api/swaps/redeem", post(redeem))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SwapsResponse {
    pub swaps: Vec<Swap>,
}

/// Swaps the user requested or received, newest first.
async fn list_swaps(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SwapsResponse>> {
    let swaps = state.swaps.swaps_for_user(&user.user_id).await?;
    Ok(Json(SwapsResponse { swaps }))
}

fn default_kind() -> SwapType {
    SwapType::Swap
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwapRequest {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: SwapType,
    pub owner_id: Option<String>,
    #[validate(length(min = 1))]
    pub owner_item_id: String,
    pub requester_item_id: Option<String>,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub message: String,
    pub points_used: Option<u32>,
}

async fn create_swap(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateSwapRequest>,
) -> Result<(StatusCode, Json<Swap>)> {
    body.validate()?;

    let swap = state
        .swaps
        .create_swap_request(
            &user.user_id,
            SwapRequest {
                kind: body.kind,
                owner_id: body.owner_id,
                owner_item_id: body.owner_item_id,
                requester_item_id: body.requester_item_id,
                message: body.message,
                points_used: body.points_used,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(swap)))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSwapRequest {
    #[validate(length(min = 1))]
    pub swap_id: String,
    pub status: SwapStatus,
}

async fn update_swap(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdateSwapRequest>,
) -> Result<Json<Swap>> {
    body.validate()?;

    let swap = state
        .swaps
        .update_swap_status(&body.swap_id, body.status, &user.user_id)
        .await?;
    Ok(Json(swap))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    #[validate(length(min = 1))]
    pub item_id: String,
    #[validate(range(min = 1))]
    pub points: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RedeemResponse {
    pub swap: Swap,
    pub item: Item,
    /// Requester balance after the redemption
    pub remaining_points: u32,
}

/// Redeem an item for points in one step.
async fn redeem(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>> {
    body.validate()?;

    let completion = state
        .swaps
        .redeem_with_points(&user.user_id, &body.item_id, body.points)
        .await?;

    Ok(Json(RedeemResponse {
        remaining_points: completion.requester.points,
        swap: completion.swap,
        item: completion.owner_item,
    }))
}
