// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! End-to-end swap and redemption tests.
//!
//! Point movements and item state are checked through the store after each
//! request, so a partially applied completion would show up here.

use axum::http::{Method, StatusCode};
use rewear::models::{ItemStatus, SwapStatus};
use serde_json::json;

mod common;

use common::{bearer, json_request, seed_item, seed_user, send};

#[tokio::test]
async fn test_redeem_transfers_points() {
    let (app, state) = common::create_test_app();
    seed_user(&state, "a", 100, false).await;
    seed_user(&state, "b", 0, false).await;
    seed_item(&state, "coat", "b", ItemStatus::Approved, 30).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/swaps/redeem",
            Some(&bearer(&state, "a")),
            Some(json!({"itemId": "coat", "points": 30})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["remainingPoints"], 70);
    assert_eq!(body["swap"]["status"], "completed");
    assert_eq!(body["swap"]["type"], "redeem");
    assert_eq!(body["item"]["status"], "redeemed");

    let a = state.db.get_user("a").await.unwrap().unwrap();
    let b = state.db.get_user("b").await.unwrap().unwrap();
    assert_eq!(a.points, 70);
    assert_eq!(b.points, 30);
    assert_eq!(a.total_swaps, 1);
    assert_eq!(b.total_swaps, 1);

    let item = state.db.get_item("coat").await.unwrap().unwrap();
    assert!(!item.available);
    assert_eq!(item.status, ItemStatus::Redeemed);
}

#[tokio::test]
async fn test_redeem_insufficient_points_changes_nothing() {
    let (app, state) = common::create_test_app();
    seed_user(&state, "a", 20, false).await;
    seed_user(&state, "b", 0, false).await;
    seed_item(&state, "coat", "b", ItemStatus::Approved, 30).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/swaps/redeem",
            Some(&bearer(&state, "a")),
            Some(json!({"itemId": "coat", "points": 30})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient points");
    assert_eq!(body["code"], "insufficient_points");

    assert_eq!(state.db.get_user("a").await.unwrap().unwrap().points, 20);
    assert_eq!(state.db.get_user("b").await.unwrap().unwrap().points, 0);
    let item = state.db.get_item("coat").await.unwrap().unwrap();
    assert!(item.available);
    assert_eq!(item.status, ItemStatus::Approved);
    assert!(state.db.swaps_for_user("a").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_redeem_price_mismatch_and_missing_item() {
    let (app, state) = common::create_test_app();
    seed_user(&state, "a", 100, false).await;
    seed_user(&state, "b", 0, false).await;
    seed_item(&state, "coat", "b", ItemStatus::Approved, 30).await;
    let token = bearer(&state, "a");

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/swaps/redeem",
            Some(&token),
            Some(json!({"itemId": "coat", "points": 10})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/swaps/redeem",
            Some(&token),
            Some(json!({"itemId": "nope", "points": 30})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Item not found");

    assert_eq!(state.db.get_user("a").await.unwrap().unwrap().points, 100);
}

#[tokio::test]
async fn test_item_swap_lifecycle() {
    let (app, state) = common::create_test_app();
    seed_user(&state, "a", 3, false).await;
    seed_user(&state, "b", 4, false).await;
    seed_item(&state, "wanted", "b", ItemStatus::Approved, 30).await;
    seed_item(&state, "offered", "a", ItemStatus::Approved, 20).await;
    let a_token = bearer(&state, "a");
    let b_token = bearer(&state, "b");

    let (status, swap) = send(
        &app,
        json_request(
            Method::POST,
            "/api/swaps",
            Some(&a_token),
            Some(json!({
                "type": "swap",
                "ownerId": "b",
                "ownerItemId": "wanted",
                "requesterItemId": "offered",
                "message": "Trade?"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{swap}");
    assert_eq!(swap["status"], "pending");
    let swap_id = swap["id"].as_str().unwrap().to_string();

    // Only the owner may approve.
    let (status, _) = send(
        &app,
        json_request(
            Method::PATCH,
            "/api/swaps",
            Some(&a_token),
            Some(json!({"swapId": swap_id, "status": "approved"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        json_request(
            Method::PATCH,
            "/api/swaps",
            Some(&b_token),
            Some(json!({"swapId": swap_id, "status": "approved"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (status, body) = send(
        &app,
        json_request(
            Method::PATCH,
            "/api/swaps",
            Some(&a_token),
            Some(json!({"swapId": swap_id, "status": "completed"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    let a = state.db.get_user("a").await.unwrap().unwrap();
    let b = state.db.get_user("b").await.unwrap().unwrap();
    assert_eq!((a.points, a.total_swaps), (13, 1));
    assert_eq!((b.points, b.total_swaps), (14, 1));

    for id in ["wanted", "offered"] {
        let item = state.db.get_item(id).await.unwrap().unwrap();
        assert!(!item.available);
        assert_eq!(item.status, ItemStatus::Swapped);
    }

    // Completed swaps are terminal.
    let (status, _) = send(
        &app,
        json_request(
            Method::PATCH,
            "/api/swaps",
            Some(&b_token),
            Some(json!({"swapId": swap_id, "status": "rejected"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, listed) = send(
        &app,
        json_request(Method::GET, "/api/swaps", Some(&b_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["swaps"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_request_moves_no_points() {
    let (app, state) = common::create_test_app();
    seed_user(&state, "a", 100, false).await;
    seed_user(&state, "b", 0, false).await;
    seed_item(&state, "coat", "b", ItemStatus::Approved, 30).await;

    let (status, swap) = send(
        &app,
        json_request(
            Method::POST,
            "/api/swaps",
            Some(&bearer(&state, "a")),
            Some(json!({"type": "redeem", "ownerItemId": "coat"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(swap["pointsUsed"], 30);

    let (status, body) = send(
        &app,
        json_request(
            Method::PATCH,
            "/api/swaps",
            Some(&bearer(&state, "b")),
            Some(json!({"swapId": swap["id"], "status": "rejected"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");

    assert_eq!(state.db.get_user("a").await.unwrap().unwrap().points, 100);
    assert_eq!(state.db.get_user("b").await.unwrap().unwrap().points, 0);
    assert!(state.db.get_item("coat").await.unwrap().unwrap().available);

    // The item is free for a new request once the old one is closed.
    let swaps = state.db.swaps_for_item("coat").await.unwrap();
    assert!(swaps.iter().all(|s| s.status == SwapStatus::Rejected));
}

#[tokio::test]
async fn test_request_validation() {
    let (app, state) = common::create_test_app();
    seed_user(&state, "a", 0, false).await;
    seed_user(&state, "b", 0, false).await;
    seed_item(&state, "coat", "b", ItemStatus::Approved, 30).await;
    seed_item(&state, "draft", "b", ItemStatus::Pending, 30).await;
    let token = bearer(&state, "a");

    // Own item.
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/swaps",
            Some(&bearer(&state, "b")),
            Some(json!({"type": "redeem", "ownerItemId": "coat"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Not yet approved.
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/swaps",
            Some(&token),
            Some(json!({"type": "redeem", "ownerItemId": "draft"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Swap without an offered item.
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/swaps",
            Some(&token),
            Some(json!({"type": "swap", "ownerItemId": "coat"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Redemption the requester cannot afford.
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/swaps",
            Some(&token),
            Some(json!({"type": "redeem", "ownerItemId": "coat"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "insufficient_points");

    let (status, body) = send(
        &app,
        json_request(
            Method::PATCH,
            "/api/swaps",
            Some(&token),
            Some(json!({"swapId": "missing", "status": "completed"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Swap not found");
}

#[tokio::test]
async fn test_concurrent_redemptions_sell_item_once() {
    let (app, state) = common::create_test_app();
    seed_user(&state, "b", 0, false).await;
    seed_item(&state, "coat", "b", ItemStatus::Approved, 30).await;
    for buyer in ["a1", "a2", "a3", "a4"] {
        seed_user(&state, buyer, 100, false).await;
    }

    let mut handles = Vec::new();
    for buyer in ["a1", "a2", "a3", "a4"] {
        let app = app.clone();
        let token = bearer(&state, buyer);
        handles.push(tokio::spawn(async move {
            send(
                &app,
                json_request(
                    Method::POST,
                    "/api/swaps/redeem",
                    Some(&token),
                    Some(json!({"itemId": "coat", "points": 30})),
                ),
            )
            .await
            .0
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() == StatusCode::OK {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(state.db.get_user("b").await.unwrap().unwrap().points, 30);
}

#[tokio::test]
async fn test_requester_cannot_complete_unapproved_swap() {
    let (app, state) = common::create_test_app();
    seed_user(&state, "a", 0, false).await;
    seed_user(&state, "b", 0, false).await;
    seed_item(&state, "wanted", "b", ItemStatus::Approved, 30).await;
    seed_item(&state, "offered", "a", ItemStatus::Approved, 20).await;
    let a_token = bearer(&state, "a");

    let (status, swap) = send(
        &app,
        json_request(
            Method::POST,
            "/api/swaps",
            Some(&a_token),
            Some(json!({
                "type": "swap",
                "ownerItemId": "wanted",
                "requesterItemId": "offered"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{swap}");
    let swap_id = swap["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        json_request(
            Method::PATCH,
            "/api/swaps",
            Some(&a_token),
            Some(json!({"swapId": swap_id, "status": "completed"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stored = state.db.get_swap(&swap_id).await.unwrap().unwrap();
    assert_eq!(stored.status, SwapStatus::Pending);
    for id in ["wanted", "offered"] {
        let item = state.db.get_item(id).await.unwrap().unwrap();
        assert!(item.available);
        assert_eq!(item.status, ItemStatus::Approved);
    }
    assert_eq!(state.db.get_user("a").await.unwrap().unwrap().points, 0);
    assert_eq!(state.db.get_user("b").await.unwrap().unwrap().points, 0);

    // The owner completing directly counts as consent.
    let (status, body) = send(
        &app,
        json_request(
            Method::PATCH,
            "/api/swaps",
            Some(&bearer(&state, "b")),
            Some(json!({"swapId": swap_id, "status": "completed"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "completed");
}
