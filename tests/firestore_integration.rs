// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and are skipped
//! when `FIRESTORE_EMULATOR_HOST` is not set. IDs are unique per run so the
//! tests do not depend on a clean emulator.

use rewear::db::{Store, WriteBatch};
use rewear::models::{Item, ItemQuery, ItemStatus, Like, Swap, SwapStatus, SwapType, User};
use rewear::services::swaps::plan_completion;
use rewear::time_utils::now_rfc3339;

mod common;
use common::test_db;

fn unique_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

fn test_user(id: &str, points: u32) -> User {
    let now = now_rfc3339();
    User {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        password_hash: "hash".to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        avatar_url: None,
        bio: None,
        location: None,
        points,
        rating: 5.0,
        total_swaps: 0,
        is_admin: false,
        created_at: now.clone(),
        updated_at: now,
    }
}

fn test_item(id: &str, owner: &str, points: u32) -> Item {
    let now = now_rfc3339();
    Item {
        id: id.to_string(),
        user_id: owner.to_string(),
        title: "Corduroy trousers".to_string(),
        description: "Barely worn".to_string(),
        category: "Bottoms".to_string(),
        garment_type: "Trousers".to_string(),
        size: "32".to_string(),
        condition: "Good".to_string(),
        points,
        tags: vec!["corduroy".to_string()],
        images: vec![],
        status: ItemStatus::Approved,
        available: true,
        views: 0,
        likes: 0,
        rejection_reason: None,
        created_at: now.clone(),
        updated_at: now,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_round_trip_and_email_lookup() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id("user");

    assert!(db.get_user(&id).await.unwrap().is_none());

    let user = test_user(&id, 50);
    db.put_user(&user).await.unwrap();

    let stored = db.get_user(&id).await.unwrap().expect("user stored");
    assert_eq!(stored.points, 50);
    assert_eq!(stored.email, user.email);

    let by_email = db
        .find_user_by_email(&user.email)
        .await
        .unwrap()
        .expect("lookup by email");
    assert_eq!(by_email.id, id);
}

// ═══════════════════════════════════════════════════════════════════════════
// ITEM TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_query_items_by_owner() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_id("owner");

    let first = test_item(&unique_id("item"), &owner, 20);
    let mut pending = test_item(&unique_id("item"), &owner, 20);
    pending.status = ItemStatus::Pending;
    db.commit(WriteBatch::new().put_item(first.clone()).put_item(pending.clone()))
        .await
        .unwrap();

    let all = db
        .query_items(&ItemQuery {
            owner_id: Some(owner.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let approved = db
        .query_items(&ItemQuery {
            owner_id: Some(owner.clone()),
            status: Some(ItemStatus::Approved),
            search: Some("CORDUROY".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, first.id);

    db.commit(WriteBatch::new().delete_item(pending.id.clone()))
        .await
        .unwrap();
    assert!(db.get_item(&pending.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_like_documents() {
    require_emulator!();

    let db = test_db().await;
    let item_id = unique_id("item");
    let user_id = unique_id("user");
    let like = Like {
        id: Like::doc_id(&item_id, &user_id),
        item_id: item_id.clone(),
        user_id: user_id.clone(),
        created_at: now_rfc3339(),
    };

    db.commit(WriteBatch::new().put_like(like.clone()))
        .await
        .unwrap();
    assert_eq!(db.get_like(&item_id, &user_id).await.unwrap(), Some(like));

    db.commit(WriteBatch::new().delete_like(Like::doc_id(&item_id, &user_id)))
        .await
        .unwrap();
    assert!(db.get_like(&item_id, &user_id).await.unwrap().is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// SWAP TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_completion_batch_is_applied() {
    require_emulator!();

    let db = test_db().await;
    let requester = test_user(&unique_id("buyer"), 100);
    let owner = test_user(&unique_id("seller"), 0);
    let item = test_item(&unique_id("item"), &owner.id, 30);
    let now = now_rfc3339();

    let swap = Swap {
        id: unique_id("swap"),
        kind: SwapType::Redeem,
        status: SwapStatus::Approved,
        requester_id: requester.id.clone(),
        owner_id: owner.id.clone(),
        owner_item_id: item.id.clone(),
        requester_item_id: None,
        message: String::new(),
        points_used: Some(30),
        created_at: now.clone(),
        updated_at: now.clone(),
    };

    let completion = plan_completion(&swap, &requester, &owner, &item, None, &now).unwrap();
    db.commit(completion.into_batch()).await.unwrap();

    assert_eq!(db.get_user(&requester.id).await.unwrap().unwrap().points, 70);
    assert_eq!(db.get_user(&owner.id).await.unwrap().unwrap().points, 30);

    let stored = db.get_item(&item.id).await.unwrap().unwrap();
    assert!(!stored.available);
    assert_eq!(stored.status, ItemStatus::Redeemed);

    let for_item = db.swaps_for_item(&item.id).await.unwrap();
    assert_eq!(for_item.len(), 1);
    assert_eq!(for_item[0].status, SwapStatus::Completed);

    let for_owner = db.swaps_for_user(&owner.id).await.unwrap();
    assert_eq!(for_owner.len(), 1);
}
