// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Firestore client wrapper with typed operations.
//!
//! Provides the [`Store`] operations for:
//! - Users (profiles and point balances)
//! - Items (listings)
//! - Swaps (exchange and redemption requests)
//! - Likes and reports
//!
//! Write batches are committed inside a Firestore transaction.

use super::{collections, Store, Write, WriteBatch};
use crate::error::AppError;
use crate::models::{Item, ItemQuery, ItemStatus, Like, Swap, SwapStatus, User};
use async_trait::async_trait;
use firestore::FirestoreQueryDirection;
use std::collections::HashMap;

// Firestore limits transactions to 500 writes.
const MAX_BATCH_WRITES: usize = 500;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    /// Fetch every swap whose `field` equals `value`.
    async fn swaps_where(&self, field: &'static str, value: &str) -> Result<Vec<Swap>, AppError> {
        let value = value.to_string();
        self.client
            .fluent()
            .select()
            .from(collections::SWAPS)
            .filter(move |q| q.field(field).eq(value.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Merge two swap result sets, dropping duplicates, newest first.
    fn merge_swaps(first: Vec<Swap>, second: Vec<Swap>) -> Vec<Swap> {
        let mut by_id: HashMap<String, Swap> = HashMap::new();
        for swap in first.into_iter().chain(second) {
            by_id.insert(swap.id.clone(), swap);
        }
        let mut swaps: Vec<Swap> = by_id.into_values().collect();
        swaps.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        swaps
    }
}

#[async_trait]
impl Store for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let users: Vec<User> = self
            .client
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.into_iter().next())
    }

    async fn count_users(&self) -> Result<usize, AppError> {
        let users: Vec<User> = self
            .client
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.len())
    }

    // ─── Item Operations ─────────────────────────────────────────

    async fn get_item(&self, item_id: &str) -> Result<Option<Item>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::ITEMS)
            .obj()
            .one(item_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Equality filters run in Firestore. Free-text search has no index,
    /// so when `search` is set the candidates are filtered and paginated here.
    async fn query_items(&self, query: &ItemQuery) -> Result<Vec<Item>, AppError> {
        let status = query.status.map(|s| s.as_str().to_string());
        let owner = query.owner_id.clone();
        let category = query.category.clone();
        let condition = query.condition.clone();
        let size = query.size.clone();
        let available_only = query.available_only;

        let select = self
            .client
            .fluent()
            .select()
            .from(collections::ITEMS)
            .filter(move |q| {
                q.for_all([
                    status.clone().and_then(|s| q.field("status").eq(s)),
                    owner.clone().and_then(|o| q.field("userId").eq(o)),
                    category.clone().and_then(|c| q.field("category").eq(c)),
                    condition.clone().and_then(|c| q.field("condition").eq(c)),
                    size.clone().and_then(|s| q.field("size").eq(s)),
                    available_only
                        .then_some(true)
                        .and_then(|a| q.field("available").eq(a)),
                ])
            })
            .order_by([("createdAt", FirestoreQueryDirection::Descending)]);

        if query.search.is_some() {
            let candidates: Vec<Item> = select
                .obj()
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            let matching = candidates
                .into_iter()
                .filter(|item| query.matches(item))
                .collect();
            return Ok(query.paginate(matching));
        }

        let select = select.offset(query.offset as u32);
        let select = match query.limit {
            Some(limit) => select.limit(limit as u32),
            None => select,
        };

        select
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn count_items(&self, status: Option<ItemStatus>) -> Result<usize, AppError> {
        let query = ItemQuery {
            status,
            ..Default::default()
        };
        Ok(self.query_items(&query).await?.len())
    }

    // ─── Swap Operations ─────────────────────────────────────────

    async fn get_swap(&self, swap_id: &str) -> Result<Option<Swap>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::SWAPS)
            .obj()
            .one(swap_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn swaps_for_user(&self, user_id: &str) -> Result<Vec<Swap>, AppError> {
        let (requested, owned) = tokio::try_join!(
            self.swaps_where("requesterId", user_id),
            self.swaps_where("ownerId", user_id),
        )?;
        Ok(Self::merge_swaps(requested, owned))
    }

    async fn swaps_for_item(&self, item_id: &str) -> Result<Vec<Swap>, AppError> {
        let (as_owner_item, as_offer) = tokio::try_join!(
            self.swaps_where("ownerItemId", item_id),
            self.swaps_where("requesterItemId", item_id),
        )?;
        Ok(Self::merge_swaps(as_owner_item, as_offer))
    }

    async fn count_swaps(&self, status: Option<SwapStatus>) -> Result<usize, AppError> {
        let swaps: Vec<Swap> = match status {
            Some(status) => self.swaps_where("status", status.as_str()).await?,
            None => self
                .client
                .fluent()
                .select()
                .from(collections::SWAPS)
                .obj()
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?,
        };
        Ok(swaps.len())
    }

    // ─── Likes / Reports ─────────────────────────────────────────

    async fn get_like(&self, item_id: &str, user_id: &str) -> Result<Option<Like>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::LIKES)
            .obj()
            .one(&Like::doc_id(item_id, user_id))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn count_reports(&self) -> Result<usize, AppError> {
        let reports: Vec<crate::models::Report> = self
            .client
            .fluent()
            .select()
            .from(collections::REPORTS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(reports.len())
    }

    // ─── Atomic Writes ───────────────────────────────────────────

    /// Commit a write batch in a single Firestore transaction.
    ///
    /// Either every document in the batch is written or none is.
    async fn commit(&self, batch: WriteBatch) -> Result<(), AppError> {
        if batch.is_empty() {
            return Ok(());
        }
        if batch.len() > MAX_BATCH_WRITES {
            return Err(AppError::Database(format!(
                "Write batch of {} exceeds transaction limit",
                batch.len()
            )));
        }

        let writes = batch.len();
        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        for write in batch.writes() {
            let added = match write {
                Write::PutUser(user) => self
                    .client
                    .fluent()
                    .update()
                    .in_col(collections::USERS)
                    .document_id(&user.id)
                    .object(user)
                    .add_to_transaction(&mut transaction)
                    .map(|_| ()),
                Write::PutItem(item) => self
                    .client
                    .fluent()
                    .update()
                    .in_col(collections::ITEMS)
                    .document_id(&item.id)
                    .object(item)
                    .add_to_transaction(&mut transaction)
                    .map(|_| ()),
                Write::DeleteItem(item_id) => self
                    .client
                    .fluent()
                    .delete()
                    .from(collections::ITEMS)
                    .document_id(item_id)
                    .add_to_transaction(&mut transaction)
                    .map(|_| ()),
                Write::PutSwap(swap) => self
                    .client
                    .fluent()
                    .update()
                    .in_col(collections::SWAPS)
                    .document_id(&swap.id)
                    .object(swap)
                    .add_to_transaction(&mut transaction)
                    .map(|_| ()),
                Write::PutLike(like) => self
                    .client
                    .fluent()
                    .update()
                    .in_col(collections::LIKES)
                    .document_id(&like.id)
                    .object(like)
                    .add_to_transaction(&mut transaction)
                    .map(|_| ()),
                Write::DeleteLike(like_id) => self
                    .client
                    .fluent()
                    .delete()
                    .from(collections::LIKES)
                    .document_id(like_id)
                    .add_to_transaction(&mut transaction)
                    .map(|_| ()),
                Write::PutReport(report) => self
                    .client
                    .fluent()
                    .update()
                    .in_col(collections::REPORTS)
                    .document_id(&report.id)
                    .object(report)
                    .add_to_transaction(&mut transaction)
                    .map(|_| ()),
            };

            added.map_err(|e| {
                AppError::Database(format!("Failed to add write to transaction: {}", e))
            })?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::debug!(writes, "Write batch committed");
        Ok(())
    }
}
