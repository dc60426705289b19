// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Admin moderation of listings and aggregate statistics.

use crate::db::{Db, WriteBatch};
use crate::error::AppError;
use crate::models::{Item, ItemQuery, ItemStatus, ItemWithOwner, SwapStatus};
use crate::services::items::join_owners;
use crate::services::locks::{item_key, user_key, LedgerLocks};
use crate::time_utils::now_rfc3339;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Share of an item's point value credited to the lister on approval.
pub const LISTING_BONUS_PERCENT: u32 = 50;

/// Listing bonus for an item worth `points`, rounded down.
pub fn listing_bonus(points: u32) -> u32 {
    points * LISTING_BONUS_PERCENT / 100
}

/// Dashboard counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AdminStats {
    pub total_users: usize,
    pub total_items: usize,
    pub pending_items: usize,
    pub completed_swaps: usize,
    pub total_reports: usize,
}

/// Moderation decision on a pending listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Approve,
    Reject,
}

#[derive(Clone)]
pub struct AdminService {
    db: Db,
    locks: LedgerLocks,
}

impl AdminService {
    pub fn new(db: Db, locks: LedgerLocks) -> Self {
        Self { db, locks }
    }

    pub async fn stats(&self) -> Result<AdminStats, AppError> {
        let (total_users, total_items, pending_items, completed_swaps, total_reports) = tokio::try_join!(
            self.db.count_users(),
            self.db.count_items(None),
            self.db.count_items(Some(ItemStatus::Pending)),
            self.db.count_swaps(Some(SwapStatus::Completed)),
            self.db.count_reports(),
        )?;

        Ok(AdminStats {
            total_users,
            total_items,
            pending_items,
            completed_swaps,
            total_reports,
        })
    }

    /// Moderation queue, newest first, with owner contact details.
    pub async fn pending_items(&self) -> Result<Vec<ItemWithOwner>, AppError> {
        let query = ItemQuery {
            status: Some(ItemStatus::Pending),
            ..Default::default()
        };
        let items = self.db.query_items(&query).await?;
        join_owners(&self.db, items, true).await
    }

    /// Approve a pending item and credit its owner the listing bonus.
    pub async fn approve_item(&self, item_id: &str) -> Result<Item, AppError> {
        let snapshot = self
            .db
            .get_item(item_id)
            .await?
            .ok_or(AppError::NotFound("Item"))?;
        let keys = [item_key(item_id), user_key(&snapshot.user_id)];
        let _guards = self.locks.lock_all(&keys).await;

        let mut item = self
            .db
            .get_item(item_id)
            .await?
            .ok_or(AppError::NotFound("Item"))?;
        if item.status != ItemStatus::Pending || item.user_id != snapshot.user_id {
            return Err(AppError::BadRequest(
                "Only pending items can be approved".to_string(),
            ));
        }
        let mut owner = self
            .db
            .get_user(&item.user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        let now = now_rfc3339();
        let bonus = listing_bonus(item.points);

        item.status = ItemStatus::Approved;
        item.available = true;
        item.rejection_reason = None;
        item.updated_at = now.clone();

        owner.points = owner.points.saturating_add(bonus);
        owner.updated_at = now;

        self.db
            .commit(
                WriteBatch::new()
                    .put_item(item.clone())
                    .put_user(owner.clone()),
            )
            .await?;

        tracing::info!(
            item_id,
            owner_id = %owner.id,
            bonus,
            balance = owner.points,
            "Item approved"
        );
        Ok(item)
    }

    /// Reject a pending item. Balances are untouched.
    pub async fn reject_item(
        &self,
        item_id: &str,
        reason: Option<String>,
    ) -> Result<Item, AppError> {
        let _guard = self.locks.lock(&item_key(item_id)).await;
        let mut item = self
            .db
            .get_item(item_id)
            .await?
            .ok_or(AppError::NotFound("Item"))?;
        if item.status != ItemStatus::Pending {
            return Err(AppError::BadRequest(
                "Only pending items can be rejected".to_string(),
            ));
        }

        item.status = ItemStatus::Rejected;
        item.rejection_reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        item.updated_at = now_rfc3339();

        self.db.put_item(&item).await?;
        tracing::info!(item_id, reason = ?item.rejection_reason, "Item rejected");
        Ok(item)
    }

    /// Hard-delete an item. Open swaps on it are rejected in the same batch.
    pub async fn remove_item(&self, item_id: &str) -> Result<(), AppError> {
        let _guard = self.locks.lock(&item_key(item_id)).await;
        if self.db.get_item(item_id).await?.is_none() {
            return Err(AppError::NotFound("Item"));
        }

        let now = now_rfc3339();
        let mut batch = WriteBatch::new().delete_item(item_id);
        for mut swap in self.db.swaps_for_item(item_id).await? {
            if swap.is_active() {
                swap.status = SwapStatus::Rejected;
                swap.updated_at = now.clone();
                batch = batch.put_swap(swap);
            }
        }

        let closed_swaps = batch.len() - 1;
        self.db.commit(batch).await?;
        tracing::info!(item_id, closed_swaps, "Item removed by admin");
        Ok(())
    }
}
