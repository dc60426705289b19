// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Catalogue: listing creation, browsing, likes and reports.

use crate::db::{Db, WriteBatch};
use crate::error::AppError;
use crate::models::{
    Item, ItemOwner, ItemQuery, ItemStatus, ItemWithOwner, Like, Report, ReportStatus, User,
};
use crate::services::locks::{item_key, LedgerLocks};
use crate::time_utils::now_rfc3339;
use futures_util::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};

/// Maximum concurrent owner lookups when joining listings.
const MAX_CONCURRENT_DB_OPS: usize = 10;

/// Number of listings on the landing page.
pub const FEATURED_ITEM_COUNT: usize = 8;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Base price in points for a category.
fn category_base_points(category: &str) -> u32 {
    match category {
        "Tops" => 15,
        "Bottoms" => 20,
        "Dresses" => 25,
        "Outerwear" => 35,
        "Footwear" => 30,
        "Accessories" => 10,
        _ => 15,
    }
}

/// Condition multiplier in percent.
fn condition_percent(condition: &str) -> u32 {
    match condition {
        "Like New" => 150,
        "Excellent" => 130,
        "Good" => 100,
        "Fair" => 70,
        _ => 100,
    }
}

/// Point price of a listing, rounded half up.
pub fn price_for(category: &str, condition: &str) -> u32 {
    (category_base_points(category) * condition_percent(condition) + 50) / 100
}

/// Fields supplied by the lister.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub category: String,
    pub garment_type: String,
    pub size: String,
    pub condition: String,
    pub tags: Vec<String>,
}

/// Public catalogue filters.
#[derive(Debug, Clone, Default)]
pub struct BrowseFilters {
    pub category: Option<String>,
    pub condition: Option<String>,
    pub size: Option<String>,
    pub search: Option<String>,
    /// 1-based
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl BrowseFilters {
    /// Effective (page, limit) after defaults and clamping.
    pub fn page_and_limit(&self) -> (usize, usize) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, limit)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub likes: u32,
}

/// Attach owner summaries to listings, preserving order.
///
/// Listings whose owner no longer exists are dropped.
pub async fn join_owners(
    db: &Db,
    items: Vec<Item>,
    include_email: bool,
) -> Result<Vec<ItemWithOwner>, AppError> {
    let owner_ids: HashSet<String> = items.iter().map(|i| i.user_id.clone()).collect();

    let owners: HashMap<String, User> = stream::iter(owner_ids)
        .map(|owner_id| async move {
            let user = db.get_user(&owner_id).await?;
            Ok::<_, AppError>(user.map(|u| (owner_id, u)))
        })
        .buffer_unordered(MAX_CONCURRENT_DB_OPS)
        .collect::<Vec<Result<Option<(String, User)>, AppError>>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, AppError>>()?
        .into_iter()
        .flatten()
        .collect();

    let joined = items
        .into_iter()
        .filter_map(|item| {
            let Some(owner) = owners.get(&item.user_id) else {
                tracing::warn!(item_id = %item.id, owner_id = %item.user_id, "Listing owner missing");
                return None;
            };
            Some(ItemWithOwner {
                user: ItemOwner {
                    first_name: owner.first_name.clone(),
                    last_name: owner.last_name.clone(),
                    rating: owner.rating,
                    email: include_email.then(|| owner.email.clone()),
                },
                item,
            })
        })
        .collect();

    Ok(joined)
}

#[derive(Clone)]
pub struct ItemService {
    db: Db,
    locks: LedgerLocks,
}

impl ItemService {
    pub fn new(db: Db, locks: LedgerLocks) -> Self {
        Self { db, locks }
    }

    /// List a new garment. It stays pending until moderated.
    pub async fn create_item(&self, owner_id: &str, new_item: NewItem) -> Result<Item, AppError> {
        if self.db.get_user(owner_id).await?.is_none() {
            return Err(AppError::NotFound("User"));
        }

        let now = now_rfc3339();
        let tags = new_item
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let item = Item {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            points: price_for(&new_item.category, &new_item.condition),
            title: new_item.title.trim().to_string(),
            description: new_item.description.trim().to_string(),
            category: new_item.category,
            garment_type: new_item.garment_type,
            size: new_item.size,
            condition: new_item.condition,
            tags,
            images: vec![],
            status: ItemStatus::Pending,
            available: true,
            views: 0,
            likes: 0,
            rejection_reason: None,
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.put_item(&item).await?;
        tracing::info!(item_id = %item.id, owner_id, points = item.points, "Item listed");
        Ok(item)
    }

    /// Approved listings matching the filters, newest first.
    pub async fn browse(&self, filters: BrowseFilters) -> Result<Vec<ItemWithOwner>, AppError> {
        let (page, limit) = filters.page_and_limit();
        let query = ItemQuery {
            status: Some(ItemStatus::Approved),
            category: non_blank(filters.category),
            condition: non_blank(filters.condition),
            size: non_blank(filters.size),
            search: non_blank(filters.search),
            offset: (page - 1) * limit,
            limit: Some(limit),
            ..Default::default()
        };

        let items = self.db.query_items(&query).await?;
        join_owners(&self.db, items, false).await
    }

    pub async fn featured(&self) -> Result<Vec<ItemWithOwner>, AppError> {
        let query = ItemQuery {
            status: Some(ItemStatus::Approved),
            available_only: true,
            limit: Some(FEATURED_ITEM_COUNT),
            ..Default::default()
        };
        let items = self.db.query_items(&query).await?;
        join_owners(&self.db, items, false).await
    }

    /// Item detail. Each call on a public listing counts as a view.
    ///
    /// Pending and rejected listings are only visible to their owner and to
    /// admins; everyone else gets 404.
    pub async fn view_item(
        &self,
        item_id: &str,
        viewer_id: Option<&str>,
    ) -> Result<ItemWithOwner, AppError> {
        let item = {
            let _guard = self.locks.lock(&item_key(item_id)).await;
            let mut item = self
                .db
                .get_item(item_id)
                .await?
                .ok_or(AppError::NotFound("Item"))?;
            if item.status.is_public() {
                item.views = item.views.saturating_add(1);
                self.db.put_item(&item).await?;
            } else if !self.may_see_unlisted(&item, viewer_id).await? {
                return Err(AppError::NotFound("Item"));
            }
            item
        };

        join_owners(&self.db, vec![item], false)
            .await?
            .pop()
            .ok_or(AppError::NotFound("User"))
    }

    async fn may_see_unlisted(&self, item: &Item, viewer_id: Option<&str>) -> Result<bool, AppError> {
        let Some(viewer_id) = viewer_id else {
            return Ok(false);
        };
        if viewer_id == item.user_id {
            return Ok(true);
        }
        Ok(self
            .db
            .get_user(viewer_id)
            .await?
            .is_some_and(|user| user.is_admin))
    }

    /// Every listing owned by the user, any status.
    pub async fn items_for_user(&self, user_id: &str) -> Result<Vec<Item>, AppError> {
        let query = ItemQuery {
            owner_id: Some(user_id.to_string()),
            ..Default::default()
        };
        self.db.query_items(&query).await
    }

    /// Like the item, or remove an existing like.
    pub async fn toggle_like(&self, item_id: &str, user_id: &str) -> Result<LikeState, AppError> {
        let _guard = self.locks.lock(&item_key(item_id)).await;
        let mut item = self
            .db
            .get_item(item_id)
            .await?
            .ok_or(AppError::NotFound("Item"))?;

        let existing = self.db.get_like(item_id, user_id).await?;
        item.updated_at = now_rfc3339();

        let (liked, batch) = match existing {
            Some(like) => {
                item.likes = item.likes.saturating_sub(1);
                (false, WriteBatch::new().delete_like(like.id))
            }
            None => {
                item.likes = item.likes.saturating_add(1);
                let like = Like {
                    id: Like::doc_id(item_id, user_id),
                    item_id: item_id.to_string(),
                    user_id: user_id.to_string(),
                    created_at: item.updated_at.clone(),
                };
                (true, WriteBatch::new().put_like(like))
            }
        };

        let likes = item.likes;
        self.db.commit(batch.put_item(item)).await?;

        tracing::debug!(item_id, user_id, liked, likes, "Like toggled");
        Ok(LikeState { liked, likes })
    }

    /// Delete a listing on behalf of its owner or an admin.
    pub async fn delete_item(&self, item_id: &str, actor_id: &str) -> Result<(), AppError> {
        let _guard = self.locks.lock(&item_key(item_id)).await;
        let item = self
            .db
            .get_item(item_id)
            .await?
            .ok_or(AppError::NotFound("Item"))?;

        if item.user_id != actor_id {
            let is_admin = self
                .db
                .get_user(actor_id)
                .await?
                .is_some_and(|u| u.is_admin);
            if !is_admin {
                return Err(AppError::Forbidden);
            }
        }

        let swaps = self.db.swaps_for_item(item_id).await?;
        if swaps.iter().any(|s| s.is_active()) {
            return Err(AppError::Conflict(
                "Item has an active swap request".to_string(),
            ));
        }

        self.db.commit(WriteBatch::new().delete_item(item_id)).await?;
        tracing::info!(item_id, actor_id, "Item deleted");
        Ok(())
    }

    /// File an abuse report against a listing.
    pub async fn report_item(
        &self,
        item_id: &str,
        reporter_id: &str,
        reason: &str,
        description: Option<String>,
    ) -> Result<Report, AppError> {
        if self.db.get_item(item_id).await?.is_none() {
            return Err(AppError::NotFound("Item"));
        }

        let now = now_rfc3339();
        let report = Report {
            id: uuid::Uuid::new_v4().to_string(),
            reporter_id: reporter_id.to_string(),
            item_id: item_id.to_string(),
            reason: reason.trim().to_string(),
            description: non_blank(description),
            status: ReportStatus::Pending,
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.commit(WriteBatch::new().put_report(report.clone())).await?;
        tracing::info!(item_id, reporter_id, report_id = %report.id, "Item reported");
        Ok(report)
    }
}
