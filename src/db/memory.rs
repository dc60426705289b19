// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! In-memory document store for local development and tests.

use super::{Store, Write, WriteBatch};
use crate::error::AppError;
use crate::models::{Item, ItemQuery, ItemStatus, Like, Report, Swap, SwapStatus, User};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Collections {
    users: HashMap<String, User>,
    items: HashMap<String, Item>,
    swaps: HashMap<String, Swap>,
    likes: HashMap<String, Like>,
    reports: HashMap<String, Report>,
}

/// Process-local store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryDb {
    data: Arc<RwLock<Collections>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut swaps: Vec<Swap>) -> Vec<Swap> {
    swaps.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    swaps
}

#[async_trait]
impl Store for MemoryDb {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.data.read().await.users.get(user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let data = self.data.read().await;
        Ok(data.users.values().find(|u| u.email == email).cloned())
    }

    async fn count_users(&self) -> Result<usize, AppError> {
        Ok(self.data.read().await.users.len())
    }

    async fn get_item(&self, item_id: &str) -> Result<Option<Item>, AppError> {
        Ok(self.data.read().await.items.get(item_id).cloned())
    }

    async fn query_items(&self, query: &ItemQuery) -> Result<Vec<Item>, AppError> {
        let data = self.data.read().await;
        let matching: Vec<Item> = data
            .items
            .values()
            .filter(|item| query.matches(item))
            .cloned()
            .collect();
        Ok(query.paginate(matching))
    }

    async fn count_items(&self, status: Option<ItemStatus>) -> Result<usize, AppError> {
        let data = self.data.read().await;
        Ok(data
            .items
            .values()
            .filter(|item| status.map_or(true, |s| item.status == s))
            .count())
    }

    async fn get_swap(&self, swap_id: &str) -> Result<Option<Swap>, AppError> {
        Ok(self.data.read().await.swaps.get(swap_id).cloned())
    }

    async fn swaps_for_user(&self, user_id: &str) -> Result<Vec<Swap>, AppError> {
        let data = self.data.read().await;
        let swaps = data
            .swaps
            .values()
            .filter(|swap| swap.involves_user(user_id))
            .cloned()
            .collect();
        Ok(newest_first(swaps))
    }

    async fn swaps_for_item(&self, item_id: &str) -> Result<Vec<Swap>, AppError> {
        let data = self.data.read().await;
        let swaps = data
            .swaps
            .values()
            .filter(|swap| swap.involves_item(item_id))
            .cloned()
            .collect();
        Ok(newest_first(swaps))
    }

    async fn count_swaps(&self, status: Option<SwapStatus>) -> Result<usize, AppError> {
        let data = self.data.read().await;
        Ok(data
            .swaps
            .values()
            .filter(|swap| status.map_or(true, |s| swap.status == s))
            .count())
    }

    async fn get_like(&self, item_id: &str, user_id: &str) -> Result<Option<Like>, AppError> {
        let data = self.data.read().await;
        Ok(data.likes.get(&Like::doc_id(item_id, user_id)).cloned())
    }

    async fn count_reports(&self) -> Result<usize, AppError> {
        Ok(self.data.read().await.reports.len())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), AppError> {
        // A single write guard makes the whole batch visible at once.
        let mut data = self.data.write().await;
        for write in batch.into_writes() {
            match write {
                Write::PutUser(user) => {
                    data.users.insert(user.id.clone(), user);
                }
                Write::PutItem(item) => {
                    data.items.insert(item.id.clone(), item);
                }
                Write::DeleteItem(item_id) => {
                    data.items.remove(&item_id);
                }
                Write::PutSwap(swap) => {
                    data.swaps.insert(swap.id.clone(), swap);
                }
                Write::PutLike(like) => {
                    data.likes.insert(like.id.clone(), like);
                }
                Write::DeleteLike(like_id) => {
                    data.likes.remove(&like_id);
                }
                Write::PutReport(report) => {
                    data.reports.insert(report.id.clone(), report);
                }
            }
        }
        Ok(())
    }
}
