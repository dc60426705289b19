// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Database layer.
//!
//! Handlers and services talk to a [`Store`]; the Firestore implementation
//! is used in production and [`MemoryDb`] for local development and tests.
//! Every multi-document mutation goes through [`Store::commit`] so that a
//! point transfer is applied all-or-nothing.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{Item, ItemQuery, ItemStatus, Like, Report, Swap, SwapStatus, User};
use async_trait::async_trait;
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const ITEMS: &str = "items";
    pub const SWAPS: &str = "swaps";
    pub const LIKES: &str = "likes";
    pub const REPORTS: &str = "reports";
}

/// Shared handle to the configured store.
pub type Db = Arc<dyn Store>;

/// A single document write inside a [`WriteBatch`].
#[derive(Debug, Clone)]
pub enum Write {
    PutUser(User),
    PutItem(Item),
    DeleteItem(String),
    PutSwap(Swap),
    PutLike(Like),
    DeleteLike(String),
    PutReport(Report),
}

/// Ordered set of writes applied atomically by [`Store::commit`].
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    writes: Vec<Write>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_user(mut self, user: User) -> Self {
        self.writes.push(Write::PutUser(user));
        self
    }

    pub fn put_item(mut self, item: Item) -> Self {
        self.writes.push(Write::PutItem(item));
        self
    }

    pub fn delete_item(mut self, item_id: impl Into<String>) -> Self {
        self.writes.push(Write::DeleteItem(item_id.into()));
        self
    }

    pub fn put_swap(mut self, swap: Swap) -> Self {
        self.writes.push(Write::PutSwap(swap));
        self
    }

    pub fn put_like(mut self, like: Like) -> Self {
        self.writes.push(Write::PutLike(like));
        self
    }

    pub fn delete_like(mut self, like_id: impl Into<String>) -> Self {
        self.writes.push(Write::DeleteLike(like_id.into()));
        self
    }

    pub fn put_report(mut self, report: Report) -> Self {
        self.writes.push(Write::PutReport(report));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    pub fn into_writes(self) -> Vec<Write> {
        self.writes
    }
}

/// Document store used by the services.
#[async_trait]
pub trait Store: Send + Sync {
    // ─── Users ───────────────────────────────────────────────────

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError>;

    /// Look up a user by (lower-cased) email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn count_users(&self) -> Result<usize, AppError>;

    // ─── Items ───────────────────────────────────────────────────

    async fn get_item(&self, item_id: &str) -> Result<Option<Item>, AppError>;

    /// Items matching the query, newest first, paginated.
    async fn query_items(&self, query: &ItemQuery) -> Result<Vec<Item>, AppError>;

    async fn count_items(&self, status: Option<ItemStatus>) -> Result<usize, AppError>;

    // ─── Swaps ───────────────────────────────────────────────────

    async fn get_swap(&self, swap_id: &str) -> Result<Option<Swap>, AppError>;

    /// Swaps where the user is requester or owner, newest first.
    async fn swaps_for_user(&self, user_id: &str) -> Result<Vec<Swap>, AppError>;

    /// Swaps referencing the item as owner item or offered item.
    async fn swaps_for_item(&self, item_id: &str) -> Result<Vec<Swap>, AppError>;

    async fn count_swaps(&self, status: Option<SwapStatus>) -> Result<usize, AppError>;

    // ─── Likes / Reports ─────────────────────────────────────────

    async fn get_like(&self, item_id: &str, user_id: &str) -> Result<Option<Like>, AppError>;

    async fn count_reports(&self) -> Result<usize, AppError>;

    // ─── Writes ──────────────────────────────────────────────────

    /// Apply every write in the batch, or none of them.
    async fn commit(&self, batch: WriteBatch) -> Result<(), AppError>;

    async fn put_user(&self, user: &User) -> Result<(), AppError> {
        self.commit(WriteBatch::new().put_user(user.clone())).await
    }

    async fn put_item(&self, item: &Item) -> Result<(), AppError> {
        self.commit(WriteBatch::new().put_item(item.clone())).await
    }

    async fn put_swap(&self, swap: &Swap) -> Result<(), AppError> {
        self.commit(WriteBatch::new().put_swap(swap.clone())).await
    }
}
