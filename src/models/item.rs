// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Clothing listing model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Moderation / lifecycle state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ItemStatus {
    Pending,
    Approved,
    Rejected,
    Swapped,
    Redeemed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Approved => "approved",
            ItemStatus::Rejected => "rejected",
            ItemStatus::Swapped => "swapped",
            ItemStatus::Redeemed => "redeemed",
        }
    }

    /// Whether anyone may view a listing in this state.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            ItemStatus::Approved | ItemStatus::Swapped | ItemStatus::Redeemed
        )
    }
}

/// Item document stored in the `items` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Item {
    /// Item ID (also used as document ID)
    pub id: String,
    /// Owning user
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Garment type, free text ("T-Shirt", "Jeans", ...)
    #[serde(rename = "type", default)]
    pub garment_type: String,
    pub size: String,
    pub condition: String,
    /// Redemption price in points
    pub points: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: ItemStatus,
    pub available: bool,
    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Item {
    /// Approved and not yet exchanged.
    pub fn is_swappable(&self) -> bool {
        self.status == ItemStatus::Approved && self.available
    }
}

/// Owner fields joined onto catalogue listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ItemOwner {
    pub first_name: String,
    pub last_name: String,
    pub rating: f64,
    /// Only populated for admin views
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A listing together with its owner summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ItemWithOwner {
    #[serde(flatten)]
    pub item: Item,
    pub user: ItemOwner,
}

/// Catalogue filter shared by all storage backends.
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    pub status: Option<ItemStatus>,
    pub owner_id: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub size: Option<String>,
    /// Case-insensitive substring match on title or description
    pub search: Option<String>,
    pub available_only: bool,
    pub offset: usize,
    /// `None` returns every match
    pub limit: Option<usize>,
}

impl ItemQuery {
    /// Whether an item passes every filter (pagination not included).
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(status) = self.status {
            if item.status != status {
                return false;
            }
        }
        if let Some(owner) = &self.owner_id {
            if &item.user_id != owner {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &item.category != category {
                return false;
            }
        }
        if let Some(condition) = &self.condition {
            if &item.condition != condition {
                return false;
            }
        }
        if let Some(size) = &self.size {
            if &item.size != size {
                return false;
            }
        }
        if self.available_only && !item.available {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !item.title.to_lowercase().contains(&needle)
                && !item.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }

    /// Sort newest first and apply offset/limit.
    pub fn paginate(&self, mut items: Vec<Item>) -> Vec<Item> {
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        let iter = items.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}
