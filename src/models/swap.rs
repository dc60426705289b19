// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Swap and redemption request model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Item-for-item exchange or item-for-points redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum SwapType {
    Swap,
    Redeem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum SwapStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl SwapStatus {
    /// Rejected and completed swaps never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SwapStatus::Rejected | SwapStatus::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStatus::Pending => "pending",
            SwapStatus::Approved => "approved",
            SwapStatus::Rejected => "rejected",
            SwapStatus::Completed => "completed",
        }
    }
}

/// Swap document stored in the `swaps` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Swap {
    /// Swap ID (also used as document ID)
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SwapType,
    pub status: SwapStatus,
    pub requester_id: String,
    pub owner_id: String,
    /// The owner's listing being requested
    pub owner_item_id: String,
    /// Item offered in exchange (swap type only)
    #[serde(default)]
    pub requester_item_id: Option<String>,
    #[serde(default)]
    pub message: String,
    /// Points paid (redeem type only)
    #[serde(default)]
    pub points_used: Option<u32>,
    pub created_at: String,
    pub updated_at: String,
}

impl Swap {
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Whether this swap references the item on either side.
    pub fn involves_item(&self, item_id: &str) -> bool {
        self.owner_item_id == item_id || self.requester_item_id.as_deref() == Some(item_id)
    }

    pub fn involves_user(&self, user_id: &str) -> bool {
        self.requester_id == user_id || self.owner_id == user_id
    }
}
