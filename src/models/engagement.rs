// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Likes and abuse reports on listings.

use serde::{Deserialize, Serialize};

/// A user's like on an item. One document per (item, user) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: String,
    pub item_id: String,
    pub user_id: String,
    pub created_at: String,
}

impl Like {
    /// Deterministic document ID so a pair can only be liked once.
    pub fn doc_id(item_id: &str, user_id: &str) -> String {
        format!("{}_{}", item_id, user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Dismissed,
}

/// Abuse report filed against a listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub reporter_id: String,
    pub item_id: String,
    pub reason: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ReportStatus,
    pub created_at: String,
    pub updated_at: String,
}
