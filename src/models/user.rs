// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! User model: profile plus point ledger entry.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Points granted to every new account.
pub const WELCOME_BONUS_POINTS: u32 = 50;

/// Starting rating for new accounts.
pub const INITIAL_RATING: f64 = 5.0;

/// User document stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID (also used as document ID)
    pub id: String,
    /// Login email, stored lower-cased
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Point balance
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub rating: f64,
    /// Number of completed swaps and redemptions
    #[serde(default)]
    pub total_swaps: u32,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// User as returned by the API (no credential material).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub points: u32,
    pub rating: f64,
    pub total_swaps: u32,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            avatar_url: user.avatar_url.clone(),
            bio: user.bio.clone(),
            location: user.location.clone(),
            points: user.points,
            rating: user.rating,
            total_swaps: user.total_swaps,
            is_admin: user.is_admin,
            created_at: user.created_at.clone(),
        }
    }
}
