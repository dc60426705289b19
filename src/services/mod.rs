// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Services module - business logic layer.

pub mod accounts;
pub mod admin;
pub mod items;
pub mod locks;
pub mod swaps;

pub use accounts::{AccountService, ProfileUpdate, SignUp};
pub use admin::{AdminService, AdminStats, ModerationAction};
pub use items::{BrowseFilters, ItemService, LikeState, NewItem};
pub use locks::{KeyedLocks, LedgerLocks};
pub use swaps::{Completion, SwapCoordinator, SwapRequest};
