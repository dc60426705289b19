// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Data models for the application.

pub mod engagement;
pub mod item;
pub mod swap;
pub mod user;

pub use engagement::{Like, Report, ReportStatus};
pub use item::{Item, ItemOwner, ItemQuery, ItemStatus, ItemWithOwner};
pub use swap::{Swap, SwapStatus, SwapType};
pub use user::{User, UserProfile};
