// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! ReWear: a community clothing exchange
//!
//! This crate provides the backend API for listing garments, swapping them
//! between users or redeeming them with points, and moderating listings.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Db;
use services::{AccountService, AdminService, ItemService, KeyedLocks, SwapCoordinator};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub accounts: AccountService,
    pub items: ItemService,
    pub swaps: SwapCoordinator,
    pub admin: AdminService,
}

impl AppState {
    /// Wire up the services over one store and one set of ledger locks.
    pub fn new(config: Config, db: Db) -> Self {
        let locks = Arc::new(KeyedLocks::new());
        Self {
            accounts: AccountService::new(db.clone(), locks.clone()),
            items: ItemService::new(db.clone(), locks.clone()),
            swaps: SwapCoordinator::new(db.clone(), locks.clone()),
            admin: AdminService::new(db.clone(), locks),
            config,
            db,
        }
    }
}
