// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! ReWear API Server
//!
//! Community clothing exchange: users list garments, swap them with each
//! other or redeem them with points, and admins moderate new listings.

use rewear::{
    config::{Config, StorageBackend},
    db::{Db, FirestoreDb, MemoryDb},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "rewear=debug,info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        storage = ?config.storage,
        "Starting ReWear API"
    );

    let db: Db = match config.storage {
        StorageBackend::Firestore => {
            let db = FirestoreDb::new(&config.gcp_project_id).await?;
            tracing::info!(project = %config.gcp_project_id, "Firestore connected");
            Arc::new(db)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryDb::new())
        }
    };

    let state = Arc::new(AppState::new(config.clone(), db));

    if let Some(admin) = &config.admin_bootstrap {
        let created = state
            .accounts
            .ensure_admin(&admin.email, &admin.password)
            .await?;
        if created {
            tracing::info!(email = %admin.email, "Admin account created");
        }
    }

    // Build router
    let app = rewear::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
///
/// `RUST_LOG` overrides the default filter.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
