// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Middleware modules (authentication, security headers).

pub mod auth;
pub mod security;

pub use auth::{require_admin, require_auth, AuthUser};
