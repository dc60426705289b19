// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Account registration, sign-in and profile management.

use crate::db::Db;
use crate::error::AppError;
use crate::models::user::{INITIAL_RATING, WELCOME_BONUS_POINTS};
use crate::models::User;
use crate::services::locks::{email_key, user_key, LedgerLocks};
use crate::time_utils::now_rfc3339;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use ring::rand::{SecureRandom, SystemRandom};

/// Starting balance for the bootstrap admin account.
pub const ADMIN_INITIAL_POINTS: u32 = 1000;

const SALT_LEN: usize = 16;

/// Hash a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt_bytes = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt_bytes)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Salt generation failed: {}", e)))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Salt encoding failed: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string. Malformed hashes never verify.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Argon2 is CPU-bound; keep it off the async workers.
async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Hashing task failed: {}", e)))?
}

async fn verify_password_blocking(password: String, password_hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .unwrap_or(false)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// New account details.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Optional profile fields; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

#[derive(Clone)]
pub struct AccountService {
    db: Db,
    locks: LedgerLocks,
}

impl AccountService {
    pub fn new(db: Db, locks: LedgerLocks) -> Self {
        Self { db, locks }
    }

    /// Register a new account with the welcome bonus.
    pub async fn sign_up(&self, request: SignUp) -> Result<User, AppError> {
        self.create_account(request, WELCOME_BONUS_POINTS, false)
            .await
    }

    async fn create_account(
        &self,
        request: SignUp,
        points: u32,
        is_admin: bool,
    ) -> Result<User, AppError> {
        let email = normalize_email(&request.email);
        let _guard = self.locks.lock(&email_key(&email)).await;

        if self.db.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password_blocking(request.password).await?;
        let now = now_rfc3339();

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            password_hash,
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            avatar_url: None,
            bio: None,
            location: None,
            points,
            rating: INITIAL_RATING,
            total_swaps: 0,
            is_admin,
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.put_user(&user).await?;

        tracing::info!(user_id = %user.id, is_admin, points, "Account created");
        Ok(user)
    }

    /// Verify credentials. Unknown email and wrong password are indistinguishable.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);
        let user = self
            .db
            .find_user_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password_blocking(password.to_string(), user.password_hash.clone()).await {
            tracing::warn!(user_id = %user.id, "Sign-in with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User signed in");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, AppError> {
        self.db
            .get_user(user_id)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    /// Apply a profile update.
    ///
    /// Holds the user's ledger lock so a concurrent point transfer is not
    /// overwritten by the stale balance read here.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<User, AppError> {
        let _guard = self.locks.lock(&user_key(user_id)).await;
        let mut user = self.get_user(user_id).await?;

        if let Some(first_name) = update.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if let Some(avatar_url) = update.avatar_url {
            user.avatar_url = Some(avatar_url).filter(|v| !v.is_empty());
        }
        if let Some(bio) = update.bio {
            user.bio = Some(bio).filter(|v| !v.is_empty());
        }
        if let Some(location) = update.location {
            user.location = Some(location).filter(|v| !v.is_empty());
        }
        user.updated_at = now_rfc3339();

        self.db.put_user(&user).await?;
        tracing::debug!(user_id, "Profile updated");
        Ok(user)
    }

    /// Create the admin account if no user owns the email yet.
    ///
    /// Returns `true` when an account was created.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool, AppError> {
        if self
            .db
            .find_user_by_email(&normalize_email(email))
            .await?
            .is_some()
        {
            tracing::info!("Admin account already exists");
            return Ok(false);
        }

        let request = SignUp {
            email: email.to_string(),
            password: password.to_string(),
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
        };

        match self
            .create_account(request, ADMIN_INITIAL_POINTS, true)
            .await
        {
            Ok(_) => Ok(true),
            // Lost a race with another instance bootstrapping the same account.
            Err(AppError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
