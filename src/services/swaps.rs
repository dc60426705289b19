// SPDX-License-Identifier: MIT
// Copyright 2026 The ReWear Authors

//! Swap coordinator: request creation, status transitions and completion.
//!
//! Completing a swap touches up to five documents (the swap, one or two
//! items and two users). [`plan_completion`] computes the new state of all
//! of them without I/O, and the result is committed as one [`WriteBatch`].

use crate::db::{Db, WriteBatch};
use crate::error::AppError;
use crate::models::{Item, ItemStatus, Swap, SwapStatus, SwapType, User};
use crate::services::locks::{item_key, swap_key, user_key, LedgerLocks};
use crate::time_utils::now_rfc3339;

/// Points credited to each party of a completed item-for-item swap.
pub const SWAP_BONUS_POINTS: u32 = 10;

/// New state of every document touched by a completed swap.
#[derive(Debug, Clone)]
pub struct Completion {
    pub swap: Swap,
    pub requester: User,
    pub owner: User,
    pub owner_item: Item,
    pub requester_item: Option<Item>,
}

impl Completion {
    pub fn into_batch(self) -> WriteBatch {
        let mut batch = WriteBatch::new()
            .put_swap(self.swap)
            .put_user(self.requester)
            .put_user(self.owner)
            .put_item(self.owner_item);
        if let Some(item) = self.requester_item {
            batch = batch.put_item(item);
        }
        batch
    }
}

/// Compute the effect of completing `swap`.
///
/// Fails without side effects when the swap is already terminal, an item is
/// no longer available or the requester cannot cover a redemption.
pub fn plan_completion(
    swap: &Swap,
    requester: &User,
    owner: &User,
    owner_item: &Item,
    offered_item: Option<&Item>,
    now: &str,
) -> Result<Completion, AppError> {
    if swap.status.is_terminal() {
        return Err(AppError::BadRequest(format!(
            "Swap is already {}",
            swap.status.as_str()
        )));
    }
    if requester.id == owner.id {
        return Err(AppError::BadRequest(
            "Cannot swap with yourself".to_string(),
        ));
    }
    if !owner_item.available {
        return Err(AppError::Conflict("Item is no longer available".to_string()));
    }

    let mut requester = requester.clone();
    let mut owner = owner.clone();

    let mut owner_item = owner_item.clone();
    owner_item.available = false;
    owner_item.updated_at = now.to_string();

    let mut requester_item = None;

    match swap.kind {
        SwapType::Redeem => {
            let price = swap.points_used.unwrap_or(owner_item.points);
            requester.points = requester
                .points
                .checked_sub(price)
                .ok_or(AppError::InsufficientPoints)?;
            owner.points = owner.points.saturating_add(price);
            owner_item.status = ItemStatus::Redeemed;
        }
        SwapType::Swap => {
            let offered = requester_item.insert(
                requester_item_for(swap, offered_item)?.clone(),
            );
            if !offered.available {
                return Err(AppError::Conflict(
                    "Offered item is no longer available".to_string(),
                ));
            }
            offered.available = false;
            offered.status = ItemStatus::Swapped;
            offered.updated_at = now.to_string();

            requester.points = requester.points.saturating_add(SWAP_BONUS_POINTS);
            owner.points = owner.points.saturating_add(SWAP_BONUS_POINTS);
            owner_item.status = ItemStatus::Swapped;
        }
    }

    requester.total_swaps = requester.total_swaps.saturating_add(1);
    requester.updated_at = now.to_string();
    owner.total_swaps = owner.total_swaps.saturating_add(1);
    owner.updated_at = now.to_string();

    let mut swap = swap.clone();
    swap.status = SwapStatus::Completed;
    swap.updated_at = now.to_string();

    Ok(Completion {
        swap,
        requester,
        owner,
        owner_item,
        requester_item,
    })
}

fn requester_item_for<'a>(swap: &Swap, item: Option<&'a Item>) -> Result<&'a Item, AppError> {
    match (swap.requester_item_id.as_deref(), item) {
        (Some(id), Some(item)) if item.id == id => Ok(item),
        _ => Err(AppError::BadRequest(
            "Swap requires an offered item".to_string(),
        )),
    }
}

/// Check that `actor_id` may move `swap` to `next`.
pub fn check_transition(swap: &Swap, next: SwapStatus, actor_id: &str) -> Result<(), AppError> {
    if !swap.involves_user(actor_id) {
        return Err(AppError::Forbidden);
    }
    if swap.status.is_terminal() {
        return Err(AppError::BadRequest(format!(
            "Swap is already {}",
            swap.status.as_str()
        )));
    }

    match next {
        SwapStatus::Pending => Err(AppError::BadRequest(
            "Swap cannot return to pending".to_string(),
        )),
        SwapStatus::Approved | SwapStatus::Rejected if swap.status != SwapStatus::Pending => {
            Err(AppError::BadRequest(format!(
                "Cannot move swap from {} to {}",
                swap.status.as_str(),
                next.as_str()
            )))
        }
        SwapStatus::Approved | SwapStatus::Rejected if actor_id != swap.owner_id => {
            Err(AppError::Forbidden)
        }
        // The requester may only complete once the owner has approved.
        SwapStatus::Completed
            if swap.status == SwapStatus::Pending && actor_id != swap.owner_id =>
        {
            Err(AppError::BadRequest(
                "Swap must be approved by the owner first".to_string(),
            ))
        }
        _ => Ok(()),
    }
}

/// A swap or redemption request.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub kind: SwapType,
    /// Expected owner of the requested item, if the client knows it
    pub owner_id: Option<String>,
    pub owner_item_id: String,
    pub requester_item_id: Option<String>,
    pub message: String,
    pub points_used: Option<u32>,
}

#[derive(Clone)]
pub struct SwapCoordinator {
    db: Db,
    locks: LedgerLocks,
}

impl SwapCoordinator {
    pub fn new(db: Db, locks: LedgerLocks) -> Self {
        Self { db, locks }
    }

    async fn load_item(&self, item_id: &str) -> Result<Item, AppError> {
        self.db
            .get_item(item_id)
            .await?
            .ok_or(AppError::NotFound("Item"))
    }

    async fn load_user(&self, user_id: &str) -> Result<User, AppError> {
        self.db
            .get_user(user_id)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    async fn ensure_no_active_swap(&self, item_id: &str) -> Result<(), AppError> {
        let swaps = self.db.swaps_for_item(item_id).await?;
        if swaps.iter().any(|s| s.is_active()) {
            return Err(AppError::Conflict(
                "Item already has an active swap request".to_string(),
            ));
        }
        Ok(())
    }

    /// Open a new pending request against another user's listing.
    pub async fn create_swap_request(
        &self,
        requester_id: &str,
        request: SwapRequest,
    ) -> Result<Swap, AppError> {
        let mut keys = vec![item_key(&request.owner_item_id)];
        if let Some(offered) = &request.requester_item_id {
            keys.push(item_key(offered));
        }
        let _guards = self.locks.lock_all(&keys).await;

        let owner_item = self.load_item(&request.owner_item_id).await?;
        if !owner_item.is_swappable() {
            return Err(AppError::BadRequest(
                "Item is not available".to_string(),
            ));
        }
        if owner_item.user_id == requester_id {
            return Err(AppError::BadRequest(
                "Cannot request your own item".to_string(),
            ));
        }
        if let Some(owner_id) = &request.owner_id {
            if owner_id != &owner_item.user_id {
                return Err(AppError::BadRequest(
                    "Owner does not match item".to_string(),
                ));
            }
        }

        let requester = self.load_user(requester_id).await?;

        let points_used = match (request.kind, &request.requester_item_id) {
            (SwapType::Swap, Some(offered_id)) => {
                let offered = self.load_item(offered_id).await?;
                if offered.user_id != requester_id {
                    return Err(AppError::BadRequest(
                        "Offered item does not belong to you".to_string(),
                    ));
                }
                if !offered.is_swappable() {
                    return Err(AppError::BadRequest(
                        "Offered item is not available".to_string(),
                    ));
                }
                self.ensure_no_active_swap(offered_id).await?;
                None
            }
            (SwapType::Swap, None) => {
                return Err(AppError::BadRequest(
                    "Swap requires an offered item".to_string(),
                ));
            }
            (SwapType::Redeem, Some(_)) => {
                return Err(AppError::BadRequest(
                    "Redemption cannot offer an item".to_string(),
                ));
            }
            (SwapType::Redeem, None) => {
                let price = request.points_used.unwrap_or(owner_item.points);
                if price != owner_item.points {
                    return Err(AppError::BadRequest(
                        "Points must equal the item price".to_string(),
                    ));
                }
                if requester.points < price {
                    return Err(AppError::InsufficientPoints);
                }
                Some(price)
            }
        };

        self.ensure_no_active_swap(&owner_item.id).await?;

        let now = now_rfc3339();
        let swap = Swap {
            id: uuid::Uuid::new_v4().to_string(),
            kind: request.kind,
            status: SwapStatus::Pending,
            requester_id: requester_id.to_string(),
            owner_id: owner_item.user_id.clone(),
            owner_item_id: owner_item.id.clone(),
            requester_item_id: request.requester_item_id,
            message: request.message.trim().to_string(),
            points_used,
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.put_swap(&swap).await?;
        tracing::info!(
            swap_id = %swap.id,
            kind = ?swap.kind,
            requester_id,
            owner_id = %swap.owner_id,
            "Swap requested"
        );
        Ok(swap)
    }

    /// Move a swap to a new status. Completion applies the exchange.
    pub async fn update_swap_status(
        &self,
        swap_id: &str,
        next: SwapStatus,
        actor_id: &str,
    ) -> Result<Swap, AppError> {
        let snapshot = self
            .db
            .get_swap(swap_id)
            .await?
            .ok_or(AppError::NotFound("Swap"))?;

        let mut keys = vec![
            swap_key(swap_id),
            user_key(&snapshot.requester_id),
            user_key(&snapshot.owner_id),
            item_key(&snapshot.owner_item_id),
        ];
        if let Some(offered) = &snapshot.requester_item_id {
            keys.push(item_key(offered));
        }
        let _guards = self.locks.lock_all(&keys).await;

        // Re-read under the locks; the snapshot may be stale.
        let swap = self
            .db
            .get_swap(swap_id)
            .await?
            .ok_or(AppError::NotFound("Swap"))?;
        check_transition(&swap, next, actor_id)?;

        let now = now_rfc3339();

        if next != SwapStatus::Completed {
            let mut updated = swap;
            updated.status = next;
            updated.updated_at = now;
            self.db.put_swap(&updated).await?;
            tracing::info!(swap_id, actor_id, status = next.as_str(), "Swap status changed");
            return Ok(updated);
        }

        let completion = self.plan_for(&swap, &now).await?;
        let completed = completion.swap.clone();
        self.log_completion(&completion);
        self.db.commit(completion.into_batch()).await?;
        Ok(completed)
    }

    async fn plan_for(&self, swap: &Swap, now: &str) -> Result<Completion, AppError> {
        let requester = self.load_user(&swap.requester_id).await?;
        let owner = self.load_user(&swap.owner_id).await?;
        let owner_item = self.load_item(&swap.owner_item_id).await?;
        let requester_item = match &swap.requester_item_id {
            Some(id) => Some(self.load_item(id).await?),
            None => None,
        };

        plan_completion(
            swap,
            &requester,
            &owner,
            &owner_item,
            requester_item.as_ref(),
            now,
        )
    }

    fn log_completion(&self, completion: &Completion) {
        tracing::info!(
            swap_id = %completion.swap.id,
            kind = ?completion.swap.kind,
            requester_id = %completion.requester.id,
            requester_points = completion.requester.points,
            owner_id = %completion.owner.id,
            owner_points = completion.owner.points,
            points_used = ?completion.swap.points_used,
            "Swap completed"
        );
    }

    /// Buy a listing outright with points.
    ///
    /// Creates an approved redemption and completes it in the same batch.
    pub async fn redeem_with_points(
        &self,
        user_id: &str,
        item_id: &str,
        points: u32,
    ) -> Result<Completion, AppError> {
        let snapshot = self.load_item(item_id).await?;
        let keys = [
            item_key(item_id),
            user_key(user_id),
            user_key(&snapshot.user_id),
        ];
        let _guards = self.locks.lock_all(&keys).await;

        let item = self.load_item(item_id).await?;
        if item.user_id != snapshot.user_id {
            return Err(AppError::Conflict("Item changed owner".to_string()));
        }
        if !item.is_swappable() {
            return Err(AppError::BadRequest("Item is not available".to_string()));
        }
        if item.user_id == user_id {
            return Err(AppError::BadRequest(
                "Cannot redeem your own item".to_string(),
            ));
        }
        if points != item.points {
            return Err(AppError::BadRequest(
                "Points must equal the item price".to_string(),
            ));
        }
        self.ensure_no_active_swap(item_id).await?;

        let requester = self.load_user(user_id).await?;
        let owner = self.load_user(&item.user_id).await?;

        let now = now_rfc3339();
        let swap = Swap {
            id: uuid::Uuid::new_v4().to_string(),
            kind: SwapType::Redeem,
            status: SwapStatus::Approved,
            requester_id: user_id.to_string(),
            owner_id: item.user_id.clone(),
            owner_item_id: item.id.clone(),
            requester_item_id: None,
            message: String::new(),
            points_used: Some(points),
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        let completion = plan_completion(&swap, &requester, &owner, &item, None, &now)?;
        self.log_completion(&completion);
        self.db.commit(completion.clone().into_batch()).await?;
        Ok(completion)
    }

    /// Swaps where the user is requester or owner, newest first.
    pub async fn swaps_for_user(&self, user_id: &str) -> Result<Vec<Swap>, AppError> {
        self.db.swaps_for_user(user_id).await
    }
}
