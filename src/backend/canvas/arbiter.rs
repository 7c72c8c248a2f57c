/**
 * Write Arbiter
 *
 * Validates an incoming pixel write and applies it against the cooldown
 * tracker and the canvas store.
 *
 * # Algorithm
 *
 * 1. Reject a blank participant (`Unauthenticated`) and malformed
 *    coordinates or color (`SharedError::ValidationError`). Nothing shared
 *    is touched.
 * 2. Atomically check and reserve the participant's cooldown slot.
 * 3. Denied: return `Rejected` with the wait; the store is untouched.
 * 4. Allowed: write the cell and return `Accepted` with the store's
 *    effective timestamp.
 *
 * Steps 2 and 4 are not one transaction. A participant whose slot was
 * reserved keeps the cooldown even if the store write then fails.
 */

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::backend::canvas::cooldown::{CooldownDecision, CooldownTracker};
use crate::backend::canvas::store::CanvasStore;
use crate::backend::error::BackendError;
use crate::shared::{validate_color, validate_coordinates, Pixel, PlacePixelRequest};

/// Result of a write that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Accepted {
        x: usize,
        y: usize,
        pixel: Pixel,
        /// Store-assigned timestamp, epoch ms
        effective_timestamp: i64,
        next_allowed_at: DateTime<Utc>,
    },
    Rejected { retry_after_seconds: u64 },
}

impl WriteOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Applies writes on behalf of participants
#[derive(Debug, Clone)]
pub struct WriteArbiter {
    store: Arc<CanvasStore>,
    cooldowns: Arc<CooldownTracker>,
}

impl WriteArbiter {
    pub fn new(store: Arc<CanvasStore>, cooldowns: Arc<CooldownTracker>) -> Self {
        Self { store, cooldowns }
    }

    /// Cooldown entered after an accepted write
    pub fn cooldown_seconds(&self) -> u64 {
        self.cooldowns.cooldown_seconds()
    }

    /// Validate and apply one write at server time `now`
    ///
    /// `Ok(Rejected)` is the normal cooldown answer; `Err` is reserved for
    /// requests that never got as far as the cooldown check, or a store
    /// failure after the slot was reserved.
    pub async fn submit(
        &self,
        request: &PlacePixelRequest,
        now: DateTime<Utc>,
    ) -> Result<WriteOutcome, BackendError> {
        let participant = request.username.trim();
        if participant.is_empty() {
            tracing::warn!("[Arbiter] Write without a participant identity");
            return Err(BackendError::unauthenticated("a username is required to place a pixel"));
        }

        let (x, y) = validate_coordinates(request.x, request.y, self.store.size())?;
        validate_color(&request.color)?;

        let next_allowed_at = match self.cooldowns.check_and_reserve(participant, now) {
            CooldownDecision::Denied { retry_after_seconds } => {
                tracing::info!(
                    participant,
                    retry_after_seconds,
                    "[Arbiter] Write rejected, participant on cooldown"
                );
                return Ok(WriteOutcome::Rejected { retry_after_seconds });
            }
            CooldownDecision::Allowed { next_allowed_at } => next_allowed_at,
        };

        let pixel = self
            .store
            .apply_write(x, y, &request.color, participant, now)
            .await
            .map_err(|e| {
                tracing::error!(participant, error = %e, "[Arbiter] Store write failed after cooldown reserved");
                BackendError::from(e)
            })?;

        tracing::info!(
            participant,
            x,
            y,
            color = %request.color,
            effective_timestamp = pixel.last_updated,
            "[Arbiter] Write accepted"
        );

        Ok(WriteOutcome::Accepted {
            x,
            y,
            effective_timestamp: pixel.last_updated,
            pixel,
            next_allowed_at,
        })
    }
}
