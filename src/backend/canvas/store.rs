/**
 * Canvas Store
 *
 * The authoritative `N × N` grid. It is created once with a fixed size and
 * only exposes two operations: a full snapshot read and a single-cell write.
 *
 * # Locking
 *
 * Each row sits behind its own `RwLock`. A write locks exactly one row, so
 * writes to different rows never contend, and writes to the same cell are
 * serialized by that row's lock.
 *
 * A snapshot read takes every row's read lock (always in row order) before
 * copying anything, so it sees a single point in time. Writers only ever
 * hold one lock, which rules out lock-order deadlocks, and `tokio`'s
 * `RwLock` is fair, so a queued writer is never starved by readers.
 *
 * # Timestamps
 *
 * Effective timestamps come from one store-wide clock that never hands out
 * the same millisecond twice. The clock is advanced while the row lock is
 * held, so for any single cell the write applied last is also the one with
 * the larger timestamp.
 */

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::shared::{CanvasSnapshot, Pixel};

/// Errors from the store layer
///
/// Coordinates are validated by the write arbiter before reaching the store,
/// so seeing this means a caller skipped validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("cell ({x}, {y}) is outside the {size}x{size} canvas")]
    OutOfBounds { x: usize, y: usize, size: usize },
}

/// Authoritative canvas state
#[derive(Debug)]
pub struct CanvasStore {
    size: usize,
    rows: Vec<RwLock<Vec<Pixel>>>,
    /// Lowest timestamp the next write may receive (epoch ms)
    clock: AtomicI64,
}

impl CanvasStore {
    /// Create a `size × size` canvas with every cell set to `default_color`
    pub fn new(size: usize, default_color: &str) -> Self {
        let rows = (0..size)
            .map(|_| RwLock::new(vec![Pixel::blank(default_color); size]))
            .collect();

        tracing::info!(size, default_color, "[Canvas] Created canvas store");

        Self {
            size,
            rows,
            clock: AtomicI64::new(0),
        }
    }

    /// Side length of the canvas
    pub fn size(&self) -> usize {
        self.size
    }

    /// Consistent point-in-time copy of the whole canvas
    pub async fn read_all(&self) -> CanvasSnapshot {
        let mut guards = Vec::with_capacity(self.size);
        for row in &self.rows {
            guards.push(row.read().await);
        }

        let pixels = guards.iter().map(|row| row.to_vec()).collect();
        drop(guards);

        CanvasSnapshot {
            size: self.size,
            pixels,
        }
    }

    /// Write one cell and return its new state
    ///
    /// The returned pixel's `last_updated` is the effective timestamp: `now`
    /// unless an earlier write already used that millisecond or a later one.
    pub async fn apply_write(
        &self,
        x: usize,
        y: usize,
        color: &str,
        participant: &str,
        now: DateTime<Utc>,
    ) -> Result<Pixel, StoreError> {
        let out_of_bounds = StoreError::OutOfBounds {
            x,
            y,
            size: self.size,
        };
        if x >= self.size {
            return Err(out_of_bounds);
        }
        let row = self.rows.get(y).ok_or(out_of_bounds)?;

        let mut row = row.write().await;
        let effective = self.next_timestamp(now.timestamp_millis());

        let pixel = Pixel {
            color: color.to_string(),
            last_updated: effective,
            last_updated_by: participant.to_string(),
        };
        row[x] = pixel.clone();

        tracing::debug!(x, y, color, participant, effective, "[Canvas] Cell updated");
        Ok(pixel)
    }

    /// Hand out `max(now, clock)` and move the clock one millisecond past it
    fn next_timestamp(&self, now_ms: i64) -> i64 {
        let (Ok(floor) | Err(floor)) =
            self.clock
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |floor| {
                    Some(now_ms.max(floor).saturating_add(1))
                });
        now_ms.max(floor)
    }
}
