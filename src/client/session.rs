//! # Canvas Session
//!
//! One participant's view of the shared canvas.
//!
//! The session keeps a local copy of the grid. It replaces that copy
//! wholesale on every poll, paints the participant's own writes into it
//! optimistically and mirrors the server's cooldown as a local countdown.
//!
//! ## Tasks
//!
//! - **poll loop**: fetches `GET /canvas` every `poll_interval`, starting
//!   immediately. A failed fetch keeps the current copy and the loop
//!   carries on.
//! - **countdown ticker**: advances the countdown every `countdown_tick`
//!   and announces the remaining time.
//!
//! Both tasks run under a `canvas_session` span tagged with a random
//! session id. They stop when the session is shut down or dropped.
//!
//! ## Events
//!
//! Everything the session learns is published as a [`SessionEvent`] on a
//! broadcast channel. Slow subscribers may miss events; the snapshot itself
//! is always available through [`CanvasSession::snapshot`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::api::{CanvasClient, PlaceResult};
use super::config::ClientConfig;
use super::countdown::{format_remaining, remaining_seconds, Countdown, CountdownTick};
use super::error::{ClientError, ClientResult};
use crate::shared::{validate_color, validate_coordinates, CanvasSnapshot, Pixel, PlacePixelRequest};

const EVENT_CAPACITY: usize = 64;

/// Notifications published by a running session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A poll replaced the local copy
    SnapshotReplaced { size: usize },
    /// A poll failed; the local copy is unchanged
    FetchFailed { message: String },
    PixelAccepted {
        x: usize,
        y: usize,
        cooldown_seconds: u64,
    },
    PixelRejected {
        x: usize,
        y: usize,
        retry_after_seconds: u64,
    },
    /// The write never got an answer; the cooldown is unchanged
    PlaceFailed { x: usize, y: usize, message: String },
    CooldownTick {
        remaining_seconds: u64,
        display: String,
    },
    CooldownFinished,
}

/// What became of a write the session sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOutcome {
    Accepted {
        pixel: Option<Pixel>,
        cooldown_seconds: u64,
    },
    Rejected { retry_after_seconds: u64 },
}

#[derive(Debug, Default)]
struct LocalCanvas {
    snapshot: Option<CanvasSnapshot>,
    /// Bumped on every wholesale replacement
    generation: u64,
}

#[derive(Debug)]
struct SessionShared {
    client: CanvasClient,
    username: Option<String>,
    local: RwLock<LocalCanvas>,
    countdown: RwLock<Countdown>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionShared {
    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    async fn poll_once(&self) -> ClientResult<()> {
        match self.client.fetch_canvas().await {
            Ok(snapshot) => {
                let size = snapshot.size;
                {
                    let mut local = self.local.write().await;
                    local.snapshot = Some(snapshot);
                    local.generation += 1;
                }
                debug!("[CanvasSession] Replaced local canvas ({}x{})", size, size);
                self.publish(SessionEvent::SnapshotReplaced { size });
                Ok(())
            }
            Err(e) => {
                warn!("[CanvasSession] Failed to fetch canvas: {}", e);
                self.publish(SessionEvent::FetchFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn tick_countdown(&self) {
        let tick = self.countdown.write().await.tick(Instant::now());
        match tick {
            CountdownTick::Idle => {}
            CountdownTick::Running { remaining } => self.publish(SessionEvent::CooldownTick {
                remaining_seconds: remaining_seconds(remaining),
                display: format_remaining(remaining),
            }),
            CountdownTick::Finished => {
                debug!("[CanvasSession] Cooldown finished");
                self.publish(SessionEvent::CooldownFinished);
            }
        }
    }

    async fn arm_countdown(&self, seconds: u64) {
        self.countdown.write().await.arm(Instant::now(), seconds);
    }

    /// Put back the cell an optimistic write replaced, unless a poll has
    /// already replaced the whole copy or the cell changed since
    async fn revert(&self, generation: u64, x: usize, y: usize, previous: Pixel, optimistic: &Pixel) {
        let mut local = self.local.write().await;
        if local.generation != generation {
            return;
        }
        if let Some(cell) = local.snapshot.as_mut().and_then(|s| s.pixel_mut(x, y)) {
            if cell == optimistic {
                *cell = previous;
            }
        }
    }
}

/// A participant's live connection to the canvas
pub struct CanvasSession {
    shared: Arc<SessionShared>,
    session_id: Uuid,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl CanvasSession {
    /// Start polling and counting down.
    ///
    /// Must be called from within a Tokio runtime. `username` is the
    /// participant identity; without one the session is read-only.
    pub fn start(config: ClientConfig, username: Option<String>) -> ClientResult<Self> {
        let poll_interval = config.poll_interval();
        let countdown_tick = config.countdown_tick();
        let client = CanvasClient::new(config)?;
        let username = username
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let shared = Arc::new(SessionShared {
            client,
            username,
            local: RwLock::new(LocalCanvas::default()),
            countdown: RwLock::new(Countdown::default()),
            events,
        });

        let session_id = Uuid::new_v4();
        let span = info_span!(
            "canvas_session",
            session_id = %session_id,
            participant = shared.username.as_deref().unwrap_or("-")
        );
        let (shutdown, shutdown_rx) = watch::channel(false);

        let tasks = vec![
            tokio::spawn(
                poll_loop(Arc::clone(&shared), poll_interval, shutdown_rx.clone())
                    .instrument(span.clone()),
            ),
            tokio::spawn(
                countdown_loop(Arc::clone(&shared), countdown_tick, shutdown_rx)
                    .instrument(span.clone()),
            ),
        ];

        span.in_scope(|| info!("[CanvasSession] Started against {}", shared.client.config().server_url()));

        Ok(Self {
            shared,
            session_id,
            shutdown,
            tasks,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn username(&self) -> Option<&str> {
        self.shared.username.as_deref()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    /// Current local copy, `None` until the first successful poll
    pub async fn snapshot(&self) -> Option<CanvasSnapshot> {
        self.shared.local.read().await.snapshot.clone()
    }

    /// Poll once now, outside the regular schedule
    pub async fn refresh(&self) -> ClientResult<()> {
        self.shared.poll_once().await
    }

    /// Time left before the next write may be sent
    pub async fn cooldown_remaining(&self) -> Option<Duration> {
        self.shared.countdown.read().await.remaining(Instant::now())
    }

    /// Paint one cell.
    ///
    /// Checks identity, the local countdown, that a canvas is loaded and the
    /// write itself, in that order, before anything is sent. The cell is
    /// painted locally before the request goes out. Any answer from the
    /// server (accepted or rate limited) arms the countdown; a transport
    /// failure leaves it alone.
    pub async fn place_pixel(&self, x: i64, y: i64, color: &str) -> ClientResult<PlaceOutcome> {
        let shared = &self.shared;
        let username = shared.username.clone().ok_or(ClientError::Unauthenticated)?;

        if let Some(remaining) = shared.countdown.read().await.remaining(Instant::now()) {
            return Err(ClientError::CooldownActive {
                remaining_seconds: remaining_seconds(remaining),
            });
        }

        let (ux, uy, generation, previous, optimistic) = {
            let mut local = shared.local.write().await;
            let generation = local.generation;
            let snapshot = local.snapshot.as_mut().ok_or(ClientError::CanvasNotLoaded)?;
            let (ux, uy) = validate_coordinates(x, y, snapshot.size)?;
            validate_color(color)?;

            let optimistic = Pixel {
                color: color.to_string(),
                last_updated: Utc::now().timestamp_millis(),
                last_updated_by: username.clone(),
            };
            let cell = snapshot.pixel_mut(ux, uy).ok_or(ClientError::CanvasNotLoaded)?;
            let previous = std::mem::replace(cell, optimistic.clone());
            (ux, uy, generation, previous, optimistic)
        };

        let request = PlacePixelRequest {
            x,
            y,
            color: color.to_string(),
            username,
        };

        match shared.client.place_pixel(&request).await {
            Ok(PlaceResult::Accepted {
                pixel,
                cooldown_seconds,
            }) => {
                shared.arm_countdown(cooldown_seconds).await;
                info!("[CanvasSession] Placed pixel at ({}, {})", ux, uy);
                shared.publish(SessionEvent::PixelAccepted {
                    x: ux,
                    y: uy,
                    cooldown_seconds,
                });
                Ok(PlaceOutcome::Accepted {
                    pixel,
                    cooldown_seconds,
                })
            }
            Ok(PlaceResult::RateLimited {
                retry_after_seconds,
            }) => {
                shared.arm_countdown(retry_after_seconds).await;
                if shared.client.config().revert_on_reject() {
                    shared.revert(generation, ux, uy, previous, &optimistic).await;
                }
                info!(
                    "[CanvasSession] Pixel at ({}, {}) rejected, retry in {}s",
                    ux, uy, retry_after_seconds
                );
                shared.publish(SessionEvent::PixelRejected {
                    x: ux,
                    y: uy,
                    retry_after_seconds,
                });
                Ok(PlaceOutcome::Rejected {
                    retry_after_seconds,
                })
            }
            Err(e) => {
                if shared.client.config().revert_on_reject() {
                    shared.revert(generation, ux, uy, previous, &optimistic).await;
                }
                warn!("[CanvasSession] Failed to place pixel at ({}, {}): {}", ux, uy, e);
                shared.publish(SessionEvent::PlaceFailed {
                    x: ux,
                    y: uy,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Stop both tasks and wait for them to finish
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!("[CanvasSession] Task ended abnormally: {}", e);
                }
            }
        }
        info!("[CanvasSession] Session {} stopped", self.session_id);
    }
}

impl Drop for CanvasSession {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

async fn poll_loop(shared: Arc<SessionShared>, period: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = interval.tick() => {}
        }
        tokio::select! {
            _ = shutdown.changed() => break,
            // Errors are already logged and published
            _ = shared.poll_once() => {}
        }
    }
    debug!("[CanvasSession] Poll loop stopped");
}

async fn countdown_loop(
    shared: Arc<SessionShared>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = interval.tick() => shared.tick_countdown().await,
        }
    }
    debug!("[CanvasSession] Countdown loop stopped");
}
