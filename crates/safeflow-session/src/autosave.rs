//! The autosave loop
//!
//! A timer-driven state machine that periodically commits the current form
//! snapshot to the draft store. One loop exists per signed-in session and
//! runs as a dedicated tokio task owned by [`AutosaveHandle`]; dropping or
//! stopping the handle tears the timer down, so no save can fire after
//! logout.
//!
//! # State machine
//! - `Idle`: disabled; no timer exists
//! - `Armed`: enabled, no save pending
//! - `Saving`: enabled, exactly one save in flight
//!
//! `Armed -> Saving` happens on a timer tick or an explicit
//! [`AutosaveHandle::save_now`] request. `Saving -> Armed` happens when the
//! store write resolves, success or failure. The loop task awaits each save
//! inline before processing the next tick, which makes the
//! at-most-one-in-flight guard structural: a slow backend absorbs ticks
//! instead of stacking overlapping writes (and can therefore pause
//! autosaving until it responds).

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use safeflow_identity::UserId;
use safeflow_store::DraftStore;

use crate::form::ExamForm;

/// Autosave cadence configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Time between save attempts
    pub interval: Duration,
}

impl AutosaveConfig {
    /// Default save cadence
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(3000);

    /// Create a configuration with a custom interval
    #[inline]
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

/// Phase of the autosave state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosavePhase {
    /// Disabled; the loop has stopped and released its timer
    Idle,
    /// Enabled with no save pending
    Armed,
    /// Enabled with one save in flight
    Saving,
}

/// Observable autosave state, published after every transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutosaveStatus {
    /// Current phase
    pub phase: AutosavePhase,
    /// Commit time of the last successful save, if any
    ///
    /// A failed save leaves this untouched.
    pub last_saved_at: Option<DateTime<Utc>>,
    /// Version the store assigned to the last successful save
    pub last_version: Option<u64>,
    /// Error from the most recent failed save, cleared by the next attempt
    pub last_error: Option<String>,
}

impl AutosaveStatus {
    fn armed() -> Self {
        Self {
            phase: AutosavePhase::Armed,
            last_saved_at: None,
            last_version: None,
            last_error: None,
        }
    }
}

enum Command {
    SaveNow,
    Stop,
}

/// Owner of a running autosave loop
///
/// Spawned per signed-in session. The loop keeps running until
/// [`AutosaveHandle::stop`] is awaited or the handle is dropped; both
/// release the timer so nothing writes after logout.
#[derive(Debug)]
pub struct AutosaveHandle {
    status_rx: watch::Receiver<AutosaveStatus>,
    cmd_tx: mpsc::Sender<Command>,
    task: Option<JoinHandle<()>>,
}

impl AutosaveHandle {
    /// Start the loop for a signed-in identity
    ///
    /// `form_rx` carries the live form snapshot; the loop serializes
    /// whatever it holds at each save. The first tick fires one full
    /// interval after activation: enabling autosave does not itself force
    /// a save.
    #[must_use]
    pub fn spawn(
        store: Arc<dyn DraftStore>,
        user: UserId,
        form_rx: watch::Receiver<ExamForm>,
        config: AutosaveConfig,
    ) -> Self {
        let (status_tx, status_rx) = watch::channel(AutosaveStatus::armed());
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let task = tokio::spawn(run_loop(
            store,
            user,
            form_rx,
            cmd_rx,
            status_tx,
            config.interval,
        ));

        Self {
            status_rx,
            cmd_tx,
            task: Some(task),
        }
    }

    /// Current status snapshot
    #[inline]
    #[must_use]
    pub fn status(&self) -> AutosaveStatus {
        self.status_rx.borrow().clone()
    }

    /// Subscribe to status transitions
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AutosaveStatus> {
        self.status_rx.clone()
    }

    /// Request an immediate save
    ///
    /// Honored only when no save is already in flight; requests arriving
    /// while one is are dropped by the in-flight guard, the same as timer
    /// ticks.
    pub async fn save_now(&self) {
        let _ = self.cmd_tx.send(Command::SaveNow).await;
    }

    /// Stop the loop, waiting for any in-flight save to resolve
    ///
    /// In-flight saves are never cancelled; they complete or error on their
    /// own schedule. After this returns the status is
    /// [`AutosavePhase::Idle`] and the timer is gone.
    pub async fn stop(mut self) {
        let _ = self.cmd_tx.send(Command::Stop).await;
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_loop(
    store: Arc<dyn DraftStore>,
    user: UserId,
    form_rx: watch::Receiver<ExamForm>,
    mut cmd_rx: mpsc::Receiver<Command>,
    status_tx: watch::Sender<AutosaveStatus>,
    period: Duration,
) {
    // Skip the activation instant: the first tick lands one period later.
    // Ticks that elapse while a save is in flight are skipped outright, not
    // queued behind it.
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    debug!(user = %user, period_ms = period.as_millis() as u64, "autosave armed");

    'running: loop {
        tokio::select! {
            _ = ticker.tick() => {
                save_once(store.as_ref(), &user, &form_rx, &status_tx).await;
            }
            cmd = cmd_rx.recv() => match cmd {
                Some(Command::SaveNow) => {
                    save_once(store.as_ref(), &user, &form_rx, &status_tx).await;
                }
                Some(Command::Stop) | None => break,
            },
        }

        // Save requests that arrived while a save was in flight are dropped
        // by the in-flight guard, not queued behind it.
        loop {
            match cmd_rx.try_recv() {
                Ok(Command::SaveNow) => {}
                Ok(Command::Stop) => break 'running,
                Err(_) => break,
            }
        }
    }

    status_tx.send_modify(|status| status.phase = AutosavePhase::Idle);
    debug!(user = %user, "autosave stopped");
}

/// One Armed -> Saving -> Armed cycle
async fn save_once(
    store: &dyn DraftStore,
    user: &UserId,
    form_rx: &watch::Receiver<ExamForm>,
    status_tx: &watch::Sender<AutosaveStatus>,
) {
    status_tx.send_modify(|status| {
        status.phase = AutosavePhase::Saving;
        status.last_error = None;
    });

    let snapshot = form_rx.borrow().clone();
    match store.put(user, snapshot.to_draft_data()).await {
        Ok(draft) => {
            status_tx.send_modify(|status| {
                status.phase = AutosavePhase::Armed;
                status.last_saved_at = Some(draft.saved_at);
                status.last_version = Some(draft.version);
                status.last_error = None;
            });
        }
        Err(err) => {
            // Transient by policy: keep the last successful timestamp and
            // wait for the next tick rather than retrying immediately.
            warn!(user = %user, error = %err, "autosave failed");
            status_tx.send_modify(|status| {
                status.phase = AutosavePhase::Armed;
                status.last_error = Some(err.to_string());
            });
        }
    }
}
