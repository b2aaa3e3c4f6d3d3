//! Testing utilities for the SafeFlow workspace
//!
//! Shared fixtures: scripted confirmation gates, failure-injecting and
//! instrumented store wrappers, and sample draft payloads.

#![allow(missing_docs)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::json;

use safeflow_identity::UserId;
use safeflow_session::{ConfirmPrompt, ConfirmationGate, Decision};
use safeflow_store::{Draft, DraftData, DraftStore, StoreError};

/// Build a draft payload shaped like a form snapshot.
pub fn draft_payload(answer: &str) -> DraftData {
    DraftData::try_from(json!({
        "examTitle": "Accessible Web Basics",
        "question": "Explain how you would build an accessible confirmation dialog.",
        "answer": answer,
        "agree": false,
    }))
    .expect("object literal")
}

/// Confirmation gate that replays a fixed script of decisions.
///
/// Records every prompt it receives so tests can assert on wording and
/// ordering. Panics if asked for more decisions than were scripted.
pub struct ScriptedGate {
    script: Mutex<VecDeque<Decision>>,
    seen: Mutex<Vec<ConfirmPrompt>>,
}

impl ScriptedGate {
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            script: Mutex::new(decisions.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<ConfirmPrompt> {
        self.seen.lock().clone()
    }
}

#[async_trait::async_trait]
impl ConfirmationGate for ScriptedGate {
    async fn request(&self, prompt: ConfirmPrompt) -> Decision {
        self.seen.lock().push(prompt);
        self.script
            .lock()
            .pop_front()
            .expect("gate script exhausted: unexpected prompt")
    }
}

/// Confirmation gate that always answers the same way.
pub struct AlwaysGate(pub Decision);

impl AlwaysGate {
    pub fn confirm() -> Self {
        Self(Decision::Confirmed)
    }

    pub fn cancel() -> Self {
        Self(Decision::Cancelled)
    }
}

#[async_trait::async_trait]
impl ConfirmationGate for AlwaysGate {
    async fn request(&self, _prompt: ConfirmPrompt) -> Decision {
        self.0
    }
}

/// Store wrapper that fails a scripted number of operations.
///
/// `fail_next(n)` makes the next `n` operations (of any kind) return
/// [`StoreError::Unavailable`]; `fail_after(k, n)` lets `k` operations
/// through first. Operations beyond the script pass through untouched.
pub struct FlakyStore<S> {
    inner: S,
    pass_before_failing: AtomicUsize,
    failures_left: AtomicUsize,
}

impl<S> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pass_before_failing: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(0),
        }
    }

    /// Fail the next `n` operations.
    pub fn fail_next(&self, n: usize) {
        self.fail_after(0, n);
    }

    /// Let `pass` operations through, then fail the following `n`.
    pub fn fail_after(&self, pass: usize, n: usize) {
        self.pass_before_failing.store(pass, Ordering::SeqCst);
        self.failures_left.store(n, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if decrement_if_positive(&self.pass_before_failing) {
            return Ok(());
        }
        if decrement_if_positive(&self.failures_left) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

fn decrement_if_positive(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_sub(1))
        .is_ok()
}

#[async_trait::async_trait]
impl<S: DraftStore> DraftStore for FlakyStore<S> {
    async fn get(&self, user: &UserId) -> Result<Option<Draft>, StoreError> {
        self.check()?;
        self.inner.get(user).await
    }

    async fn put(&self, user: &UserId, data: DraftData) -> Result<Draft, StoreError> {
        self.check()?;
        self.inner.put(user, data).await
    }

    async fn delete(&self, user: &UserId) -> Result<(), StoreError> {
        self.check()?;
        self.inner.delete(user).await
    }
}

/// Store wrapper that counts operations and tracks put concurrency.
///
/// An optional per-put delay simulates a slow backend, which is how tests
/// observe that save attempts never overlap.
pub struct RecordingStore<S> {
    inner: S,
    put_delay: Option<Duration>,
    puts: AtomicUsize,
    deletes: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl<S> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            put_delay: None,
            puts: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Make every put take `delay` before reaching the inner store.
    pub fn with_put_delay(inner: S, delay: Duration) -> Self {
        let mut store = Self::new(inner);
        store.put_delay = Some(delay);
        store
    }

    /// Completed puts.
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Completed deletes.
    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Highest number of puts that were ever in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl<S: DraftStore> DraftStore for RecordingStore<S> {
    async fn get(&self, user: &UserId) -> Result<Option<Draft>, StoreError> {
        self.inner.get(user).await
    }

    async fn put(&self, user: &UserId, data: DraftData) -> Result<Draft, StoreError> {
        let concurrent = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(concurrent, Ordering::SeqCst);

        if let Some(delay) = self.put_delay {
            tokio::time::sleep(delay).await;
        }
        let result = self.inner.put(user, data).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.puts.fetch_add(1, Ordering::SeqCst);
        result
    }

    async fn delete(&self, user: &UserId) -> Result<(), StoreError> {
        let result = self.inner.delete(user).await;
        self.deletes.fetch_add(1, Ordering::SeqCst);
        result
    }
}
