//! Exam session engine
//!
//! The client-side core of SafeFlow: a headless [`ExamSession`] that binds a
//! derived identity to a [`DraftStore`](safeflow_store::DraftStore) backing
//! and drives the flows around it:
//!
//! - the **autosave loop** ([`autosave`]): a timer-driven state machine
//!   committing form snapshots with an at-most-one-in-flight guarantee
//! - the **restore protocol** ([`restore`]): the login-time
//!   check-and-prompt flow for resuming a previous draft
//! - the **confirmation gate** ([`confirm`]): the generic user-decision
//!   checkpoint used by restore, submit, and exit
//! - the **exit guard** ([`exit_guard`]): the advisory warning before
//!   leaving with meaningful work

pub mod autosave;
pub mod confirm;
pub mod error;
pub mod exit_guard;
pub mod form;
pub mod restore;
pub mod session;

pub use autosave::{AutosaveConfig, AutosaveHandle, AutosavePhase, AutosaveStatus};
pub use confirm::{ConfirmPrompt, ConfirmationGate, Decision};
pub use error::SessionError;
pub use form::ExamForm;
pub use restore::{run_restore, RestoreOutcome};
pub use session::ExamSession;
