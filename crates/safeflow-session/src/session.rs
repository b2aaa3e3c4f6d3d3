//! Exam session orchestration
//!
//! Ties the pieces together the way the exam UI drives them: login derives
//! an identity and runs the restore protocol, autosave starts once editing
//! begins, and submit/clear/exit pass through the confirmation gate before
//! touching the stored draft.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use safeflow_identity::UserId;
use safeflow_store::DraftStore;

use crate::autosave::{AutosaveConfig, AutosaveHandle, AutosaveStatus};
use crate::confirm::{ConfirmPrompt, ConfirmationGate, Decision};
use crate::error::SessionError;
use crate::exit_guard::should_warn_before_exit;
use crate::form::ExamForm;
use crate::restore::{run_restore, RestoreOutcome};

/// Announcement after a confirmed submission
const SUBMITTED_ANNOUNCEMENT: &str = "Submitted. Your server draft was cleared.";

/// Announcement after an explicit draft clear
const CLEARED_ANNOUNCEMENT: &str = "Server draft cleared.";

/// One logged-in exam-taking session
///
/// Owns the form state and, while signed in, the autosave loop writing it
/// to the draft store. Exactly one identity is active at a time; signing in
/// again requires a confirmed exit first.
pub struct ExamSession {
    store: Arc<dyn DraftStore>,
    gate: Arc<dyn ConfirmationGate>,
    config: AutosaveConfig,
    form: ExamForm,
    active: Option<Active>,
    announcement: Option<String>,
}

struct Active {
    user: UserId,
    form_tx: watch::Sender<ExamForm>,
    autosave: AutosaveHandle,
}

impl ExamSession {
    /// Create a signed-out session over a store and a confirmation gate
    #[must_use]
    pub fn new(store: Arc<dyn DraftStore>, gate: Arc<dyn ConfirmationGate>) -> Self {
        Self {
            store,
            gate,
            config: AutosaveConfig::default(),
            form: ExamForm::default(),
            active: None,
            announcement: None,
        }
    }

    /// Override the autosave cadence
    #[inline]
    #[must_use]
    pub fn with_autosave_config(mut self, config: AutosaveConfig) -> Self {
        self.config = config;
        self
    }

    /// Sign in with an email, run the restore protocol, and start autosaving
    ///
    /// The returned outcome says how editing begins: fresh, resumed from the
    /// stored draft, after a discard, or degraded because the store could
    /// not be queried (the error is also surfaced via
    /// [`ExamSession::announcement`]). Either way, focus belongs on the
    /// answer field afterwards.
    ///
    /// # Errors
    /// - [`SessionError::AlreadyActive`] if a session is signed in
    /// - [`SessionError::Identity`] if the email is unusable
    pub async fn login(&mut self, email: &str) -> Result<RestoreOutcome, SessionError> {
        if self.active.is_some() {
            return Err(SessionError::AlreadyActive);
        }

        let user = UserId::derive(email)?;
        self.announcement = None;

        let outcome = run_restore(self.store.as_ref(), self.gate.as_ref(), &user).await;
        match &outcome {
            RestoreOutcome::Fresh => {}
            RestoreOutcome::Restored { draft } => {
                self.form = ExamForm::from_draft_data(&draft.data);
                info!(user = %user, version = draft.version, "draft restored");
            }
            RestoreOutcome::Discarded => {
                self.form.reset_answers();
            }
            RestoreOutcome::Degraded { error } => {
                self.announcement = Some(error.to_string());
            }
        }

        let (form_tx, form_rx) = watch::channel(self.form.clone());
        let autosave =
            AutosaveHandle::spawn(Arc::clone(&self.store), user.clone(), form_rx, self.config);

        debug!(user = %user, "session activated");
        self.active = Some(Active {
            user,
            form_tx,
            autosave,
        });
        Ok(outcome)
    }

    /// Update the answer text
    pub fn set_answer(&mut self, answer: impl Into<String>) {
        self.form.answer = answer.into();
        self.publish_form();
    }

    /// Update the final-answer agreement flag
    pub fn set_agree(&mut self, agree: bool) {
        self.form.agree = agree;
        self.publish_form();
    }

    /// Request an immediate save of the current form
    ///
    /// # Errors
    /// Returns [`SessionError::NotActive`] when signed out.
    pub async fn save_now(&self) -> Result<(), SessionError> {
        let active = self.active.as_ref().ok_or(SessionError::NotActive)?;
        active.autosave.save_now().await;
        Ok(())
    }

    /// Submit the exam
    ///
    /// Refused outright until the answer is non-blank and the agreement flag
    /// is set. Then the submission prompt decides: cancelling returns
    /// `Ok(false)` with nothing changed; confirming clears the stored draft
    /// (best-effort), resets the answer fields, and returns `Ok(true)`.
    /// The session stays signed in either way.
    ///
    /// # Errors
    /// - [`SessionError::NotActive`] when signed out
    /// - [`SessionError::AnswerRequired`] / [`SessionError::AgreementRequired`]
    ///   when the form is not ready to submit
    pub async fn submit(&mut self) -> Result<bool, SessionError> {
        let active = self.active.as_ref().ok_or(SessionError::NotActive)?;
        if self.form.answer.trim().is_empty() {
            return Err(SessionError::AnswerRequired);
        }
        if !self.form.agree {
            return Err(SessionError::AgreementRequired);
        }

        if self.gate.request(ConfirmPrompt::submit()).await == Decision::Cancelled {
            return Ok(false);
        }

        if let Err(error) = self.store.delete(&active.user).await {
            warn!(user = %active.user, error = %error, "draft cleanup after submit failed");
        }
        self.form.reset_answers();
        self.publish_form();
        self.announcement = Some(SUBMITTED_ANNOUNCEMENT.to_string());
        info!("exam submitted");
        Ok(true)
    }

    /// Clear the stored draft and reset the answer fields, without a prompt
    ///
    /// The deletion is best-effort, matching the restore protocol's discard.
    ///
    /// # Errors
    /// Returns [`SessionError::NotActive`] when signed out.
    pub async fn clear_draft(&mut self) -> Result<(), SessionError> {
        let active = self.active.as_ref().ok_or(SessionError::NotActive)?;

        if let Err(error) = self.store.delete(&active.user).await {
            warn!(user = %active.user, error = %error, "draft clear failed");
        }
        self.form.reset_answers();
        self.publish_form();
        self.announcement = Some(CLEARED_ANNOUNCEMENT.to_string());
        Ok(())
    }

    /// Leave the session, behind the exit prompt
    ///
    /// Cancelling keeps everything running and returns `Ok(false)`.
    /// Confirming stops the autosave loop (waiting for any in-flight save),
    /// signs the identity out, and returns `Ok(true)`. Form content is kept;
    /// the stored draft (if any) stays on the server.
    ///
    /// # Errors
    /// Returns [`SessionError::NotActive`] when signed out.
    pub async fn exit(&mut self) -> Result<bool, SessionError> {
        if self.active.is_none() {
            return Err(SessionError::NotActive);
        }

        if self.gate.request(ConfirmPrompt::exit()).await == Decision::Cancelled {
            return Ok(false);
        }

        if let Some(active) = self.active.take() {
            active.autosave.stop().await;
            debug!(user = %active.user, "session deactivated");
        }
        self.announcement = None;
        Ok(true)
    }

    /// Whether leaving right now deserves the advisory warning
    #[inline]
    #[must_use]
    pub fn exit_warning_needed(&self) -> bool {
        should_warn_before_exit(self.active.is_some(), &self.form)
    }

    /// Current form state
    #[inline]
    #[must_use]
    pub fn form(&self) -> &ExamForm {
        &self.form
    }

    /// The signed-in identity, if any
    #[inline]
    #[must_use]
    pub fn user(&self) -> Option<&UserId> {
        self.active.as_ref().map(|a| &a.user)
    }

    /// Whether a session is signed in
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Latest autosave status, while signed in
    #[inline]
    #[must_use]
    pub fn autosave_status(&self) -> Option<AutosaveStatus> {
        self.active.as_ref().map(|a| a.autosave.status())
    }

    /// The last status line to surface to the user, if any
    #[inline]
    #[must_use]
    pub fn announcement(&self) -> Option<&str> {
        self.announcement.as_deref()
    }

    /// Push the current form into the autosave loop's snapshot channel
    fn publish_form(&self) {
        if let Some(active) = &self.active {
            active.form_tx.send_replace(self.form.clone());
        }
    }
}
