//! The confirmation gate
//!
//! A generic "propose action, get a user decision" capability. Presentation
//! is out of scope: implementations may render a modal dialog, read a
//! terminal prompt, or replay a script in tests. The contract is that
//! exactly one [`Decision`] is produced per request, edits to the protected
//! state stay blocked until it resolves, and an escape/cancel input always
//! resolves to [`Decision::Cancelled`].

/// Outcome of a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The user accepted the proposed action
    Confirmed,
    /// The user declined (including via escape/cancel inputs)
    Cancelled,
}

impl Decision {
    /// Whether the user accepted
    #[inline]
    #[must_use]
    pub fn is_confirmed(self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

/// A two-outcome prompt presented through a [`ConfirmationGate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    /// Short prompt title
    pub title: String,
    /// Explanatory body text
    pub body: String,
    /// Label for the confirming control
    pub confirm_label: String,
    /// Label for the cancelling control
    pub cancel_label: String,
    /// Whether confirming is destructive
    pub dangerous: bool,
}

impl ConfirmPrompt {
    /// Build a prompt
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        confirm_label: impl Into<String>,
        cancel_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            confirm_label: confirm_label.into(),
            cancel_label: cancel_label.into(),
            dangerous: false,
        }
    }

    /// Mark the confirming action as destructive
    #[inline]
    #[must_use]
    pub fn dangerous(mut self) -> Self {
        self.dangerous = true;
        self
    }

    /// The login-time restore prompt: continue with the saved draft, or
    /// discard it
    #[must_use]
    pub fn restore() -> Self {
        Self::new(
            "Restore progress",
            "We found saved progress on the server. Do you want to continue \
             where you left off, or discard it?",
            "Continue",
            "Discard",
        )
    }

    /// The submission prompt
    #[must_use]
    pub fn submit() -> Self {
        Self::new(
            "Confirm submission",
            "Submitting is irreversible in this demo. Do you want to submit now?",
            "Submit",
            "Go back",
        )
        .dangerous()
    }

    /// The exit prompt
    #[must_use]
    pub fn exit() -> Self {
        Self::new(
            "Confirm exit",
            "Exiting may interrupt your workflow. Your progress is saved, \
             but do you really want to exit now?",
            "Exit",
            "Stay",
        )
        .dangerous()
    }
}

/// Capability for asking the user to confirm an action
#[async_trait::async_trait]
pub trait ConfirmationGate: Send + Sync {
    /// Present a prompt and wait for the user's decision
    ///
    /// Exactly one decision is produced per request.
    async fn request(&self, prompt: ConfirmPrompt) -> Decision;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_prompt_offers_continue_or_discard() {
        let prompt = ConfirmPrompt::restore();
        assert_eq!(prompt.confirm_label, "Continue");
        assert_eq!(prompt.cancel_label, "Discard");
        assert!(!prompt.dangerous);
    }

    #[test]
    fn destructive_prompts_are_flagged() {
        assert!(ConfirmPrompt::submit().dangerous);
        assert!(ConfirmPrompt::exit().dangerous);
    }

    #[test]
    fn decision_helpers() {
        assert!(Decision::Confirmed.is_confirmed());
        assert!(!Decision::Cancelled.is_confirmed());
    }
}
