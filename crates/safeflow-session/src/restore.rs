//! The restore protocol
//!
//! On session activation with a resolved identity, check the draft store for
//! saved progress and let the user decide whether to resume it. Editing
//! stays suspended until the prompt resolves; every resolution hands focus
//! back to the answer field.

use tracing::{debug, warn};

use safeflow_identity::UserId;
use safeflow_store::{Draft, DraftStore, StoreError};

use crate::confirm::{ConfirmPrompt, ConfirmationGate, Decision};

/// Resolution of the login-time restore check
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    /// No stored draft; editing proceeds from the default form
    Fresh,
    /// The user chose to continue from the stored draft
    ///
    /// The stored record stays in place; the next autosave cycle overwrites
    /// it.
    Restored {
        /// The draft to resume from
        draft: Draft,
    },
    /// The user chose to discard the stored draft
    ///
    /// The remote record was deleted best-effort; editing proceeds from the
    /// default form either way.
    Discarded,
    /// The store could not be queried; editing proceeds as if no draft
    /// existed, with the error surfaced for display
    Degraded {
        /// Why the query failed
        error: StoreError,
    },
}

impl RestoreOutcome {
    /// Every resolution returns input focus to the primary answer field
    #[inline]
    #[must_use]
    pub fn focus_answer(&self) -> bool {
        true
    }

    /// The draft to resume from, when the user chose to continue
    #[inline]
    #[must_use]
    pub fn restored_draft(&self) -> Option<&Draft> {
        match self {
            Self::Restored { draft } => Some(draft),
            _ => None,
        }
    }
}

/// Run the restore protocol for a signed-in identity
///
/// Queries the store and, only if a draft exists, suspends on the restore
/// prompt until the user picks continue or discard. Store failures during
/// the query degrade to fresh-start behavior; failures during a discard are
/// swallowed (the deletion is best-effort and editing proceeds regardless).
pub async fn run_restore(
    store: &dyn DraftStore,
    gate: &dyn ConfirmationGate,
    user: &UserId,
) -> RestoreOutcome {
    let draft = match store.get(user).await {
        Ok(Some(draft)) => draft,
        Ok(None) => {
            debug!(user = %user, "no stored draft");
            return RestoreOutcome::Fresh;
        }
        Err(error) => {
            warn!(user = %user, error = %error, "draft lookup failed, starting fresh");
            return RestoreOutcome::Degraded { error };
        }
    };

    debug!(user = %user, version = draft.version, "stored draft found, prompting");
    match gate.request(ConfirmPrompt::restore()).await {
        Decision::Confirmed => RestoreOutcome::Restored { draft },
        Decision::Cancelled => {
            if let Err(error) = store.delete(user).await {
                warn!(user = %user, error = %error, "draft discard failed, proceeding anyway");
            }
            RestoreOutcome::Discarded
        }
    }
}
