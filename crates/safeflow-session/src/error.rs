//! Error types for the session engine

use safeflow_identity::IdentityError;

/// Errors raised by [`ExamSession`](crate::ExamSession) operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Login was attempted with an unusable email
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The session is already signed in
    #[error("already signed in")]
    AlreadyActive,

    /// The operation requires a signed-in session
    #[error("not signed in")]
    NotActive,

    /// Submission requires a non-empty answer
    #[error("an answer is required before submitting")]
    AnswerRequired,

    /// Submission requires the final-answer confirmation
    #[error("the final-answer confirmation is required before submitting")]
    AgreementRequired,
}
