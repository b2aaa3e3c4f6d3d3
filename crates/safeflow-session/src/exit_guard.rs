//! The exit guard
//!
//! Best-effort warning before the user leaves with unsaved or meaningful
//! work. The warning is advisory only: runtimes differ in whether leaving
//! can be interrupted at all, so callers may surface the signal but must
//! never rely on it to block exit.

use crate::form::ExamForm;

/// Whether leaving now deserves a warning
///
/// Warns only while autosave is enabled and the form holds meaningful work
/// (non-blank answer text or a set agreement flag). A signed-out or empty
/// session leaves silently.
#[inline]
#[must_use]
pub fn should_warn_before_exit(autosave_enabled: bool, form: &ExamForm) -> bool {
    autosave_enabled && form.has_meaningful_work()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_warning_when_autosave_is_disabled() {
        let mut form = ExamForm::default();
        form.answer = "unsaved essay".to_string();
        assert!(!should_warn_before_exit(false, &form));
    }

    #[test]
    fn no_warning_for_empty_work() {
        assert!(!should_warn_before_exit(true, &ExamForm::default()));
    }

    #[test]
    fn warns_for_answer_text() {
        let mut form = ExamForm::default();
        form.answer = "half-finished thought".to_string();
        assert!(should_warn_before_exit(true, &form));
    }

    #[test]
    fn warns_for_agreement_alone() {
        let mut form = ExamForm::default();
        form.agree = true;
        assert!(should_warn_before_exit(true, &form));
    }
}
