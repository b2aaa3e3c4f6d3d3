//! The exam form model
//!
//! A small fixed-shape form: exam title and question (presented to the
//! user), the answer text, and the final-answer agreement flag. Serialized
//! with camelCase field names so snapshots round-trip against previously
//! stored drafts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use safeflow_store::DraftData;

/// Exam title shown by the demo
pub const DEFAULT_EXAM_TITLE: &str = "Accessible Web Basics";

/// Exam question shown by the demo
pub const DEFAULT_QUESTION: &str =
    "Explain how you would build an accessible confirmation dialog.";

/// In-progress exam form state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamForm {
    /// Exam title
    pub exam_title: String,
    /// The question being answered
    pub question: String,
    /// Free-text answer
    pub answer: String,
    /// "I confirm this is my final answer"
    pub agree: bool,
}

impl Default for ExamForm {
    fn default() -> Self {
        Self {
            exam_title: DEFAULT_EXAM_TITLE.to_string(),
            question: DEFAULT_QUESTION.to_string(),
            answer: String::new(),
            agree: false,
        }
    }
}

impl ExamForm {
    /// Clear the answer and agreement, keeping the exam prompt intact
    pub fn reset_answers(&mut self) {
        self.answer.clear();
        self.agree = false;
    }

    /// Whether the form holds work worth warning about
    ///
    /// Non-blank answer text or a set agreement flag counts as meaningful.
    #[inline]
    #[must_use]
    pub fn has_meaningful_work(&self) -> bool {
        !self.answer.trim().is_empty() || self.agree
    }

    /// Snapshot the form as a draft payload
    #[must_use]
    pub fn to_draft_data(&self) -> DraftData {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => DraftData::from(map),
            // A plain struct always serializes to an object; this arm only
            // keeps the conversion infallible.
            _ => DraftData::new(),
        }
    }

    /// Rebuild form state from a stored draft payload
    ///
    /// Missing fields take their defaults; a payload that does not fit the
    /// form shape at all falls back to the default form.
    #[must_use]
    pub fn from_draft_data(data: &DraftData) -> Self {
        serde_json::from_value(Value::from(data.clone())).unwrap_or_default()
    }
}
