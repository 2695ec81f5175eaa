//! Core data models for translation

use serde::{Deserialize, Serialize};

/// Cell value recorded for a translation that was attempted and failed.
///
/// Distinct from the empty placeholder, which marks a cell that was never
/// attempted (for example when the source text is blank).
pub const FAILURE_SENTINEL: &str = "[Translation Failed]";

/// One configured backend model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Short registry key; also the output column prefix.
    pub key: String,
    /// Backend model identifier sent in the request body.
    pub id: String,
    /// Disabled models are excluded from fan-out and from the output header.
    pub enabled: bool,
}

/// One row read from the input dataset. Immutable once read.
#[derive(Debug, Clone)]
pub struct InputRecord {
    pub id: String,
    pub category: String,
    /// Source text to translate; may be empty.
    pub question: String,
}

/// Outcome of a single (text, model) translation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// Cleaned single-line translation.
    Translated(String),
    /// The call was attempted and did not produce a usable translation.
    Failed,
}

impl TranslationOutcome {
    /// Whether this outcome carries a translation.
    pub fn is_translated(&self) -> bool {
        matches!(self, TranslationOutcome::Translated(_))
    }

    /// Render for storage: the translation text, or the failure sentinel.
    pub fn render(&self) -> &str {
        match self {
            TranslationOutcome::Translated(text) => text,
            TranslationOutcome::Failed => FAILURE_SENTINEL,
        }
    }
}

/// One output row. `cells` align positionally with the registry's
/// enabled-model order; `None` means the call was never attempted.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub id: String,
    pub category: String,
    pub question: String,
    pub cells: Vec<Option<TranslationOutcome>>,
}

impl ResultRow {
    /// Build a skeleton row with every model cell still unattempted.
    pub fn skeleton(record: &InputRecord, model_count: usize) -> Self {
        Self {
            id: record.id.clone(),
            category: record.category.clone(),
            question: record.question.clone(),
            cells: vec![None; model_count],
        }
    }

    /// Render one model cell for storage; unattempted cells render empty.
    pub fn cell_text(&self, index: usize) -> &str {
        match self.cells.get(index) {
            Some(Some(outcome)) => outcome.render(),
            _ => "",
        }
    }
}
