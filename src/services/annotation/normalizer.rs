//! Offline text cleanup.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::dataset::{Value, CLEANED_SUMMARY_COLUMN, SUMMARY_COLUMN};

use super::annotator::RowAnnotator;
use super::types::AnnotationError;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Strip punctuation and symbols, lowercase, and trim surrounding whitespace.
///
/// Trimming runs last so that removing punctuation next to an edge cannot
/// leave whitespace that a second pass would remove.
pub fn normalize_text(text: &str) -> String {
    let stripped = NON_WORD.replace_all(text, "");
    stripped.to_lowercase().trim().to_string()
}

/// Annotator that writes a normalized copy of a text column.
pub struct TextNormalizer {
    source: String,
    target: String,
}

impl TextNormalizer {
    /// Normalizer from `SUMMARY` into `CLEANED_SUMMARY`.
    pub fn new() -> Self {
        Self::with_columns(SUMMARY_COLUMN, CLEANED_SUMMARY_COLUMN)
    }

    pub fn with_columns(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RowAnnotator for TextNormalizer {
    fn source_column(&self) -> &str {
        &self.source
    }

    fn target_column(&self) -> &str {
        &self.target
    }

    fn display_name(&self) -> &str {
        "Text cleanup"
    }

    async fn annotate(&self, text: &str) -> Result<Value, AnnotationError> {
        Ok(Value::Text(normalize_text(text)))
    }
}
