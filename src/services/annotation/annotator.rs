//! RowAnnotator trait: shared abstraction for per-row transforms.

use async_trait::async_trait;

use crate::dataset::Value;

use super::types::AnnotationError;

/// A function from one text cell to one derived cell.
///
/// Implementations wrap a specific transform (text cleanup, LLM scoring) and
/// expose it through a uniform interface so the `AnnotationManager` can
/// apply any of them to a dataset column.
#[async_trait]
pub trait RowAnnotator: Send + Sync {
    /// Column the input text is read from.
    fn source_column(&self) -> &str;

    /// Column the derived values are written to.
    fn target_column(&self) -> &str;

    /// Human-readable name for progress output.
    fn display_name(&self) -> &str;

    /// Whether each row costs a call to a remote service.
    fn is_remote(&self) -> bool {
        false
    }

    /// Whether the backend is ready to run.
    async fn is_available(&self) -> bool {
        true
    }

    /// Human-readable reason when `is_available` returns false.
    fn availability_hint(&self) -> String {
        String::new()
    }

    /// Derive the value for a single row.
    async fn annotate(&self, text: &str) -> Result<Value, AnnotationError>;
}
