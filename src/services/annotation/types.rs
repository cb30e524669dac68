//! Types shared across row annotators.

use thiserror::Error;

use crate::dataset::DatasetError;
use crate::llm::LlmError;

/// Events emitted while a batch runs.
/// Used by the CLI to drive progress bars and status messages.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationEvent {
    Started {
        annotator: String,
        total_rows: usize,
    },
    RowStarted {
        row: usize,
        preview: String,
    },
    RowCompleted {
        row: usize,
    },
    /// Source cell was missing; the derived cell is missing too.
    RowSkipped {
        row: usize,
    },
    RowFailed {
        row: usize,
        error: String,
    },
    Complete {
        succeeded: usize,
        skipped: usize,
        failed: usize,
    },
}

/// Result of a batch run that wrote its derived column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchAnnotationResult {
    pub column: String,
    pub succeeded: usize,
    pub skipped: usize,
}

/// Errors from row annotators.
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// The external service call failed (network, auth, rate limit, timeout).
    #[error("Upstream service failed: {0}")]
    Upstream(#[from] LlmError),

    /// The service replied with something that is not a number.
    #[error("Could not parse a score from reply {reply:?}")]
    Parse { reply: String },

    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl AnnotationError {
    /// Row-level failures abort the batch; this tells callers whether the
    /// cause was the remote service rather than local input.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AnnotationError::Upstream(_)
                | AnnotationError::Parse { .. }
                | AnnotationError::BackendNotAvailable(_)
        )
    }
}
