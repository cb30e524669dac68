//! Per-user session state.
//!
//! A session moves `Empty -> Loaded -> Annotated -> Presented`. Loading
//! again resets it to `Loaded`, or to `Empty` when the load fails.
//! Precondition violations (annotating or viewing before a load) come back
//! as warning notices, never as errors.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::dataset::{Dataset, DatasetError, SampleSize};
use crate::services::aggregate::{build_view, AggregateError, AggregateView, ProductFilter};
use crate::services::annotation::{AnnotationError, AnnotationManager, RowAnnotator};

/// Severity of a notice shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A user-visible message produced by a session action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors from session actions that the caller must surface.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl SessionError {
    /// Notice to show for this error.
    pub fn to_notice(&self) -> Notice {
        Notice::error(self.to_string())
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Nothing loaded; no view exists.
    #[default]
    Empty,
    Loaded {
        dataset: Dataset,
    },
    /// At least one derived column has been written.
    Annotated {
        dataset: Dataset,
        columns: BTreeSet<String>,
    },
    /// A view has been computed for the current selection.
    Presented {
        dataset: Dataset,
        columns: BTreeSet<String>,
        filter: ProductFilter,
    },
}

impl SessionState {
    pub fn phase(&self) -> &'static str {
        match self {
            SessionState::Empty => "empty",
            SessionState::Loaded { .. } => "loaded",
            SessionState::Annotated { .. } => "annotated",
            SessionState::Presented { .. } => "presented",
        }
    }

    fn dataset(&self) -> Option<&Dataset> {
        match self {
            SessionState::Empty => None,
            SessionState::Loaded { dataset }
            | SessionState::Annotated { dataset, .. }
            | SessionState::Presented { dataset, .. } => Some(dataset),
        }
    }

    /// Split into the dataset and the derived columns written so far.
    fn into_parts(self) -> Option<(Dataset, BTreeSet<String>)> {
        match self {
            SessionState::Empty => None,
            SessionState::Loaded { dataset } => Some((dataset, BTreeSet::new())),
            SessionState::Annotated { dataset, columns }
            | SessionState::Presented {
                dataset, columns, ..
            } => Some((dataset, columns)),
        }
    }
}

/// Explicit session object holding the current dataset or nothing.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> &'static str {
        self.state.phase()
    }

    /// Current dataset, or `None` while empty.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.state.dataset()
    }

    /// Derived columns written since the last load.
    pub fn annotated_columns(&self) -> Vec<String> {
        match &self.state {
            SessionState::Annotated { columns, .. } | SessionState::Presented { columns, .. } => {
                columns.iter().cloned().collect()
            }
            _ => Vec::new(),
        }
    }

    /// Load a dataset, optionally sampling `sample` records.
    ///
    /// The sample size is validated before the file is touched. Any failure
    /// leaves the session empty.
    pub fn load(
        &mut self,
        path: &Path,
        delimiter: u8,
        sample: Option<usize>,
    ) -> Result<Notice, SessionError> {
        let result = match sample {
            Some(n) => SampleSize::new(n)
                .and_then(|size| Dataset::load_sample(path, delimiter, size)),
            None => Dataset::load_with_delimiter(path, delimiter),
        };

        match result {
            Ok(dataset) => {
                info!("Session loaded {} records", dataset.len());
                let notice = Notice::success(format!(
                    "Loaded {} reviews from {}",
                    dataset.len(),
                    path.display()
                ));
                self.state = SessionState::Loaded { dataset };
                Ok(notice)
            }
            Err(e) => {
                warn!("Load failed, session reset: {}", e);
                self.state = SessionState::Empty;
                Err(e.into())
            }
        }
    }

    /// Load an already-built dataset.
    pub fn replace(&mut self, dataset: Dataset) -> Notice {
        let notice = Notice::success(format!("Loaded {} reviews", dataset.len()));
        self.state = SessionState::Loaded { dataset };
        notice
    }

    /// Run an annotator over every record of the current dataset.
    ///
    /// While empty this returns a warning notice. The batch runs on a copy
    /// and the state is only replaced once it succeeds, so a failed or
    /// cancelled batch leaves the session as it was.
    pub async fn annotate(
        &mut self,
        manager: &AnnotationManager,
        annotator: &dyn RowAnnotator,
    ) -> Result<Notice, SessionError> {
        let Some(current) = self.state.dataset() else {
            return Ok(Notice::warning("Please ingest the dataset first."));
        };
        let mut dataset = current.clone();

        let result = manager.run(&mut dataset, annotator).await?;

        let mut columns: BTreeSet<String> = self.annotated_columns().into_iter().collect();
        columns.insert(result.column.clone());
        self.state = SessionState::Annotated { dataset, columns };
        Ok(Notice::success(format!(
            "{} complete: {} rows written to {}",
            annotator.display_name(),
            result.succeeded,
            result.column
        )))
    }

    /// Compute the aggregate view of `column` for `filter`.
    ///
    /// Returns no view plus a warning while empty or when `column` has not
    /// been derived yet.
    pub fn view(
        &mut self,
        filter: &ProductFilter,
        column: &str,
    ) -> (Option<AggregateView>, Option<Notice>) {
        let Some(dataset) = self.state.dataset() else {
            return (
                None,
                Some(Notice::warning(
                    "No data loaded. Please ingest the dataset first.",
                )),
            );
        };
        if !dataset.has_column(column) {
            return (
                None,
                Some(Notice::warning(format!(
                    "Column {} not available yet. Run the annotation step first.",
                    column
                ))),
            );
        }

        match build_view(dataset, column, filter) {
            Ok(view) => {
                if let Some((dataset, columns)) = std::mem::take(&mut self.state).into_parts() {
                    self.state = SessionState::Presented {
                        dataset,
                        columns,
                        filter: filter.clone(),
                    };
                }
                (Some(view), None)
            }
            Err(AggregateError::NotNumeric(column)) => (
                None,
                Some(Notice::warning(format!(
                    "Column {} has no numeric values to chart.",
                    column
                ))),
            ),
            Err(e) => (None, Some(SessionError::from(e).to_notice())),
        }
    }
}
