//! Annotation manager: applies any `RowAnnotator` across a dataset column.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::dataset::{Dataset, DatasetError, Value};
use crate::utils::truncate_chars;

use super::annotator::RowAnnotator;
use super::types::{AnnotationError, AnnotationEvent, BatchAnnotationResult};

/// Characters of review text carried in `RowStarted` events.
const PREVIEW_CHARS: usize = 40;

/// Runs annotators row by row over a dataset.
///
/// Rows are processed sequentially. The first failing row aborts the batch
/// and the dataset is left untouched: the derived column is only written
/// once every row has a value.
#[derive(Default)]
pub struct AnnotationManager {
    event_tx: Option<mpsc::Sender<AnnotationEvent>>,
}

impl AnnotationManager {
    pub fn new() -> Self {
        Self { event_tx: None }
    }

    /// Emit progress events on `event_tx`.
    ///
    /// The caller owns the receiver and decides how to present progress.
    /// It must keep draining it while a batch runs.
    pub fn with_events(event_tx: mpsc::Sender<AnnotationEvent>) -> Self {
        Self {
            event_tx: Some(event_tx),
        }
    }

    async fn emit(&self, event: AnnotationEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event).await;
        }
    }

    /// Derive `annotator.target_column()` from `annotator.source_column()`.
    pub async fn run(
        &self,
        dataset: &mut Dataset,
        annotator: &dyn RowAnnotator,
    ) -> Result<BatchAnnotationResult, AnnotationError> {
        let source = annotator.source_column();
        if !dataset.has_column(source) {
            return Err(DatasetError::MissingColumn(source.to_string()).into());
        }

        if annotator.is_remote() && !annotator.is_available().await {
            self.emit(AnnotationEvent::Complete {
                succeeded: 0,
                skipped: 0,
                failed: 0,
            })
            .await;
            return Err(AnnotationError::BackendNotAvailable(format!(
                "{}: {}",
                annotator.display_name(),
                annotator.availability_hint()
            )));
        }

        let inputs = dataset.column_text(source)?;

        self.emit(AnnotationEvent::Started {
            annotator: annotator.display_name().to_string(),
            total_rows: inputs.len(),
        })
        .await;

        let mut derived = Vec::with_capacity(inputs.len());
        let mut succeeded = 0usize;
        let mut skipped = 0usize;

        for (row, input) in inputs.iter().enumerate() {
            let Some(text) = input else {
                derived.push(Value::Missing);
                skipped += 1;
                self.emit(AnnotationEvent::RowSkipped { row }).await;
                continue;
            };

            self.emit(AnnotationEvent::RowStarted {
                row,
                preview: preview(text),
            })
            .await;

            match annotator.annotate(text).await {
                Ok(value) => {
                    derived.push(value);
                    succeeded += 1;
                    self.emit(AnnotationEvent::RowCompleted { row }).await;
                }
                Err(e) => {
                    warn!(
                        "{} failed on row {}, aborting batch: {}",
                        annotator.display_name(),
                        row,
                        e
                    );
                    self.emit(AnnotationEvent::RowFailed {
                        row,
                        error: e.to_string(),
                    })
                    .await;
                    self.emit(AnnotationEvent::Complete {
                        succeeded,
                        skipped,
                        failed: 1,
                    })
                    .await;
                    return Err(e);
                }
            }
        }

        let target = annotator.target_column();
        dataset.set_column(target, derived)?;

        info!(
            "{} wrote {} ({} rows, {} skipped)",
            annotator.display_name(),
            target,
            succeeded,
            skipped
        );

        self.emit(AnnotationEvent::Complete {
            succeeded,
            skipped,
            failed: 0,
        })
        .await;

        Ok(BatchAnnotationResult {
            column: target.to_string(),
            succeeded,
            skipped,
        })
    }
}

fn preview(text: &str) -> String {
    truncate_chars(text, PREVIEW_CHARS)
}
