//! Progress display driven by annotation events.

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use reviewlens::services::AnnotationEvent;

use super::icons;

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░")
}

/// Draw a progress bar until the event channel closes.
///
/// The sender side lives in an `AnnotationManager`; drop the manager once
/// the batch is done so this task can finish.
pub fn spawn_progress_handler(
    mut event_rx: mpsc::Receiver<AnnotationEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut pb: Option<ProgressBar> = None;
        let mut label = String::new();
        while let Some(event) = event_rx.recv().await {
            match event {
                AnnotationEvent::Started {
                    annotator,
                    total_rows,
                } => {
                    let progress = ProgressBar::new(total_rows as u64);
                    progress.set_style(bar_style());
                    progress.set_message(format!("{}...", annotator));
                    label = annotator;
                    pb = Some(progress);
                }
                AnnotationEvent::RowStarted { preview, .. } => {
                    if let Some(ref progress) = pb {
                        progress.set_message(preview);
                    }
                }
                AnnotationEvent::RowCompleted { .. } | AnnotationEvent::RowSkipped { .. } => {
                    if let Some(ref progress) = pb {
                        progress.inc(1);
                    }
                }
                AnnotationEvent::RowFailed { row, error } => {
                    if let Some(ref progress) = pb {
                        progress.println(format!("{} Row {} failed: {}", icons::error(), row, error));
                    }
                }
                AnnotationEvent::Complete {
                    succeeded,
                    skipped,
                    failed,
                } => {
                    if let Some(progress) = pb.take() {
                        progress.finish_and_clear();
                    }
                    if failed > 0 {
                        println!(
                            "{} {} aborted after {} rows",
                            icons::error(),
                            label,
                            succeeded
                        );
                    } else if !label.is_empty() {
                        println!(
                            "{} {} complete: {} rows, {} skipped",
                            icons::success(),
                            label,
                            succeeded,
                            skipped
                        );
                    }
                }
            }
        }
    })
}
