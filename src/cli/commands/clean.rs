//! Text cleanup command.

use reviewlens::dataset::{CLEANED_SUMMARY_COLUMN, SENTIMENT_SCORE_COLUMN};
use reviewlens::services::{mean_by_product, AnnotationManager, TextNormalizer};
use reviewlens::{Config, Session};

use crate::cli::icons;
use crate::cli::render::{print_means, print_notice, print_table};

/// Load the dataset, normalize review text, and show a preview.
pub async fn cmd_clean(config: &Config, path: Option<&str>, limit: usize) -> anyhow::Result<()> {
    let path = config.dataset_path(path);
    let mut session = Session::new();

    let notice = session
        .load(&path, config.dataset.delimiter_byte(), None)
        .map_err(|e| {
            print_notice(&e.to_notice());
            e
        })?;
    print_notice(&notice);

    let notice = session
        .annotate(&AnnotationManager::new(), &TextNormalizer::new())
        .await?;
    print_notice(&notice);

    let Some(dataset) = session.dataset() else {
        return Ok(());
    };

    println!();
    print_table(dataset, limit);

    if dataset.has_column(SENTIMENT_SCORE_COLUMN) {
        let means = mean_by_product(dataset, SENTIMENT_SCORE_COLUMN)?;
        print_means("Average sentiment by product", &means);
    } else {
        println!(
            "\n{} No {} column; run `reviewlens analyze` to score reviews",
            icons::dim_arrow(),
            SENTIMENT_SCORE_COLUMN
        );
    }

    tracing::info!("Wrote {} for {} rows", CLEANED_SUMMARY_COLUMN, dataset.len());
    Ok(())
}
