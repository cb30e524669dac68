//! Sentiment analysis command.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;

use reviewlens::dataset::SENTIMENT_COLUMN;
use reviewlens::llm::LlmClient;
use reviewlens::services::{AnnotationManager, ProductFilter, SentimentScorer};
use reviewlens::{Config, Dataset, SampleSize, Session};

use crate::cli::icons;
use crate::cli::progress::spawn_progress_handler;
use crate::cli::render::{print_histogram, print_means, print_notice, print_table};

pub struct AnalyzeOptions {
    pub path: Option<String>,
    pub sample: Option<usize>,
    pub product: Option<String>,
    pub seed: Option<u64>,
    pub model: Option<String>,
}

/// Sample reviews, score them, and chart the result.
pub async fn cmd_analyze(config: &Config, options: AnalyzeOptions) -> anyhow::Result<()> {
    // Reject bad sizes before touching the file or the network.
    let size = match options.sample {
        Some(n) => SampleSize::new(n)?,
        None => config.dataset.sample_size(),
    };

    let path = config.dataset_path(options.path.as_deref());
    let full = match Dataset::load_with_delimiter(&path, config.dataset.delimiter_byte()) {
        Ok(ds) => ds,
        Err(e) => {
            eprintln!("{} {}", icons::error(), e);
            return Err(e.into());
        }
    };
    let sampled = match options.seed {
        Some(seed) => full.sample(size, &mut StdRng::seed_from_u64(seed)),
        None => full.sample(size, &mut rand::rng()),
    };

    let mut session = Session::new();
    print_notice(&session.replace(sampled));

    let mut llm = config.llm.clone();
    if let Some(ref model) = options.model {
        llm = llm.with_model(model);
    }
    let client = Arc::new(LlmClient::new(llm)?);
    let scorer = SentimentScorer::from_client(client, &config.sentiment);

    let (event_tx, event_rx) = mpsc::channel(64);
    let event_handler = spawn_progress_handler(event_rx);
    let result = {
        let manager = AnnotationManager::with_events(event_tx);
        session.annotate(&manager, &scorer).await
    };
    if let Err(e) = event_handler.await {
        tracing::warn!("Event handler task failed: {}", e);
    }

    match result {
        Ok(notice) => print_notice(&notice),
        Err(e) => {
            print_notice(&e.to_notice());
            return Err(e.into());
        }
    }

    let stats = scorer.cache_stats();
    tracing::info!(
        "Sentiment cache: {} hits, {} misses, {} entries",
        stats.hits,
        stats.misses,
        stats.entries
    );

    let filter = ProductFilter::parse(options.product.as_deref());
    let (view, notice) = session.view(&filter, SENTIMENT_COLUMN);
    if let Some(notice) = notice {
        print_notice(&notice);
    }
    let Some(view) = view else {
        return Ok(());
    };

    println!();
    print_table(&view.records, view.records.len());
    print_means(
        &format!("Average sentiment by product ({})", view.filter),
        &view.means,
    );
    print_histogram("Sentiment distribution", &view.histogram);

    Ok(())
}
