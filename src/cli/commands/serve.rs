//! Web dashboard command.

use reviewlens::Config;

use crate::cli::icons;

/// Start the dashboard server.
pub async fn cmd_serve(
    config: &Config,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let dataset = config.dataset_path(None);
    if !dataset.is_file() {
        eprintln!(
            "{} Dataset not found at {}; ingest will fail until it exists",
            icons::warn(),
            dataset.display()
        );
    }

    println!(
        "{} Starting reviewlens dashboard at http://{}:{}",
        icons::info(),
        config.server.host,
        config.server.port
    );
    println!("  Press Ctrl+C to stop");

    reviewlens::server::serve(config).await
}
