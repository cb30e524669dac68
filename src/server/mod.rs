//! Web dashboard for the review pipeline.
//!
//! One shared session backs every request:
//! - load a sample of the dataset
//! - clean text or score sentiment
//! - view per-product means and the sentiment histogram
//!
//! The session mutex serializes actions, so each one runs to completion
//! before the next starts.

mod assets;
mod handlers;
mod routes;
mod templates;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::llm::LlmClient;
use crate::services::SentimentScorer;
use crate::session::Session;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub scorer: Arc<SentimentScorer>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = Arc::new(LlmClient::new(config.llm.clone())?);
        let scorer = SentimentScorer::from_client(client, &config.sentiment);
        Ok(Self::with_scorer(config, scorer))
    }

    /// State with a caller-supplied scorer.
    pub fn with_scorer(config: Config, scorer: SentimentScorer) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            scorer: Arc::new(scorer),
            config: Arc::new(config),
        }
    }
}

/// Start the web server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState::new(config)?;
    let app = create_router(state);

    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
