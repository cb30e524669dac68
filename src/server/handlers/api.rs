//! JSON API handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::super::AppState;
use crate::dataset::{Dataset, DatasetError, SENTIMENT_COLUMN};
use crate::services::annotation::{AnnotationManager, RowAnnotator, TextNormalizer};
use crate::services::{
    product_options, score_column, AggregateError, AggregateView, AnnotationError, ProductFilter,
};
use crate::session::{Notice, Session, SessionError};

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Body of `POST /api/load`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoadRequest {
    /// Number of reviews to sample (1-20); absent loads every row.
    pub sample: Option<usize>,
}

/// Query of `GET /api/view` and the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    pub product: Option<String>,
    pub column: Option<String>,
}

impl ViewParams {
    pub fn filter(&self) -> ProductFilter {
        ProductFilter::parse(self.product.as_deref())
    }

    /// Explicitly requested column, if any.
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    /// Requested column, else the dataset's score column, else `SENTIMENT`.
    pub fn column_for(&self, dataset: Option<&Dataset>) -> String {
        self.column()
            .or_else(|| dataset.and_then(score_column))
            .unwrap_or(SENTIMENT_COLUMN)
            .to_string()
    }
}

/// Reply to every session action.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub notice: Notice,
    pub phase: &'static str,
    pub rows: usize,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub view: Option<AggregateView>,
    pub notice: Option<Notice>,
    pub phase: &'static str,
}

/// HTTP status for a failed session action.
pub fn error_status(error: &SessionError) -> StatusCode {
    match error {
        SessionError::Dataset(e) | SessionError::Annotation(AnnotationError::Dataset(e)) => {
            match e {
                DatasetError::NotFound(_) => StatusCode::NOT_FOUND,
                DatasetError::InvalidSampleSize(_)
                | DatasetError::MissingColumn(_)
                | DatasetError::Csv(_) => StatusCode::UNPROCESSABLE_ENTITY,
                DatasetError::LengthMismatch { .. } | DatasetError::Io(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
        SessionError::Annotation(_) => StatusCode::BAD_GATEWAY,
        SessionError::Aggregate(
            AggregateError::MissingColumn(_) | AggregateError::NotNumeric(_),
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::Aggregate(AggregateError::Dataset(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond(session: &Session, result: Result<Notice, SessionError>) -> Response {
    let (status, notice) = match result {
        Ok(notice) => (StatusCode::OK, notice),
        Err(e) => {
            tracing::warn!("Session action failed: {}", e);
            (error_status(&e), e.to_notice())
        }
    };
    let body = ActionResponse {
        notice,
        phase: session.phase(),
        rows: session.dataset().map(|d| d.len()).unwrap_or(0),
    };
    (status, Json(body)).into_response()
}

/// Load the configured dataset into the session.
pub async fn api_load(State(state): State<AppState>, Json(req): Json<LoadRequest>) -> Response {
    let path = state.config.dataset_path(None);
    let delimiter = state.config.dataset.delimiter_byte();

    let mut session = state.session.lock().await;
    let result = session.load(&path, delimiter, req.sample);
    respond(&session, result)
}

async fn run_annotator(state: &AppState, annotator: &dyn RowAnnotator) -> Response {
    let mut session = state.session.lock().await;
    let result = session.annotate(&AnnotationManager::new(), annotator).await;
    respond(&session, result)
}

/// Normalize review text.
pub async fn api_clean(State(state): State<AppState>) -> Response {
    run_annotator(&state, &TextNormalizer::new()).await
}

/// Score review sentiment with the LLM.
pub async fn api_analyze(State(state): State<AppState>) -> Response {
    let scorer = state.scorer.clone();
    let response = run_annotator(&state, scorer.as_ref()).await;
    let stats = scorer.cache_stats();
    tracing::debug!(
        "Sentiment cache: {} hits, {} misses",
        stats.hits,
        stats.misses
    );
    response
}

/// Aggregate view for a product filter; `view` is null until data exists.
pub async fn api_view(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Json<ViewResponse> {
    let mut session = state.session.lock().await;
    let column = params.column_for(session.dataset());
    let (view, notice) = session.view(&params.filter(), &column);
    Json(ViewResponse {
        view,
        notice,
        phase: session.phase(),
    })
}

/// Product filter options; empty until a dataset is loaded.
pub async fn api_products(State(state): State<AppState>) -> Response {
    let session = state.session.lock().await;
    let Some(dataset) = session.dataset() else {
        return Json(Vec::<String>::new()).into_response();
    };
    match product_options(dataset) {
        Ok(options) => Json(options).into_response(),
        Err(e) => {
            let e = SessionError::from(e);
            (error_status(&e), Json(e.to_notice())).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::dataset::Value;
    use crate::llm::LlmError;

    #[test]
    fn status_mapping() {
        let not_found = SessionError::Dataset(DatasetError::NotFound(PathBuf::from("x.csv")));
        assert_eq!(error_status(&not_found), StatusCode::NOT_FOUND);

        let sample = SessionError::Dataset(DatasetError::InvalidSampleSize(30));
        assert_eq!(error_status(&sample), StatusCode::UNPROCESSABLE_ENTITY);

        let upstream = SessionError::Annotation(AnnotationError::Upstream(LlmError::Timeout(60)));
        assert_eq!(error_status(&upstream), StatusCode::BAD_GATEWAY);

        let parse = SessionError::Annotation(AnnotationError::Parse {
            reply: "Positive".into(),
        });
        assert_eq!(error_status(&parse), StatusCode::BAD_GATEWAY);

        let column = SessionError::Annotation(AnnotationError::Dataset(
            DatasetError::MissingColumn("SUMMARY".into()),
        ));
        assert_eq!(error_status(&column), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn view_params_defaults() {
        let params = ViewParams::default();
        assert_eq!(params.filter(), ProductFilter::All);
        assert_eq!(params.column(), None);
        assert_eq!(params.column_for(None), "SENTIMENT");

        let params = ViewParams {
            product: Some("Lamp".into()),
            column: Some(String::new()),
        };
        assert_eq!(params.filter(), ProductFilter::Product("Lamp".into()));
        assert_eq!(params.column(), None);
    }

    #[test]
    fn view_column_falls_back_to_shipped_scores() {
        let dataset = Dataset::from_rows(
            vec!["PRODUCT", "SUMMARY", "SENTIMENT_SCORE"],
            vec![vec![
                Value::text("Chair"),
                Value::text("Comfy"),
                Value::text("0.8"),
            ]],
        )
        .unwrap();
        assert_eq!(ViewParams::default().column_for(Some(&dataset)), "SENTIMENT_SCORE");

        let params = ViewParams {
            product: None,
            column: Some("SENTIMENT".into()),
        };
        assert_eq!(params.column_for(Some(&dataset)), "SENTIMENT");
    }

    #[test]
    fn text_column_view_is_422() {
        let err = SessionError::Aggregate(AggregateError::NotNumeric("CLEANED_SUMMARY".into()));
        assert_eq!(error_status(&err), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
