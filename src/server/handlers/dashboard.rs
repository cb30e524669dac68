//! Dashboard page handler.

use axum::{
    extract::{Query, State},
    response::Html,
};

use super::super::templates;
use super::super::AppState;
use super::api::ViewParams;
use crate::dataset::SENTIMENT_COLUMN;
use crate::services::{product_options, score_column};

/// Render the dashboard for the current session and filter.
///
/// Without an explicit column the charts follow the dataset's score column;
/// a loaded dataset without one shows just the table.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Html<String> {
    let filter = params.filter();

    let mut session = state.session.lock().await;
    let options = session
        .dataset()
        .and_then(|d| product_options(d).ok())
        .unwrap_or_default();
    let column = match (params.column(), session.dataset()) {
        (Some(column), _) => Some(column.to_string()),
        (None, Some(dataset)) => score_column(dataset).map(str::to_string),
        (None, None) => Some(SENTIMENT_COLUMN.to_string()),
    };
    let (view, notice) = match column {
        Some(ref column) => session.view(&filter, column),
        None => (None, None),
    };

    let mut content = templates::controls(
        session.phase(),
        &options,
        filter.label(),
        column.as_deref().unwrap_or_default(),
        state.config.dataset.sample_size().get(),
    );
    content.push_str(&templates::notice_banner(notice.as_ref()));
    if let Some(ref view) = view {
        content.push_str(&templates::view_sections(view));
    } else if let Some(dataset) = session.dataset() {
        content.push_str("<section><h2>Reviews</h2>");
        content.push_str(&templates::records_table(dataset));
        content.push_str("</section>");
    }

    Html(templates::base_template("Customer Review Sentiment", &content))
}
