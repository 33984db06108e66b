use storage::{dto::report::ReportPage, error::Result, models::CollectionCount};

use crate::error::WebError;
use crate::state::AppState;

/// Get the two summaries shown on one page of a report type.
///
/// A report type without summaries yields an empty page; a page past the
/// last one of a populated type is not found.
pub async fn get_report_page(
    state: &AppState,
    report_type: &str,
    page: u32,
) -> std::result::Result<ReportPage, WebError> {
    let report = state.content().fetch_page(report_type, page).await?;

    if report.total_pages > 0 && page > report.total_pages {
        return Err(WebError::NotFound);
    }

    Ok(report)
}

/// Count summaries per report type and model
pub async fn get_collection_counts(state: &AppState) -> Result<Vec<CollectionCount>> {
    state.content().collection_counts().await
}
