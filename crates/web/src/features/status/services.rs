use storage::{
    dto::status::{PageCompletionStatus, TypeCompletionStatus},
    error::Result,
    models::Scope,
};

use crate::state::AppState;

/// Get the completion status of one page
pub async fn get_page_status(
    state: &AppState,
    scope: &Scope,
    page: i32,
    report_type: &str,
) -> Result<PageCompletionStatus> {
    state.evaluator().page_status(scope, page, report_type).await
}

/// Get the completion status of a whole report type.
///
/// `total_pages` falls back to the number of stored summaries when the caller
/// does not supply it.
pub async fn get_type_status(
    state: &AppState,
    scope: &Scope,
    report_type: &str,
    total_pages: Option<u32>,
) -> Result<TypeCompletionStatus> {
    let evaluator = state.evaluator();
    let total_pages = evaluator
        .resolve_total_pages(report_type, total_pages)
        .await?;

    let status = evaluator
        .type_status(scope, report_type, total_pages)
        .await?;

    tracing::debug!(
        report_type,
        total_pages,
        completed = status.completed_evaluation_count,
        submitted = status.total_evaluations_submitted,
        all_pages_complete = status.all_pages_complete,
        "Type status computed"
    );

    Ok(status)
}
