use storage::{
    dto::rating::{PageRatings, SavedRating},
    error::Result,
    models::{RatingKey, RatingPatch, Scope},
};

use crate::state::AppState;

/// Save one rating and report the page status it leaves behind
pub async fn save_rating(
    state: &AppState,
    key: &RatingKey,
    patch: &RatingPatch,
) -> Result<SavedRating> {
    let saved = state.evaluator().save_rating(key, patch).await?;

    tracing::info!(
        page = key.page,
        model = %key.model,
        report_type = %key.report_type,
        all_criteria_met = saved.record.all_criteria_met,
        page_complete = saved.page_status.is_complete,
        "Rating saved"
    );

    Ok(saved)
}

/// Get the stored ratings of both models for a page
pub async fn get_page_ratings(
    state: &AppState,
    scope: &Scope,
    page: i32,
    report_type: &str,
) -> Result<PageRatings> {
    state
        .evaluator()
        .page_ratings(scope, page, report_type)
        .await
}
