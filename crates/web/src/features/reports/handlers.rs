use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    response::{IntoResponse, Response},
};
use storage::{
    dto::report::{ReportPage, ReportPath},
    models::CollectionCount,
};
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/reports/{report_type}/{page}",
    params(ReportPath),
    responses(
        (status = 200, description = "Mistral and DeepSeek summaries for the page", body = ReportPage),
        (status = 400, description = "Invalid report type or page"),
        (status = 404, description = "Page past the last summary")
    ),
    tag = "reports"
)]
pub async fn get_report_page(
    State(state): State<AppState>,
    path: Result<Path<ReportPath>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(path) = path?;
    path.validate()?;

    let report = services::get_report_page(&state, &path.report_type, path.page).await?;

    Ok(Json(report).into_response())
}

#[utoipa::path(
    get,
    path = "/api/reports/counts",
    responses(
        (status = 200, description = "Summary counts per report type and model", body = Vec<CollectionCount>)
    ),
    tag = "reports"
)]
pub async fn get_collection_counts(State(state): State<AppState>) -> Result<Response, WebError> {
    let counts = services::get_collection_counts(&state).await?;

    Ok(Json(counts).into_response())
}
