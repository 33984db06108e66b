use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
};
use storage::dto::{
    rating::PagePath,
    status::{PageCompletionStatus, TypeCompletionStatus, TypeStatusPath, TypeStatusQuery},
};
use validator::Validate;

use crate::annotator::Annotator;
use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/page-status/{page}/{report_type}",
    params(
        PagePath,
        ("x-annotator-id" = Option<String>, Header, description = "Annotator scope, anonymous when absent")
    ),
    responses(
        (status = 200, description = "Page completion: `isComplete` when both models have a record, `allCriteriaMet` when both are fully rated", body = PageCompletionStatus),
        (status = 400, description = "Invalid page or report type")
    ),
    tag = "status"
)]
pub async fn get_page_status(
    State(state): State<AppState>,
    Annotator(scope): Annotator,
    path: Result<Path<PagePath>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(path) = path?;
    path.validate()?;

    let status = services::get_page_status(&state, &scope, path.page, &path.report_type).await?;

    Ok(Json(status).into_response())
}

#[utoipa::path(
    get,
    path = "/api/type-status/{report_type}",
    params(
        TypeStatusPath,
        TypeStatusQuery,
        ("x-annotator-id" = Option<String>, Header, description = "Annotator scope, anonymous when absent")
    ),
    responses(
        (status = 200, description = "Report type completion used to gate the final submission", body = TypeCompletionStatus),
        (status = 400, description = "Invalid report type or totalPages")
    ),
    tag = "status"
)]
pub async fn get_type_status(
    State(state): State<AppState>,
    Annotator(scope): Annotator,
    path: Result<Path<TypeStatusPath>, PathRejection>,
    query: Result<Query<TypeStatusQuery>, QueryRejection>,
) -> Result<Response, WebError> {
    let Path(path) = path?;
    let Query(query) = query?;
    path.validate()?;

    let status =
        services::get_type_status(&state, &scope, &path.report_type, query.total_pages).await?;

    Ok(Json(status).into_response())
}
