use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::{IntoResponse, Response},
};
use storage::{
    dto::rating::{PagePath, PageRatings, RatingPath, SavedRating, UpsertRatingRequest},
    models::RatingPatch,
};
use validator::Validate;

use crate::annotator::Annotator;
use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    put,
    path = "/api/ratings/{page}/{report_type}/{model}",
    params(
        RatingPath,
        ("x-annotator-id" = Option<String>, Header, description = "Annotator scope, anonymous when absent")
    ),
    request_body = UpsertRatingRequest,
    responses(
        (status = 200, description = "Rating saved; includes the refreshed page status", body = SavedRating),
        (status = 400, description = "Invalid page, model, report type or rating"),
        (status = 409, description = "Concurrent write for the same rating"),
        (status = 503, description = "Rating store timed out")
    ),
    tag = "ratings"
)]
pub async fn upsert_rating(
    State(state): State<AppState>,
    Annotator(scope): Annotator,
    path: Result<Path<RatingPath>, PathRejection>,
    payload: Result<Json<UpsertRatingRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Path(path) = path?;
    let Json(req) = payload?;

    let key = path.into_key(scope)?;
    req.validate()?;

    let saved = services::save_rating(&state, &key, &RatingPatch::from(&req)).await?;

    Ok(Json(saved).into_response())
}

#[utoipa::path(
    get,
    path = "/api/ratings/{page}/{report_type}",
    params(
        PagePath,
        ("x-annotator-id" = Option<String>, Header, description = "Annotator scope, anonymous when absent")
    ),
    responses(
        (status = 200, description = "Stored ratings of both models; a model without a rating is null", body = PageRatings),
        (status = 400, description = "Invalid page or report type")
    ),
    tag = "ratings"
)]
pub async fn get_page_ratings(
    State(state): State<AppState>,
    Annotator(scope): Annotator,
    path: Result<Path<PagePath>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(path) = path?;
    path.validate()?;

    let ratings =
        services::get_page_ratings(&state, &scope, path.page, &path.report_type).await?;

    Ok(Json(ratings).into_response())
}
