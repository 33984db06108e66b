use axum::{
    Router,
    routing::{get, put},
};

use super::handlers::{get_page_ratings, upsert_rating};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:page/:report_type", get(get_page_ratings))
        .route("/:page/:report_type/:model", put(upsert_rating))
}
