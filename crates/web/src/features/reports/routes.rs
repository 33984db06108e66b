use axum::{Router, routing::get};

use super::handlers::{get_collection_counts, get_report_page};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/counts", get(get_collection_counts))
        .route("/:report_type/:page", get(get_report_page))
}
