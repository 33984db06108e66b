use axum::{Router, routing::get};

use super::handlers::{get_page_status, get_type_status};
use crate::state::AppState;

pub fn page_routes() -> Router<AppState> {
    Router::new().route("/:page/:report_type", get(get_page_status))
}

pub fn type_routes() -> Router<AppState> {
    Router::new().route("/:report_type", get(get_type_status))
}
