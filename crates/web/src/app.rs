use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::features::{ratings, reports, status};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        ratings::handlers::upsert_rating,
        ratings::handlers::get_page_ratings,
        status::handlers::get_page_status,
        status::handlers::get_type_status,
        reports::handlers::get_report_page,
        reports::handlers::get_collection_counts,
    ),
    components(
        schemas(
            storage::dto::rating::UpsertRatingRequest,
            storage::dto::rating::SavedRating,
            storage::dto::rating::PageRatings,
            storage::dto::status::PageCompletionStatus,
            storage::dto::status::TypeCompletionStatus,
            storage::dto::report::ReportPage,
            storage::models::RatingRecord,
            storage::models::ModelName,
            storage::models::ReportSummary,
            storage::models::CollectionCount,
        )
    ),
    tags(
        (name = "ratings", description = "Criterion ratings of generated summaries"),
        (name = "status", description = "Page and report type completion"),
        (name = "reports", description = "Generated summaries under evaluation"),
    )
)]
pub struct ApiDoc;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/ratings", ratings::routes::routes())
        .nest("/page-status", status::routes::page_routes())
        .nest("/type-status", status::routes::type_routes())
        .nest("/reports", reports::routes::routes());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use storage::memory::MemoryStore;
    use storage::models::ModelName;
    use tower::ServiceExt;

    use crate::annotator::ANNOTATOR_HEADER;

    fn app(store: &Arc<MemoryStore>) -> Router {
        router(AppState::new(store.clone(), store.clone()))
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<&str>,
        annotator: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(annotator) = annotator {
            builder = builder.header(ANNOTATOR_HEADER, annotator);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn put(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        send(app, "PUT", uri, Some(body), None).await
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, "GET", uri, None, None).await
    }

    #[tokio::test]
    async fn test_put_rating_returns_record_and_page_status() {
        let store = Arc::new(MemoryStore::default());
        let (status, body) = put(
            app(&store),
            "/api/ratings/1/advanced/mistral",
            r#"{"criterion1": 1, "criterion2": 5, "criterion3": 3}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["model"], "mistral");
        assert_eq!(body["record"]["criterion2Rating"], 5);
        assert_eq!(body["record"]["allCriteriaMet"], true);
        assert_eq!(body["pageStatus"]["isComplete"], false);
        assert_eq!(body["pageStatus"]["recordCount"], 1);
    }

    #[tokio::test]
    async fn test_partial_update_clears_all_criteria_met() {
        let store = Arc::new(MemoryStore::default());
        put(
            app(&store),
            "/api/ratings/1/advanced/mistral",
            r#"{"criterion1": 1, "criterion2": 5, "criterion3": 3}"#,
        )
        .await;

        let (status, body) = put(
            app(&store),
            "/api/ratings/1/advanced/mistral",
            r#"{"criterion1": 0}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["criterion1Rating"], 0);
        assert_eq!(body["record"]["criterion3Rating"], 3);
        assert_eq!(body["record"]["allCriteriaMet"], false);
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn test_out_of_range_rating_is_rejected() {
        let store = Arc::new(MemoryStore::default());
        let (status, body) = put(
            app(&store),
            "/api/ratings/1/advanced/deepseek",
            r#"{"criterion1": 6}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
        let details = body["details"].as_array().unwrap();
        assert!(details[0].as_str().unwrap().starts_with("criterion1"));
        assert_eq!(store.record_count().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_path_segments_are_rejected() {
        let store = Arc::new(MemoryStore::default());

        let (status, body) = put(app(&store), "/api/ratings/1/advanced/llama", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"][0].as_str().unwrap().starts_with("model"));

        let (status, body) = put(app(&store), "/api/ratings/0/advanced/mistral", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"][0].as_str().unwrap().starts_with("page"));

        let (status, _) = put(app(&store), "/api/ratings/abc/advanced/mistral", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_body_field_is_rejected() {
        let store = Arc::new(MemoryStore::default());
        let (status, body) = put(
            app(&store),
            "/api/ratings/1/advanced/mistral",
            r#"{"criterion1": 2, "allCriteriaMet": true}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn test_get_page_ratings_has_null_for_unrated_model() {
        let store = Arc::new(MemoryStore::default());
        put(
            app(&store),
            "/api/ratings/2/non-invasive/deepseek",
            r#"{"criterion1": 3, "criterion2": 4, "criterion3": 5}"#,
        )
        .await;

        let (status, body) = get(app(&store), "/api/ratings/2/non-invasive").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["mistral"].is_null());
        assert_eq!(body["deepseek"]["criterion1Rating"], 3);
        assert_eq!(body["deepseek"]["criterion2Rating"], 4);
        assert_eq!(body["deepseek"]["criterion3Rating"], 5);
    }

    #[tokio::test]
    async fn test_page_status_counts_unrated_records() {
        let store = Arc::new(MemoryStore::default());
        for model in ModelName::ALL {
            let uri = format!("/api/ratings/4/advanced/{}", model);
            put(app(&store), &uri, "{}").await;
        }

        let (status, body) = get(app(&store), "/api/page-status/4/advanced").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isComplete"], true);
        assert_eq!(body["allCriteriaMet"], false);
    }

    #[tokio::test]
    async fn test_type_status_with_explicit_total_pages() {
        let store = Arc::new(MemoryStore::default());
        for model in ModelName::ALL {
            let uri = format!("/api/ratings/1/advanced/{}", model);
            put(
                app(&store),
                &uri,
                r#"{"criterion1": 2, "criterion2": 2, "criterion3": 2}"#,
            )
            .await;
        }

        let (status, body) = get(app(&store), "/api/type-status/advanced?totalPages=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["allPagesComplete"], true);
        assert_eq!(body["completedEvaluationCount"], 2);
        assert_eq!(body["totalEvaluationsSubmitted"], 2);

        let (_, body) = get(app(&store), "/api/type-status/advanced?totalPages=0").await;
        assert_eq!(body["allPagesComplete"], false);

        let (status, _) = get(app(&store), "/api/type-status/advanced?totalPages=-2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_type_status_derives_total_pages_from_summaries() {
        let store = Arc::new(MemoryStore::default());
        store
            .insert_summary("advanced", ModelName::Mistral, "", "m1")
            .await;
        store
            .insert_summary("advanced", ModelName::Deepseek, "", "d1")
            .await;
        store
            .insert_summary("advanced", ModelName::Deepseek, "", "d2")
            .await;

        let (status, body) = get(app(&store), "/api/type-status/advanced").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["allPagesComplete"], false);

        let (_, body) = get(app(&store), "/api/type-status/invasive").await;
        assert_eq!(body["totalPages"], 0);
        assert_eq!(body["allPagesComplete"], false);
    }

    #[tokio::test]
    async fn test_annotator_header_scopes_ratings() {
        let store = Arc::new(MemoryStore::default());
        send(
            app(&store),
            "PUT",
            "/api/ratings/1/advanced/mistral",
            Some(r#"{"criterion1": 1}"#),
            Some("RISE2025"),
        )
        .await;

        let (_, anonymous) = get(app(&store), "/api/ratings/1/advanced").await;
        assert!(anonymous["mistral"].is_null());

        let (_, scoped) = send(
            app(&store),
            "GET",
            "/api/ratings/1/advanced",
            None,
            Some("RISE2025"),
        )
        .await;
        assert_eq!(scoped["mistral"]["annotator"], "RISE2025");
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let store = Arc::new(MemoryStore::default());
        store.set_unavailable(true);

        let (status, body) = put(
            app(&store),
            "/api/ratings/1/advanced/mistral",
            r#"{"criterion1": 1}"#,
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["kind"], "persistence");
    }

    #[tokio::test]
    async fn test_report_pages_and_counts() {
        let store = Arc::new(MemoryStore::default());
        store
            .insert_summary("advanced", ModelName::Mistral, "Analysis by Mistral", "m1")
            .await;
        store
            .insert_summary("advanced", ModelName::Deepseek, "Analysis by DeepSeek", "d1")
            .await;

        let (status, body) = get(app(&store), "/api/reports/advanced/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mistral"]["label"], "Analysis by Mistral");
        assert_eq!(body["deepseek"]["content"], "d1");
        assert_eq!(body["totalPages"], 1);

        let (status, _) = get(app(&store), "/api/reports/advanced/2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get(app(&store), "/api/reports/invasive/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalPages"], 0);

        let (status, body) = get(app(&store), "/api/reports/counts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_openapi_lists_rating_paths() {
        let doc = ApiDoc::openapi();
        assert!(
            doc.paths
                .paths
                .contains_key("/api/ratings/{page}/{report_type}/{model}")
        );
        assert!(doc.paths.paths.contains_key("/api/type-status/{report_type}"));
    }
}
