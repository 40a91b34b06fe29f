use axum::{middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::v1;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
///
/// The Prometheus endpoint is mounted at `metrics_path` when `metrics` is set.
pub fn create_router(
    state: AppState,
    metrics: Option<PrometheusMetrics>,
    metrics_path: &str,
) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/v1", v1::create_v1_router())
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m, metrics_path));
    }

    router
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppConfig;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::llm::MockCompletionProvider;
    use crate::infrastructure::vector_store::InMemoryVectorStore;

    fn app(completion: MockCompletionProvider) -> Router {
        let mut config = AppConfig::default();
        config.store.dimensions = 8;
        app_with(config, MockEmbeddingProvider::new(8), completion)
    }

    fn app_with(
        mut config: AppConfig,
        embedder: MockEmbeddingProvider,
        completion: MockCompletionProvider,
    ) -> Router {
        config.embedding.min_interval_ms = 0;

        let state = crate::build_app_state(
            &config,
            Arc::new(embedder),
            Arc::new(completion),
            Arc::new(InMemoryVectorStore::new()),
        );

        create_router(state, None, "/metrics")
    }

    fn answer_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/answer")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_answer_then_cached() {
        let app = app(MockCompletionProvider::new("Use Azure Blob Storage."));

        let first = app
            .clone()
            .oneshot(answer_request(r#"{"question":"Where do I store files?"}"#))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert!(first.headers().contains_key("x-request-id"));
        let first = json_body(first).await;
        assert_eq!(first["text"], "Use Azure Blob Storage.");
        assert_eq!(first["cached"], false);

        let second = app
            .oneshot(answer_request(r#"{"question":"Where do I store files?"}"#))
            .await
            .unwrap();
        let second = json_body(second).await;
        assert_eq!(second["text"], "Use Azure Blob Storage.");
        assert_eq!(second["cached"], true);
    }

    #[tokio::test]
    async fn test_empty_question_is_bad_request() {
        let response = app(MockCompletionProvider::new("x"))
            .oneshot(answer_request(r#"{"question":"   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_malformed_json_uses_error_envelope() {
        let response = app(MockCompletionProvider::new("x"))
            .oneshot(answer_request("{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "json_parse_error");
    }

    #[tokio::test]
    async fn test_completion_failure_is_service_unavailable() {
        let response = app(MockCompletionProvider::new("x").with_error("HTTP 500"))
            .oneshot(answer_request(r#"{"question":"Hello?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "completion_unavailable");
    }

    #[tokio::test]
    async fn test_wrong_embedding_size_is_service_unavailable() {
        let config = AppConfig::default();
        assert_eq!(config.store.dimensions, 1536);

        let response = app_with(
            config,
            MockEmbeddingProvider::new(8),
            MockCompletionProvider::new("x"),
        )
        .oneshot(answer_request(r#"{"question":"hello"}"#))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "embedding_unavailable");
    }

    #[tokio::test]
    async fn test_ready_reports_store() {
        let response = app(MockCompletionProvider::new("x"))
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["checks"][0]["name"], "vector_store:in_memory");
    }
}
