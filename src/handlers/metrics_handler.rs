use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Handle GET /metrics - Prometheus exposition format
pub async fn metrics(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_handler_renders() {
        // Build a local recorder so the test does not touch the global one
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let state = Arc::new(recorder.handle());

        let response = metrics(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
