use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

/// Health check endpoint
/// Returns 200 OK if the service is running
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "resale-pricer",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// Readiness check endpoint
/// Returns 200 OK if the service is ready to accept traffic
pub async fn readiness_check() -> impl IntoResponse {
    // The listings pool is loaded before the router is built, so reaching
    // this handler means the engine is able to price requests.
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "service": "resale-pricer",
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_returns_ok() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_check_returns_ok() {
        let response = readiness_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
