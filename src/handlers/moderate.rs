use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::metrics;
use crate::moderation;

#[derive(Debug, Deserialize)]
pub struct ModerateRequest {
    pub message: String,
}

/// Handle POST /v1/moderate
///
/// Moderation is pure and infallible, so the handler only records the
/// outcome and echoes the message back with its classification.
pub async fn handle_moderate(Json(request): Json<ModerateRequest>) -> Json<Value> {
    let result = moderation::moderate(&request.message);

    info!(
        label = result.label.as_str(),
        reasons = result.reasons.len(),
        "chat message moderated"
    );
    metrics::record_moderation(result.label.as_str());

    Json(json!({
        "input": request.message,
        "result": result,
    }))
}
