use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::engine::PriceSuggestor;
use crate::error::AppError;
use crate::models::QueryItem;

/// Shared application state for the pricing routes
#[derive(Clone)]
pub struct AppState {
    pub suggestor: Arc<PriceSuggestor>,
}

/// Handle POST /v1/negotiate
///
/// A missing or blank category is the only rejection; everything else the
/// engine absorbs by narrowing the blend. The response wraps the full
/// suggestion with the flat price-range string shown in negotiation chat.
pub async fn handle_negotiate(
    State(state): State<AppState>,
    Json(item): Json<QueryItem>,
) -> Result<Json<Value>, AppError> {
    if item.category.trim().is_empty() {
        return Err(AppError::InvalidInput("category is required".to_string()));
    }

    let suggestion = state.suggestor.suggest(&item).await;

    Ok(Json(json!({
        "input": item,
        "fair_price_range": suggestion.fair_price_range(),
        "suggestion": suggestion,
    })))
}
