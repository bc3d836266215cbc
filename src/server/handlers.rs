//! Request handlers for the gateway's HTTP surface.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::orders::CreateDraftOrderRequest;
use crate::resources::Shop;
use crate::rewards::ExchangeRequest;
use crate::server::error::ApiError;
use crate::server::AppState;

/// `GET /health` — liveness plus the shape of the loaded configuration.
///
/// Never exposes the token itself, only its length.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "status": "ok",
        "config": {
            "shop": config.shop().as_ref(),
            "api_version": config.api_version().to_string(),
            "token_length": config.access_token().as_ref().len(),
        }
    }))
}

/// `GET /test-config` — probes the Admin API with the configured
/// credentials.
///
/// Always answers 200; the `success` flag carries the verdict.
pub async fn test_config(State(state): State<AppState>) -> Json<Value> {
    match Shop::fetch(&state.client).await {
        Ok(shop) => Json(json!({
            "success": true,
            "message": "Configuration is correct!",
            "shop_name": shop.name,
            "shop_domain": shop.domain,
        })),
        Err(err) => Json(json!({
            "success": false,
            "message": "Configuration error",
            "error": err.to_string(),
        })),
    }
}

/// `POST /create-draft-order` — validates the cart and creates a draft
/// order, returning the hosted invoice URL.
pub async fn create_draft_order(
    State(state): State<AppState>,
    Json(request): Json<CreateDraftOrderRequest>,
) -> Result<Json<Value>, ApiError> {
    let receipt = state.orders.create(request).await?;

    Ok(Json(json!({
        "success": true,
        "invoice_url": receipt.invoice_url,
        "draft_order_id": receipt.draft_order_id,
        "total_price": receipt.total_price,
    })))
}

/// `POST /rewards/exchange` — runs one points-to-reward exchange.
pub async fn exchange(
    State(state): State<AppState>,
    Json(request): Json<ExchangeRequest>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state.exchange.exchange(&request).await?;

    Ok(Json(json!({
        "success": true,
        "discount_code": outcome.discount_code,
        "discount_value": outcome.discount_value,
        "points_used": outcome.points_used,
        "remaining_points": outcome.remaining_points,
    })))
}

/// Query parameters of the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// The customer to report on.
    pub customer_id: Option<String>,
}

/// `GET /rewards/history?customer_id=` — current balance and reward
/// history.
pub async fn rewards_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Value>, ApiError> {
    let raw_id = params
        .customer_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::validation("customer_id is required"))?;

    let (customer_id, snapshot) = state.exchange.history(&raw_id).await?;

    Ok(Json(json!({
        "success": true,
        "customer_id": customer_id.to_string(),
        "points": snapshot.points,
        "history": snapshot.history,
    })))
}
