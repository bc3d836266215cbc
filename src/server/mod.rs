//! The gateway's HTTP surface.
//!
//! Five JSON routes behind a permissive CORS layer (the storefront calls
//! these endpoints directly from the browser; the CORS layer also answers
//! OPTIONS pre-flights):
//!
//! - `POST /create-draft-order`
//! - `POST /rewards/exchange`
//! - `GET /rewards/history?customer_id=`
//! - `GET /health`
//! - `GET /test-config`

pub mod error;
mod handlers;

pub use error::ApiError;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::clients::RestClient;
use crate::config::GatewayConfig;
use crate::orders::DraftOrderService;
use crate::rewards::ExchangeService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The immutable gateway configuration.
    pub config: Arc<GatewayConfig>,
    /// The shared Admin API client.
    pub client: Arc<RestClient>,
    /// Draft-order assembly.
    pub orders: Arc<DraftOrderService>,
    /// The rewards exchange sequencer.
    pub exchange: Arc<ExchangeService>,
}

impl AppState {
    /// Builds the service graph from configuration.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        let client = Arc::new(RestClient::new(&config));
        let orders = Arc::new(DraftOrderService::new(Arc::clone(&client)));
        let exchange = Arc::new(ExchangeService::new(
            Arc::clone(&client),
            config.rewards().clone(),
        ));

        Self {
            config: Arc::new(config),
            client,
            orders,
            exchange,
        }
    }
}

/// Builds the gateway router over the given state.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/test-config", get(handlers::test_config))
        .route("/create-draft-order", post(handlers::create_draft_order))
        .route("/rewards/exchange", post(handlers::exchange))
        .route("/rewards/history", get(handlers::rewards_history))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
