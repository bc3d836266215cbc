//! # Storefront Gateway
//!
//! A backend-for-frontend layer in front of the Shopify Admin REST API,
//! used by a storefront to create discounted draft orders and to run a
//! loyalty points-to-reward exchange backed by customer metafields.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe, immutable configuration via [`GatewayConfig`] and validated
//!   newtypes
//! - An async Admin API client with retry logic and rate-limit handling
//! - Typed Admin REST resources (draft orders, customers, metafields, gift
//!   cards, price rules, discount codes)
//! - The draft-order assembly and rewards-exchange services
//! - An axum HTTP surface exposing both to the storefront
//!
//! Shopify stays the system of record for customers, points, orders, and
//! codes; the gateway owns no durable state.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use storefront_gateway::{server, GatewayConfig};
//!
//! let config = GatewayConfig::from_env()?;
//! let app = server::router(server::AppState::new(config));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! ## Retry Behavior
//!
//! Every outbound call runs under the configured [`RetryPolicy`]: 429
//! responses honor `Retry-After` (falling back to exponential backoff),
//! 5xx responses and transport failures back off exponentially, and any
//! other non-success status fails immediately with the upstream status and
//! body. Retries are bounded and strictly sequential; there is no
//! cross-request backoff state.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed
//!   explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All shared types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio runtime

pub mod clients;
pub mod config;
pub mod error;
pub mod orders;
pub mod resources;
pub mod rewards;
pub mod server;

// Re-export public types at crate root for convenience
pub use config::{
    AccessToken, ApiVersion, ExchangeTier, GatewayConfig, GatewayConfigBuilder, HostUrl,
    RetryPolicy, RewardKind, RewardsConfig, ShopDomain,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiCallLimit, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, RateLimitExhaustedError, RestClient, RestError,
    UpstreamUnavailableError,
};

// Re-export the service layer
pub use orders::{CreateDraftOrderRequest, DraftOrderReceipt, DraftOrderService, OrderError};
pub use resources::ResourceError;
pub use rewards::{ExchangeError, ExchangeOutcome, ExchangeRequest, ExchangeService};
