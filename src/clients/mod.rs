//! HTTP client types for Shopify Admin API communication.
//!
//! This module provides the foundational HTTP client layer for making
//! authenticated requests to the Admin API. It handles request/response
//! processing, the retry policy, and Shopify-specific header parsing.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client with retry handling
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`rest::RestClient`]: Higher-level REST API client
//! - [`rest::RestError`]: REST-specific error types
//!
//! # Retry Behavior
//!
//! The configured [`RetryPolicy`](crate::RetryPolicy) applies uniformly to
//! every request:
//!
//! - **429 (Rate Limited)**: waits for `Retry-After` when present, otherwise
//!   `base_delay * 2^attempt`
//! - **5xx (Server Error)**: exponential backoff on the same schedule
//! - **Transport failures**: retried on the same schedule
//! - **Other non-success statuses**: never retried; the response is handed
//!   back for the caller to map

mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, RateLimitExhaustedError,
    UpstreamUnavailableError,
};
pub use http_client::{HttpClient, GATEWAY_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{ApiCallLimit, HttpResponse};

// Re-export REST client types at the clients module level
pub use rest::{RestClient, RestError};
