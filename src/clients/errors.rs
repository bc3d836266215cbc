//! HTTP-specific error types for the Admin API layer.
//!
//! Four failure shapes:
//!
//! - [`HttpResponseError`]: a non-retryable upstream status, passed through
//!   with its status and serialized body (raised by the resource layer when
//!   it has no more specific mapping for the status)
//! - [`RateLimitExhaustedError`]: 429 responses kept coming until the retry
//!   budget ran out
//! - [`UpstreamUnavailableError`]: 5xx responses kept coming until the retry
//!   budget ran out
//! - [`HttpError::Network`]: transport-level failures (after retries)
//!
//! # Example
//!
//! ```rust,ignore
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::RateLimited(e)) => println!("Rate limited after {} tries", e.tries),
//!     Err(HttpError::Upstream(e)) => println!("Upstream down after {} tries", e.tries),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when an HTTP request receives a non-retryable,
/// non-successful response.
///
/// The message field carries the upstream error body serialized as JSON so
/// the caller can surface it unchanged.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Serialized error message in JSON format.
    pub message: String,
    /// Reference ID for error reporting (from the X-Request-Id header).
    pub error_reference: Option<String>,
}

/// Error returned when 429 responses exhausted the retry budget.
#[derive(Debug, Error)]
#[error("Shopify API rate limit exceeded after {tries} attempts. Last message: {message}")]
pub struct RateLimitExhaustedError {
    /// The number of attempts that were made.
    pub tries: u32,
    /// Serialized error message from the last response.
    pub message: String,
    /// Reference ID for error reporting (from the X-Request-Id header).
    pub error_reference: Option<String>,
}

/// Error returned when 5xx responses exhausted the retry budget.
#[derive(Debug, Error)]
#[error("Shopify API returned {code} after {tries} attempts. Last message: {message}")]
pub struct UpstreamUnavailableError {
    /// The HTTP status code of the last response.
    pub code: u16,
    /// The number of attempts that were made.
    pub tries: u32,
    /// Serialized error message from the last response.
    pub message: String,
    /// Reference ID for error reporting (from the X-Request-Id header).
    pub error_reference: Option<String>,
}

/// Error returned when an HTTP request fails validation before sending.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

/// Unified error type for all HTTP-level failures.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A non-retryable HTTP response error.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Rate-limit retries exhausted.
    #[error(transparent)]
    RateLimited(#[from] RateLimitExhaustedError),

    /// Upstream 5xx retries exhausted.
    #[error(transparent)]
    Upstream(#[from] UpstreamUnavailableError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error (after transport retries).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
