//! Handler-boundary error mapping.
//!
//! Every service failure is converted to a JSON error body here; nothing is
//! allowed to crash the process. Client mistakes map to 4xx, exhausted
//! upstream retries to 502/503, and non-retryable upstream client errors
//! pass their status through.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::clients::{HttpError, RestError};
use crate::orders::OrderError;
use crate::resources::ResourceError;
use crate::rewards::ExchangeError;

/// A JSON error response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    /// Creates an error with an explicit status and body.
    #[must_use]
    pub const fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// Creates a 400 with a bare `{"error": ...}` body.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, json!({ "error": message.into() }))
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyCart => Self::validation("No items provided"),
            OrderError::InvalidItem { .. } => Self::validation(err.to_string()),
            OrderError::IncompleteResponse { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error", "message": err.to_string() }),
            ),
            OrderError::Resource(inner) => from_resource_error(&inner),
        }
    }
}

impl From<ExchangeError> for ApiError {
    fn from(err: ExchangeError) -> Self {
        match err {
            ExchangeError::MissingCustomerId
            | ExchangeError::InvalidCustomerId
            | ExchangeError::ProgramEnded => Self::validation(err.to_string()),
            ExchangeError::InvalidDiscountValue { ref valid_values } => Self::new(
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid discount_value", "valid_values": valid_values }),
            ),
            ExchangeError::CustomerNotFound => Self::new(
                StatusCode::NOT_FOUND,
                json!({ "error": "Customer not found" }),
            ),
            ExchangeError::InsufficientPoints {
                current_points,
                points_required,
            } => Self::new(
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Không đủ điểm",
                    "current_points": current_points,
                    "points_required": points_required,
                }),
            ),
            ExchangeError::MissingScope
            | ExchangeError::RewardIssue(_)
            | ExchangeError::DebitFailed(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": err.to_string() }),
            ),
            ExchangeError::Resource(inner) => from_resource_error(&inner),
        }
    }
}

impl From<ResourceError> for ApiError {
    fn from(err: ResourceError) -> Self {
        from_resource_error(&err)
    }
}

fn from_resource_error(err: &ResourceError) -> ApiError {
    match err {
        ResourceError::NotFound { resource, id } => ApiError::new(
            StatusCode::NOT_FOUND,
            json!({ "error": format!("{resource} with id {id} not found") }),
        ),
        ResourceError::ValidationFailed { errors, .. } => ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": "Shopify rejected the request", "details": errors }),
        ),
        ResourceError::UnexpectedBody { .. } => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Internal server error", "message": err.to_string() }),
        ),
        ResourceError::Http(http) | ResourceError::Rest(RestError::Http(http)) => {
            from_http_error(http)
        }
        ResourceError::Rest(rest) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Internal server error", "message": rest.to_string() }),
        ),
    }
}

fn from_http_error(err: &HttpError) -> ApiError {
    match err {
        // Non-retryable upstream status: pass status and body through
        HttpError::Response(e) => ApiError::new(
            StatusCode::from_u16(e.code).unwrap_or(StatusCode::BAD_GATEWAY),
            json!({
                "error": "Shopify API error",
                "status": e.code,
                "details": details_value(&e.message),
            }),
        ),
        HttpError::RateLimited(_) => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": "Shopify API rate limit exceeded. Please try again later." }),
        ),
        HttpError::Upstream(e) => ApiError::new(
            StatusCode::BAD_GATEWAY,
            json!({
                "error": "Shopify API unavailable",
                "status": e.code,
                "details": details_value(&e.message),
            }),
        ),
        HttpError::Network(_) => ApiError::new(
            StatusCode::BAD_GATEWAY,
            json!({ "error": "Failed to reach Shopify API" }),
        ),
        HttpError::InvalidRequest(e) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Internal server error", "message": e.to_string() }),
        ),
    }
}

/// Keeps upstream error bodies as structured JSON when they parse.
fn details_value(message: &str) -> Value {
    serde_json::from_str(message).unwrap_or_else(|_| Value::String(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{
        HttpResponseError, RateLimitExhaustedError, UpstreamUnavailableError,
    };

    #[test]
    fn test_order_validation_maps_to_400() {
        let error: ApiError = OrderError::InvalidItem {
            index: 0,
            reason: "variant_id is required",
        }
        .into();
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_insufficient_points_maps_to_400_with_both_values() {
        let error: ApiError = ExchangeError::InsufficientPoints {
            current_points: 40_000,
            points_required: 50_000,
        }
        .into();

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.body["current_points"], 40_000);
        assert_eq!(error.body["points_required"], 50_000);
        assert_eq!(error.body["error"], "Không đủ điểm");
    }

    #[test]
    fn test_customer_not_found_maps_to_404() {
        let error: ApiError = ExchangeError::CustomerNotFound.into();
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_discount_value_lists_tiers() {
        let error: ApiError = ExchangeError::InvalidDiscountValue {
            valid_values: vec![50_000, 100_000],
        }
        .into();

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.body["valid_values"][0], 50_000);
    }

    #[test]
    fn test_rate_limit_exhaustion_maps_to_503() {
        let error: ApiError = ResourceError::Http(HttpError::RateLimited(
            RateLimitExhaustedError {
                tries: 4,
                message: "{}".to_string(),
                error_reference: None,
            },
        ))
        .into();
        assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_upstream_exhaustion_maps_to_502() {
        let error: ApiError = ResourceError::Http(HttpError::Upstream(
            UpstreamUnavailableError {
                code: 500,
                tries: 4,
                message: "{}".to_string(),
                error_reference: None,
            },
        ))
        .into();
        assert_eq!(error.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_non_retryable_upstream_status_passes_through() {
        let error: ApiError = ResourceError::Http(HttpError::Response(HttpResponseError {
            code: 403,
            message: r#"{"errors":"Unauthorized"}"#.to_string(),
            error_reference: None,
        }))
        .into();

        assert_eq!(error.status(), StatusCode::FORBIDDEN);
        assert_eq!(error.body["status"], 403);
        assert_eq!(error.body["details"]["errors"], "Unauthorized");
    }
}
