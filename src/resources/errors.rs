//! Resource-specific error types for Admin API operations.
//!
//! The gateway maps upstream status codes to semantic error variants:
//!
//! - **404**: [`ResourceError::NotFound`] - resource doesn't exist
//! - **422**: [`ResourceError::ValidationFailed`] - validation errors from
//!   the API
//! - **Other**: wrapped HTTP error, preserving status and body

use std::collections::HashMap;

use crate::clients::{HttpError, RestError};
use thiserror::Error;

/// Error type for Admin API resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The resource was not found (HTTP 404).
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// The type name of the resource (e.g., "Customer").
        resource: &'static str,
        /// The ID that was requested.
        id: String,
    },

    /// Validation failed for the resource (HTTP 422).
    #[error("Validation failed: {errors:?}")]
    ValidationFailed {
        /// A map of field names to error messages.
        errors: HashMap<String, Vec<String>>,
        /// The request ID for debugging (from the X-Request-Id header).
        request_id: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("Missing '{key}' in {resource} response")]
    UnexpectedBody {
        /// The type name of the resource.
        resource: &'static str,
        /// The wrapped-object key that was absent or malformed.
        key: &'static str,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A REST-level error occurred.
    #[error(transparent)]
    Rest(#[from] RestError),
}

impl ResourceError {
    /// Creates a `ResourceError` from an HTTP response status code.
    ///
    /// Maps 404 to `NotFound`, 422 to `ValidationFailed`, and everything
    /// else to a wrapped HTTP error carrying the serialized body.
    #[must_use]
    pub fn from_http_response(
        code: u16,
        body: &serde_json::Value,
        resource: &'static str,
        id: Option<&str>,
        request_id: Option<&str>,
    ) -> Self {
        match code {
            404 => Self::NotFound {
                resource,
                id: id.unwrap_or("unknown").to_string(),
            },
            422 => Self::ValidationFailed {
                errors: parse_validation_errors(body),
                request_id: request_id.map(ToString::to_string),
            },
            _ => Self::Http(HttpError::Response(crate::clients::HttpResponseError {
                code,
                message: body.to_string(),
                error_reference: request_id.map(ToString::to_string),
            })),
        }
    }

    /// Returns the upstream status code behind this error, when one exists.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::ValidationFailed { .. } => Some(422),
            Self::Http(HttpError::Response(e)) | Self::Rest(RestError::Http(HttpError::Response(e))) => {
                Some(e.code)
            }
            _ => None,
        }
    }
}

/// Parses validation errors from an API response body.
///
/// Shopify returns validation errors either keyed by field
/// (`{"errors": {"title": ["can't be blank"]}}`) or as a flat list
/// (`{"errors": ["Title can't be blank"]}`).
fn parse_validation_errors(body: &serde_json::Value) -> HashMap<String, Vec<String>> {
    let mut result = HashMap::new();

    if let Some(errors) = body.get("errors") {
        match errors {
            serde_json::Value::Object(map) => {
                for (field, messages) in map {
                    let msgs: Vec<String> = match messages {
                        serde_json::Value::Array(arr) => arr
                            .iter()
                            .filter_map(|v| v.as_str().map(ToString::to_string))
                            .collect(),
                        serde_json::Value::String(s) => vec![s.clone()],
                        _ => vec![messages.to_string()],
                    };
                    result.insert(field.clone(), msgs);
                }
            }
            serde_json::Value::Array(arr) => {
                let msgs: Vec<String> = arr
                    .iter()
                    .filter_map(|v| v.as_str().map(ToString::to_string))
                    .collect();
                if !msgs.is_empty() {
                    result.insert("base".to_string(), msgs);
                }
            }
            serde_json::Value::String(s) => {
                result.insert("base".to_string(), vec![s.clone()]);
            }
            _ => {}
        }
    }

    result
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_found_error_formats_message_with_resource_and_id() {
        let error = ResourceError::NotFound {
            resource: "Customer",
            id: "123456".to_string(),
        };
        let message = error.to_string();

        assert!(message.contains("Customer"));
        assert!(message.contains("123456"));
        assert!(message.contains("not found"));
    }

    #[test]
    fn test_from_http_response_maps_404_to_not_found() {
        let error = ResourceError::from_http_response(
            404,
            &json!({"errors": "Not Found"}),
            "Customer",
            Some("123"),
            None,
        );
        assert!(matches!(error, ResourceError::NotFound { .. }));
        assert_eq!(error.upstream_status(), Some(404));
    }

    #[test]
    fn test_from_http_response_maps_422_to_validation_failed() {
        let body = json!({"errors": {"code": ["has already been taken"]}});
        let error =
            ResourceError::from_http_response(422, &body, "GiftCard", None, Some("req-9"));

        match error {
            ResourceError::ValidationFailed { errors, request_id } => {
                assert_eq!(
                    errors.get("code"),
                    Some(&vec!["has already been taken".to_string()])
                );
                assert_eq!(request_id.as_deref(), Some("req-9"));
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_from_http_response_wraps_other_codes() {
        let error = ResourceError::from_http_response(
            403,
            &json!({"errors": "Unauthorized"}),
            "GiftCard",
            None,
            None,
        );
        assert!(matches!(error, ResourceError::Http(_)));
        assert_eq!(error.upstream_status(), Some(403));
    }

    #[test]
    fn test_parse_validation_errors_array_format() {
        let body = json!({"errors": ["Title can't be blank", "Price must be positive"]});
        let errors = parse_validation_errors(&body);

        assert_eq!(errors.get("base").unwrap().len(), 2);
    }

    #[test]
    fn test_parse_validation_errors_string_format() {
        let body = json!({"errors": "something went wrong"});
        let errors = parse_validation_errors(&body);

        assert_eq!(
            errors.get("base"),
            Some(&vec!["something went wrong".to_string()])
        );
    }
}
