//! REST-specific error types.

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for REST API operations.
///
/// Wraps HTTP errors and adds the REST-specific path validation case.
#[derive(Debug, Error)]
pub enum RestError {
    /// The REST API path is invalid (empty after normalization).
    #[error("Invalid REST API path: {path}")]
    InvalidPath {
        /// The invalid path that was provided.
        path: String,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}
