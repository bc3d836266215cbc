//! REST client for the Shopify Admin API.
//!
//! The [`RestClient`] layers `.json` path normalization and convenience
//! methods over the retrying [`HttpClient`](crate::clients::HttpClient).

mod client;
mod errors;

pub use client::RestClient;
pub use errors::RestError;
