//! HTTP client for Shopify Admin API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests with automatic retry handling.
//!
//! # Retry Behavior
//!
//! The configured [`RetryPolicy`] applies to every request:
//!
//! - **429 (Rate Limited)**: waits for the `Retry-After` header value when
//!   present, otherwise `base_delay * 2^attempt`
//! - **5xx (Server Error)**: exponential backoff on the same schedule
//! - **Transport failures**: retried on the same schedule
//! - **Other non-success statuses**: never retried; the response is handed
//!   back so the caller can map the status with resource context
//!
//! Attempts are strictly sequential and retry state is request-scoped; the
//! client keeps no cross-request backoff state.

use std::collections::HashMap;
use std::time::Duration;

use crate::clients::errors::{HttpError, RateLimitExhaustedError, UpstreamUnavailableError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::{GatewayConfig, RetryPolicy};

/// Gateway version from Cargo.toml, reported in the User-Agent header.
pub const GATEWAY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the Shopify Admin API.
///
/// The client handles:
/// - Base URI construction from the shop domain (or the `api_host` override)
/// - Default headers including User-Agent and the access token
/// - The retry policy described in the module docs
/// - Shopify-specific header parsing (rate limit bucket, request id)
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URI (e.g., `https://my-store.myshopify.com`).
    base_uri: String,
    /// Base path (e.g., "/admin/api/2024-10").
    base_path: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Retry policy applied to every request.
    retry: RetryPolicy,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(base_path: impl Into<String>, config: &GatewayConfig) -> Self {
        let base_path = base_path.into();

        // api_host points the client at a proxy or mock server; production
        // traffic goes straight to the shop.
        let base_uri = config.api_host().map_or_else(
            || format!("https://{}", config.shop().as_ref()),
            |host| host.base_url().to_string(),
        );

        let user_agent = format!("storefront-gateway/{GATEWAY_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            "X-Shopify-Access-Token".to_string(),
            config.access_token().as_ref().to_string(),
        );

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.request_timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_uri,
            base_path,
            default_headers,
            retry: config.retry(),
        }
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the base path for this client.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request to the Shopify Admin API.
    ///
    /// Non-retryable non-2xx responses are returned as `Ok`; callers check
    /// [`HttpResponse::is_ok`] and map the status with resource context.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - A transport error persists through retries (`Network`)
    /// - 429 responses exhaust the retry budget (`RateLimited`)
    /// - 5xx responses exhaust the retry budget (`Upstream`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = format!("{}{}/{}", self.base_uri, self.base_path, request.path);

        let mut headers = self.default_headers.clone();
        if request.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        // attempt counts retries already performed for this request
        let mut attempt: u32 = 0;
        loop {
            let mut req_builder = match request.http_method {
                HttpMethod::Get => self.client.get(&url),
                HttpMethod::Post => self.client.post(&url),
                HttpMethod::Put => self.client.put(&url),
                HttpMethod::Delete => self.client.delete(&url),
            };

            for (key, value) in &headers {
                req_builder = req_builder.header(key, value);
            }

            if let Some(query) = &request.query {
                req_builder = req_builder.query(query);
            }

            if let Some(body) = &request.body {
                req_builder = req_builder.body(body.to_string());
            }

            let res = match req_builder.send().await {
                Ok(res) => res,
                Err(err) => {
                    if attempt >= self.retry.max_retries {
                        return Err(HttpError::Network(err));
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        path = %request.path,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transport error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
            };

            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let body_text = res.text().await.unwrap_or_default();

            let body = if body_text.is_empty() {
                serde_json::json!({})
            } else {
                serde_json::from_str(&body_text).unwrap_or_else(|_| {
                    // 5xx bodies are often HTML error pages; keep them readable
                    if code >= 500 {
                        serde_json::json!({ "raw_body": body_text })
                    } else {
                        serde_json::json!({})
                    }
                })
            };

            let response = HttpResponse::new(code, res_headers, body);

            if let Some(limit) = response.api_call_limit {
                if limit.is_nearly_exhausted() {
                    tracing::warn!(
                        request_count = limit.request_count,
                        bucket_size = limit.bucket_size,
                        "approaching Shopify API call limit"
                    );
                }
            }

            if response.is_ok() {
                return Ok(response);
            }

            // Non-retryable statuses go back to the caller, which maps them
            // with resource context (404 -> NotFound, 422 -> validation, ...)
            let retryable = code == 429 || code >= 500;
            if !retryable {
                return Ok(response);
            }

            let error_message = Self::serialize_error(&response);
            let error_reference = response.request_id().map(String::from);

            if attempt >= self.retry.max_retries {
                if code == 429 {
                    return Err(HttpError::RateLimited(RateLimitExhaustedError {
                        tries: attempt + 1,
                        message: error_message,
                        error_reference,
                    }));
                }
                return Err(HttpError::Upstream(UpstreamUnavailableError {
                    code,
                    tries: attempt + 1,
                    message: error_message,
                    error_reference,
                }));
            }

            let delay = Self::retry_delay(&self.retry, &response, code, attempt);
            tracing::warn!(
                path = %request.path,
                status = code,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                "retryable upstream status, backing off"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Parses response headers into a `HashMap` with lowercased keys.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Calculates the retry delay for a retryable response.
    ///
    /// 429 honors `Retry-After` when present; everything else follows the
    /// exponential schedule.
    fn retry_delay(
        policy: &RetryPolicy,
        response: &HttpResponse,
        status: u16,
        attempt: u32,
    ) -> Duration {
        if status == 429 {
            if let Some(retry_after) = response.retry_request_after {
                return Duration::from_secs_f64(retry_after.max(0.0));
            }
        }
        policy.delay_for_attempt(attempt)
    }

    /// Serializes an error response body to a compact JSON string.
    fn serialize_error(response: &HttpResponse) -> String {
        let mut error_body = serde_json::Map::new();

        if let Some(errors) = response.body.get("errors") {
            error_body.insert("errors".to_string(), errors.clone());
        }
        if let Some(error) = response.body.get("error") {
            error_body.insert("error".to_string(), error.clone());
        }
        if let Some(raw) = response.body.get("raw_body") {
            error_body.insert("raw_body".to_string(), raw.clone());
        }

        if let Some(request_id) = response.request_id() {
            error_body.insert(
                "error_reference".to_string(),
                serde_json::json!(format!(
                    "If you report this error, please include this id: {request_id}."
                )),
            );
        }

        serde_json::to_string(&error_body).unwrap_or_else(|_| "{}".to_string())
    }
}
