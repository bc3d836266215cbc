//! Configuration types for the storefront gateway.
//!
//! The gateway is configured once at startup through [`GatewayConfig`], an
//! immutable struct passed explicitly to clients and services. Nothing else
//! in the crate reads process environment; [`GatewayConfig::from_env`] is the
//! single place ambient state enters the program.
//!
//! # Example
//!
//! ```rust
//! use storefront_gateway::{AccessToken, GatewayConfig, ShopDomain};
//!
//! let config = GatewayConfig::builder()
//!     .shop(ShopDomain::new("my-store").unwrap())
//!     .access_token(AccessToken::new("shpat_example").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.shop().as_ref(), "my-store.myshopify.com");
//! ```

mod newtypes;
mod version;

pub use newtypes::{AccessToken, HostUrl, ShopDomain};
pub use version::ApiVersion;

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ConfigError;

/// Environment variable holding the shop domain.
pub const ENV_SHOP: &str = "SHOPIFY_SHOP";
/// Environment variable holding the Admin API access token.
pub const ENV_ACCESS_TOKEN: &str = "SHOPIFY_ACCESS_TOKEN";
/// Environment variable optionally overriding the pinned API version.
pub const ENV_API_VERSION: &str = "SHOPIFY_API_VERSION";
/// Environment variable optionally overriding the Admin API base URL.
pub const ENV_API_HOST: &str = "SHOPIFY_API_HOST";

/// Retry policy for outbound Admin API calls.
///
/// A failed call is retried up to `max_retries` additional times. The wait
/// before retry `n` (zero-based) is `base_delay * 2^n`, unless the response
/// carried a `Retry-After` header, which takes precedence.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use storefront_gateway::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_retries, 3);
/// assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of additional attempts after the first failure.
    pub max_retries: u32,
    /// Base delay for the exponential backoff schedule.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Returns the backoff delay before retry number `attempt` (zero-based).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay * 2_u32.saturating_pow(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

/// The kind of reward artifact the exchange issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewardKind {
    /// A stored-value gift card bound to the customer.
    GiftCard,
    /// A price rule plus single-use discount code restricted to the customer.
    DiscountCode,
}

/// One row of the points-to-VND exchange table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExchangeTier {
    /// Reward value in VND.
    pub value_vnd: i64,
    /// Points debited for this tier.
    pub points_cost: i64,
}

/// Configuration for the rewards exchange program.
///
/// The default table is the 1:1 rate (50 000 points buy a 50 000 VND
/// reward). The table is configuration rather than a constant because the
/// intended rate is an open business question; see DESIGN.md.
#[derive(Clone, Debug)]
pub struct RewardsConfig {
    /// Exchange tiers, keyed by reward value in VND.
    pub tiers: Vec<ExchangeTier>,
    /// Hard cutoff; exchanges after this instant are rejected.
    pub program_deadline: DateTime<Utc>,
    /// Which artifact to issue.
    pub reward_kind: RewardKind,
    /// Fixed expiry date stamped on issued gift cards.
    pub gift_card_expires_on: NaiveDate,
    /// Validity window for issued discount codes.
    pub discount_code_validity_days: i64,
}

impl RewardsConfig {
    /// End of the exchange program: start of 2026-03-04 in ICT (UTC+7).
    const PROGRAM_DEADLINE: &'static str = "2026-03-04T00:00:00+07:00";

    /// The default 1:1 exchange table.
    #[must_use]
    pub fn default_tiers() -> Vec<ExchangeTier> {
        [50_000, 100_000, 200_000, 500_000]
            .into_iter()
            .map(|v| ExchangeTier {
                value_vnd: v,
                points_cost: v,
            })
            .collect()
    }

    /// Returns the points cost for a reward value, or `None` if the value is
    /// not a configured tier.
    #[must_use]
    pub fn points_required(&self, discount_value: i64) -> Option<i64> {
        self.tiers
            .iter()
            .find(|tier| tier.value_vnd == discount_value)
            .map(|tier| tier.points_cost)
    }

    /// Returns the configured reward values, for validation error messages.
    #[must_use]
    pub fn valid_values(&self) -> Vec<i64> {
        self.tiers.iter().map(|tier| tier.value_vnd).collect()
    }
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            tiers: Self::default_tiers(),
            program_deadline: DateTime::parse_from_rfc3339(Self::PROGRAM_DEADLINE)
                .expect("program deadline literal is valid RFC 3339")
                .with_timezone(&Utc),
            reward_kind: RewardKind::GiftCard,
            gift_card_expires_on: NaiveDate::from_ymd_opt(2026, 3, 3)
                .expect("gift card expiry literal is a valid date"),
            discount_code_validity_days: 90,
        }
    }
}

/// Immutable configuration for the gateway.
///
/// # Thread Safety
///
/// `GatewayConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across handlers and async tasks.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    shop: ShopDomain,
    access_token: AccessToken,
    api_version: ApiVersion,
    api_host: Option<HostUrl>,
    request_timeout: Duration,
    retry: RetryPolicy,
    rewards: RewardsConfig,
}

// Verify GatewayConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GatewayConfig>();
};

impl GatewayConfig {
    /// Creates a new builder for constructing a `GatewayConfig`.
    #[must_use]
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::new()
    }

    /// Loads configuration from the process environment.
    ///
    /// `SHOPIFY_SHOP` and `SHOPIFY_ACCESS_TOKEN` are required;
    /// `SHOPIFY_API_VERSION` and `SHOPIFY_API_HOST` are optional. Missing
    /// required variables fail startup rather than every request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is absent or a value
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let shop = require_env(ENV_SHOP)?;
        let token = require_env(ENV_ACCESS_TOKEN)?;

        let mut builder = Self::builder()
            .shop(ShopDomain::new(shop)?)
            .access_token(AccessToken::new(token)?);

        if let Some(version) = optional_env(ENV_API_VERSION) {
            builder = builder.api_version(version.parse()?);
        }
        if let Some(host) = optional_env(ENV_API_HOST) {
            builder = builder.api_host(HostUrl::new(host)?);
        }

        builder.build()
    }

    /// Returns the shop domain.
    #[must_use]
    pub const fn shop(&self) -> &ShopDomain {
        &self.shop
    }

    /// Returns the Admin API access token.
    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the pinned API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the base URL override, if configured.
    #[must_use]
    pub const fn api_host(&self) -> Option<&HostUrl> {
        self.api_host.as_ref()
    }

    /// Returns the per-call wall-clock bound.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the retry policy for outbound calls.
    #[must_use]
    pub const fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Returns the rewards program configuration.
    #[must_use]
    pub const fn rewards(&self) -> &RewardsConfig {
        &self.rewards
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingEnvironment { name })
}

fn optional_env(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Builder for [`GatewayConfig`] instances.
///
/// Required fields are `shop` and `access_token`; everything else has
/// defaults (pinned API version, 30 s timeout, default retry policy and
/// rewards program).
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
    shop: Option<ShopDomain>,
    access_token: Option<AccessToken>,
    api_version: Option<ApiVersion>,
    api_host: Option<HostUrl>,
    request_timeout: Option<Duration>,
    retry: Option<RetryPolicy>,
    rewards: Option<RewardsConfig>,
}

impl GatewayConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shop domain (required).
    #[must_use]
    pub fn shop(mut self, shop: ShopDomain) -> Self {
        self.shop = Some(shop);
        self
    }

    /// Sets the Admin API access token (required).
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the Admin API base URL override.
    #[must_use]
    pub fn api_host(mut self, host: HostUrl) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Sets the per-call wall-clock bound.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Sets the rewards program configuration.
    #[must_use]
    pub fn rewards(mut self, rewards: RewardsConfig) -> Self {
        self.rewards = Some(rewards);
        self
    }

    /// Builds the [`GatewayConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `shop` or
    /// `access_token` are not set.
    pub fn build(self) -> Result<GatewayConfig, ConfigError> {
        let shop = self
            .shop
            .ok_or(ConfigError::MissingRequiredField { field: "shop" })?;
        let access_token = self.access_token.ok_or(ConfigError::MissingRequiredField {
            field: "access_token",
        })?;

        Ok(GatewayConfig {
            shop,
            access_token,
            api_version: self.api_version.unwrap_or_default(),
            api_host: self.api_host,
            request_timeout: self
                .request_timeout
                .unwrap_or(Duration::from_secs(30)),
            retry: self.retry.unwrap_or_default(),
            rewards: self.rewards.unwrap_or_default(),
        })
    }
}
