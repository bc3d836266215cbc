//! DiscountCode resource.
//!
//! Codes are always nested under a price rule; the gateway only ever
//! creates a single code per rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::RestClient;
use crate::resources::{ensure_success, extract_resource, ResourceError};

/// A textual discount code bound to a price rule.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DiscountCode {
    /// The unique identifier of the discount code.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub id: Option<u64>,

    /// The ID of the price rule this code belongs to.
    /// Read-only field returned by the API.
    #[serde(skip_serializing)]
    pub price_rule_id: Option<u64>,

    /// The code the customer enters at checkout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// How many times the code has been used.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub usage_count: Option<i32>,

    /// When the code was created.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
}

impl DiscountCode {
    const NAME: &'static str = "DiscountCode";

    /// Creates a code bound to the given price rule.
    ///
    /// Sends `POST /admin/api/{version}/price_rules/{id}/discount_codes.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ValidationFailed`] when Shopify rejects the
    /// code (422), or the wrapped HTTP error otherwise.
    pub async fn create_for_rule(
        &self,
        client: &RestClient,
        price_rule_id: u64,
    ) -> Result<Self, ResourceError> {
        let path = format!("price_rules/{price_rule_id}/discount_codes");
        let body = serde_json::json!({ "discount_code": self });

        let response = client.post(&path, body, None).await?;

        ensure_success(&response, Self::NAME, Some(&price_rule_id.to_string()))?;
        extract_resource(&response, Self::NAME, "discount_code")
    }
}
