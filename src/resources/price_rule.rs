//! PriceRule resource.
//!
//! Discount codes in Shopify are a two-step mechanism: a price rule defines
//! the value and eligibility, then one or more codes are bound to it. The
//! exchange creates a fixed-amount rule restricted to the redeeming
//! customer, valid for a fixed window, limited to a single use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::RestClient;
use crate::resources::{ensure_success, extract_resource, ResourceError};

/// The type of value a price rule applies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceRuleValueType {
    /// A fixed monetary amount off.
    FixedAmount,
    /// A percentage off.
    Percentage,
}

/// Which customers a price rule applies to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceRuleCustomerSelection {
    /// All customers.
    All,
    /// Only the customers listed in `prerequisite_customer_ids`.
    Prerequisite,
}

/// What a price rule targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceRuleTargetType {
    /// The rule discounts line items.
    LineItem,
    /// The rule discounts shipping.
    ShippingLine,
}

/// Which targets within the target type are discounted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceRuleTargetSelection {
    /// All eligible targets.
    All,
    /// Only entitled targets.
    Entitled,
}

/// How the discount value is allocated over the targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceRuleAllocationMethod {
    /// Spread across all targets.
    Across,
    /// Applied to each target.
    Each,
}

/// A price rule defining a discount's value and eligibility.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PriceRule {
    /// The unique identifier of the price rule.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub id: Option<u64>,

    /// The title of the price rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The type of value applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<PriceRuleValueType>,

    /// The value, as a string. Shopify requires discounts to be negative
    /// (e.g., "-50000.0" for 50 000 off).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Which customers the rule applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_selection: Option<PriceRuleCustomerSelection>,

    /// What the rule targets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<PriceRuleTargetType>,

    /// Which targets are discounted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_selection: Option<PriceRuleTargetSelection>,

    /// How the value is allocated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation_method: Option<PriceRuleAllocationMethod>,

    /// Whether each customer can use the rule at most once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub once_per_customer: Option<bool>,

    /// Total number of times the rule can be used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<i32>,

    /// Customers allowed to use the rule when `customer_selection` is
    /// `Prerequisite`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerequisite_customer_ids: Option<Vec<u64>>,

    /// When the rule becomes active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,

    /// When the rule expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,

    /// When the rule was created.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
}

impl PriceRule {
    const NAME: &'static str = "PriceRule";

    /// Creates the price rule in Shopify.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ValidationFailed`] when Shopify rejects the
    /// payload (422), or the wrapped HTTP error otherwise.
    pub async fn create(&self, client: &RestClient) -> Result<Self, ResourceError> {
        let body = serde_json::json!({ "price_rule": self });

        let response = client.post("price_rules", body, None).await?;

        ensure_success(&response, Self::NAME, None)?;
        extract_resource(&response, Self::NAME, "price_rule")
    }

    /// Deletes the price rule (and with it any codes bound to it).
    ///
    /// Used as the compensating action when a points debit fails after a
    /// discount code was issued.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if the rule doesn't exist, or
    /// [`ResourceError::UnexpectedBody`] when called on a rule without an ID.
    pub async fn delete(&self, client: &RestClient) -> Result<(), ResourceError> {
        let id = self.id.ok_or(ResourceError::UnexpectedBody {
            resource: Self::NAME,
            key: "id",
        })?;

        let path = format!("price_rules/{id}");
        let response = client.delete(&path, None).await?;

        ensure_success(&response, Self::NAME, Some(&id.to_string()))
    }
}
