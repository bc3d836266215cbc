//! DraftOrder resource.
//!
//! The gateway creates draft orders and returns their hosted invoice URL.
//! It deliberately never calls the `complete` endpoint: completing converts
//! the draft to a paid order and invalidates the invoice link the
//! storefront hands to the customer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::RestClient;
use crate::resources::{ensure_success, extract_resource, ResourceError};

/// A discount applied to a draft-order line item.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppliedDiscount {
    /// The human-visible description of the discount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The discount value (numeric, as a string).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// The type of value: "percentage" or "fixed_amount".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,

    /// The calculated discount amount, fixed to two decimals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// A line item in a draft order.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DraftOrderLineItem {
    /// The ID of the product variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<u64>,

    /// The quantity of items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,

    /// The title of the product (populated by Shopify on read).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The price per item as a string (populated by Shopify on read).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    /// A discount applied to this specific line item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_discount: Option<AppliedDiscount>,
}

/// Reference to an existing customer by ID, used when creating a draft
/// order on a customer's behalf.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerRef {
    /// The customer's ID.
    pub id: u64,
}

/// A draft order in Shopify.
///
/// # Read-Only Fields
///
/// `id`, `name`, `status`, `invoice_url`, `subtotal_price`, `total_price`,
/// and the timestamps are server-populated and never sent in create
/// requests.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DraftOrder {
    // --- Read-only fields (not serialized) ---
    /// The unique identifier of the draft order.
    #[serde(skip_serializing)]
    pub id: Option<u64>,

    /// The name of the draft order (e.g., "#D1").
    #[serde(skip_serializing)]
    pub name: Option<String>,

    /// The status of the draft order ("open", "invoice_sent", "completed").
    #[serde(skip_serializing)]
    pub status: Option<String>,

    /// The hosted invoice URL for this draft order.
    ///
    /// Valid while the draft order stays open.
    #[serde(skip_serializing)]
    pub invoice_url: Option<String>,

    /// The subtotal price before taxes and shipping.
    #[serde(skip_serializing)]
    pub subtotal_price: Option<String>,

    /// The total price including taxes and shipping.
    #[serde(skip_serializing)]
    pub total_price: Option<String>,

    /// When the draft order was created.
    #[serde(skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,

    // --- Core fields ---
    /// The customer's email address (used when no customer ID is known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// The customer this draft order belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRef>,

    /// Whether to use the customer's default address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_customer_default_address: Option<bool>,

    /// An optional note attached to the draft order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Line items in the draft order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<DraftOrderLineItem>>,
}

impl DraftOrder {
    const NAME: &'static str = "DraftOrder";

    /// Creates the draft order in Shopify.
    ///
    /// Sends `POST /admin/api/{version}/draft_orders.json`. The created
    /// draft order is returned with `id`, `invoice_url` and `total_price`
    /// populated. Identical payloads create independent draft orders; there
    /// is no idempotency key.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ValidationFailed`] when Shopify rejects the
    /// payload (422), or the wrapped HTTP error otherwise.
    pub async fn create(&self, client: &RestClient) -> Result<Self, ResourceError> {
        let body = serde_json::json!({ "draft_order": self });

        let response = client.post("draft_orders", body, None).await?;

        ensure_success(&response, Self::NAME, None)?;
        extract_resource(&response, Self::NAME, "draft_order")
    }
}
