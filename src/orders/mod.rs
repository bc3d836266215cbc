//! Draft-order assembly for discounted storefront carts.
//!
//! The storefront sends a cart of variant lines with tier discount
//! percentages; the gateway validates it, computes per-line discount
//! amounts, creates a Shopify draft order, and hands back the hosted
//! invoice URL.
//!
//! The draft order is intentionally left open. Completing it through the
//! API converts it to a paid order and invalidates the invoice URL, which
//! is the link the storefront sends the customer to.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clients::RestClient;
use crate::resources::{
    AppliedDiscount, CustomerRef, DraftOrder, DraftOrderLineItem, ResourceError,
};

/// Label for lines given away outright.
const FREE_GIFT_LABEL: &str = "Quà tặng miễn phí";

/// One line of the storefront cart.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CartItem {
    /// The product variant to order.
    pub variant_id: Option<u64>,
    /// How many units.
    pub quantity: Option<i64>,
    /// Unit price in shop currency.
    pub price: Option<f64>,
    /// Tier discount percentage in `[0, 100]`.
    #[serde(default)]
    pub discount_percent: f64,
    /// Marks the line as a free gift regardless of percentage.
    #[serde(default)]
    pub is_gift: bool,
}

/// Request body for draft-order creation.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CreateDraftOrderRequest {
    /// Customer to attach the order to, when known.
    pub customer_id: Option<u64>,
    /// Fallback identification by email for guest carts.
    pub customer_email: Option<String>,
    /// The cart lines.
    #[serde(default)]
    pub items: Vec<CartItem>,
}

/// The pieces of a created draft order the storefront needs.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DraftOrderReceipt {
    /// The created draft order's ID.
    pub draft_order_id: u64,
    /// The hosted invoice URL, valid while the draft stays open.
    pub invoice_url: String,
    /// The total price Shopify computed, when present.
    pub total_price: Option<String>,
}

/// Errors from draft-order assembly.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The cart was empty.
    #[error("No items provided")]
    EmptyCart,

    /// A cart line failed validation.
    #[error("Item {index}: {reason}")]
    InvalidItem {
        /// Zero-based index of the offending line.
        index: usize,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// Shopify accepted the request but the response was missing a field
    /// the storefront depends on.
    #[error("Draft order response was missing {field}")]
    IncompleteResponse {
        /// The absent field.
        field: &'static str,
    },

    /// An upstream call failed.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Computes a line's discount amount, fixed to two decimals.
///
/// `price * quantity * percent / 100`, formatted the way Shopify expects
/// monetary strings.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn discount_amount(price: f64, quantity: i64, percent: f64) -> String {
    format!("{:.2}", price * quantity as f64 * percent / 100.0)
}

/// Builds the applied discount for a cart line, if it has one.
///
/// Lines with a zero percentage carry no discount. A 100% line or an
/// explicit gift flag is labeled as a free gift instead of a tier
/// discount; the amount computation is identical.
#[must_use]
pub fn applied_discount_for(item: &CartItem) -> Option<AppliedDiscount> {
    if item.discount_percent <= 0.0 {
        return None;
    }

    let is_gift = item.is_gift || (item.discount_percent - 100.0).abs() < f64::EPSILON;
    let description = if is_gift {
        FREE_GIFT_LABEL.to_string()
    } else {
        format!("Tier Discount {}%", item.discount_percent)
    };

    Some(AppliedDiscount {
        description: Some(description),
        value: Some(item.discount_percent.to_string()),
        value_type: Some("percentage".to_string()),
        amount: Some(discount_amount(
            item.price.unwrap_or(0.0),
            item.quantity.unwrap_or(0),
            item.discount_percent,
        )),
    })
}

/// Validates the cart, naming the first offending line.
///
/// # Errors
///
/// Returns [`OrderError::EmptyCart`] or [`OrderError::InvalidItem`].
pub fn validate_items(items: &[CartItem]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    for (index, item) in items.iter().enumerate() {
        if item.variant_id.is_none() {
            return Err(OrderError::InvalidItem {
                index,
                reason: "variant_id is required",
            });
        }
        if item.quantity.map_or(true, |q| q <= 0) {
            return Err(OrderError::InvalidItem {
                index,
                reason: "quantity must be greater than 0",
            });
        }
        match item.price {
            Some(price) if price >= 0.0 => {}
            _ => {
                return Err(OrderError::InvalidItem {
                    index,
                    reason: "price must be a positive number",
                });
            }
        }
        if !(0.0..=100.0).contains(&item.discount_percent) {
            return Err(OrderError::InvalidItem {
                index,
                reason: "discount_percent must be between 0 and 100",
            });
        }
    }

    Ok(())
}

/// Creates draft orders from validated carts.
#[derive(Debug, Clone)]
pub struct DraftOrderService {
    client: Arc<RestClient>,
}

impl DraftOrderService {
    /// Creates a new service over the given client.
    #[must_use]
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }

    /// Validates the cart, builds the payload, and creates the draft order.
    ///
    /// No idempotency key is attached: submitting the same cart twice
    /// creates two independent draft orders.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError`] for invalid carts, upstream failures, or a
    /// response missing the invoice URL.
    pub async fn create(
        &self,
        request: CreateDraftOrderRequest,
    ) -> Result<DraftOrderReceipt, OrderError> {
        validate_items(&request.items)?;

        let line_items: Vec<DraftOrderLineItem> = request
            .items
            .iter()
            .map(|item| DraftOrderLineItem {
                variant_id: item.variant_id,
                quantity: item.quantity,
                applied_discount: applied_discount_for(item),
                ..Default::default()
            })
            .collect();

        let draft = DraftOrder {
            line_items: Some(line_items),
            use_customer_default_address: Some(true),
            customer: request.customer_id.map(|id| CustomerRef { id }),
            email: match request.customer_id {
                Some(_) => None,
                None => request.customer_email.clone(),
            },
            ..Default::default()
        };

        tracing::info!(
            customer_id = ?request.customer_id,
            items = request.items.len(),
            "creating draft order"
        );

        let created = draft.create(&self.client).await?;

        let draft_order_id = created
            .id
            .ok_or(OrderError::IncompleteResponse { field: "id" })?;
        let invoice_url = created.invoice_url.ok_or(OrderError::IncompleteResponse {
            field: "invoice_url",
        })?;

        tracing::info!(draft_order_id, "draft order created");

        Ok(DraftOrderReceipt {
            draft_order_id,
            invoice_url,
            total_price: created.total_price,
        })
    }
}
