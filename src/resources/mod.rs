//! Typed Shopify Admin REST resources used by the gateway.
//!
//! Each resource module defines the payload struct(s) for one Admin API
//! resource plus the focused operations the gateway performs on it. Shopify
//! wraps every body in a resource key (`{"customer": {...}}`,
//! `{"draft_order": {...}}`); the helpers here centralize unwrapping and the
//! status-to-error mapping.
//!
//! Read-only fields (ids, timestamps, server-computed totals) are marked
//! `#[serde(skip_serializing)]` so they never leak into create requests.

mod customer;
mod discount_code;
mod draft_order;
mod errors;
mod gift_card;
mod metafield;
mod price_rule;
mod shop;

pub use customer::Customer;
pub use discount_code::DiscountCode;
pub use draft_order::{AppliedDiscount, CustomerRef, DraftOrder, DraftOrderLineItem};
pub use errors::ResourceError;
pub use gift_card::GiftCard;
pub use metafield::Metafield;
pub use price_rule::{
    PriceRule, PriceRuleAllocationMethod, PriceRuleCustomerSelection, PriceRuleTargetSelection,
    PriceRuleTargetType, PriceRuleValueType,
};
pub use shop::Shop;

use serde::de::DeserializeOwned;

use crate::clients::HttpResponse;

/// Converts a non-2xx response into the matching [`ResourceError`].
pub(crate) fn ensure_success(
    response: &HttpResponse,
    resource: &'static str,
    id: Option<&str>,
) -> Result<(), ResourceError> {
    if response.is_ok() {
        return Ok(());
    }
    Err(ResourceError::from_http_response(
        response.code,
        &response.body,
        resource,
        id,
        response.request_id(),
    ))
}

/// Extracts and deserializes the wrapped resource object from a response
/// body (e.g. the `{...}` in `{"customer": {...}}`).
pub(crate) fn extract_resource<T: DeserializeOwned>(
    response: &HttpResponse,
    resource: &'static str,
    key: &'static str,
) -> Result<T, ResourceError> {
    let value = response
        .body
        .get(key)
        .ok_or(ResourceError::UnexpectedBody { resource, key })?;

    serde_json::from_value(value.clone()).map_err(|err| {
        tracing::debug!(%err, resource, key, "failed to deserialize resource body");
        ResourceError::UnexpectedBody { resource, key }
    })
}
