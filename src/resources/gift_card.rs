//! GiftCard resource.
//!
//! Gift cards are one of the two reward artifacts the exchange can issue.
//! They cannot be deleted through the Admin API; `disable` is the only way
//! to take one out of circulation, which the exchange uses as its
//! compensating action when a points debit fails after issuance.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::RestClient;
use crate::resources::{ensure_success, extract_resource, ResourceError};

/// A stored-value gift card.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GiftCard {
    /// The unique identifier of the gift card.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub id: Option<u64>,

    /// The full card code. Writable on create; Shopify only returns the
    /// last characters on subsequent reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// The initial value of the card, as a decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,

    /// The remaining balance.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub balance: Option<String>,

    /// The ID of the customer the card is bound to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<u64>,

    /// An internal note, not visible to the customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// The date the gift card expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<NaiveDate>,

    /// The last characters of the code.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub last_characters: Option<String>,

    /// When the gift card was disabled, if it has been.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub disabled_at: Option<DateTime<Utc>>,

    /// When the gift card was created.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
}

impl GiftCard {
    const NAME: &'static str = "GiftCard";

    /// Returns whether the gift card is currently enabled (not disabled).
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.disabled_at.is_none()
    }

    /// Creates the gift card in Shopify.
    ///
    /// Requires the `write_gift_cards` scope; Shopify answers 403 without
    /// it, which callers surface as a missing-scope error.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ValidationFailed`] when Shopify rejects the
    /// payload (422), or the wrapped HTTP error otherwise.
    pub async fn create(&self, client: &RestClient) -> Result<Self, ResourceError> {
        let body = serde_json::json!({ "gift_card": self });

        let response = client.post("gift_cards", body, None).await?;

        ensure_success(&response, Self::NAME, None)?;
        extract_resource(&response, Self::NAME, "gift_card")
    }

    /// Disables the gift card.
    ///
    /// Sends `POST /admin/api/{version}/gift_cards/{id}/disable.json`.
    /// Once disabled, a gift card cannot be re-enabled.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if the gift card doesn't exist,
    /// or [`ResourceError::UnexpectedBody`] when called on a card without
    /// an ID.
    pub async fn disable(&self, client: &RestClient) -> Result<Self, ResourceError> {
        let id = self.id.ok_or(ResourceError::UnexpectedBody {
            resource: Self::NAME,
            key: "id",
        })?;

        let path = format!("gift_cards/{id}/disable");
        let body = serde_json::json!({});

        let response = client.post(&path, body, None).await?;

        ensure_success(&response, Self::NAME, Some(&id.to_string()))?;
        extract_resource(&response, Self::NAME, "gift_card")
    }
}
