//! Metafield resource, scoped to customers.
//!
//! The rewards program stores its state in customer metafields under the
//! `rewards` namespace: an integer points balance and a JSON history list.
//! Shopify upserts on POST for an existing namespace/key pair on the same
//! owner, so writes always go through `create_for_customer`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::RestClient;
use crate::resources::{ensure_success, extract_resource, ResourceError};

/// A metafield attached to a Shopify customer.
///
/// The `metafield_type` field (serialized as `type` in JSON) specifies the
/// data type of the value; the gateway uses `number_integer` for points and
/// `json` for history.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Metafield {
    /// The unique identifier of the metafield.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub id: Option<u64>,

    /// The namespace for the metafield.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// The key for the metafield within its namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// The value stored in the metafield, always a string on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// The type of data stored in the metafield.
    ///
    /// Renamed from `type` to avoid the Rust keyword conflict.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub metafield_type: Option<String>,

    /// The ID of the resource that owns this metafield.
    /// Read-only field returned by the API.
    #[serde(skip_serializing)]
    pub owner_id: Option<u64>,

    /// The type of resource that owns this metafield.
    /// Read-only field returned by the API.
    #[serde(skip_serializing)]
    pub owner_resource: Option<String>,

    /// When the metafield was last updated.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Metafield {
    const NAME: &'static str = "Metafield";

    /// Builds a `number_integer` metafield value.
    #[must_use]
    pub fn number_integer(namespace: &str, key: &str, value: i64) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            key: Some(key.to_string()),
            value: Some(value.to_string()),
            metafield_type: Some("number_integer".to_string()),
            ..Self::default()
        }
    }

    /// Builds a `json` metafield value from any serializable payload.
    #[must_use]
    pub fn json(namespace: &str, key: &str, value: &serde_json::Value) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            key: Some(key.to_string()),
            value: Some(value.to_string()),
            metafield_type: Some("json".to_string()),
            ..Self::default()
        }
    }

    /// Lists metafields attached to a customer, optionally filtered by
    /// namespace and key.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if the customer doesn't exist.
    pub async fn list_for_customer(
        client: &RestClient,
        customer_id: u64,
        namespace: Option<&str>,
        key: Option<&str>,
    ) -> Result<Vec<Self>, ResourceError> {
        let path = format!("customers/{customer_id}/metafields");

        let mut query = HashMap::new();
        if let Some(namespace) = namespace {
            query.insert("namespace".to_string(), namespace.to_string());
        }
        if let Some(key) = key {
            query.insert("key".to_string(), key.to_string());
        }
        let query = (!query.is_empty()).then_some(query);

        let response = client.get(&path, query).await?;

        ensure_success(&response, Self::NAME, Some(&customer_id.to_string()))?;
        extract_resource(&response, Self::NAME, "metafields")
    }

    /// Creates (or upserts) a metafield on a customer.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ValidationFailed`] when Shopify rejects the
    /// value (422).
    pub async fn create_for_customer(
        &self,
        client: &RestClient,
        customer_id: u64,
    ) -> Result<Self, ResourceError> {
        let path = format!("customers/{customer_id}/metafields");
        let body = serde_json::json!({ "metafield": self });

        let response = client.post(&path, body, None).await?;

        ensure_success(&response, Self::NAME, Some(&customer_id.to_string()))?;
        extract_resource(&response, Self::NAME, "metafield")
    }

    /// Returns the value parsed as an integer, if possible.
    #[must_use]
    pub fn integer_value(&self) -> Option<i64> {
        self.value.as_deref().and_then(|v| v.trim().parse().ok())
    }
}
