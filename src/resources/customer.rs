//! Customer resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::RestClient;
use crate::resources::{ensure_success, extract_resource, ResourceError};

/// A Shopify customer, reduced to the fields the gateway reads.
///
/// The gateway never creates or mutates customers; it only verifies they
/// exist before touching their metafields.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Customer {
    /// The unique identifier of the customer.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub id: Option<u64>,

    /// The customer's email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// The customer's first name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// The customer's last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// The customer's account state (e.g., "enabled").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Comma-separated tags on the customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    /// When the customer was created.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    const NAME: &'static str = "Customer";

    /// Finds a single customer by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if the customer doesn't exist.
    pub async fn find(client: &RestClient, id: u64) -> Result<Self, ResourceError> {
        let path = format!("customers/{id}");
        let response = client.get(&path, None).await?;

        ensure_success(&response, Self::NAME, Some(&id.to_string()))?;
        extract_resource(&response, Self::NAME, "customer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_deserialization_from_api_response() {
        let json = r#"{
            "id": 706405506930370000,
            "email": "bob.norman@example.com",
            "first_name": "Bob",
            "last_name": "Norman",
            "state": "enabled",
            "tags": "vip",
            "created_at": "2024-01-15T10:30:00Z"
        }"#;

        let customer: Customer = serde_json::from_str(json).unwrap();

        assert_eq!(customer.id, Some(706_405_506_930_370_000));
        assert_eq!(customer.email.as_deref(), Some("bob.norman@example.com"));
        assert_eq!(customer.first_name.as_deref(), Some("Bob"));
        assert!(customer.created_at.is_some());
    }

    #[test]
    fn test_customer_serialization_omits_read_only_fields() {
        let customer = Customer {
            id: Some(123),
            email: Some("a@b.c".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&customer).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["email"], "a@b.c");
    }
}
