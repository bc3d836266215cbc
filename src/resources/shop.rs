//! Shop resource, used by the configuration probe endpoint.

use serde::{Deserialize, Serialize};

use crate::clients::RestClient;
use crate::resources::{ensure_success, extract_resource, ResourceError};

/// The shop the access token belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Shop {
    /// The unique identifier of the shop.
    #[serde(skip_serializing)]
    pub id: Option<u64>,

    /// The shop's display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The shop's primary domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// The shop's myshopify.com domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub myshopify_domain: Option<String>,
}

impl Shop {
    const NAME: &'static str = "Shop";

    /// Fetches the shop for the configured credentials.
    ///
    /// A successful fetch proves the shop domain, token and API version are
    /// all usable.
    ///
    /// # Errors
    ///
    /// Returns the wrapped HTTP error when the credentials are rejected.
    pub async fn fetch(client: &RestClient) -> Result<Self, ResourceError> {
        let response = client.get("shop", None).await?;

        ensure_success(&response, Self::NAME, None)?;
        extract_resource(&response, Self::NAME, "shop")
    }
}
