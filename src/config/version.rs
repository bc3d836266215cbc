//! Shopify API version definitions.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Shopify Admin API version.
///
/// Shopify releases new API versions quarterly. The gateway pins `2024-10`
/// by default; the `Custom` variant carries any other `YYYY-MM` string so a
/// deployment can move ahead without a code change.
///
/// # Example
///
/// ```rust
/// use storefront_gateway::ApiVersion;
///
/// let version: ApiVersion = "2024-10".parse().unwrap();
/// assert_eq!(version, ApiVersion::V2024_10);
/// assert_eq!(version.to_string(), "2024-10");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// API version 2024-04 (April 2024)
    V2024_04,
    /// API version 2024-07 (July 2024)
    V2024_07,
    /// API version 2024-10 (October 2024)
    V2024_10,
    /// API version 2025-01 (January 2025)
    V2025_01,
    /// Custom version string for future or unrecognized versions.
    Custom(String),
}

impl ApiVersion {
    /// Returns the version the gateway pins by default.
    #[must_use]
    pub const fn pinned() -> Self {
        Self::V2024_10
    }

    /// Returns the version as its `YYYY-MM` string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::V2024_04 => "2024-04",
            Self::V2024_07 => "2024-07",
            Self::V2024_10 => "2024-10",
            Self::V2025_01 => "2025-01",
            Self::Custom(s) => s,
        }
    }

    fn is_valid_format(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == 7
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[4] == b'-'
            && bytes[5..].iter().all(u8::is_ascii_digit)
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::pinned()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2024-04" => Ok(Self::V2024_04),
            "2024-07" => Ok(Self::V2024_07),
            "2024-10" => Ok(Self::V2024_10),
            "2025-01" => Ok(Self::V2025_01),
            other if Self::is_valid_format(other) => Ok(Self::Custom(other.to_string())),
            other => Err(ConfigError::InvalidApiVersion {
                version: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_version_is_2024_10() {
        assert_eq!(ApiVersion::pinned(), ApiVersion::V2024_10);
        assert_eq!(ApiVersion::default(), ApiVersion::V2024_10);
    }

    #[test]
    fn test_display_matches_wire_format() {
        assert_eq!(ApiVersion::V2024_10.to_string(), "2024-10");
        assert_eq!(ApiVersion::V2025_01.to_string(), "2025-01");
    }

    #[test]
    fn test_parse_known_versions() {
        let version: ApiVersion = "2024-10".parse().unwrap();
        assert_eq!(version, ApiVersion::V2024_10);
    }

    #[test]
    fn test_parse_future_version_as_custom() {
        let version: ApiVersion = "2026-07".parse().unwrap();
        assert_eq!(version, ApiVersion::Custom("2026-07".to_string()));
        assert_eq!(version.to_string(), "2026-07");
    }

    #[test]
    fn test_parse_rejects_malformed_versions() {
        assert!("latest".parse::<ApiVersion>().is_err());
        assert!("2024".parse::<ApiVersion>().is_err());
        assert!("2024-1".parse::<ApiVersion>().is_err());
        assert!("24-10-01".parse::<ApiVersion>().is_err());
    }
}
