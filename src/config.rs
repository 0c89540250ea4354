//! Configuration for loading and listing images.
//!
//! All sections have sensible defaults and can be overridden from JSON;
//! missing fields fall back to their defaults.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Master configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PspConfig {
    /// Image loading limits.
    pub io: IoConfig,
    /// Listing output options.
    pub listing: ListingConfig,
}

impl PspConfig {
    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Image loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Maximum image size to load (default: 67108864 = 64MB).
    pub max_file_size: u64,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            max_file_size: 64 * 1024 * 1024, // 64MB
        }
    }
}

/// Listing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Placeholder for a directory without a secondary directory (default: "--").
    pub missing_marker: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            missing_marker: "--".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PspError;

    #[test]
    fn test_defaults() {
        let config = PspConfig::default();
        assert_eq!(config.io.max_file_size, 64 * 1024 * 1024);
        assert_eq!(config.listing.missing_marker, "--");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PspConfig::from_json_str(r#"{"io": {"max_file_size": 4096}}"#).unwrap();
        assert_eq!(config.io.max_file_size, 4096);
        assert_eq!(config.listing, ListingConfig::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = PspConfig::default();
        config.listing.missing_marker = "n/a".to_string();
        let json = config.to_json_string().unwrap();
        assert_eq!(PspConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        let err = PspConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, PspError::Config(_)));
    }
}
