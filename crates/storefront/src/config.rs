//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CATALOG_URL` - Base URL of the furniture catalog API (default: `http://127.0.0.1:3001`)
//! - `STOREFRONT_DATA_DIR` - Directory holding the persisted cart (default: `.estimator`)
//! - `STOREFRONT_TAX_RATE` - Tax rate as a fraction (default: `0.18`)
//! - `STOREFRONT_PAYMENT_DELAY_MS` - Simulated payment processing time (default: `3000`)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use estimator_core::GST_RATE;
use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_URL: &str = "http://127.0.0.1:3001";
const DEFAULT_DATA_DIR: &str = ".estimator";
const DEFAULT_PAYMENT_DELAY_MS: u64 = 3000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the catalog API
    pub catalog_url: Url,
    /// Directory for the local cart store
    pub data_dir: PathBuf,
    /// Tax rate applied at checkout
    pub tax_rate: Decimal,
    /// How long the simulated payment takes
    pub payment_delay: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for unparseable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let catalog_url = parse_var(&lookup, "CATALOG_URL", DEFAULT_CATALOG_URL)?;
        let data_dir = lookup("STOREFRONT_DATA_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let tax_rate = lookup("STOREFRONT_TAX_RATE")
            .map(|raw| parse_value::<Decimal>("STOREFRONT_TAX_RATE", &raw))
            .transpose()?
            .unwrap_or(GST_RATE);
        if tax_rate.is_sign_negative() || tax_rate > Decimal::ONE {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_TAX_RATE".to_string(),
                format!("{tax_rate} is not between 0 and 1"),
            ));
        }

        let delay_ms: u64 = lookup("STOREFRONT_PAYMENT_DELAY_MS")
            .map(|raw| parse_value("STOREFRONT_PAYMENT_DELAY_MS", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_PAYMENT_DELAY_MS);

        Ok(Self {
            catalog_url,
            data_dir,
            tax_rate,
            payment_delay: Duration::from_millis(delay_ms),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to a default when unset.
fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    parse_value(key, &raw)
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.catalog_url.as_str(), "http://127.0.0.1:3001/");
        assert_eq!(config.data_dir, PathBuf::from(".estimator"));
        assert_eq!(config.tax_rate, GST_RATE);
        assert_eq!(config.payment_delay, Duration::from_secs(3));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("CATALOG_URL", "http://catalog.internal:8080/"),
            ("STOREFRONT_DATA_DIR", "/tmp/cart"),
            ("STOREFRONT_TAX_RATE", "0.05"),
            ("STOREFRONT_PAYMENT_DELAY_MS", "0"),
        ])
        .unwrap();
        assert_eq!(config.catalog_url.host_str(), Some("catalog.internal"));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/cart"));
        assert_eq!(config.tax_rate, Decimal::new(5, 2));
        assert_eq!(config.payment_delay, Duration::ZERO);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("CATALOG_URL", "not a url")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "CATALOG_URL"
        ));
        assert!(matches!(
            load(&[("STOREFRONT_TAX_RATE", "1.5")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "STOREFRONT_TAX_RATE"
        ));
        assert!(matches!(
            load(&[("STOREFRONT_PAYMENT_DELAY_MS", "soon")]),
            Err(ConfigError::InvalidEnvVar(..))
        ));
    }
}
