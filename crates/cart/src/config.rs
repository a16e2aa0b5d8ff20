//! Shopfront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHOPFRONT_DATA_DIR` - Directory for persisted cart data (default: .shopfront)
//! - `SHOPFRONT_STORAGE_TIMEOUT_MS` - Per-call storage timeout (default: 5000)
//! - `SHOPFRONT_NOTIFICATION_LIMIT` - Keep at most this many notifications (default: unbounded)
//! - `SHOPFRONT_CHECKOUT_DELAY_MS` - Simulated payment processing time (default: 1400)
//! - `SHOPFRONT_FREE_SHIPPING_THRESHOLD` - Subtotal for free shipping (default: 150.00)
//! - `SHOPFRONT_SHIPPING_FEE` - Flat shipping fee (default: 9.99)
//! - `SHOPFRONT_CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::checkout::CheckoutSettings;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shopfront session configuration.
#[derive(Debug, Clone)]
pub struct ShopfrontConfig {
    /// Directory holding persisted keys
    pub data_dir: PathBuf,
    /// Upper bound on any single storage call
    pub storage_timeout: Duration,
    /// Notification log bound (`None` keeps every entry)
    pub notification_limit: Option<usize>,
    /// Checkout pricing and processing
    pub checkout: CheckoutSettings,
    /// How long catalog reads stay cached
    pub catalog_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

impl ShopfrontConfig {
    /// Defaults rooted at `data_dir`, without reading the environment.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            storage_timeout: Duration::from_secs(5),
            notification_limit: None,
            checkout: CheckoutSettings::default(),
            catalog_cache_ttl: Duration::from_secs(300),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::new(".shopfront");

        let data_dir = get_optional_env("SHOPFRONT_DATA_DIR")
            .map_or(defaults.data_dir, PathBuf::from);
        let storage_timeout =
            Duration::from_millis(get_parsed_or("SHOPFRONT_STORAGE_TIMEOUT_MS", 5_000_u64)?);
        let notification_limit = get_optional_parsed::<usize>("SHOPFRONT_NOTIFICATION_LIMIT")?;
        if notification_limit == Some(0) {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_NOTIFICATION_LIMIT".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let checkout = CheckoutSettings {
            free_shipping_threshold: get_money_or(
                "SHOPFRONT_FREE_SHIPPING_THRESHOLD",
                defaults.checkout.free_shipping_threshold,
            )?,
            shipping_fee: get_money_or("SHOPFRONT_SHIPPING_FEE", defaults.checkout.shipping_fee)?,
            processing_delay: Duration::from_millis(get_parsed_or(
                "SHOPFRONT_CHECKOUT_DELAY_MS",
                1_400_u64,
            )?),
        };
        let catalog_cache_ttl =
            Duration::from_secs(get_parsed_or("SHOPFRONT_CATALOG_CACHE_TTL_SECS", 300_u64)?);

        Ok(Self {
            data_dir,
            storage_timeout,
            notification_limit,
            checkout,
            catalog_cache_ttl,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse `raw` as `T`, naming `key` in the error.
fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get an optional environment variable parsed as `T`.
fn get_optional_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key)
        .map(|raw| parse_value(key, &raw))
        .transpose()
}

/// Get an environment variable parsed as `T`, or `default` when unset.
fn get_parsed_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(get_optional_parsed(key)?.unwrap_or(default))
}

/// Get a non-negative decimal amount, or `default` when unset.
fn get_money_or(key: &str, default: Decimal) -> Result<Decimal, ConfigError> {
    let amount = get_parsed_or(key, default)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("amount cannot be negative (got {amount})"),
        ));
    }
    Ok(amount)
}
