//! Wallet configuration.
//!
//! Loaded once at startup from environment variables (a `.env` file is
//! honoured). Every variable is optional; unset variables take the defaults
//! below, and a set but invalid value is an error rather than a silent
//! fallback.
//!
//! | Variable | Default |
//! |---|---|
//! | `WALLET_MINIMUM_WITHDRAWAL` | 2000 |
//! | `WALLET_PLATFORM_FEE_PERCENT` | 2 |
//! | `WALLET_TRANSACTION_LOG_CAPACITY` | 100 |
//! | `WALLET_MAX_COMMIT_ATTEMPTS` | 8 |
//! | `WALLET_NOTIFICATION_BUFFER` | 256 |

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::value_objects::Money;
use crate::domain::wallet::DEFAULT_TRANSACTION_LOG_CAPACITY;

const MINIMUM_WITHDRAWAL: &str = "WALLET_MINIMUM_WITHDRAWAL";
const PLATFORM_FEE_PERCENT: &str = "WALLET_PLATFORM_FEE_PERCENT";
const TRANSACTION_LOG_CAPACITY: &str = "WALLET_TRANSACTION_LOG_CAPACITY";
const MAX_COMMIT_ATTEMPTS: &str = "WALLET_MAX_COMMIT_ATTEMPTS";
const NOTIFICATION_BUFFER: &str = "WALLET_NOTIFICATION_BUFFER";

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue {
        /// The name of the environment variable.
        key: String,
        /// Description of why the value is invalid.
        message: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, message } => {
                write!(formatter, "Invalid value for {key}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for the wallet services.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletConfig {
    /// Smallest amount a withdrawal may request.
    pub minimum_withdrawal: Money,
    /// Platform fee in percent of the withdrawal amount.
    pub platform_fee_percent: Decimal,
    /// Entries kept in each wallet's transaction log.
    pub transaction_log_capacity: usize,
    /// Attempts a service makes when commits hit version conflicts.
    pub max_commit_attempts: usize,
    /// Capacity of the notification channel.
    pub notification_buffer: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            minimum_withdrawal: Money::new(2000),
            platform_fee_percent: Decimal::from(2),
            transaction_log_capacity: DEFAULT_TRANSACTION_LOG_CAPACITY,
            max_commit_attempts: 8,
            notification_buffer: 256,
        }
    }
}

impl WalletConfig {
    /// Creates a configuration with the given limits and default sizing.
    #[must_use]
    pub fn new(minimum_withdrawal: Money, platform_fee_percent: Decimal) -> Self {
        Self {
            minimum_withdrawal,
            platform_fee_percent,
            ..Self::default()
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set to a value
    /// that does not parse or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors if file doesn't exist)
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`WalletConfig::from_env`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use consultant_wallet::domain::value_objects::Money;
    /// use consultant_wallet::infrastructure::WalletConfig;
    ///
    /// let config = WalletConfig::from_lookup(|key| {
    ///     (key == "WALLET_MINIMUM_WITHDRAWAL").then(|| "500".to_string())
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.minimum_withdrawal, Money::new(500));
    /// assert_eq!(config.max_commit_attempts, 8);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let minimum_withdrawal = match lookup(MINIMUM_WITHDRAWAL) {
            Some(value) => Money::parse_non_negative(&value)
                .map_err(|error| ConfigError::invalid(MINIMUM_WITHDRAWAL, error.to_string()))?,
            None => defaults.minimum_withdrawal,
        };

        let platform_fee_percent: Decimal =
            parse_or(&lookup, PLATFORM_FEE_PERCENT, defaults.platform_fee_percent)?;
        if platform_fee_percent < Decimal::ZERO || platform_fee_percent > Decimal::ONE_HUNDRED {
            return Err(ConfigError::invalid(
                PLATFORM_FEE_PERCENT,
                "must be between 0 and 100",
            ));
        }

        Ok(Self {
            minimum_withdrawal,
            platform_fee_percent,
            transaction_log_capacity: positive_or(
                &lookup,
                TRANSACTION_LOG_CAPACITY,
                defaults.transaction_log_capacity,
            )?,
            max_commit_attempts: positive_or(
                &lookup,
                MAX_COMMIT_ATTEMPTS,
                defaults.max_commit_attempts,
            )?,
            notification_buffer: positive_or(
                &lookup,
                NOTIFICATION_BUFFER,
                defaults.notification_buffer,
            )?,
        })
    }
}

/// Parses an optional value, falling back to `default` when unset.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|error: T::Err| ConfigError::invalid(key, error.to_string()))
    })
}

fn positive_or<F>(lookup: &F, key: &str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(lookup, key, default)? {
        0 => Err(ConfigError::invalid(key, "must be greater than zero")),
        value => Ok(value),
    }
}
