//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BAZARIO_API_BASE_URL` - Base URL of the Bazario REST backend
//! - `BAZARIO_API_TOKEN` - Backend access token (min 16 chars, no placeholders)
//!
//! ## Optional
//! - `BAZARIO_CURRENCY` - ISO 4217 display currency (default: PKR)
//! - `BAZARIO_BUY_NOW_PATH` - Path for the buy-now snapshot file
//!   (default: .bazario/buy_now.json)

use std::path::PathBuf;

use bazario_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_TOKEN_LENGTH: usize = 16;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Display currency for totals
    pub currency: CurrencyCode,
    /// Path the buy-now snapshot is persisted to
    pub buy_now_path: PathBuf,
}

/// Bazario backend API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL of the REST backend (e.g. `https://api.bazario.pk/v1/`)
    pub base_url: Url,
    /// Backend access token
    pub token: SecretString,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the token fails placeholder/length validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig::from_env()?;

        let currency = match get_optional_env("BAZARIO_CURRENCY") {
            Some(code) => parse_currency(&code)?,
            None => CurrencyCode::PKR,
        };

        let buy_now_path = get_env_or_default("BAZARIO_BUY_NOW_PATH", ".bazario/buy_now.json");

        Ok(Self {
            api,
            currency,
            buy_now_path: PathBuf::from(buy_now_path),
        })
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_url = get_required_env("BAZARIO_API_BASE_URL")?;
        let base_url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("BAZARIO_API_BASE_URL".to_string(), e.to_string())
        })?;

        let token = get_validated_secret("BAZARIO_API_TOKEN")?;

        Ok(Self { base_url, token })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_currency(code: &str) -> Result<CurrencyCode, ConfigError> {
    match code.to_uppercase().as_str() {
        "PKR" => Ok(CurrencyCode::PKR),
        "USD" => Ok(CurrencyCode::USD),
        "EUR" => Ok(CurrencyCode::EUR),
        "GBP" => Ok(CurrencyCode::GBP),
        "AED" => Ok(CurrencyCode::AED),
        other => Err(ConfigError::InvalidEnvVar(
            "BAZARIO_CURRENCY".to_string(),
            format!("unsupported currency: {other}"),
        )),
    }
}

/// Validate that a secret is not a placeholder and is long enough.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_TOKEN_LENGTH} characters (got {})",
                secret.len()
            ),
        ));
    }

    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-token-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_too_short() {
        let result = validate_secret_strength("shorttoken", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("kj2H8s0qLw9xN4vPzR7t", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("pkr").unwrap(), CurrencyCode::PKR);
        assert_eq!(parse_currency("USD").unwrap(), CurrencyCode::USD);
        assert!(parse_currency("BTC").is_err());
    }

    #[test]
    fn test_api_config_debug_redacts_token() {
        let config = ApiConfig {
            base_url: Url::parse("https://api.bazario.pk/v1/").unwrap(),
            token: SecretString::from("kj2H8s0qLw9xN4vPzR7t"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("api.bazario.pk"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("kj2H8s0qLw9xN4vPzR7t"));
    }
}
