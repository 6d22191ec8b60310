//! Configuration loaded from environment variables.
//!
//! Configuration is an explicit value built once at startup (or, for the
//! HTTP service, once per request from the submitted credentials) and passed
//! to every component. Nothing reads the environment after startup.
//!
//! # Environment Variables
//!
//! ## Script entry points (`mf-cli`)
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_API_KEY` - Admin API access token (HIGH PRIVILEGE)
//!
//! ## Optional
//! - `SHOPIFY_API_VERSION` - API version (default: 2024-01)
//! - `SHOPIFY_BASE_URL` - Override for `https://{store}` (proxies, tests)
//!
//! ## HTTP service (`metafields-server`)
//! - `METAFIELDS_HOST` - Bind address (default: 127.0.0.1)
//! - `METAFIELDS_PORT` - Listen port (default: 3000)
//! - `METAFIELDS_MUTATION_FILE` - Bulk mutation file path (default: bulk_metafields.jsonl)
//! - `SHOPIFY_API_VERSION` / `SHOPIFY_BASE_URL` - as above
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sentry sampling (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Admin API version used when `SHOPIFY_API_VERSION` is unset.
pub const DEFAULT_API_VERSION: &str = "2024-01";

/// Mutation file written by bulk runs, relative to the working directory.
pub const DEFAULT_MUTATION_FILE: &str = "bulk_metafields.jsonl";

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

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
    "insert",
    "enter-",
    "put-your",
    "add-your",
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

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the HIGH PRIVILEGE access token.
#[derive(Clone)]
pub struct ShopifyAdminConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2024-01)
    pub api_version: String,
    /// Admin API access token (HIGH PRIVILEGE - full store access)
    pub access_token: SecretString,
    /// Origin override replacing `https://{store}`
    pub base_url: Option<String>,
}

impl std::fmt::Debug for ShopifyAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyAdminConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ShopifyAdminConfig {
    /// Build a configuration from explicit values.
    ///
    /// The store may be given as a bare domain or as a URL; any scheme and
    /// trailing slash are stripped.
    #[must_use]
    pub fn new(
        store: &str,
        access_token: SecretString,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            store: normalize_store(store),
            api_version: api_version.into(),
            access_token,
            base_url: None,
        }
    }

    /// Replace the `https://{store}` origin (used for proxies and tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url.map(|url| url.trim_end_matches('/').to_owned());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `SHOPIFY_STORE` or `SHOPIFY_API_KEY` is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let store = get_required_env("SHOPIFY_STORE")?;
        let token = get_required_env("SHOPIFY_API_KEY")?;
        if let Err(e) = validate_secret_strength(&token, "SHOPIFY_API_KEY") {
            tracing::warn!("SHOPIFY_API_KEY validation warning: {e}");
        }

        let config = Self::new(
            &store,
            SecretString::from(token),
            get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
        )
        .with_base_url(get_optional_env("SHOPIFY_BASE_URL"));

        Ok(config)
    }

    /// Origin of the store (`https://{store}` unless overridden).
    #[must_use]
    pub fn origin(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}", self.store))
    }

    /// Versioned Admin API root, e.g. `https://shop.myshopify.com/admin/api/2024-01`.
    #[must_use]
    pub fn admin_api_url(&self) -> String {
        format!("{}/admin/api/{}", self.origin(), self.api_version)
    }

    /// Expose the access token for the request header.
    pub(crate) fn token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

/// HTTP service configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify API version used for every submitted store
    pub api_version: String,
    /// Origin override applied to every submitted store
    pub shopify_base_url: Option<String>,
    /// Where bulk runs write their mutation file
    pub mutation_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            api_version: DEFAULT_API_VERSION.to_owned(),
            shopify_base_url: None,
            mutation_file: PathBuf::from(DEFAULT_MUTATION_FILE),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the host or port cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("METAFIELDS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("METAFIELDS_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("METAFIELDS_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("METAFIELDS_PORT".to_string(), e.to_string()))?;

        Ok(Self {
            host,
            port,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            shopify_base_url: get_optional_env("SHOPIFY_BASE_URL"),
            mutation_file: PathBuf::from(get_env_or_default(
                "METAFIELDS_MUTATION_FILE",
                DEFAULT_MUTATION_FILE,
            )),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_optional_env("SENTRY_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            sentry_traces_sample_rate: get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Build the Admin API configuration for credentials submitted by a caller.
    #[must_use]
    pub fn shopify_for(&self, store: &str, token: SecretString) -> ShopifyAdminConfig {
        ShopifyAdminConfig::new(store, token, self.api_version.clone())
            .with_base_url(self.shopify_base_url.clone())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Strip scheme and trailing slashes from a store domain.
fn normalize_store(store: &str) -> String {
    let store = store.trim();
    let store = store
        .strip_prefix("https://")
        .or_else(|| store.strip_prefix("http://"))
        .unwrap_or(store);
    store.trim_end_matches('/').to_owned()
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Is this a real access token?"
            ),
        ));
    }

    Ok(())
}
