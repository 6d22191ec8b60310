//! CLI command implementations.
//!
//! Every command reads store credentials from the environment:
//!
//! - `SHOPIFY_STORE` - store domain, e.g. `your-store.myshopify.com`
//! - `SHOPIFY_API_KEY` - Admin API access token
//! - `SHOPIFY_API_VERSION` - Admin API version (default `2024-01`)
//! - `SHOPIFY_BASE_URL` - optional origin override

pub mod bulk;
pub mod get;
pub mod set;

use clap::Args;
use thiserror::Error;

use metafields_admin::config::{ConfigError, ShopifyAdminConfig};
use metafields_admin::services::BulkRunError;
use metafields_admin::shopify::{AdminClient, AdminShopifyError};
use metafields_core::MetafieldSpec;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shopify API call failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] AdminShopifyError),

    /// Bulk run failed.
    #[error("Bulk run failed at {}", .0)]
    Bulk(#[from] BulkRunError),

    /// Shopify created no bulk operation.
    #[error("Bulk operation not created: {0}")]
    BulkNotCreated(String),
}

/// Metafield overrides shared by the write commands.
///
/// Unset fields keep the command's default.
#[derive(Debug, Args)]
pub struct MetafieldArgs {
    /// Metafield namespace
    #[arg(long)]
    pub namespace: Option<String>,

    /// Metafield key
    #[arg(long)]
    pub key: Option<String>,

    /// Value to write
    #[arg(long)]
    pub value: Option<String>,

    /// Shopify metafield type
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,
}

impl MetafieldArgs {
    /// Apply overrides on top of `defaults`.
    #[must_use]
    pub fn resolve(self, defaults: MetafieldSpec) -> MetafieldSpec {
        MetafieldSpec {
            namespace: self.namespace.unwrap_or(defaults.namespace),
            key: self.key.unwrap_or(defaults.key),
            kind: self.kind.unwrap_or(defaults.kind),
            value: self.value.unwrap_or(defaults.value),
        }
    }
}

/// Build an Admin API client from the environment.
fn client_from_env() -> Result<AdminClient, CommandError> {
    let config = ShopifyAdminConfig::from_env()?;
    tracing::info!(store = %config.store, api_version = %config.api_version, "Using store");
    Ok(AdminClient::new(&config))
}
