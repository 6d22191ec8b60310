//! Shopify Admin API client (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **CRITICAL: every client built here carries an Admin API access token.**
//!
//! The token is only ever sent to the store's own Admin API. Staged upload
//! destinations (third-party object storage) never receive it.
//!
//! # Architecture
//!
//! - REST Admin API for product listing and per-variant metafields
//! - GraphQL Admin API for staged uploads and bulk mutations, using
//!   `graphql_client` wire types with hand-written operation documents
//! - Direct API calls to Shopify (no local state)
//!
//! # Example
//!
//! ```rust,ignore
//! use metafields_admin::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config);
//!
//! // Every variant in the store, in listing order
//! let variants = client.list_variants().await?;
//!
//! // Request an upload slot for a bulk mutation file
//! let target = client.create_staged_upload("bulk_metafields.jsonl", "text/jsonl").await?;
//! ```

mod admin;
pub mod types;

pub use admin::{AdminClient, PRODUCTS_PAGE_SIZE, StagedUploadResponse, queries};
pub use types::*;

use metafields_core::{LinkHeaderError, StagedUploadKeyError};
use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),

    /// Non-success response not covered by a more specific variant.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The `Link` header could not be parsed.
    #[error("Pagination error: {0}")]
    Pagination(#[from] LinkHeaderError),

    /// The server handed out a cursor that was already followed.
    #[error("Pagination cursor repeated: {0}")]
    RepeatedCursor(String),

    /// `stagedUploadsCreate` returned no targets.
    #[error("No staged upload target returned")]
    NoStagedTarget,

    /// The staged upload response carried no storage key.
    #[error("Staged upload failed: {0}")]
    StagedUploadKey(#[from] StagedUploadKeyError),

    /// Reading the file to upload failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}
