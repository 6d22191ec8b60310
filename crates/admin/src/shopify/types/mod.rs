//! Domain types for Shopify Admin API.
//!
//! These types provide a clean, ergonomic API separate from the raw REST
//! payloads and GraphQL response data.

pub mod bulk;
pub mod metafield;
pub mod product;

// Re-export all types for convenience
pub use bulk::*;
pub use metafield::*;
pub use product::*;
