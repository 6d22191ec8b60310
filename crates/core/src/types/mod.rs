//! Core types for the metafield tools.
//!
//! This module provides type-safe wrappers for Shopify domain concepts.

pub mod bulk;
pub mod id;
pub mod metafield;

pub use bulk::{BulkOperationStatus, BulkStage};
pub use id::*;
pub use metafield::{MetafieldSpec, MetafieldsSetInput, SINGLE_LINE_TEXT_FIELD};
