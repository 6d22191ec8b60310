//! Metafields Core - Shared types and parsers.
//!
//! This crate provides the types used across the metafield tools:
//! - `admin` - Admin API client, bulk/sequential services and the HTTP service
//! - `cli` - Command-line entry points (`get`, `set`, `bulk`)
//!
//! # Architecture
//!
//! The core crate contains only types and pure parsers - no I/O, no HTTP
//! clients. This keeps it lightweight and independently testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, global IDs, metafield inputs, bulk stage/status
//! - [`parse`] - `Link` header cursor extraction and staged upload key extraction

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod parse;
pub mod types;

pub use parse::*;
pub use types::*;
