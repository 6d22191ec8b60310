//! Shopify variant metafield tools.
//!
//! This crate provides the Admin API client, the metafield runs built on it
//! and the HTTP service, as a library so the CLI and tests can reuse them.
//!
//! # Security
//!
//! Every client built here carries a Shopify Admin API access token with
//! write access to the store. The HTTP service takes store credentials from
//! request bodies and performs no caller authentication; bind it to a trusted
//! interface only.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
