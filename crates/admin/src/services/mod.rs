//! Metafield runs built on the Admin API client.
//!
//! # Services
//!
//! - `bulk` - staged upload and bulk mutation run
//! - `mutation_file` - JSONL variables file for bulk mutations
//! - `sequential` - one REST write per variant with a fixed delay

pub mod bulk;
pub mod mutation_file;
pub mod sequential;

pub use bulk::{BulkMetafieldRun, BulkRunError, BulkRunReport};
pub use mutation_file::{MUTATION_FILE_MIME, MUTATION_FILE_NAME, write_mutation_file};
pub use sequential::{
    DEFAULT_WRITE_DELAY, DEFAULT_WRITE_DELAY_MS, SequentialReport, set_all_variants,
};
