//! Per-variant metafield writes.
//!
//! One REST write per variant with a fixed pause after each. A failed write
//! is logged and skipped; the loop always visits every variant.

use std::time::Duration;

use tracing::instrument;

use metafields_core::{MetafieldSpec, ProductId, VariantId};

use crate::shopify::{AdminClient, AdminShopifyError, VariantRef};

/// Default pause between variant writes, in milliseconds.
pub const DEFAULT_WRITE_DELAY_MS: u64 = 500;

/// Default pause between variant writes.
pub const DEFAULT_WRITE_DELAY: Duration = Duration::from_millis(DEFAULT_WRITE_DELAY_MS);

/// A variant whose write failed.
#[derive(Debug)]
pub struct FailedWrite {
    /// Product owning the variant.
    pub product_id: ProductId,
    /// Variant that was not updated.
    pub variant_id: VariantId,
    /// Why the write failed.
    pub error: AdminShopifyError,
}

/// Outcome of a sequential run.
#[derive(Debug, Default)]
pub struct SequentialReport {
    /// Variants written, in order.
    pub succeeded: Vec<VariantId>,
    /// Variants whose write failed, in order.
    pub failed: Vec<FailedWrite>,
}

impl SequentialReport {
    /// Number of variants attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Write `spec` to every variant in the store, one request at a time.
///
/// # Errors
///
/// Returns an error only if listing variants fails. Individual write failures
/// are collected in the report.
#[instrument(skip(client, spec), fields(store = %client.store(), namespace = %spec.namespace, key = %spec.key))]
pub async fn set_all_variants(
    client: &AdminClient,
    spec: &MetafieldSpec,
    delay: Duration,
) -> Result<SequentialReport, AdminShopifyError> {
    let variants = client.list_variants().await?;
    tracing::info!(variants = variants.len(), "Discovered variants");

    Ok(write_each(client, &variants, spec, delay).await)
}

/// Write `spec` to each of `variants`, pausing `delay` after every attempt.
pub async fn write_each(
    client: &AdminClient,
    variants: &[VariantRef],
    spec: &MetafieldSpec,
    delay: Duration,
) -> SequentialReport {
    let mut report = SequentialReport::default();

    for &VariantRef {
        product_id,
        variant_id,
    } in variants
    {
        match client.set_variant_metafield(variant_id, spec).await {
            Ok(metafield) => {
                tracing::info!(%variant_id, %product_id, metafield_id = %metafield.id, "Metafield set");
                report.succeeded.push(variant_id);
            }
            Err(error) => {
                tracing::error!(%variant_id, %product_id, %error, "Failed to set metafield");
                report.failed.push(FailedWrite {
                    product_id,
                    variant_id,
                    error,
                });
            }
        }

        tokio::time::sleep(delay).await;
    }

    tracing::info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "Sequential run complete"
    );
    report
}
