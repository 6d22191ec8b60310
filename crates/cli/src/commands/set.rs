//! Write one metafield to every variant, one request at a time.
//!
//! # Usage
//!
//! ```bash
//! # color = multicolor on every variant
//! mf-cli set
//!
//! # Custom field with a slower pace
//! mf-cli set --key material --value cotton --delay-ms 1000
//! ```

use std::time::Duration;

use metafields_admin::services::set_all_variants;
use metafields_core::MetafieldSpec;

use super::{CommandError, MetafieldArgs, client_from_env};

/// Run the sequential write.
///
/// Per-variant failures are logged and counted; they do not fail the command.
pub async fn run(args: MetafieldArgs, delay_ms: u64) -> Result<(), CommandError> {
    let client = client_from_env()?;
    let spec = args.resolve(MetafieldSpec::default_sequential());
    let delay = Duration::from_millis(delay_ms);

    tracing::info!(
        "Setting {}.{} = {} on every variant ({} ms between writes)",
        spec.namespace,
        spec.key,
        spec.value,
        delay_ms
    );

    let report = set_all_variants(&client, &spec, delay).await?;

    if report.failed.is_empty() {
        tracing::info!("Done: {} variants updated", report.succeeded.len());
    } else {
        for failure in &report.failed {
            tracing::warn!(
                variant_id = %failure.variant_id,
                product_id = %failure.product_id,
                "Not updated: {}",
                failure.error
            );
        }
        tracing::warn!(
            "Done: {} of {} variants updated, {} failed",
            report.succeeded.len(),
            report.attempted(),
            report.failed.len()
        );
    }

    Ok(())
}
