//! Write one metafield to every variant through a bulk operation.
//!
//! # Usage
//!
//! ```bash
//! # custom_label_4 = blank on every variant
//! mf-cli bulk
//!
//! mf-cli bulk --key custom_label_3 --value clearance --output /tmp/bulk.jsonl
//! ```
//!
//! The bulk operation runs asynchronously on Shopify; this command only
//! reports that it was created.

use std::path::Path;

use metafields_admin::services::BulkMetafieldRun;
use metafields_admin::shopify::format_user_errors;
use metafields_core::MetafieldSpec;

use super::{CommandError, MetafieldArgs, client_from_env};

/// Run the bulk flow, writing the mutation file to `output`.
pub async fn run(args: MetafieldArgs, output: &Path) -> Result<(), CommandError> {
    let client = client_from_env()?;
    let spec = args.resolve(MetafieldSpec::default_bulk());

    tracing::info!(
        "Bulk setting {}.{} = {} on every variant",
        spec.namespace,
        spec.key,
        spec.value
    );

    let report = BulkMetafieldRun::new(&client, spec, output).run().await?;

    for error in &report.submission.user_errors {
        tracing::warn!("User error: {error}");
    }

    let operation = report.submission.bulk_operation.as_ref().ok_or_else(|| {
        CommandError::BulkNotCreated(format_user_errors(&report.submission.user_errors))
    })?;

    tracing::info!(
        operation_id = %operation.id,
        status = %operation.status,
        "Bulk operation triggered for {} variants. Operation ID: {}",
        report.variants,
        operation.id
    );

    Ok(())
}
