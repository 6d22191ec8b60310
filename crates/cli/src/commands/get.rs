//! Show a variant's metafields.
//!
//! # Usage
//!
//! ```bash
//! mf-cli get 808950810
//! ```

use metafields_core::VariantId;

use super::{CommandError, client_from_env};

/// Log every metafield on `variant_id`.
pub async fn run(variant_id: VariantId) -> Result<(), CommandError> {
    let client = client_from_env()?;

    tracing::info!(%variant_id, "Fetching metafields");
    let metafields = client.get_variant_metafields(variant_id).await?;

    if metafields.is_empty() {
        tracing::warn!(%variant_id, "No metafields found for this variant");
        return Ok(());
    }

    tracing::info!(%variant_id, count = metafields.len(), "Found metafields");
    for (index, metafield) in metafields.iter().enumerate() {
        tracing::info!(
            "[{}] {}.{} = {} (type: {}, id: {})",
            index + 1,
            metafield.namespace,
            metafield.key,
            metafield.value_text(),
            metafield.kind,
            metafield.id,
        );
    }

    Ok(())
}
