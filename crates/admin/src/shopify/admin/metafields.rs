//! Variant metafield reads and writes over the REST Admin API.

use tracing::instrument;

use metafields_core::{MetafieldSpec, VariantId};

use super::AdminClient;
use crate::shopify::AdminShopifyError;
use crate::shopify::types::{Metafield, MetafieldEnvelope, MetafieldWrite, MetafieldsEnvelope};

impl AdminClient {
    /// Get all metafields attached to a variant.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::NotFound` if the variant does not exist, or
    /// another error if the request fails.
    #[instrument(skip(self), fields(variant_id = %variant_id))]
    pub async fn get_variant_metafields(
        &self,
        variant_id: VariantId,
    ) -> Result<Vec<Metafield>, AdminShopifyError> {
        let url = self.endpoint(&format!("variants/{variant_id}/metafields.json"))?;
        let response = self.send_get(url).await?;
        let envelope: MetafieldsEnvelope = response.json().await?;
        Ok(envelope.metafields)
    }

    /// Create or update one metafield on a variant.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::Api` when Shopify rejects the value, or
    /// another error if the request fails.
    #[instrument(skip(self, spec), fields(variant_id = %variant_id, namespace = %spec.namespace, key = %spec.key))]
    pub async fn set_variant_metafield(
        &self,
        variant_id: VariantId,
        spec: &MetafieldSpec,
    ) -> Result<Metafield, AdminShopifyError> {
        let url = self.endpoint(&format!("variants/{variant_id}/metafields.json"))?;
        let response = self
            .post_json(url, &MetafieldWrite { metafield: spec })
            .await?;
        let envelope: MetafieldEnvelope<Metafield> = response.json().await?;
        Ok(envelope.metafield)
    }
}
