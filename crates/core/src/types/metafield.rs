//! Metafield write types.
//!
//! [`MetafieldSpec`] is the owner-less description of a desired write
//! (namespace, key, type, value). Binding it to an owner produces a
//! [`MetafieldsSetInput`], the record serialized one-per-line into the bulk
//! mutation file.

use serde::{Deserialize, Serialize};

use super::id::{GlobalId, VariantId};

/// Shopify metafield type for a single line of text.
pub const SINGLE_LINE_TEXT_FIELD: &str = "single_line_text_field";

/// A desired metafield write, not yet bound to an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetafieldSpec {
    /// Metafield namespace (e.g. `mm-google-shopping`).
    pub namespace: String,
    /// Metafield key within the namespace.
    pub key: String,
    /// Shopify metafield type (e.g. `single_line_text_field`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Value to write.
    pub value: String,
}

impl MetafieldSpec {
    /// Namespace used by the Google Shopping feed app.
    pub const GOOGLE_SHOPPING_NAMESPACE: &'static str = "mm-google-shopping";

    /// Create a spec with the given namespace, key and value.
    ///
    /// The type defaults to `single_line_text_field`.
    #[must_use]
    pub fn text(
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            kind: SINGLE_LINE_TEXT_FIELD.to_owned(),
            value: value.into(),
        }
    }

    /// Override the metafield type.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Default write for the per-variant (`set`) entry point.
    #[must_use]
    pub fn default_sequential() -> Self {
        Self::text(Self::GOOGLE_SHOPPING_NAMESPACE, "color", "multicolor")
    }

    /// Default write for the bulk entry point.
    #[must_use]
    pub fn default_bulk() -> Self {
        Self::text(Self::GOOGLE_SHOPPING_NAMESPACE, "custom_label_4", "blank")
    }

    /// Bind this spec to a variant owner.
    #[must_use]
    pub fn for_variant(&self, variant: VariantId) -> MetafieldsSetInput {
        MetafieldsSetInput {
            owner_id: variant.gid(),
            namespace: self.namespace.clone(),
            key: self.key.clone(),
            kind: self.kind.clone(),
            value: self.value.clone(),
        }
    }
}

/// One `metafieldsSet` input record.
///
/// Serializes with keys exactly `ownerId, namespace, key, type, value`, in
/// that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldsSetInput {
    /// Global id of the owning resource.
    pub owner_id: GlobalId,
    /// Metafield namespace.
    pub namespace: String,
    /// Metafield key.
    pub key: String,
    /// Shopify metafield type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Value to write.
    pub value: String,
}
