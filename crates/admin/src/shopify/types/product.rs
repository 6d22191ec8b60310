//! Product domain types for Shopify Admin API.

use serde::{Deserialize, Serialize};

use metafields_core::{GlobalId, ProductId, VariantId};

/// A product as returned by `GET /products.json`.
///
/// Only the fields the metafield tools need are decoded; everything else in
/// the REST payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Product title.
    #[serde(default)]
    pub title: Option<String>,
    /// Variants in the order Shopify lists them.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

/// A product variant nested in a REST product payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Owning product ID.
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Variant title (combination of option values).
    #[serde(default)]
    pub title: Option<String>,
}

/// A variant reference carried through the metafield runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantRef {
    /// Owning product ID.
    pub product_id: ProductId,
    /// Variant ID.
    pub variant_id: VariantId,
}

impl VariantRef {
    /// Global id of the variant (`gid://shopify/ProductVariant/{id}`).
    #[must_use]
    pub fn gid(&self) -> GlobalId {
        self.variant_id.gid()
    }
}

impl Product {
    /// References to this product's variants, in listing order.
    pub fn variant_refs(&self) -> impl Iterator<Item = VariantRef> + '_ {
        self.variants.iter().map(|variant| VariantRef {
            product_id: variant.product_id.unwrap_or(self.id),
            variant_id: variant.id,
        })
    }
}

/// Flatten products into variant references, preserving product order and
/// variant order within each product.
#[must_use]
pub fn flatten_variants(products: &[Product]) -> Vec<VariantRef> {
    products.iter().flat_map(Product::variant_refs).collect()
}
