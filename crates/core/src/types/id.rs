//! Newtype IDs for type-safe Shopify resource references.
//!
//! The REST Admin API identifies resources by numeric id, while the GraphQL
//! Admin API uses global ids (`gid://shopify/{Resource}/{id}`). The
//! `define_id!` macro ties each numeric id to its GraphQL resource name so the
//! global id is always derived, never hand-formatted.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Prefix shared by every Shopify global id.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Macro to define a type-safe Shopify ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_u64()`, `gid()`
/// - `Display`, `FromStr`, `From<u64>` and `Into<u64>` implementations
///
/// # Example
///
/// ```rust
/// # use metafields_core::define_id;
/// define_id!(OrderId, "Order");
///
/// let order_id = OrderId::new(7);
/// assert_eq!(order_id.gid().as_str(), "gid://shopify/Order/7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $resource:literal) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// GraphQL resource name used in the global id.
            pub const RESOURCE: &'static str = $resource;

            /// Create a new ID from a numeric value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying numeric value.
            #[must_use]
            pub const fn as_u64(&self) -> u64 {
                self.0
            }

            /// Derive the GraphQL global id for this resource.
            #[must_use]
            pub fn gid(&self) -> $crate::GlobalId {
                $crate::GlobalId::new(Self::RESOURCE, self.0)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<u64>().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId, "Product");
define_id!(VariantId, "ProductVariant");
define_id!(MetafieldId, "Metafield");

/// A Shopify GraphQL global id, e.g. `gid://shopify/ProductVariant/42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalId(String);

impl GlobalId {
    /// Format a global id from a resource name and numeric id.
    #[must_use]
    pub fn new(resource: &str, id: u64) -> Self {
        Self(format!("{GID_PREFIX}{resource}/{id}"))
    }

    /// Returns the global id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GlobalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_gid_format() {
        let id = VariantId::new(42_657_614_889_132);
        assert_eq!(
            id.gid().as_str(),
            "gid://shopify/ProductVariant/42657614889132"
        );
    }

    #[test]
    fn test_variant_gid_small_ids() {
        for n in [0_u64, 1, 6, 999] {
            assert_eq!(
                VariantId::new(n).gid().to_string(),
                format!("gid://shopify/ProductVariant/{n}")
            );
        }
    }

    #[test]
    fn test_product_gid_format() {
        assert_eq!(ProductId::new(12).gid().as_str(), "gid://shopify/Product/12");
    }

    #[test]
    fn test_id_deserializes_from_json_number() {
        let id: VariantId = serde_json::from_str("39072856").expect("numeric id");
        assert_eq!(id.as_u64(), 39_072_856);
    }

    #[test]
    fn test_id_from_str() {
        let id: VariantId = " 123 ".parse().expect("parse");
        assert_eq!(id, VariantId::new(123));
        assert!("abc".parse::<VariantId>().is_err());
    }

    #[test]
    fn test_gid_serializes_as_string() {
        let json = serde_json::to_string(&VariantId::new(5).gid()).expect("serialize");
        assert_eq!(json, "\"gid://shopify/ProductVariant/5\"");
    }
}
