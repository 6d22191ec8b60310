//! Metafield domain types for Shopify Admin API.

use serde::{Deserialize, Serialize};

use metafields_core::{MetafieldId, MetafieldSpec};

/// A metafield as returned by the REST variant metafields endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metafield {
    /// Metafield ID.
    pub id: MetafieldId,
    /// Namespace.
    pub namespace: String,
    /// Key within the namespace.
    pub key: String,
    /// Stored value. Strings for text types; numbers/booleans for some legacy types.
    pub value: serde_json::Value,
    /// Shopify metafield type.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Metafield {
    /// The value as display text, without JSON quoting for strings.
    #[must_use]
    pub fn value_text(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// `{"metafields": [...]}` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct MetafieldsEnvelope {
    pub metafields: Vec<Metafield>,
}

/// `{"metafield": {...}}` envelope.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MetafieldEnvelope<T> {
    pub metafield: T,
}

/// Request body for `POST /variants/{id}/metafields.json`.
pub(crate) type MetafieldWrite<'a> = MetafieldEnvelope<&'a MetafieldSpec>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metafields_envelope_decodes() {
        let json = r#"{"metafields": [
            {"id": 1069228935, "namespace": "mm-google-shopping", "key": "color",
             "value": "multicolor", "type": "single_line_text_field",
             "owner_id": 808950810, "owner_resource": "variant"},
            {"id": 1069228936, "namespace": "inventory", "key": "warehouse",
             "value": 25, "type": "number_integer"}
        ]}"#;

        let envelope: MetafieldsEnvelope = serde_json::from_str(json).expect("metafields");
        let values: Vec<String> = envelope.metafields.iter().map(Metafield::value_text).collect();
        assert_eq!(values, ["multicolor", "25"]);
    }

    #[test]
    fn test_write_body_shape() {
        let spec = MetafieldSpec::default_sequential();
        let body = serde_json::to_value(MetafieldWrite { metafield: &spec }).expect("body");
        assert_eq!(
            body,
            serde_json::json!({
                "metafield": {
                    "namespace": "mm-google-shopping",
                    "key": "color",
                    "type": "single_line_text_field",
                    "value": "multicolor"
                }
            })
        );
    }
}
