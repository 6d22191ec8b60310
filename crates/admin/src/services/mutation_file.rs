//! Bulk mutation variables file.
//!
//! One JSON object per line, one line per variant, each supplying the
//! variables of the inner `metafieldsSet` mutation.

use std::io;
use std::path::Path;

use metafields_core::{MetafieldSpec, MetafieldsSetInput};

use crate::shopify::VariantRef;

/// File name registered with the staged upload.
pub const MUTATION_FILE_NAME: &str = "bulk_metafields.jsonl";

/// MIME type registered with the staged upload and sent with the file part.
pub const MUTATION_FILE_MIME: &str = "text/jsonl";

/// Bind `spec` to every variant, in order.
#[must_use]
pub fn build_records(variants: &[VariantRef], spec: &MetafieldSpec) -> Vec<MetafieldsSetInput> {
    variants
        .iter()
        .map(|variant| spec.for_variant(variant.variant_id))
        .collect()
}

/// Serialize records as JSON Lines, each line newline-terminated.
///
/// # Errors
///
/// Returns an error if a record fails to serialize.
pub fn render_jsonl(records: &[MetafieldsSetInput]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Write the mutation file for `variants`, replacing any previous file.
///
/// Returns the number of lines written.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn write_mutation_file(
    path: &Path,
    variants: &[VariantRef],
    spec: &MetafieldSpec,
) -> io::Result<usize> {
    let records = build_records(variants, spec);
    let contents = render_jsonl(&records)?;
    tokio::fs::write(path, contents).await?;

    tracing::info!(path = %path.display(), lines = records.len(), "Wrote mutation file");
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use metafields_core::{ProductId, VariantId};

    use super::*;

    fn variants(ids: &[u64]) -> Vec<VariantRef> {
        ids.iter()
            .map(|&id| VariantRef {
                product_id: ProductId::new(1),
                variant_id: VariantId::new(id),
            })
            .collect()
    }

    #[test]
    fn test_one_line_per_variant() {
        let records = build_records(&variants(&[1, 2, 3]), &MetafieldSpec::default_bulk());
        let jsonl = render_jsonl(&records).expect("jsonl");

        assert_eq!(jsonl.lines().count(), 3);
        assert_eq!(
            jsonl.lines().next(),
            Some(
                r#"{"ownerId":"gid://shopify/ProductVariant/1","namespace":"mm-google-shopping","key":"custom_label_4","type":"single_line_text_field","value":"blank"}"#
            )
        );
    }

    #[test]
    fn test_line_keys_are_exact() {
        let records = build_records(&variants(&[9]), &MetafieldSpec::default_bulk());
        let jsonl = render_jsonl(&records).expect("jsonl");
        let line: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(jsonl.trim_end()).expect("object");

        let mut keys: Vec<&str> = line.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["key", "namespace", "ownerId", "type", "value"]);
    }

    #[test]
    fn test_empty_variants_render_empty_file() {
        assert_eq!(render_jsonl(&[]).expect("jsonl"), "");
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(MUTATION_FILE_NAME);
        std::fs::write(&path, "stale\nstale\nstale\nstale\n").expect("seed");

        let written = write_mutation_file(&path, &variants(&[5, 6]), &MetafieldSpec::default_bulk())
            .await
            .expect("written");

        let contents = std::fs::read_to_string(&path).expect("read");
        assert_eq!(written, 2);
        assert_eq!(contents.lines().count(), 2);
        assert!(!contents.contains("stale"));
    }
}
