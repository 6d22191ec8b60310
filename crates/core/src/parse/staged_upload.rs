//! Storage key extraction from a staged upload response.
//!
//! A successful multipart POST to a staged upload target answers with:
//!
//! ```text
//! <?xml version='1.0' encoding='UTF-8'?>
//! <PostResponse>
//!   <Location>https://shopify-staged-uploads.storage.googleapis.com/tmp/1/bulk/abc/bulk_metafields.jsonl</Location>
//!   <Bucket>shopify-staged-uploads</Bucket>
//!   <Key>tmp/1/bulk/abc/bulk_metafields.jsonl</Key>
//!   <ETag>"d41d8cd98f00b204e9800998ecf8427e"</ETag>
//! </PostResponse>
//! ```
//!
//! The `PostResponse/Key` text is the `stagedUploadPath` a bulk mutation
//! must reference.

use quick_xml::Reader;
use quick_xml::events::Event;

const ROOT: &[u8] = b"PostResponse";
const KEY: &[u8] = b"Key";

/// Errors that can occur when extracting the staged upload key.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StagedUploadKeyError {
    /// The body is not well-formed XML.
    #[error("malformed staged upload response: {0}")]
    Malformed(String),
    /// No non-empty `PostResponse/Key` element was found.
    #[error("staged upload response has no PostResponse.Key element")]
    MissingKey,
}

/// Extract the `PostResponse/Key` value from a staged upload response body.
///
/// # Errors
///
/// Returns [`StagedUploadKeyError::Malformed`] if the XML cannot be read and
/// [`StagedUploadKeyError::MissingKey`] if no non-empty key is present.
pub fn staged_upload_key(xml: &str) -> Result<String, StagedUploadKeyError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut key = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => path.push(e.local_name().as_ref().to_vec()),
            Ok(Event::End(_)) => {
                if at_key(&path) && !key.is_empty() {
                    return Ok(key);
                }
                path.pop();
            }
            Ok(Event::Text(text)) if at_key(&path) => {
                let text = text
                    .unescape()
                    .map_err(|e| StagedUploadKeyError::Malformed(e.to_string()))?;
                key.push_str(&text);
            }
            Ok(Event::CData(data)) if at_key(&path) => {
                key.push_str(&String::from_utf8_lossy(&data));
            }
            Ok(Event::Eof) => return Err(StagedUploadKeyError::MissingKey),
            Ok(_) => {}
            Err(e) => return Err(StagedUploadKeyError::Malformed(e.to_string())),
        }
    }
}

fn at_key(path: &[Vec<u8>]) -> bool {
    matches!(path, [root, key] if root.as_slice() == ROOT && key.as_slice() == KEY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_key() {
        let xml = r#"<?xml version='1.0' encoding='UTF-8'?><PostResponse><Location>https://storage.example/tmp/1/bulk.jsonl</Location><Bucket>shopify-staged-uploads</Bucket><Key>tmp/1/bulk/abc/bulk_metafields.jsonl</Key><ETag>"etag"</ETag></PostResponse>"#;
        assert_eq!(
            staged_upload_key(xml).expect("key"),
            "tmp/1/bulk/abc/bulk_metafields.jsonl"
        );
    }

    #[test]
    fn test_extracts_key_with_whitespace() {
        let xml = "<PostResponse>\n  <Key>\n    tmp/2/file.jsonl\n  </Key>\n</PostResponse>\n";
        assert_eq!(staged_upload_key(xml).expect("key"), "tmp/2/file.jsonl");
    }

    #[test]
    fn test_unescapes_entities() {
        let xml = "<PostResponse><Key>tmp/a&amp;b.jsonl</Key></PostResponse>";
        assert_eq!(staged_upload_key(xml).expect("key"), "tmp/a&b.jsonl");
    }

    #[test]
    fn test_missing_key() {
        let xml = "<PostResponse><Location>https://x</Location></PostResponse>";
        assert_eq!(
            staged_upload_key(xml),
            Err(StagedUploadKeyError::MissingKey)
        );
    }

    #[test]
    fn test_empty_key_is_missing() {
        assert_eq!(
            staged_upload_key("<PostResponse><Key/></PostResponse>"),
            Err(StagedUploadKeyError::MissingKey)
        );
        assert_eq!(
            staged_upload_key("<PostResponse><Key></Key></PostResponse>"),
            Err(StagedUploadKeyError::MissingKey)
        );
    }

    #[test]
    fn test_key_outside_post_response_is_ignored() {
        let xml = "<Error><Key>tmp/should-not-match</Key><Code>AccessDenied</Code></Error>";
        assert_eq!(
            staged_upload_key(xml),
            Err(StagedUploadKeyError::MissingKey)
        );
    }

    #[test]
    fn test_not_xml() {
        assert!(staged_upload_key("").is_err());
        assert!(matches!(
            staged_upload_key("<PostResponse><Key>tmp</Bucket></PostResponse>"),
            Err(StagedUploadKeyError::Malformed(_))
        ));
    }
}
