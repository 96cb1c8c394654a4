//! Boundary to the document store and retrieval metadata.
//!
//! The pipeline itself never performs I/O. Callers hand it documents they
//! fetched through whatever transport they own; this module only fixes the
//! shape of that capability and the two conversions that sit right at the
//! boundary.

use crate::error::{PatchError, PatchResult};
use serde_json::Value;

/// Capability to fetch a document's text by identifier.
///
/// Any transport failure is surfaced as an opaque [`PatchError::Fetch`]; the
/// pipeline never retries or interprets it.
pub trait DocumentSource {
    /// Fetch the document identified by `identifier` as UTF-8 text.
    fn fetch_document(&self, identifier: &str) -> PatchResult<String>;
}

/// Metadata keys that may carry the backing document's identifier, in
/// priority order. Different retrieval backend revisions use different keys.
const IDENTIFIER_KEYS: [&str; 4] = ["file_path", "source_identifier", "minio_url", "source"];

/// Extract a document identifier from heterogeneous retrieval metadata.
///
/// Tries each known key in priority order and returns the first non-empty
/// string value. Callers decide which identifiers are usable (the upstream
/// store only serves URL identifiers, for instance); this is a priority
/// chain, not a validator.
pub fn extract_identifier(metadata: &Value) -> Option<String> {
    IDENTIFIER_KEYS.iter().find_map(|key| {
        metadata
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

/// Validate fetched bytes as UTF-8 document text.
///
/// This is the only condition under which the pipeline refuses to produce a
/// document: the input was never text to begin with.
pub fn document_from_bytes(identifier: &str, bytes: Vec<u8>) -> PatchResult<String> {
    String::from_utf8(bytes).map_err(|err| PatchError::InvalidDocument {
        identifier: identifier.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_identifier_priority_order() {
        let metadata = json!({
            "source": "https://store/last",
            "minio_url": "https://store/third",
            "file_path": "https://store/first"
        });
        assert_eq!(
            extract_identifier(&metadata),
            Some("https://store/first".to_string())
        );
    }

    #[test]
    fn test_identifier_skips_empty_values() {
        let metadata = json!({
            "file_path": "",
            "source_identifier": "   ",
            "minio_url": "https://store/doc.md"
        });
        assert_eq!(
            extract_identifier(&metadata),
            Some("https://store/doc.md".to_string())
        );
    }

    #[test]
    fn test_identifier_absent() {
        let metadata = json!({ "score": 0.92 });
        assert_eq!(extract_identifier(&metadata), None);
    }

    #[test]
    fn test_document_from_bytes() {
        let text = document_from_bytes("doc-1", b"plain text".to_vec()).unwrap();
        assert_eq!(text, "plain text");

        let err = document_from_bytes("doc-2", vec![0xff, 0xfe, 0x00]).unwrap_err();
        assert!(err.to_string().contains("doc-2"));
    }
}
