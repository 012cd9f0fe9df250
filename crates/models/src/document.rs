//! Generic JSON document as exchanged with serializers and persisted on disk.

/// Ordered string-keyed mapping of JSON values (a parsed JSON object).
///
/// `serde_json` is built with `preserve_order`, so keys keep insertion order
/// through parse and re-encode.
pub type Document = serde_json::Map<String, serde_json::Value>;
