//! Error types for snapshot decoding.
//!
//! The aggregators themselves never fail: malformed fields inside a record
//! fall back to documented defaults. Errors are reserved for documents that
//! are not shaped like a snapshot at all.

use thiserror::Error;

/// Failure to turn an input document into a [`Snapshot`](crate::model::Snapshot).
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The top-level document is not a JSON object.
    #[error("snapshot document must be a JSON object, got {found}")]
    InvalidDocument { found: &'static str },

    /// A collection field holds something other than an array of records.
    #[error("`{field}` must be a sequence of records, got {found}")]
    NotASequence {
        field: &'static str,
        found: &'static str,
    },

    /// An element of a collection could not be read as a record.
    #[error("{collection}[{index}] is not a valid record: {reason}")]
    InvalidRecord {
        collection: &'static str,
        index: usize,
        reason: String,
    },

    /// The raw text is not JSON.
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Human-readable name of a JSON value's type, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
