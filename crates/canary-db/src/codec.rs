//! Canonical JSON encoding of value-shapes.
//!
//! The encoding is UTF-8 JSON text. Empty sequences always encode to `[]`,
//! never to `null`. Decoding a storage null, or a stored JSON `null`
//! document, yields the zero value of the shape.

use crate::driver::StorageValue;
use crate::error::ColumnError;
use crate::shape::{ShapeKind, ValueShape};

/// Canonical encoding of an empty sequence.
pub const EMPTY_ARRAY: &str = "[]";

/// Encode a value-shape to its canonical JSON text.
///
/// # Errors
///
/// Returns [`ColumnError::Serialization`] if the value holds content JSON
/// cannot represent.
pub fn encode_text<S: ValueShape>(value: &S) -> Result<String, ColumnError> {
    if S::KIND == ShapeKind::Sequence && value.is_empty_sequence() {
        return Ok(EMPTY_ARRAY.to_owned());
    }
    serde_json::to_string(value).map_err(|source| ColumnError::Serialization {
        shape: S::NAME,
        source,
    })
}

/// Encode a value-shape to its canonical JSON bytes.
///
/// # Errors
///
/// Returns [`ColumnError::Serialization`] if the value holds content JSON
/// cannot represent.
pub fn encode<S: ValueShape>(value: &S) -> Result<Vec<u8>, ColumnError> {
    encode_text(value).map(String::into_bytes)
}

/// Decode canonical JSON bytes into a value-shape.
///
/// # Errors
///
/// Returns [`ColumnError::Deserialization`] if the bytes are not a JSON
/// document of the expected shape.
pub fn decode<S: ValueShape>(bytes: &[u8]) -> Result<S, ColumnError> {
    serde_json::from_slice::<Option<S>>(bytes)
        .map(Option::unwrap_or_default)
        .map_err(|source| {
            tracing::debug!(shape = S::NAME, error = %source, "Rejected stored column bytes");
            ColumnError::Deserialization {
                shape: S::NAME,
                source,
            }
        })
}

/// Decode an already-parsed JSON document into a value-shape.
///
/// Used by drivers that hand back a parsed document rather than raw text.
///
/// # Errors
///
/// Returns [`ColumnError::Deserialization`] if the document does not match
/// the shape.
pub fn decode_document<S: ValueShape>(document: serde_json::Value) -> Result<S, ColumnError> {
    serde_json::from_value::<Option<S>>(document)
        .map(Option::unwrap_or_default)
        .map_err(|source| ColumnError::Deserialization {
            shape: S::NAME,
            source,
        })
}

/// Decode whatever the driver returned for a column.
///
/// Nulls become the zero value. Text and bytes are decoded. Any other
/// native type is a [`ColumnError::TypeMismatch`].
///
/// # Errors
///
/// Returns [`ColumnError::TypeMismatch`] or [`ColumnError::Deserialization`].
pub fn decode_storage<S: ValueShape>(raw: &StorageValue) -> Result<S, ColumnError> {
    match raw {
        StorageValue::Null => Ok(S::default()),
        StorageValue::Text(text) => decode(text.as_bytes()),
        StorageValue::Bytes(bytes) => decode(bytes),
        other => Err(ColumnError::TypeMismatch {
            shape: S::NAME,
            found: other.type_name(),
        }),
    }
}
