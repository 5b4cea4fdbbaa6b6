//! The storage driver boundary.
//!
//! [`StorageValue`] is what a driver hands back when a column is read.
//! [`Stored`] wraps a value-shape so it can be bound to and fetched from
//! `sqlx` queries against `PostgreSQL` (binary `JSONB`) and `SQLite` (text).
//!
//! `sqlx` never calls `Decode` for a `NULL`; read nullable columns as
//! `Option<Stored<S>>` and collapse with [`Stored::or_zero`].

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::PgTypeInfo;
use sqlx::sqlite::SqliteTypeInfo;
use sqlx::types::Json;
use sqlx::{Database, Decode, Encode, Postgres, Sqlite, Type};

use crate::codec;
use crate::shape::ValueShape;

/// Version prefix of the `JSONB` binary wire format.
const JSONB_FORMAT_VERSION: u8 = 1;

/// A raw column value as returned by a driver.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageValue {
    /// SQL `NULL`.
    Null,
    /// Text column content.
    Text(String),
    /// Binary column content.
    Bytes(Vec<u8>),
    /// Integer column content.
    Integer(i64),
    /// Floating point column content.
    Float(f64),
    /// Boolean column content.
    Bool(bool),
}

impl StorageValue {
    /// Name of the native type, used in mismatch errors.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
        }
    }

    /// Returns `true` for SQL `NULL`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<String> for StorageValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for StorageValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Vec<u8>> for StorageValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<i64> for StorageValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for StorageValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for StorageValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Self>> From<Option<T>> for StorageValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A value-shape bound to a JSON column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stored<S>(pub S);

impl<S: ValueShape> Stored<S> {
    /// Unwrap the value-shape.
    pub fn into_inner(self) -> S {
        self.0
    }

    /// Collapse a nullable column read into the shape, `NULL` becoming the
    /// zero value.
    pub fn or_zero(column: Option<Self>) -> S {
        column.map(Self::into_inner).unwrap_or_default()
    }
}

impl<S> From<S> for Stored<S> {
    fn from(value: S) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

impl<S: ValueShape> Type<Postgres> for Stored<S> {
    fn type_info() -> PgTypeInfo {
        <Json<serde_json::Value> as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <Json<serde_json::Value> as Type<Postgres>>::compatible(ty)
    }
}

impl<'q, S: ValueShape> Encode<'q, Postgres> for Stored<S> {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        let text = codec::encode_text(&self.0)?;
        buf.push(JSONB_FORMAT_VERSION);
        buf.extend_from_slice(text.as_bytes());
        Ok(IsNull::No)
    }
}

impl<'r, S: ValueShape> Decode<'r, Postgres> for Stored<S> {
    fn decode(value: <Postgres as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        let Json(document) = <Json<serde_json::Value> as Decode<'r, Postgres>>::decode(value)?;
        Ok(Self(codec::decode_document(document)?))
    }
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

impl<S: ValueShape> Type<Sqlite> for Stored<S> {
    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty) || <Vec<u8> as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q, S: ValueShape> Encode<'q, Sqlite> for Stored<S> {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        let text = codec::encode_text(&self.0)?;
        <String as Encode<'q, Sqlite>>::encode(text, buf)
    }
}

impl<'r, S: ValueShape> Decode<'r, Sqlite> for Stored<S> {
    fn decode(value: <Sqlite as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        let bytes = <&[u8] as Decode<'r, Sqlite>>::decode(value)?;
        Ok(Self(codec::decode(bytes)?))
    }
}
