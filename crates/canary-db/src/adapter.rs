//! Column adapters: the storage boundary for one value-shape.
//!
//! A [`ColumnAdapter`] is a zero-sized, stateless binding of a value-shape
//! to the codec and the dialect table. It is `Copy` and safe to share
//! across any number of concurrent row operations.
//!
//! An absent value is written exactly like an empty one. Readers cannot
//! tell "never written" from "explicitly cleared"; callers that need that
//! distinction must track it in a separate column.

use core::marker::PhantomData;

use crate::codec;
use crate::dialect::{self, DeclaredType, Dialect};
use crate::driver::{StorageValue, Stored};
use crate::error::ColumnError;
use crate::shape::{ShapeKind, ValueShape};

/// Encode, decode and type-mapping contract for one value-shape.
pub struct ColumnAdapter<S> {
    shape: PhantomData<fn() -> S>,
}

// Zero-sized handle: `self` carries only the shape type.
#[allow(clippy::unused_self, clippy::trivially_copy_pass_by_ref)]
impl<S: ValueShape> ColumnAdapter<S> {
    /// Create the adapter. Usually reached through [`crate::registry`].
    pub const fn new() -> Self {
        Self { shape: PhantomData }
    }

    /// Common data type name of the bound shape.
    pub const fn shape_name(&self) -> &'static str {
        S::NAME
    }

    /// Structural kind of the bound shape.
    pub const fn kind(&self) -> ShapeKind {
        S::KIND
    }

    /// Produce the bytes to store for a write.
    ///
    /// `None` is treated as the zero value of the shape and yields its
    /// canonical encoding (`[]` for sequences), never a storage null.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnError::Serialization`] if the value cannot be encoded.
    pub fn write_value(&self, value: Option<&S>) -> Result<Vec<u8>, ColumnError> {
        match value {
            Some(value) => codec::encode(value),
            None => codec::encode(&S::default()),
        }
    }

    /// Rebuild the shape from what the driver returned for a read.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnError::TypeMismatch`] for non-text native values and
    /// [`ColumnError::Deserialization`] for invalid content. A storage null
    /// is never an error.
    pub fn read_value(&self, raw: &StorageValue) -> Result<S, ColumnError> {
        codec::decode_storage(raw)
    }

    /// Column type to declare for the named dialect.
    pub fn declared_type(&self, dialect: &str) -> &'static str {
        dialect::resolve_type_for(dialect, S::KIND)
    }

    /// Column type to declare for a resolved dialect.
    pub fn declared_type_for(&self, dialect: Dialect) -> DeclaredType {
        dialect::declared_type(dialect, S::KIND)
    }

    /// Package the canonical encoding for use directly in a query
    /// predicate. Same content as [`write_value`](Self::write_value).
    ///
    /// # Errors
    ///
    /// Returns [`ColumnError::Serialization`] if the value cannot be encoded.
    pub fn literal_for_query(&self, value: Option<&S>) -> Result<QueryLiteral, ColumnError> {
        let text = match value {
            Some(value) => codec::encode_text(value)?,
            None => codec::encode_text(&S::default())?,
        };
        Ok(QueryLiteral(text))
    }

    /// Wrap a value for binding to a `sqlx` query.
    pub fn bind(&self, value: Option<S>) -> Stored<S> {
        Stored(value.unwrap_or_default())
    }
}

impl<S: ValueShape> Default for ColumnAdapter<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for ColumnAdapter<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for ColumnAdapter<S> {}

impl<S: ValueShape> core::fmt::Debug for ColumnAdapter<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ColumnAdapter")
            .field("shape", &S::NAME)
            .finish()
    }
}

/// Canonical JSON text prepared for inline use in generated SQL.
///
/// Bind [`as_str`](Self::as_str) as a parameter where possible. The
/// [`Display`](core::fmt::Display) form is a single-quoted SQL string
/// literal with embedded quotes doubled; use [`to_sql_for`](Self::to_sql_for)
/// when the target is SQL Server, where a plain `'...'` literal is not
/// Unicode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryLiteral(String);

impl QueryLiteral {
    /// The canonical JSON text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the literal, returning the canonical JSON text.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Render as a quoted SQL string literal.
    pub fn to_sql(&self) -> String {
        format!("'{}'", self.0.replace('\'', "''"))
    }

    /// Render as a quoted string literal for `dialect`. SQL Server gets an
    /// `N'...'` literal so non-ASCII text survives comparison with an
    /// `NVARCHAR(MAX)` column.
    pub fn to_sql_for(&self, dialect: Dialect) -> String {
        match dialect {
            Dialect::SqlServer => format!("N{}", self.to_sql()),
            Dialect::Sqlite | Dialect::Postgres | Dialect::Other => self.to_sql(),
        }
    }
}

impl core::fmt::Display for QueryLiteral {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use canary_types::{
        ComponentChecks, LogSelector, LogSelectors, ResourceSelector, ResourceSelectors, Summary,
    };

    use super::*;

    const SELECTORS: ColumnAdapter<ResourceSelectors> = ColumnAdapter::new();
    const SUMMARY: ColumnAdapter<Summary> = ColumnAdapter::new();

    #[test]
    fn absent_and_empty_write_identically() {
        let absent = SELECTORS.write_value(None).unwrap();
        let empty = SELECTORS.write_value(Some(&ResourceSelectors::default())).unwrap();
        assert_eq!(absent, b"[]");
        assert_eq!(absent, empty);
    }

    #[test]
    fn absent_record_writes_zero_record() {
        assert_eq!(SUMMARY.write_value(None).unwrap(), b"{}");
    }

    #[test]
    fn write_then_read_round_trips() {
        let adapter: ColumnAdapter<LogSelectors> = ColumnAdapter::new();
        let value = LogSelectors(vec![LogSelector::new("pods", "k8s").with_label("ns", "prod")]);
        let bytes = adapter.write_value(Some(&value)).unwrap();
        let read = adapter.read_value(&StorageValue::Bytes(bytes)).unwrap();
        assert_eq!(read, value);
    }

    #[test]
    fn null_summary_reads_as_zero_record() {
        let summary = SUMMARY.read_value(&StorageValue::Null).unwrap();
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.total(), 0);
    }

    #[test]
    fn mismatched_native_type_fails_the_read() {
        let err = SUMMARY.read_value(&StorageValue::Bool(true)).unwrap_err();
        assert!(matches!(
            err,
            ColumnError::TypeMismatch {
                shape: "summary",
                found: "bool"
            }
        ));
    }

    #[test]
    fn declared_types_follow_shape_kind() {
        assert_eq!(SELECTORS.declared_type("sqlite"), "json");
        assert_eq!(SUMMARY.declared_type("sqlite"), "TEXT");
        assert_eq!(SUMMARY.declared_type("postgres"), "JSONB");
        assert_eq!(SELECTORS.declared_type("cockroach"), "TEXT");
        assert_eq!(
            SELECTORS.declared_type_for(Dialect::SqlServer),
            DeclaredType::NVarcharMax
        );
    }

    #[test]
    fn literal_matches_write_value() {
        let value = ResourceSelectors(vec![ResourceSelector::new("svc", "http")]);
        let literal = SELECTORS.literal_for_query(Some(&value)).unwrap();
        let bytes = SELECTORS.write_value(Some(&value)).unwrap();
        assert_eq!(literal.as_str().as_bytes(), bytes.as_slice());
        assert_eq!(literal.to_sql(), r#"'[{"name":"svc","type":"http"}]'"#);
    }

    #[test]
    fn literal_escapes_single_quotes() {
        let value = ResourceSelectors(vec![ResourceSelector::new("o'brien", "")]);
        let literal = SELECTORS.literal_for_query(Some(&value)).unwrap();
        assert_eq!(literal.to_string(), r#"'[{"name":"o''brien"}]'"#);
    }

    #[test]
    fn sqlserver_literal_is_unicode() {
        let value = ResourceSelectors(vec![ResourceSelector::new("café", "")]);
        let literal = SELECTORS.literal_for_query(Some(&value)).unwrap();
        assert_eq!(
            literal.to_sql_for(Dialect::SqlServer),
            r#"N'[{"name":"café"}]'"#
        );
        assert_eq!(literal.to_sql_for(Dialect::Postgres), literal.to_sql());
        assert_eq!(literal.to_sql_for(Dialect::Sqlite), literal.to_sql());
    }

    #[test]
    fn absent_literal_is_empty_array() {
        let checks: ColumnAdapter<ComponentChecks> = ColumnAdapter::new();
        assert_eq!(checks.literal_for_query(None).unwrap().into_inner(), "[]");
    }

    #[test]
    fn adapters_are_shareable_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let value = ResourceSelectors(vec![ResourceSelector::new(format!("svc-{i}"), "http")]);
                    let bytes = SELECTORS.write_value(Some(&value)).unwrap();
                    SELECTORS.read_value(&StorageValue::Bytes(bytes)).unwrap() == value
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
