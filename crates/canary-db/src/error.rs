//! Error types for the data layer.
//!
//! Column-level failures are reported as [`ColumnError`]. Pool and store
//! operations wrap them, together with [`sqlx`] errors, in [`DbError`].
//! A [`ColumnError`] raised inside a `sqlx` encode or decode is unboxed
//! again on conversion, so callers always see [`DbError::Column`] for it.

/// Errors raised while converting a value-shape to or from its column.
///
/// Every variant names the value-shape involved. None of them is
/// recoverable at the column layer: the enclosing row operation fails.
#[derive(Debug, thiserror::Error)]
pub enum ColumnError {
    /// The value could not be turned into its canonical JSON encoding.
    #[error("failed to serialize {shape}: {source}")]
    Serialization {
        /// Common data type name of the value-shape.
        shape: &'static str,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The stored bytes are not a valid encoding of the value-shape.
    #[error("failed to deserialize {shape}: {source}")]
    Deserialization {
        /// Common data type name of the value-shape.
        shape: &'static str,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The driver returned a native type that cannot hold JSON text.
    #[error("failed to read {shape}: expected text or bytes, found {found}")]
    TypeMismatch {
        /// Common data type name of the value-shape.
        shape: &'static str,
        /// Name of the native type the driver returned.
        found: &'static str,
    },
}

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A database operation failed.
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    /// A column value could not be encoded or decoded.
    #[error("column error: {0}")]
    Column(#[from] ColumnError),

    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Encode(source) => match source.downcast::<ColumnError>() {
                Ok(column) => Self::Column(*column),
                Err(source) => Self::Sqlx(sqlx::Error::Encode(source)),
            },
            sqlx::Error::ColumnDecode { index, source } => {
                match source.downcast::<ColumnError>() {
                    Ok(column) => Self::Column(*column),
                    Err(source) => Self::Sqlx(sqlx::Error::ColumnDecode { index, source }),
                }
            }
            other => Self::Sqlx(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deserialization_error() -> ColumnError {
        let source = serde_json::from_str::<Vec<u8>>("[").unwrap_err();
        ColumnError::Deserialization {
            shape: "componentChecks",
            source,
        }
    }

    #[test]
    fn decode_failure_unboxes_to_column_error() {
        let err = sqlx::Error::ColumnDecode {
            index: "\"checks\"".to_owned(),
            source: Box::new(deserialization_error()),
        };
        assert!(matches!(
            DbError::from(err),
            DbError::Column(ColumnError::Deserialization {
                shape: "componentChecks",
                ..
            })
        ));
    }

    #[test]
    fn encode_failure_unboxes_to_column_error() {
        let err = sqlx::Error::Encode(Box::new(ColumnError::TypeMismatch {
            shape: "summary",
            found: "integer",
        }));
        assert!(matches!(
            DbError::from(err),
            DbError::Column(ColumnError::TypeMismatch { shape: "summary", .. })
        ));
    }

    #[test]
    fn foreign_decode_errors_stay_sqlx() {
        let err = sqlx::Error::ColumnDecode {
            index: "0".to_owned(),
            source: "mismatched types".into(),
        };
        assert!(matches!(DbError::from(err), DbError::Sqlx(_)));
    }

    #[test]
    fn other_sqlx_errors_pass_through() {
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::Sqlx(sqlx::Error::RowNotFound)
        ));
    }
}
