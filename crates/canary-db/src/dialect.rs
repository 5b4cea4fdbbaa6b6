//! Dialect-conditional column types.
//!
//! The declared type of a JSON column depends on the storage backend and on
//! whether the value-shape encodes as an array or an object. Both lookups
//! are closed tables: adding a backend means adding rows, not branches.
//!
//! | dialect     | sequence        | record          |
//! |-------------|-----------------|-----------------|
//! | `sqlite`    | `json`          | `TEXT`          |
//! | `postgres`  | `JSONB`         | `JSONB`         |
//! | `sqlserver` | `NVARCHAR(MAX)` | `NVARCHAR(MAX)` |
//! | other       | `TEXT`          | `TEXT`          |

use crate::shape::ShapeKind;

/// A relational backend the data layer knows how to declare columns for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `SQLite` and compatible engines.
    Sqlite,
    /// `PostgreSQL` and wire-compatible engines.
    Postgres,
    /// Microsoft SQL Server.
    SqlServer,
    /// Any backend without a dedicated entry.
    Other,
}

/// Identifiers accepted for each dialect, compared case-insensitively.
///
/// Includes the names `sqlx` reports through `Database::NAME`.
const DIALECT_NAMES: [(&str, Dialect); 9] = [
    ("sqlite", Dialect::Sqlite),
    ("sqlite3", Dialect::Sqlite),
    ("postgres", Dialect::Postgres),
    ("postgresql", Dialect::Postgres),
    ("pg", Dialect::Postgres),
    ("pgx", Dialect::Postgres),
    ("sqlserver", Dialect::SqlServer),
    ("mssql", Dialect::SqlServer),
    ("tds", Dialect::SqlServer),
];

impl Dialect {
    /// Look up a dialect by the identifier the storage layer reports.
    ///
    /// Never fails: unknown identifiers map to [`Dialect::Other`], whose
    /// columns fall back to plain `TEXT`.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        let found = DIALECT_NAMES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
            .map(|&(_, dialect)| dialect);

        found.unwrap_or_else(|| {
            tracing::warn!(dialect = name, "Unknown dialect, declaring JSON columns as TEXT");
            Self::Other
        })
    }

    /// The dialect of a `sqlx` database driver.
    pub fn of<DB: sqlx::Database>() -> Self {
        Self::from_name(DB::NAME)
    }

    /// Canonical identifier of the dialect.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
            Self::SqlServer => "sqlserver",
            Self::Other => "other",
        }
    }
}

impl core::fmt::Display for Dialect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Column type emitted for a JSON column during schema definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    /// `SQLite` JSON text affinity.
    Json,
    /// `PostgreSQL` binary JSON.
    Jsonb,
    /// SQL Server unbounded unicode text.
    NVarcharMax,
    /// Plain unbounded text, valid on every backend.
    Text,
}

impl DeclaredType {
    /// The type as written in DDL.
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Jsonb => "JSONB",
            Self::NVarcharMax => "NVARCHAR(MAX)",
            Self::Text => "TEXT",
        }
    }
}

impl core::fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Declared types by dialect and shape kind. [`Dialect::Other`] has no
/// rows and resolves to [`DeclaredType::Text`].
const DECLARED_TYPES: [(Dialect, ShapeKind, DeclaredType); 6] = [
    (Dialect::Sqlite, ShapeKind::Sequence, DeclaredType::Json),
    (Dialect::Sqlite, ShapeKind::Record, DeclaredType::Text),
    (Dialect::Postgres, ShapeKind::Sequence, DeclaredType::Jsonb),
    (Dialect::Postgres, ShapeKind::Record, DeclaredType::Jsonb),
    (Dialect::SqlServer, ShapeKind::Sequence, DeclaredType::NVarcharMax),
    (Dialect::SqlServer, ShapeKind::Record, DeclaredType::NVarcharMax),
];

/// Declared type for a shape kind on a dialect.
pub fn declared_type(dialect: Dialect, kind: ShapeKind) -> DeclaredType {
    DECLARED_TYPES
        .iter()
        .find(|&&(d, k, _)| d == dialect && k == kind)
        .map_or(DeclaredType::Text, |&(_, _, declared)| declared)
}

/// Declared type for a sequence-shaped column on the named dialect.
pub fn resolve_type(dialect: &str) -> &'static str {
    resolve_type_for(dialect, ShapeKind::Sequence)
}

/// Declared type for a column of the given kind on the named dialect.
pub fn resolve_type_for(dialect: &str, kind: ShapeKind) -> &'static str {
    declared_type(Dialect::from_name(dialect), kind).as_sql()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_dialects_resolve() {
        assert_eq!(resolve_type("postgres"), "JSONB");
        assert_eq!(resolve_type("sqlite"), "json");
        assert_eq!(resolve_type("sqlserver"), "NVARCHAR(MAX)");
    }

    #[test]
    fn unknown_dialect_falls_back_to_text() {
        assert_eq!(resolve_type("unknown-db"), "TEXT");
        assert_eq!(resolve_type(""), "TEXT");
        assert_eq!(resolve_type_for("mysql", ShapeKind::Record), "TEXT");
    }

    #[test]
    fn every_dialect_and_kind_has_a_type() {
        let dialects = [
            Dialect::Sqlite,
            Dialect::Postgres,
            Dialect::SqlServer,
            Dialect::Other,
        ];
        for dialect in dialects {
            for kind in [ShapeKind::Sequence, ShapeKind::Record] {
                assert!(!declared_type(dialect, kind).as_sql().is_empty());
            }
        }
    }

    #[test]
    fn records_use_plain_text_on_sqlite() {
        assert_eq!(resolve_type_for("sqlite", ShapeKind::Record), "TEXT");
        assert_eq!(resolve_type_for("postgres", ShapeKind::Record), "JSONB");
    }

    #[test]
    fn names_match_case_insensitively() {
        assert_eq!(Dialect::from_name("PostgreSQL"), Dialect::Postgres);
        assert_eq!(Dialect::from_name("SQLite"), Dialect::Sqlite);
        assert_eq!(Dialect::from_name(" MSSQL "), Dialect::SqlServer);
        assert_eq!(Dialect::from_name("oracle"), Dialect::Other);
    }

    #[test]
    fn sqlx_driver_names_map_to_dialects() {
        assert_eq!(Dialect::of::<sqlx::Postgres>(), Dialect::Postgres);
        assert_eq!(Dialect::of::<sqlx::Sqlite>(), Dialect::Sqlite);
    }

    #[test]
    fn canonical_names_round_trip() {
        for dialect in [Dialect::Sqlite, Dialect::Postgres, Dialect::SqlServer] {
            assert_eq!(Dialect::from_name(dialect.name()), dialect);
        }
    }
}
