//! Persistence for components and their JSON columns.
//!
//! A component row carries four JSON columns, one per registered
//! value-shape. Writes go through the registry adapters so absent values
//! are stored as their canonical empty encoding. Reads collapse `NULL`
//! columns (rows written by older code, or by hand) into zero values.

use canary_types::{ComponentChecks, LogSelectors, ResourceSelectors, Summary};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dialect::Dialect;
use crate::driver::Stored;
use crate::error::DbError;
use crate::registry::{self, COMPONENT_CHECKS, LOG_SELECTORS, RESOURCE_SELECTORS, SUMMARY};

/// Name of the component table.
pub const TABLE: &str = "components";

/// Non-JSON column types per dialect: `(id, name, created_at)`.
const SCALAR_COLUMNS: [(Dialect, (&str, &str, &str)); 3] = [
    (
        Dialect::Postgres,
        (
            "UUID PRIMARY KEY",
            "TEXT NOT NULL",
            "TIMESTAMPTZ NOT NULL DEFAULT now()",
        ),
    ),
    (
        Dialect::Sqlite,
        (
            "TEXT PRIMARY KEY",
            "TEXT NOT NULL",
            "TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP",
        ),
    ),
    (
        Dialect::SqlServer,
        (
            "UNIQUEIDENTIFIER PRIMARY KEY",
            "NVARCHAR(255) NOT NULL",
            "DATETIMEOFFSET NOT NULL DEFAULT SYSDATETIMEOFFSET()",
        ),
    ),
];

/// Scalar column types for dialects without an entry.
const FALLBACK_SCALAR_COLUMNS: (&str, &str, &str) = (
    "VARCHAR(36) PRIMARY KEY",
    "VARCHAR(255) NOT NULL",
    "TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP",
);

/// `CREATE TABLE` statement for the component table on `dialect`.
pub fn create_table_sql(dialect: Dialect) -> String {
    let (id, name, created_at) = SCALAR_COLUMNS
        .iter()
        .find(|(d, _)| *d == dialect)
        .map_or(FALLBACK_SCALAR_COLUMNS, |&(_, scalars)| scalars);

    let mut columns = vec![format!("id {id}"), format!("name {name}")];
    columns.extend(
        registry::column_definitions(dialect)
            .into_iter()
            .map(|(column, declared)| format!("{column} {declared}")),
    );
    columns.push(format!("created_at {created_at}"));

    // SQL Server has no IF NOT EXISTS for tables.
    let create = if dialect == Dialect::SqlServer {
        "CREATE TABLE"
    } else {
        "CREATE TABLE IF NOT EXISTS"
    };
    format!("{create} {TABLE} (\n    {}\n)", columns.join(",\n    "))
}

/// A component about to be written. Absent JSON values are stored as
/// their canonical empty encoding.
#[derive(Debug, Clone, Default)]
pub struct NewComponent {
    /// Display name.
    pub name: String,
    /// Resource selectors, if any.
    pub selectors: Option<ResourceSelectors>,
    /// Checks, if any.
    pub checks: Option<ComponentChecks>,
    /// Health summary, if computed.
    pub summary: Option<Summary>,
    /// Log selectors, if any.
    pub log_selectors: Option<LogSelectors>,
}

/// A component read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Row identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Resource selectors (empty when unset).
    pub selectors: ResourceSelectors,
    /// Checks (empty when unset).
    pub checks: ComponentChecks,
    /// Health summary (zero when unset).
    pub summary: Summary,
    /// Log selectors (empty when unset).
    pub log_selectors: LogSelectors,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}

/// A row from the `components` table as the driver returns it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ComponentRow {
    /// Row identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// `selectors` column.
    pub selectors: Option<Stored<ResourceSelectors>>,
    /// `checks` column.
    pub checks: Option<Stored<ComponentChecks>>,
    /// `summary` column.
    pub summary: Option<Stored<Summary>>,
    /// `log_selectors` column.
    pub log_selectors: Option<Stored<LogSelectors>>,
    /// Real-world timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<ComponentRow> for Component {
    fn from(row: ComponentRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            selectors: Stored::or_zero(row.selectors),
            checks: Stored::or_zero(row.checks),
            summary: Stored::or_zero(row.summary),
            log_selectors: Stored::or_zero(row.log_selectors),
            created_at: row.created_at,
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, name, selectors, checks, summary, log_selectors, created_at";

/// Operations on the `components` table.
pub struct ComponentStore<'a> {
    pool: &'a PgPool,
}

impl<'a> ComponentStore<'a> {
    /// Create a new component store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create the component table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the statement fails.
    pub async fn ensure_schema(&self) -> Result<(), DbError> {
        let sql = create_table_sql(Dialect::Postgres);
        sqlx::query(&sql).execute(self.pool).await?;
        tracing::debug!(table = TABLE, "Ensured component table");
        Ok(())
    }

    /// Insert a component, returning its generated ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Column`] if a JSON value cannot be encoded, or
    /// [`DbError::Sqlx`] if the insert fails.
    pub async fn insert(&self, component: NewComponent) -> Result<Uuid, DbError> {
        let id = Uuid::now_v7();

        sqlx::query(
            r"INSERT INTO components (id, name, selectors, checks, summary, log_selectors)
              VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(&component.name)
        .bind(RESOURCE_SELECTORS.bind(component.selectors))
        .bind(COMPONENT_CHECKS.bind(component.checks))
        .bind(SUMMARY.bind(component.summary))
        .bind(LOG_SELECTORS.bind(component.log_selectors))
        .execute(self.pool)
        .await?;

        tracing::debug!(component_id = %id, name = %component.name, "Inserted component");
        Ok(id)
    }

    /// Replace the summary of a component. Returns `false` if no row matched.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the update fails.
    pub async fn update_summary(&self, id: Uuid, summary: Option<Summary>) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE components SET summary = $1 WHERE id = $2")
            .bind(SUMMARY.bind(summary))
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Load a component by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Column`] if a stored JSON column cannot be
    /// decoded, or [`DbError::Sqlx`] if the query fails.
    pub async fn get(&self, id: Uuid) -> Result<Option<Component>, DbError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM {TABLE} WHERE id = $1");
        let row = sqlx::query_as::<_, ComponentRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Component::from))
    }

    /// Find components whose selectors equal `selectors` exactly.
    ///
    /// The selectors are inlined as a literal, which lets the generated
    /// statement be logged and replayed verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Column`] if the selectors cannot be encoded, or
    /// [`DbError::Sqlx`] if the query fails.
    pub async fn find_by_selectors(
        &self,
        selectors: &ResourceSelectors,
    ) -> Result<Vec<Component>, DbError> {
        let literal = RESOURCE_SELECTORS.literal_for_query(Some(selectors))?;
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM {TABLE} WHERE selectors = {}::jsonb ORDER BY created_at",
            literal.to_sql_for(Dialect::Postgres)
        );
        tracing::debug!(sql = %sql, "Finding components by selectors");

        let rows = sqlx::query_as::<_, ComponentRow>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Component::from).collect())
    }
}
