//! `PostgreSQL` pool for the component store.
//!
//! Pool sizing and timeouts come straight from [`StoreConfig`]. The pool
//! refuses configurations whose dialect is not `postgres`, since every
//! JSON column it writes is bound as binary `JSONB`.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::config::StoreConfig;
use crate::dialect::Dialect;
use crate::error::DbError;

/// Pool options derived from a store configuration.
fn pool_options(config: &StoreConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
}

/// Check that `config` targets `PostgreSQL` and parse its URL.
fn connect_options(config: &StoreConfig) -> Result<PgConnectOptions, DbError> {
    let dialect = config.dialect();
    if dialect != Dialect::Postgres {
        return Err(DbError::Config(format!(
            "PostgreSQL pool cannot serve dialect `{dialect}`"
        )));
    }
    config
        .url
        .parse()
        .map_err(|e: sqlx::Error| DbError::Config(format!("invalid database URL: {e}")))
}

/// Shared handle to a `PostgreSQL` pool holding the component table.
#[derive(Clone)]
pub struct PostgresPool {
    pool: PgPool,
}

impl PostgresPool {
    /// Open a pool for a `postgres` store configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] for a non-`postgres` dialect or an
    /// unparsable URL, and [`DbError::Sqlx`] if no connection can be made.
    pub async fn connect(config: &StoreConfig) -> Result<Self, DbError> {
        let options = connect_options(config)?;
        let pool = pool_options(config).connect_with(options).await?;

        tracing::info!(
            dialect = %Dialect::Postgres,
            max_connections = config.max_connections,
            "Opened component store pool"
        );
        Ok(Self { pool })
    }

    /// Open a pool for `url` with the default pool settings.
    ///
    /// # Errors
    ///
    /// See [`PostgresPool::connect`].
    pub async fn connect_url(url: &str) -> Result<Self, DbError> {
        let config = StoreConfig {
            dialect: Dialect::Postgres.name().to_owned(),
            url: url.to_owned(),
            ..StoreConfig::default()
        };
        Self::connect(&config).await
    }

    /// The underlying [`PgPool`], for binding queries.
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Drain and close every connection.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Closed component store pool");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_other_dialects() {
        let config = StoreConfig {
            dialect: "sqlite".to_owned(),
            ..StoreConfig::default()
        };
        assert!(matches!(connect_options(&config), Err(DbError::Config(_))));
    }

    #[test]
    fn rejects_malformed_url() {
        let config = StoreConfig {
            url: "not a url".to_owned(),
            ..StoreConfig::default()
        };
        assert!(matches!(connect_options(&config), Err(DbError::Config(_))));
    }

    #[test]
    fn accepts_default_config() {
        assert!(connect_options(&StoreConfig::default()).is_ok());
    }

    #[test]
    fn pool_sizing_follows_config() {
        let config = StoreConfig {
            max_connections: 4,
            connect_timeout_secs: 2,
            idle_timeout_secs: 30,
            ..StoreConfig::default()
        };
        let options = pool_options(&config);
        assert_eq!(options.get_max_connections(), 4);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(2));
        assert_eq!(options.get_idle_timeout(), Some(Duration::from_secs(30)));
    }
}
