//! Dialect-aware JSON column adapters for Canary Checker.
//!
//! Selector lists, check lists, summaries and log selectors are each stored
//! as one JSON column. This crate turns those values into a canonical JSON
//! encoding and back, and picks the column type to declare for each
//! backend, so the same values round-trip losslessly on `SQLite`,
//! `PostgreSQL`, SQL Server, or anything else that can hold text.
//!
//! # Architecture
//!
//! ```text
//! Row write / read
//!     |
//!     +-- ColumnAdapter<S>  (registry: one per value-shape)
//!         |-- codec         (canonical JSON, null -> zero value)
//!         |-- dialect       (declared column type per backend)
//!         +-- driver        (StorageValue, sqlx Encode/Decode)
//! ```
//!
//! # Modules
//!
//! - [`shape`] -- The value-shape contract
//! - [`codec`] -- Canonical encode/decode
//! - [`dialect`] -- Dialect lookup and declared column types
//! - [`adapter`] -- Column adapter and query literals
//! - [`registry`] -- The closed set of storable shapes
//! - [`driver`] -- Storage driver boundary for `sqlx`
//! - [`config`] -- YAML configuration with env overrides
//! - [`postgres`] -- `PostgreSQL` connection pool
//! - [`component_store`] -- Component table persistence
//! - [`error`] -- Shared error types

pub mod adapter;
pub mod codec;
pub mod component_store;
pub mod config;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod postgres;
pub mod registry;
pub mod shape;

// Re-export primary types for convenience.
pub use adapter::{ColumnAdapter, QueryLiteral};
pub use component_store::{Component, ComponentRow, ComponentStore, NewComponent};
pub use config::{ConfigError, StoreConfig};
pub use dialect::{DeclaredType, Dialect, declared_type, resolve_type, resolve_type_for};
pub use driver::{StorageValue, Stored};
pub use error::{ColumnError, DbError};
pub use postgres::PostgresPool;
pub use registry::{
    COMPONENT_CHECKS, LOG_SELECTORS, RESOURCE_SELECTORS, Registered, SHAPES, SUMMARY, ShapeEntry,
    adapter_for, column_definitions,
};
pub use shape::{ShapeKind, ValueShape};
