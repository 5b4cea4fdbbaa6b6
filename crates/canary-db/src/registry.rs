//! The closed set of storable value-shapes.
//!
//! Each shape is bound to its [`ColumnAdapter`] at compile time. No other
//! type can implement [`ValueShape`], so this file is the complete list of
//! what the data layer persists.

use canary_types::{ComponentChecks, LogSelectors, ResourceSelectors, Summary};

use crate::adapter::ColumnAdapter;
use crate::dialect::{self, DeclaredType, Dialect};
use crate::shape::{ShapeKind, ValueShape, sealed};

/// Adapter for resource selector lists.
pub const RESOURCE_SELECTORS: ColumnAdapter<ResourceSelectors> = ColumnAdapter::new();

/// Adapter for component check lists.
pub const COMPONENT_CHECKS: ColumnAdapter<ComponentChecks> = ColumnAdapter::new();

/// Adapter for component summaries.
pub const SUMMARY: ColumnAdapter<Summary> = ColumnAdapter::new();

/// Adapter for log selector lists.
pub const LOG_SELECTORS: ColumnAdapter<LogSelectors> = ColumnAdapter::new();

/// A value-shape with a registered adapter.
pub trait Registered: ValueShape {
    /// The adapter bound to this shape.
    const ADAPTER: ColumnAdapter<Self>;
}

/// Static description of a registered shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeEntry {
    /// Common data type name.
    pub name: &'static str,
    /// Default column name used by the component table.
    pub column: &'static str,
    /// Structural kind.
    pub kind: ShapeKind,
}

macro_rules! register {
    (@shape $shape:ty, $adapter:ident) => {
        impl sealed::Sealed for $shape {}

        impl Registered for $shape {
            const ADAPTER: ColumnAdapter<Self> = $adapter;
        }
    };
    (sequence $shape:ty => $adapter:ident, $name:literal) => {
        register!(@shape $shape, $adapter);

        impl ValueShape for $shape {
            const NAME: &'static str = $name;
            const KIND: ShapeKind = ShapeKind::Sequence;

            fn is_empty_sequence(&self) -> bool {
                self.is_empty()
            }
        }
    };
    (record $shape:ty => $adapter:ident, $name:literal) => {
        register!(@shape $shape, $adapter);

        impl ValueShape for $shape {
            const NAME: &'static str = $name;
            const KIND: ShapeKind = ShapeKind::Record;
        }
    };
}

register!(sequence ResourceSelectors => RESOURCE_SELECTORS, "resourceSelectors");
register!(sequence ComponentChecks => COMPONENT_CHECKS, "componentChecks");
register!(record Summary => SUMMARY, "summary");
register!(sequence LogSelectors => LOG_SELECTORS, "logSelectors");

/// Every registered shape, in component table column order.
pub const SHAPES: [ShapeEntry; 4] = [
    ShapeEntry {
        name: ResourceSelectors::NAME,
        column: "selectors",
        kind: ResourceSelectors::KIND,
    },
    ShapeEntry {
        name: ComponentChecks::NAME,
        column: "checks",
        kind: ComponentChecks::KIND,
    },
    ShapeEntry {
        name: Summary::NAME,
        column: "summary",
        kind: Summary::KIND,
    },
    ShapeEntry {
        name: LogSelectors::NAME,
        column: "log_selectors",
        kind: LogSelectors::KIND,
    },
];

/// The adapter for a registered shape.
pub const fn adapter_for<S: Registered>() -> ColumnAdapter<S> {
    S::ADAPTER
}

/// One schema-definition pass: the declared type of every registered
/// column on `dialect`.
pub fn column_definitions(dialect: Dialect) -> Vec<(&'static str, DeclaredType)> {
    let columns: Vec<_> = SHAPES
        .iter()
        .map(|entry| (entry.column, dialect::declared_type(dialect, entry.kind)))
        .collect();

    tracing::debug!(
        dialect = %dialect,
        columns = columns.len(),
        "Resolved JSON column types"
    );
    columns
}

#[cfg(test)]
mod tests {
    use canary_types::{ComponentCheck, LogSelector, ResourceSelector};

    use super::*;
    use crate::driver::StorageValue;

    #[test]
    fn four_shapes_registered() {
        let names: Vec<&str> = SHAPES.iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            ["resourceSelectors", "componentChecks", "summary", "logSelectors"]
        );
    }

    #[test]
    fn adapters_resolve_by_type() {
        assert_eq!(adapter_for::<ResourceSelectors>().shape_name(), "resourceSelectors");
        assert_eq!(adapter_for::<Summary>().kind(), ShapeKind::Record);
        assert_eq!(LogSelectors::ADAPTER.shape_name(), "logSelectors");
    }

    #[test]
    fn emptiness_only_applies_to_sequences() {
        assert!(ResourceSelectors::default().is_empty_sequence());
        assert!(ComponentChecks::default().is_empty_sequence());
        assert!(LogSelectors::default().is_empty_sequence());
        assert!(!Summary::default().is_empty_sequence());
        assert!(!ComponentChecks(vec![ComponentCheck::default()]).is_empty_sequence());
    }

    #[test]
    fn postgres_schema_pass() {
        let columns = column_definitions(Dialect::Postgres);
        assert_eq!(columns.len(), 4);
        assert!(columns.iter().all(|(_, t)| *t == DeclaredType::Jsonb));
    }

    #[test]
    fn sqlite_schema_pass_distinguishes_records() {
        let columns = column_definitions(Dialect::Sqlite);
        assert_eq!(
            columns,
            vec![
                ("selectors", DeclaredType::Json),
                ("checks", DeclaredType::Json),
                ("summary", DeclaredType::Text),
                ("log_selectors", DeclaredType::Json),
            ]
        );
    }

    #[test]
    fn registered_adapters_round_trip() {
        let selectors = ResourceSelectors(vec![ResourceSelector::new("db", "postgres")]);
        let bytes = RESOURCE_SELECTORS.write_value(Some(&selectors)).unwrap();
        assert_eq!(
            RESOURCE_SELECTORS.read_value(&StorageValue::Bytes(bytes)).unwrap(),
            selectors
        );

        let logs = LogSelectors(vec![LogSelector::new("api", "loki")]);
        let literal = LOG_SELECTORS.literal_for_query(Some(&logs)).unwrap();
        assert_eq!(
            LOG_SELECTORS.read_value(&StorageValue::Text(literal.into_inner())).unwrap(),
            logs
        );
    }
}
