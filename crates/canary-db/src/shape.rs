//! The value-shape contract shared by every stored column type.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Structural kind of a value-shape. Drives the declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// An ordered list of records, encoded as a JSON array.
    Sequence,
    /// A single record with named fields, encoded as a JSON object.
    Record,
}

pub(crate) mod sealed {
    /// Restricts [`super::ValueShape`] to the shapes listed in the registry.
    pub trait Sealed {}
}

/// A structured value that is stored wholesale in one JSON column.
///
/// Implemented only by the shapes in [`crate::registry`]; the set of
/// storable shapes is closed.
pub trait ValueShape:
    sealed::Sealed + Serialize + DeserializeOwned + Default + Send + Sync + 'static
{
    /// Common data type name, used in errors and logs.
    const NAME: &'static str;

    /// Structural kind of the encoding.
    const KIND: ShapeKind;

    /// Returns `true` for a sequence with no records. Records are never
    /// empty in this sense.
    fn is_empty_sequence(&self) -> bool {
        false
    }
}
