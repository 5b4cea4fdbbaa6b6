//! Selector records: resource selectors attached to components and log
//! selectors attached to checks.
//!
//! Both follow the sparse-record model. Empty strings and empty label maps
//! are left out of the JSON document, and decoding fills missing keys with
//! their defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Resource selectors
// ---------------------------------------------------------------------------

/// Selects the resources a component or check applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ResourceSelector {
    /// Exact resource name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Resource type, e.g. `http` or `Kubernetes::Pod`.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Namespace the resource lives in.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    /// Kubernetes-style label selector (`app=web,tier!=db`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label_selector: String,
    /// Kubernetes-style field selector.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub field_selector: String,
}

impl ResourceSelector {
    /// Create a selector matching a resource by name and type.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Restrict the selector to a namespace.
    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Attach a label selector expression.
    #[must_use]
    pub fn with_labels(mut self, label_selector: impl Into<String>) -> Self {
        self.label_selector = label_selector.into();
        self
    }

    /// Returns `true` if no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.kind.is_empty()
            && self.namespace.is_empty()
            && self.label_selector.is_empty()
            && self.field_selector.is_empty()
    }
}

/// Ordered list of [`ResourceSelector`]s stored in a single column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct ResourceSelectors(pub Vec<ResourceSelector>);

// ---------------------------------------------------------------------------
// Log selectors
// ---------------------------------------------------------------------------

/// Selects the log streams a check should surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LogSelector {
    /// Log stream name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Log source type.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Labels the stream must carry. Sorted by key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl LogSelector {
    /// Create a log selector by name and type with no labels.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            labels: BTreeMap::new(),
        }
    }

    /// Add a label requirement.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// Ordered list of [`LogSelector`]s stored in a single column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct LogSelectors(pub Vec<LogSelector>);

/// Collection helpers shared by the sequence-shaped newtypes.
macro_rules! sequence_newtype {
    ($name:ident, $item:ty) => {
        impl $name {
            /// Number of records in the list.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Returns `true` if the list holds no records.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Iterate over the records in order.
            pub fn iter(&self) -> core::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl From<Vec<$item>> for $name {
            fn from(items: Vec<$item>) -> Self {
                Self(items)
            }
        }

        impl FromIterator<$item> for $name {
            fn from_iter<I: IntoIterator<Item = $item>>(iter: I) -> Self {
                Self(iter.into_iter().collect())
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<$item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = core::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

pub(crate) use sequence_newtype;

sequence_newtype!(ResourceSelectors, ResourceSelector);
sequence_newtype!(LogSelectors, LogSelector);
