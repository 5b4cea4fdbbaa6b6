//! Component checks: the checks a component runs to compute its health.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::selector::{ResourceSelector, sequence_newtype};

/// One check attached to a component.
///
/// A check either selects existing canaries through [`selector`] or carries
/// an inline check definition. The inline definition is owned by the check
/// engine and is stored verbatim. A JSON `null` definition means "none" and
/// is omitted from the encoding.
///
/// [`selector`]: ComponentCheck::selector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ComponentCheck {
    /// Canaries matched by this selector contribute to the component.
    #[serde(default, skip_serializing_if = "ResourceSelector::is_empty")]
    pub selector: ResourceSelector,
    /// Inline check definition, passed through untouched. `Null` when absent.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub inline: serde_json::Value,
}

impl ComponentCheck {
    /// A check that matches canaries by selector.
    pub const fn selecting(selector: ResourceSelector) -> Self {
        Self {
            selector,
            inline: serde_json::Value::Null,
        }
    }

    /// A check that carries its own definition.
    pub fn inline(definition: serde_json::Value) -> Self {
        Self {
            selector: ResourceSelector::default(),
            inline: definition,
        }
    }
}

/// Ordered list of [`ComponentCheck`]s stored in a single column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct ComponentChecks(pub Vec<ComponentCheck>);

sequence_newtype!(ComponentChecks, ComponentCheck);
