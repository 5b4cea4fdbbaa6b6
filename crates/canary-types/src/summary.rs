//! Health summary rolled up for a component.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Counts keyed by category then severity, e.g. `{"security": {"high": 2}}`.
pub type SeverityCounts = BTreeMap<String, BTreeMap<String, u32>>;

/// Aggregated health of a component and its children.
///
/// Stored as a single record column. Zero counters and empty maps are
/// omitted from the JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Summary {
    /// Number of healthy children.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub healthy: u32,
    /// Number of unhealthy children.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub unhealthy: u32,
    /// Number of children in a warning state.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub warning: u32,
    /// Number of informational children.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub info: u32,
    /// Open incidents by type and severity.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub incidents: SeverityCounts,
    /// Insights by analyzer and severity.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub insights: SeverityCounts,
}

impl Summary {
    /// Total number of children counted in this summary.
    pub const fn total(&self) -> u32 {
        self.healthy
            .saturating_add(self.unhealthy)
            .saturating_add(self.warning)
            .saturating_add(self.info)
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: &Self) {
        self.healthy = self.healthy.saturating_add(other.healthy);
        self.unhealthy = self.unhealthy.saturating_add(other.unhealthy);
        self.warning = self.warning.saturating_add(other.warning);
        self.info = self.info.saturating_add(other.info);
        merge_counts(&mut self.incidents, &other.incidents);
        merge_counts(&mut self.insights, &other.insights);
    }
}

fn merge_counts(into: &mut SeverityCounts, from: &SeverityCounts) {
    for (category, severities) in from {
        let target = into.entry(category.clone()).or_default();
        for (severity, count) in severities {
            let slot = target.entry(severity.clone()).or_default();
            *slot = slot.saturating_add(*count);
        }
    }
}

// serde's skip_serializing_if hands the field by reference.
#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(n: &u32) -> bool {
    *n == 0
}
