//! Structured value-shapes persisted by the Canary Checker data layer.
//!
//! Every type here is stored wholesale in a single database column as a
//! JSON document. They are plain trees with no cycles and no references
//! to other rows. Types flow to `TypeScript` via `ts-rs` for the dashboard.
//!
//! # Modules
//!
//! - [`selector`] -- Resource selectors and log selectors
//! - [`check`] -- Component checks
//! - [`summary`] -- Component health summary

pub mod check;
pub mod selector;
pub mod summary;

pub use check::{ComponentCheck, ComponentChecks};
pub use selector::{LogSelector, LogSelectors, ResourceSelector, ResourceSelectors};
pub use summary::{SeverityCounts, Summary};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Writes into `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::selector::ResourceSelector::export_all();
        let _ = crate::selector::ResourceSelectors::export_all();
        let _ = crate::selector::LogSelector::export_all();
        let _ = crate::selector::LogSelectors::export_all();
        let _ = crate::check::ComponentCheck::export_all();
        let _ = crate::check::ComponentChecks::export_all();
        let _ = crate::summary::Summary::export_all();
    }
}
