//! # Backend contracts
//!
//! This module defines the behaviour a storage backend must expose in order to host the POS order engine.
//!
//! * [`CatalogLookup`] resolves product ids to their authoritative, currently active unit prices, outside of any
//!   order transaction.
//! * [`OrderManagement`] is the order store. It creates orders atomically (pricing them against the catalog inside the
//!   same transaction), reads them back, and applies status and payment changes as conditional writes.
//! * [`ReportManagement`] provides the grouped, read-only scans that the reporting engine folds into daily reports.
//!
//! Every method is expected to be self-contained: a backend acquires a pooled connection (or a transaction) for the
//! duration of the call and releases it on every exit path.
mod catalog_lookup;
mod data_objects;
mod order_management;
mod report_management;

pub use catalog_lookup::CatalogLookup;
pub use data_objects::UpdateOutcome;
pub use order_management::OrderManagement;
pub use report_management::ReportManagement;
