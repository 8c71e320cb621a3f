//! POS Order Engine
//!
//! The order engine is the core of the point-of-sale backend. It takes orders, prices them against the product
//! catalog, tracks them through the kitchen and the till, and reports on the day's sales. It is transport-agnostic.
//!
//! The library is divided into these sections:
//! 1. Database management ([`mod@db`]). The backend traits describe what the engine needs from storage; SQLite is the
//!    supported backend. The data types stored in the database are defined in [`mod@db_types`] and are public.
//! 2. The state machine and pricing rules ([`mod@transitions`], [`mod@pricing`]). These are pure functions with no
//!    storage access.
//! 3. The public API ([`mod@pos_api`]), which ties the rules to a backend.
mod db;

pub mod db_types;
pub mod pos_api;
pub mod pricing;
pub mod transitions;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use db::traits::{CatalogLookup, OrderManagement, ReportManagement, UpdateOutcome};
pub use pos_api::{
    errors::{ErrorKind, OrderFlowError, OrderStoreError, ReportApiError},
    order_flow_api::OrderFlowApi,
    order_objects,
    report_api::ReportApi,
    report_objects,
};
