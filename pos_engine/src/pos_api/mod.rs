//! # POS engine public API
//!
//! The `pos_api` module exposes the programmatic API of the order engine.
//!
//! * [`order_flow_api`] takes orders, re-prices them against the catalog, and moves them through the status and
//!   payment state machine.
//! * [`report_api`] computes the daily sales aggregates.
//!
//! The other submodules hold the request and response types, and the error types, of these APIs.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the backend traits required by the API.
//!
//! ```rust,ignore
//! use pos_engine::{OrderFlowApi, SqliteDatabase, order_objects::RequestedItem};
//! let db = SqliteDatabase::new_with_url("sqlite://data/pos_store.db", 25).await?;
//! // SqliteDatabase implements OrderManagement
//! let api = OrderFlowApi::new(db);
//! let created = api.create_order(Some(cashier_id), vec![RequestedItem::new(1, 2)]).await?;
//! ```
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
pub mod report_api;
pub mod report_objects;
