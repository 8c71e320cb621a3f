//! # POS server
//! This module hosts the HTTP server for the POS order engine. It is responsible for:
//! Identifying the caller from the headers set by the upstream identity layer.
//! Checking the caller's role against the route's access list.
//! Translating requests into calls on the order and report APIs, and their results into JSON responses.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /api/orders`: Take a new order (cashier, admin).
//! * `GET /api/orders`: List orders. The result depends on the caller's role.
//! * `GET /api/orders/{id}`: Fetch an order with its items.
//! * `PUT /api/orders/{id}/status`: Change an order's status (kitchen, admin).
//! * `PUT /api/orders/{id}/payment`: Record an order's payment (cashier, admin).
//! * `GET /api/reports/daily`: The day's sales report (admin).
//! * `GET /api/reports/summary`: The day's summary (admin, or cashier for their own orders).

pub mod access;
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
