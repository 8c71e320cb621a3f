//! Role-based visibility.
//!
//! The order engine has no notion of roles. What a user may see is expressed here as query filters, built from the
//! caller's [`Actor`].
use pos_engine::{
    db_types::{OrderStatusType, Role},
    order_objects::OrderQueryFilter,
    report_objects::{ReportFilter, ReportPeriod},
};

use crate::auth::Actor;

/// The orders a user may list.
///
/// * The kitchen sees the orders it still has to work on: `pending` and `in_progress`.
/// * Cashiers see the orders created today (server-local time), by anyone.
/// * Admins see everything.
pub fn order_scope(actor: &Actor, today: &ReportPeriod) -> OrderQueryFilter {
    match actor.role {
        Role::Admin => OrderQueryFilter::default(),
        Role::Cashier => OrderQueryFilter::default().since(today.since).until(today.until),
        Role::Kitchen => {
            OrderQueryFilter::default().with_status(OrderStatusType::Pending).with_status(OrderStatusType::InProgress)
        },
    }
}

/// The orders that count towards a user's daily summary. Admins summarise the whole store; anyone else only their own
/// orders.
pub fn summary_scope(actor: &Actor) -> ReportFilter {
    match actor.role {
        Role::Admin => ReportFilter::all(),
        Role::Cashier | Role::Kitchen => ReportFilter::for_owner(actor.id),
    }
}
