//! Order state machine rules.
//!
//! Status and payment are two independent tracks:
//!
//! ```text
//!   status:  pending ──► in_progress ──► delivered
//!               │             │
//!               └──────┬──────┘
//!                      ▼
//!                  cancelled
//!
//!   paid:    false ──► true   (exactly once)
//! ```
//!
//! The tracks meet at a single guarded edge: an order can only be delivered once it is paid, and never out of
//! `cancelled`. Every other status change is currently allowed, including re-opening a delivered order. New rules
//! belong in [`check_transition`] and [`TransitionGuard::for_status`], which must always agree.
use thiserror::Error;

use crate::db_types::{Order, OrderStatusType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("The order is cancelled and cannot be delivered")]
    OrderCancelled,
    #[error("The order is not paid and cannot be delivered")]
    OrderNotPaid,
    #[error("The order has already been paid")]
    AlreadyPaid,
    #[error("Cannot collect payment for a cancelled order")]
    PaymentOnCancelledOrder,
}

/// Checks whether an order in `current` status with the given payment state may move to `target`.
pub fn check_transition(current: OrderStatusType, paid: bool, target: OrderStatusType) -> Result<(), TransitionError> {
    use OrderStatusType::*;
    match target {
        Delivered if current == Cancelled => Err(TransitionError::OrderCancelled),
        Delivered if !paid => Err(TransitionError::OrderNotPaid),
        _ => Ok(()),
    }
}

/// Checks whether payment can be collected for an order in `current` status with the given payment state.
pub fn check_payment(current: OrderStatusType, paid: bool) -> Result<(), TransitionError> {
    if paid {
        return Err(TransitionError::AlreadyPaid);
    }
    if current == OrderStatusType::Cancelled {
        return Err(TransitionError::PaymentOnCancelledOrder);
    }
    Ok(())
}

/// The precondition of a transition, in a form that a backend can fold into a conditional `UPDATE` so that the check
/// and the write happen in a single statement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitionGuard {
    /// If set, the order's `paid` flag must have this value.
    pub paid: Option<bool>,
    /// The order's current status must not be any of these.
    pub excluded_statuses: Vec<OrderStatusType>,
}

impl TransitionGuard {
    /// The guard for changing an order's status to `target`.
    pub fn for_status(target: OrderStatusType) -> Self {
        match target {
            OrderStatusType::Delivered => {
                Self { paid: Some(true), excluded_statuses: vec![OrderStatusType::Cancelled] }
            },
            _ => Self::default(),
        }
    }

    /// The guard for collecting payment.
    pub fn for_payment() -> Self {
        Self { paid: Some(false), excluded_statuses: vec![OrderStatusType::Cancelled] }
    }

    pub fn is_unconditional(&self) -> bool {
        self.paid.is_none() && self.excluded_statuses.is_empty()
    }

    /// Evaluates the guard against an order held in memory.
    pub fn admits(&self, order: &Order) -> bool {
        self.paid.map_or(true, |paid| order.paid == paid) && !self.excluded_statuses.contains(&order.status)
    }
}
