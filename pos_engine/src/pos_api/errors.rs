use thiserror::Error;

use crate::{pricing::PricingError, transitions::TransitionError};

/// Errors surfaced by the backend traits. Backends map their driver errors into `DatabaseError`, which carries the
/// raw detail for logging only.
#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error(transparent)]
    PricingError(#[from] PricingError),
}

/// The broad category of an [`OrderFlowError`]. Callers use this to decide how to report an error, e.g. which HTTP
/// status to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input. Nothing was changed.
    Validation,
    /// The request carried no identifiable actor.
    Unauthenticated,
    NotFound,
    /// The order is not in a state that allows the requested change. Nothing was changed.
    Precondition,
    /// A concurrent request changed the order first. The caller may resubmit.
    Conflict,
    /// The store could not complete the request. Any open transaction was rolled back.
    Storage,
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("No user could be identified for this request")]
    MissingActor,
    #[error("The order has no items")]
    EmptyOrder,
    #[error("Invalid order item: {0}")]
    InvalidItem(String),
    #[error("Invalid or inactive product: {0}")]
    InvalidProduct(i64),
    #[error("Invalid order status: {0}")]
    InvalidStatus(String),
    #[error("Invalid payment method: {0}")]
    InvalidPaymentMethod(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(i64),
    #[error(transparent)]
    TransitionRejected(#[from] TransitionError),
    #[error("Order {0} was modified by another request. Please try again")]
    ConcurrentModification(i64),
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl OrderFlowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingActor => ErrorKind::Unauthenticated,
            Self::EmptyOrder |
            Self::InvalidItem(_) |
            Self::InvalidProduct(_) |
            Self::InvalidStatus(_) |
            Self::InvalidPaymentMethod(_) => ErrorKind::Validation,
            Self::OrderNotFound(_) => ErrorKind::NotFound,
            Self::TransitionRejected(_) => ErrorKind::Precondition,
            Self::ConcurrentModification(_) => ErrorKind::Conflict,
            Self::StorageFailure(_) => ErrorKind::Storage,
        }
    }
}

impl From<OrderStoreError> for OrderFlowError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::DatabaseError(s) => Self::StorageFailure(s),
            OrderStoreError::PricingError(PricingError::InvalidProduct(id)) => Self::InvalidProduct(id),
            OrderStoreError::PricingError(e @ PricingError::Overflow(_)) => Self::InvalidItem(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ReportApiError {
    #[error("Invalid report query: {0}")]
    QueryError(String),
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl From<OrderStoreError> for ReportApiError {
    fn from(e: OrderStoreError) -> Self {
        Self::StorageFailure(e.to_string())
    }
}
