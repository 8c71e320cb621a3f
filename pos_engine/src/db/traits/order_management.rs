use chrono::{DateTime, Utc};

use crate::{
    db::traits::UpdateOutcome,
    db_types::{NewOrderItem, Order, OrderItem, OrderStatusType, PaymentMethod},
    order_objects::{OrderQueryFilter, OrderWithItems},
    pos_api::errors::OrderStoreError,
    transitions::TransitionGuard,
};

/// The `OrderManagement` trait defines the order store.
///
/// Orders and their items are written once, together, by [`Self::create_order`]. After that, only the status and
/// payment fields ever change, through conditional updates that carry their precondition with them.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Creates a new order for `owner_id`, in a single atomic transaction:
    /// * fetches the active prices for the distinct products in `items`,
    /// * prices the order with [`crate::pricing::price_order`]. If any product is unknown or inactive, the transaction
    ///   is rolled back and [`crate::pricing::PricingError::InvalidProduct`] is returned,
    /// * inserts the order (`pending`, unpaid, `created_at` = now) and one row per item,
    /// * commits.
    ///
    /// Either the order and all its items exist afterwards, or nothing was written.
    async fn create_order(&self, owner_id: i64, items: &[NewOrderItem]) -> Result<OrderWithItems, OrderStoreError>;

    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderStoreError>;

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, OrderStoreError>;

    /// Fetches the orders that match `filter`, newest first.
    async fn search_orders(&self, filter: &OrderQueryFilter) -> Result<Vec<Order>, OrderStoreError>;

    /// Sets the order's status to `status` if, and only if, the order satisfies `guard`. The check and the write are
    /// one statement.
    async fn update_status(
        &self,
        order_id: i64,
        status: OrderStatusType,
        guard: &TransitionGuard,
    ) -> Result<UpdateOutcome, OrderStoreError>;

    /// Marks the order as paid with the given method and time, if, and only if, the order satisfies `guard`. The check
    /// and the write are one statement.
    async fn mark_paid(
        &self,
        order_id: i64,
        method: PaymentMethod,
        paid_at: DateTime<Utc>,
        guard: &TransitionGuard,
    ) -> Result<UpdateOutcome, OrderStoreError>;
}
