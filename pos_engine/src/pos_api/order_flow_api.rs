use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    db::traits::{OrderManagement, UpdateOutcome},
    db_types::{NewOrderItem, Order, OrderStatusType, PaymentMethod},
    order_objects::{CreatedOrder, OrderQueryFilter, OrderWithItems, PaymentReceipt, RequestedItem, StatusChange},
    pos_api::errors::{OrderFlowError, OrderStoreError},
    transitions::{check_payment, check_transition, TransitionGuard},
};

/// `OrderFlowApi` is the primary API for taking orders and moving them through their lifecycle: creation with
/// server-side pricing, kitchen status changes and payment collection.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement
{
    /// Submit a new order on behalf of `owner_id`.
    ///
    /// The items are validated before anything touches the database. The order is then priced against the catalog
    /// and stored in one transaction, so either the whole order is created or nothing is.
    pub async fn create_order(
        &self,
        owner_id: Option<i64>,
        items: Vec<RequestedItem>,
    ) -> Result<CreatedOrder, OrderFlowError> {
        let owner_id = owner_id.ok_or(OrderFlowError::MissingActor)?;
        let items = validate_items(items).map_err(|e| {
            debug!("🔄️📦️ Order from user #{owner_id} rejected. {e}");
            e
        })?;
        let created = self.db.create_order(owner_id, &items).await.map_err(|e| self.store_error(e))?;
        info!(
            "🔄️📦️ Order #{} created by user #{owner_id} with {} items. Total: {}",
            created.order.id,
            created.items.len(),
            created.order.total
        );
        Ok(CreatedOrder::from(&created.order))
    }

    /// Lists the orders matching `filter`, newest first.
    pub async fn list_orders(&self, filter: &OrderQueryFilter) -> Result<Vec<Order>, OrderFlowError> {
        trace!("🔄️📦️ Listing orders. {filter}");
        self.db.search_orders(filter).await.map_err(|e| self.store_error(e))
    }

    /// Fetches an order together with its line items.
    pub async fn fetch_order(&self, order_id: i64) -> Result<OrderWithItems, OrderFlowError> {
        let order = self.fetch_existing_order(order_id).await?;
        let items = self.db.fetch_order_items(order_id).await.map_err(|e| self.store_error(e))?;
        Ok(OrderWithItems { order, items })
    }

    /// Moves an order to the given status.
    ///
    /// `status` must name one of the [`OrderStatusType`] variants. Delivery is only possible for paid orders that
    /// have not been cancelled; every other change is accepted. Only the status field is written.
    pub async fn set_status(&self, order_id: i64, status: &str) -> Result<StatusChange, OrderFlowError> {
        let status =
            status.parse::<OrderStatusType>().map_err(|_| OrderFlowError::InvalidStatus(status.to_string()))?;
        let guard = TransitionGuard::for_status(status);
        let outcome = self.db.update_status(order_id, status, &guard).await.map_err(|e| self.store_error(e))?;
        if outcome == UpdateOutcome::NotApplied {
            let order = self.fetch_existing_order(order_id).await?;
            check_transition(order.status, order.paid, status).map_err(|e| {
                debug!("🔄️🚦️ Order #{order_id} cannot move from {} to {status}. {e}", order.status);
                e
            })?;
            warn!("🔄️🚦️ Order #{order_id} changed while it was being moved to {status}");
            return Err(OrderFlowError::ConcurrentModification(order_id));
        }
        info!("🔄️🚦️ Order #{order_id} is now {status}");
        Ok(StatusChange { order_id, status })
    }

    /// Records the payment of an order with the given method.
    ///
    /// An order can be paid exactly once, and never once it has been cancelled. The order's status is not changed.
    pub async fn collect_payment(&self, order_id: i64, method: &str) -> Result<PaymentReceipt, OrderFlowError> {
        let method =
            method.parse::<PaymentMethod>().map_err(|_| OrderFlowError::InvalidPaymentMethod(method.to_string()))?;
        let paid_at = Utc::now();
        let guard = TransitionGuard::for_payment();
        let outcome = self.db.mark_paid(order_id, method, paid_at, &guard).await.map_err(|e| self.store_error(e))?;
        if outcome == UpdateOutcome::NotApplied {
            let order = self.fetch_existing_order(order_id).await?;
            check_payment(order.status, order.paid).map_err(|e| {
                debug!("🔄️💰️ Payment for order #{order_id} rejected. {e}");
                e
            })?;
            warn!("🔄️💰️ Order #{order_id} changed while its payment was being recorded");
            return Err(OrderFlowError::ConcurrentModification(order_id));
        }
        info!("🔄️💰️ Order #{order_id} paid by {method}");
        Ok(PaymentReceipt { order_id, paid: true, payment_method: method, paid_at })
    }

    async fn fetch_existing_order(&self, order_id: i64) -> Result<Order, OrderFlowError> {
        self.db
            .fetch_order(order_id)
            .await
            .map_err(|e| self.store_error(e))?
            .ok_or(OrderFlowError::OrderNotFound(order_id))
    }

    fn store_error(&self, e: OrderStoreError) -> OrderFlowError {
        if let OrderStoreError::DatabaseError(detail) = &e {
            error!("🔄️🗃️ {detail}");
        }
        e.into()
    }
}

/// Checks the shape of a client's item list and converts it into priceable items. No database access happens here.
///
/// The list must not be empty, and every item must name a product and a positive quantity.
pub fn validate_items(items: Vec<RequestedItem>) -> Result<Vec<NewOrderItem>, OrderFlowError> {
    if items.is_empty() {
        return Err(OrderFlowError::EmptyOrder);
    }
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let product_id =
                item.product_id.ok_or_else(|| OrderFlowError::InvalidItem(format!("item {i} has no product id")))?;
            if item.quantity <= 0 {
                return Err(OrderFlowError::InvalidItem(format!(
                    "item {i} (product {product_id}) has a non-positive quantity of {}",
                    item.quantity
                )));
            }
            Ok(NewOrderItem::new(product_id, item.quantity))
        })
        .collect()
}
