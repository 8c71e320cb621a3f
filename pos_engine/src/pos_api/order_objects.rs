use std::fmt::Display;

use chrono::{DateTime, Utc};
use pos_common::Money;
use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderItem, OrderStatusType, PaymentMethod};

/// A line item as submitted by a client, before validation.
///
/// Only the product id and quantity are read. Any price the client sends along is discarded during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestedItem {
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub quantity: i64,
}

impl RequestedItem {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        Self { product_id: Some(product_id), quantity }
    }
}

/// The result of a successful order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub order_id: i64,
    pub total: Money,
    pub status: OrderStatusType,
}

impl From<&Order> for CreatedOrder {
    fn from(order: &Order) -> Self {
        Self { order_id: order.id, total: order.total, status: order.status }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub order_id: i64,
    pub status: OrderStatusType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub order_id: i64,
    pub paid: bool,
    pub payment_method: PaymentMethod,
    pub paid_at: DateTime<Utc>,
}

/// Criteria for listing orders. Empty criteria match every order.
///
/// Role-based visibility (the kitchen only seeing open orders, for instance) is expressed by the caller through these
/// filters; the order API itself does not know about roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderQueryFilter {
    pub owner_id: Option<i64>,
    pub statuses: Vec<OrderStatusType>,
    /// Inclusive lower bound on `created_at`
    pub since: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`
    pub until: Option<DateTime<Utc>>,
}

impl OrderQueryFilter {
    pub fn with_owner_id(mut self, owner_id: i64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        if !self.statuses.contains(&status) {
            self.statuses.push(status);
        }
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.owner_id.is_none() && self.statuses.is_empty() && self.since.is_none() && self.until.is_none()
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "No filters.");
        }
        if let Some(owner_id) = &self.owner_id {
            write!(f, "owner_id: {owner_id}. ")?;
        }
        if let Some(since) = &self.since {
            write!(f, "since {since}. ")?;
        }
        if let Some(until) = &self.until {
            write!(f, "until {until}. ")?;
        }
        if !self.statuses.is_empty() {
            let statuses = self.statuses.iter().map(|s| s.to_string()).collect::<Vec<String>>().join(",");
            write!(f, "statuses: [{statuses}]. ")?;
        }
        Ok(())
    }
}
