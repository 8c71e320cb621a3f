use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use pos_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid {kind}: {value}")]
pub struct ConversionError {
    kind: &'static str,
    value: String,
}

impl ConversionError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
/// The kitchen/fulfilment stage of an order. Payment is tracked separately, see [`Order::paid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusType {
    /// The order has been taken and is waiting for the kitchen.
    Pending,
    /// The kitchen is preparing the order.
    InProgress,
    /// The order has been handed over to the customer.
    Delivered,
    /// The order was called off.
    Cancelled,
}

impl OrderStatusType {
    pub const ALL: [OrderStatusType; 4] = [Self::Pending, Self::InProgress, Self::Delivered, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ConversionError::new("order status", s))
    }
}

//--------------------------------------    PaymentMethod      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Debit,
    Credit,
    Transfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [Self::Cash, Self::Debit, Self::Credit, Self::Transfer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Debit => "debit",
            Self::Credit => "credit",
            Self::Transfer => "transfer",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| ConversionError::new("payment method", s))
    }
}

//--------------------------------------         Role          ---------------------------------------------------------
/// The role of an authenticated actor, as asserted by the identity layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Cashier,
    Kitchen,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Cashier => write!(f, "cashier"),
            Role::Kitchen => write!(f, "kitchen"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "cashier" => Ok(Self::Cashier),
            "kitchen" => Ok(Self::Kitchen),
            _ => Err(ConversionError::new("role", s)),
        }
    }
}

//--------------------------------------        Product        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub unit_price: Money,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub unit_price: Money,
    pub active: bool,
}

impl NewProduct {
    pub fn new<S: Into<String>>(name: S, unit_price: Money) -> Self {
        Self { name: name.into(), unit_price, active: true }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

//--------------------------------------         Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    /// The user (usually a cashier) that took the order
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatusType,
    pub paid: bool,
    /// Only set once the order has been paid
    pub payment_method: Option<PaymentMethod>,
    /// Only set once the order has been paid
    pub paid_at: Option<DateTime<Utc>>,
    /// Sum of the line item subtotals, fixed at creation
    pub total: Money,
}

//--------------------------------------       OrderItem       ---------------------------------------------------------
/// A line item. The unit price is a snapshot of the catalog price at the moment the order was created.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    /// The product's current name. `None` if the product has since been removed from the catalog.
    pub product_name: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

//--------------------------------------     NewOrderItem      ---------------------------------------------------------
/// A validated product/quantity pair, ready to be priced. The quantity is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
}

impl NewOrderItem {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        Self { product_id, quantity }
    }
}

//--------------------------------------      PricedItem       ---------------------------------------------------------
/// A line item priced against the catalog inside the creation transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedItem {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub items: Vec<PricedItem>,
    pub total: Money,
}
