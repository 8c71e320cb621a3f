//! Authoritative order pricing.
//!
//! Orders are always priced from the catalog prices read inside the creation transaction. Whatever prices a client
//! may have sent never reach this module.
use std::collections::{BTreeSet, HashMap};

use pos_common::Money;
use thiserror::Error;

use crate::db_types::{NewOrderItem, PricedItem, PricedOrder};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("Invalid or inactive product: {0}")]
    InvalidProduct(i64),
    #[error("The price of product {0} times its quantity cannot be represented")]
    Overflow(i64),
}

/// The distinct product ids referenced by `items`, in ascending order.
pub fn distinct_product_ids(items: &[NewOrderItem]) -> Vec<i64> {
    items.iter().map(|item| item.product_id).collect::<BTreeSet<_>>().into_iter().collect()
}

/// Prices every item against `prices`, which must only contain active products.
///
/// The first item (in request order) whose product is missing from `prices` fails the whole order. Duplicate product
/// ids are kept as separate line items.
pub fn price_order(items: &[NewOrderItem], prices: &HashMap<i64, Money>) -> Result<PricedOrder, PricingError> {
    if let Some(missing) = items.iter().find(|item| !prices.contains_key(&item.product_id)) {
        return Err(PricingError::InvalidProduct(missing.product_id));
    }
    let mut total = Money::default();
    let mut priced = Vec::with_capacity(items.len());
    for item in items {
        let unit_price = prices[&item.product_id];
        let subtotal = unit_price.checked_mul(item.quantity).ok_or(PricingError::Overflow(item.product_id))?;
        total = total.checked_add(subtotal).ok_or(PricingError::Overflow(item.product_id))?;
        priced.push(PricedItem { product_id: item.product_id, quantity: item.quantity, unit_price, subtotal });
    }
    Ok(PricedOrder { items: priced, total })
}
