use std::collections::HashMap;

use pos_common::Money;

use crate::pos_api::errors::OrderStoreError;

/// The `CatalogLookup` trait gives read access to product prices, which is all the order engine needs to know about
/// the catalog.
///
/// This is the catalog as seen from outside any transaction, e.g. for showing prices before an order is placed, or for
/// a catalog kept in a separate backend. [`OrderManagement::create_order`] does not go through it: the prices an order
/// is charged must be read inside the creation transaction, so backends run the equivalent query on that
/// transaction's connection.
///
/// [`OrderManagement::create_order`]: crate::OrderManagement::create_order
#[allow(async_fn_in_trait)]
pub trait CatalogLookup {
    /// Fetches the unit prices of the given products. Only products that exist **and** are active are included in the
    /// result; any other id is simply absent from the map.
    async fn fetch_active_prices(&self, product_ids: &[i64]) -> Result<HashMap<i64, Money>, OrderStoreError>;
}
