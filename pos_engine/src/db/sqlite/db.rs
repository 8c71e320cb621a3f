use std::{collections::HashMap, fmt::Debug};

use chrono::{DateTime, Utc};
use log::*;
use pos_common::Money;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};

use super::{begin_immediate, new_pool, orders, products, reports, SqliteDatabaseError};
use crate::{
    db::traits::{CatalogLookup, OrderManagement, ReportManagement, UpdateOutcome},
    db_types::{NewOrderItem, NewProduct, Order, OrderItem, OrderStatusType, PaymentMethod, Product},
    order_objects::{OrderQueryFilter, OrderWithItems},
    pos_api::errors::OrderStoreError,
    pricing::{distinct_product_ids, price_order},
    report_objects::{AggregateRow, ReportFilter, ReportPeriod},
    transitions::TransitionGuard,
};

#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { pool })
    }

    /// Creates the database file if it does not exist yet, connects to it and brings the schema up to date.
    pub async fn create_and_migrate(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        if !Sqlite::database_exists(url).await? {
            info!("🗃️ Creating new database at {url}");
            Sqlite::create_database(url).await?;
        }
        let db = Self::new_with_url(url, max_connections).await?;
        db.run_migrations().await?;
        Ok(db)
    }

    pub async fn run_migrations(&self) -> Result<(), SqliteDatabaseError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        debug!("🗃️ Migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Adds a product to the catalog.
    pub async fn add_product(&self, product: NewProduct) -> Result<Product, SqliteDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::insert_product(product, &mut conn).await?;
        debug!("🗃️ Product #{} ({}) added at {}", product.id, product.name, product.unit_price);
        Ok(product)
    }

    pub async fn fetch_product(&self, id: i64) -> Result<Option<Product>, SqliteDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_product(id, &mut conn).await
    }

    /// Activates or deactivates a product. Inactive products cannot be ordered, but existing orders that reference
    /// them are unaffected.
    pub async fn set_product_active(&self, id: i64, active: bool) -> Result<(), SqliteDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        products::set_active(id, active, &mut conn).await?;
        debug!("🗃️ Product #{id} active: {active}");
        Ok(())
    }

    /// Changes the catalog price of a product. Prices already captured on order items do not change.
    pub async fn set_product_price(&self, id: i64, price: Money) -> Result<(), SqliteDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        products::set_unit_price(id, price, &mut conn).await?;
        debug!("🗃️ Product #{id} now costs {price}");
        Ok(())
    }
}

impl CatalogLookup for SqliteDatabase {
    async fn fetch_active_prices(&self, product_ids: &[i64]) -> Result<HashMap<i64, Money>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let prices = products::fetch_active_prices(product_ids, &mut conn).await?;
        Ok(prices)
    }
}

impl OrderManagement for SqliteDatabase {
    /// Takes a list of validated items, and in a single atomic transaction,
    /// * fetches the active prices of the referenced products,
    /// * prices every item against those prices. Unknown or inactive products abort the transaction,
    /// * inserts the order and its items.
    ///
    /// The transaction holds the write lock from the start, so concurrent creations queue behind each other for up
    /// to the busy timeout rather than failing. It is rolled back when it is dropped without being committed, so every
    /// early return leaves the database untouched.
    ///
    /// Prices are read with the same query that backs [`CatalogLookup`], but on the transaction's connection.
    async fn create_order(&self, owner_id: i64, items: &[NewOrderItem]) -> Result<OrderWithItems, OrderStoreError> {
        let mut tx = begin_immediate(&self.pool).await?;
        let ids = distinct_product_ids(items);
        let prices = products::fetch_active_prices(&ids, &mut tx).await?;
        let priced = price_order(items, &prices)?;
        let order = orders::insert_order(owner_id, priced.total, Utc::now(), &mut tx).await?;
        orders::insert_items(order.id, &priced.items, &mut tx).await?;
        let items = orders::fetch_order_items(order.id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order #{} with {} items saved for user #{owner_id}. Total: {}", order.id, items.len(), order.total);
        Ok(OrderWithItems { order, items })
    }

    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let items = orders::fetch_order_items(order_id, &mut conn).await?;
        Ok(items)
    }

    async fn search_orders(&self, filter: &OrderQueryFilter) -> Result<Vec<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders(filter, &mut conn).await?;
        Ok(orders)
    }

    async fn update_status(
        &self,
        order_id: i64,
        status: OrderStatusType,
        guard: &TransitionGuard,
    ) -> Result<UpdateOutcome, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let outcome = orders::update_status(order_id, status, guard, &mut conn).await?;
        trace!("🗃️ Status update of order #{order_id} to {status}: {outcome:?}");
        Ok(outcome)
    }

    async fn mark_paid(
        &self,
        order_id: i64,
        method: PaymentMethod,
        paid_at: DateTime<Utc>,
        guard: &TransitionGuard,
    ) -> Result<UpdateOutcome, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let outcome = orders::mark_paid(order_id, method, paid_at, guard, &mut conn).await?;
        trace!("🗃️ Payment of order #{order_id} with {method}: {outcome:?}");
        Ok(outcome)
    }
}

impl ReportManagement for SqliteDatabase {
    async fn aggregate_orders(
        &self,
        period: &ReportPeriod,
        filter: &ReportFilter,
    ) -> Result<Vec<AggregateRow>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let rows = reports::aggregate_orders(period, filter, &mut conn).await?;
        Ok(rows)
    }
}
