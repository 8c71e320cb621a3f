use chrono::{DateTime, Utc};
use log::trace;
use pos_common::Money;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db::{sqlite::SqliteDatabaseError, traits::UpdateOutcome},
    db_types::{Order, OrderItem, OrderStatusType, PaymentMethod, PricedItem},
    order_objects::OrderQueryFilter,
    transitions::TransitionGuard,
};

const ORDER_COLUMNS: &str = "id, owner_id, created_at, status, paid, payment_method, paid_at, total";

/// Inserts a new, unpaid, pending order. This is not atomic on its own; run it inside a transaction together with
/// [`insert_items`] and pass `&mut *tx` as the connection.
///
/// `RETURNING` statements are stepped to completion with `fetch_all`. A half-read statement keeps the write lock.
pub async fn insert_order(
    owner_id: i64,
    total: Money,
    created_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Order, SqliteDatabaseError> {
    let order = sqlx::query_as::<_, Order>(
        r#"
            INSERT INTO orders (owner_id, created_at, status, paid, total)
            VALUES ($1, $2, $3, 0, $4)
            RETURNING id, owner_id, created_at, status, paid, payment_method, paid_at, total;
        "#,
    )
    .bind(owner_id)
    .bind(created_at)
    .bind(OrderStatusType::Pending)
    .bind(total)
    .fetch_all(conn)
    .await?
    .pop()
    .ok_or(sqlx::Error::RowNotFound)?;
    Ok(order)
}

/// Inserts the line items of an order, one row per item, in the order given.
pub async fn insert_items(
    order_id: i64,
    items: &[PricedItem],
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    for item in items {
        sqlx::query(
            r#"
                INSERT INTO order_items (order_id, product_id, quantity, unit_price, subtotal)
                VALUES ($1, $2, $3, $4, $5);
            "#,
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.subtotal)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn fetch_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, SqliteDatabaseError> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Fetches the line items of an order in insertion order, together with the products' current names.
pub async fn fetch_order_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, SqliteDatabaseError> {
    let items = sqlx::query_as::<_, OrderItem>(
        r#"
            SELECT
                order_items.id,
                order_items.order_id,
                order_items.product_id,
                products.name AS product_name,
                order_items.quantity,
                order_items.unit_price,
                order_items.subtotal
            FROM order_items
            LEFT JOIN products ON products.id = order_items.product_id
            WHERE order_items.order_id = $1
            ORDER BY order_items.id ASC;
        "#,
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(items)
}

/// Fetches orders according to the criteria in the `OrderQueryFilter`.
///
/// Resulting orders are ordered by `created_at` in descending order, newest first.
pub async fn fetch_orders(
    query: &OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, SqliteDatabaseError> {
    let mut builder = QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders "));
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(owner_id) = query.owner_id {
        where_clause.push("owner_id = ");
        where_clause.push_bind_unseparated(owner_id);
    }
    if let Some(since) = query.since {
        where_clause.push("created_at >= ");
        where_clause.push_bind_unseparated(since);
    }
    if let Some(until) = query.until {
        where_clause.push("created_at < ");
        where_clause.push_bind_unseparated(until);
    }
    if !query.statuses.is_empty() {
        where_clause.push("status IN (");
        for (i, status) in query.statuses.iter().enumerate() {
            if i > 0 {
                where_clause.push_unseparated(", ");
            }
            where_clause.push_bind_unseparated(*status);
        }
        where_clause.push_unseparated(")");
    }
    builder.push(" ORDER BY created_at DESC, id DESC");

    trace!("🗃️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    trace!("🗃️ Result of fetch_orders: {}", orders.len());
    Ok(orders)
}

/// Appends the guard's conditions to an `UPDATE ... WHERE id = ?` statement.
fn push_guard(builder: &mut QueryBuilder<'_, Sqlite>, guard: &TransitionGuard) {
    if let Some(paid) = guard.paid {
        builder.push(" AND paid = ");
        builder.push_bind(paid);
    }
    if !guard.excluded_statuses.is_empty() {
        builder.push(" AND status NOT IN (");
        let mut list = builder.separated(", ");
        for status in &guard.excluded_statuses {
            list.push_bind(*status);
        }
        list.push_unseparated(")");
    }
}

/// Sets the status of the order, provided it satisfies `guard`. The guard is evaluated by the same statement that
/// performs the write.
pub async fn update_status(
    id: i64,
    status: OrderStatusType,
    guard: &TransitionGuard,
    conn: &mut SqliteConnection,
) -> Result<UpdateOutcome, SqliteDatabaseError> {
    let mut builder = QueryBuilder::new("UPDATE orders SET status = ");
    builder.push_bind(status);
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    push_guard(&mut builder, guard);
    trace!("🗃️ Executing query: {}", builder.sql());
    let result = builder.build().execute(conn).await?;
    Ok(UpdateOutcome::from_rows_affected(result.rows_affected()))
}

/// Records the payment of the order, provided it satisfies `guard`. `status` is left untouched.
pub async fn mark_paid(
    id: i64,
    method: PaymentMethod,
    paid_at: DateTime<Utc>,
    guard: &TransitionGuard,
    conn: &mut SqliteConnection,
) -> Result<UpdateOutcome, SqliteDatabaseError> {
    let mut builder = QueryBuilder::new("UPDATE orders SET paid = 1, payment_method = ");
    builder.push_bind(method);
    builder.push(", paid_at = ");
    builder.push_bind(paid_at);
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    push_guard(&mut builder, guard);
    trace!("🗃️ Executing query: {}", builder.sql());
    let result = builder.build().execute(conn).await?;
    Ok(UpdateOutcome::from_rows_affected(result.rows_affected()))
}
