use std::collections::HashMap;

use log::trace;
use pos_common::Money;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{NewProduct, Product},
};

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, SqliteDatabaseError> {
    let product = sqlx::query_as::<_, Product>(
        r#"
            INSERT INTO products (name, unit_price, active)
            VALUES ($1, $2, $3)
            RETURNING id, name, unit_price, active;
        "#,
    )
    .bind(product.name)
    .bind(product.unit_price)
    .bind(product.active)
    .fetch_all(conn)
    .await?
    .pop()
    .ok_or(sqlx::Error::RowNotFound)?;
    Ok(product)
}

pub async fn fetch_product(id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, SqliteDatabaseError> {
    let product = sqlx::query_as::<_, Product>("SELECT id, name, unit_price, active FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(product)
}

pub async fn set_active(id: i64, active: bool, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    let result =
        sqlx::query("UPDATE products SET active = $1 WHERE id = $2").bind(active).bind(id).execute(conn).await?;
    if result.rows_affected() == 0 {
        return Err(SqliteDatabaseError::ProductNotFound(id));
    }
    Ok(())
}

pub async fn set_unit_price(id: i64, price: Money, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    let result =
        sqlx::query("UPDATE products SET unit_price = $1 WHERE id = $2").bind(price).bind(id).execute(conn).await?;
    if result.rows_affected() == 0 {
        return Err(SqliteDatabaseError::ProductNotFound(id));
    }
    Ok(())
}

/// Fetches the unit price of every product in `ids` that exists and is active, in a single query. Ids that are
/// missing from the result are either unknown or inactive.
pub async fn fetch_active_prices(
    ids: &[i64],
    conn: &mut SqliteConnection,
) -> Result<HashMap<i64, Money>, SqliteDatabaseError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let mut builder = QueryBuilder::new("SELECT id, unit_price FROM products WHERE active = 1 AND id IN (");
    let mut list = builder.separated(", ");
    for id in ids {
        list.push_bind(*id);
    }
    list.push_unseparated(")");
    trace!("🗃️ Executing query: {}", builder.sql());
    let rows = builder.build_query_as::<(i64, Money)>().fetch_all(conn).await?;
    trace!("🗃️ {} of {} requested products are active", rows.len(), ids.len());
    Ok(rows.into_iter().collect())
}
