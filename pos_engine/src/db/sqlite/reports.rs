use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db::sqlite::SqliteDatabaseError,
    report_objects::{AggregateRow, ReportFilter, ReportPeriod},
};

/// Groups the orders created within `period` by status, payment flag and payment method. This is the only query the
/// reporting engine issues per report; the rows are folded into a report in memory.
pub async fn aggregate_orders(
    period: &ReportPeriod,
    filter: &ReportFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<AggregateRow>, SqliteDatabaseError> {
    let mut builder = QueryBuilder::new(
        r#"
            SELECT
                status,
                paid,
                payment_method,
                COUNT(*) AS order_count,
                COALESCE(SUM(total), 0) AS total
            FROM orders
            WHERE created_at >= "#,
    );
    builder.push_bind(period.since);
    builder.push(" AND created_at < ");
    builder.push_bind(period.until);
    if let Some(owner_id) = filter.owner_id {
        builder.push(" AND owner_id = ");
        builder.push_bind(owner_id);
    }
    builder.push(" GROUP BY status, paid, payment_method");
    trace!("📊️ Executing query: {}", builder.sql());
    let rows = builder.build_query_as::<AggregateRow>().fetch_all(conn).await?;
    trace!("📊️ {} aggregate groups for {}", rows.len(), period.date);
    Ok(rows)
}
