use std::collections::BTreeMap;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use pos_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db_types::{OrderStatusType, PaymentMethod};

//--------------------------------------     ReportPeriod      ---------------------------------------------------------
/// A server-local calendar day, expressed as a half-open UTC window `[since, until)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub date: NaiveDate,
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl ReportPeriod {
    pub fn today() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    pub fn for_date(date: NaiveDate) -> Self {
        let since = local_midnight(date);
        let until = date.checked_add_days(Days::new(1)).map(local_midnight).unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { date, since, until }
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.since <= *timestamp && *timestamp < self.until
    }
}

fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    // When midnight falls into a DST gap, the day starts at the first valid local instant, which is close enough to
    // the UTC interpretation for reporting purposes.
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

//--------------------------------------     ReportFilter      ---------------------------------------------------------
/// Narrows a report to a subset of orders. The default filter covers the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub owner_id: Option<i64>,
}

impl ReportFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_owner(owner_id: i64) -> Self {
        Self { owner_id: Some(owner_id) }
    }
}

//--------------------------------------     AggregateRow      ---------------------------------------------------------
/// One group of a day's orders, sharing the same status, payment flag and payment method.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AggregateRow {
    pub status: OrderStatusType,
    pub paid: bool,
    pub payment_method: Option<PaymentMethod>,
    pub order_count: i64,
    pub total: Money,
}

//--------------------------------------      DailyReport      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodTotals {
    pub count: i64,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    /// Every order created on the day, whatever its state
    pub total_orders: i64,
    pub paid_orders: i64,
    /// Revenue actually collected
    pub paid_revenue: Money,
    /// Value of the orders handed over to customers. This can differ from `paid_revenue` while payment and delivery
    /// are out of step.
    pub delivered_revenue: Money,
    /// `paid_revenue / paid_orders`, or zero if nothing was paid
    pub average_ticket: Money,
    /// Order count per status. All statuses are present.
    pub by_status: BTreeMap<OrderStatusType, i64>,
    /// Paid orders per payment method. All methods are present.
    pub by_payment_method: BTreeMap<PaymentMethod, MethodTotals>,
}

impl DailyReport {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_orders: 0,
            paid_orders: 0,
            paid_revenue: Money::default(),
            delivered_revenue: Money::default(),
            average_ticket: Money::default(),
            by_status: OrderStatusType::ALL.into_iter().map(|s| (s, 0)).collect(),
            by_payment_method: PaymentMethod::ALL.into_iter().map(|m| (m, MethodTotals::default())).collect(),
        }
    }

    /// Folds the grouped rows for a day into a zero-filled report.
    pub fn from_rows<I>(date: NaiveDate, rows: I) -> Self
    where I: IntoIterator<Item = AggregateRow> {
        let mut report = Self::empty(date);
        for row in rows {
            report.total_orders += row.order_count;
            *report.by_status.entry(row.status).or_default() += row.order_count;
            if row.status == OrderStatusType::Delivered {
                report.delivered_revenue += row.total;
            }
            if row.paid {
                report.paid_orders += row.order_count;
                report.paid_revenue += row.total;
                // A paid order always carries its method. Should one ever be missing, it still counts towards the
                // revenue, but it cannot be attributed to a method.
                if let Some(method) = row.payment_method {
                    let entry = report.by_payment_method.entry(method).or_default();
                    entry.count += row.order_count;
                    entry.total += row.total;
                }
            }
        }
        report.average_ticket = report.paid_revenue.average_over(report.paid_orders);
        report
    }

    pub fn summary(&self) -> DailySummary {
        DailySummary {
            date: self.date,
            order_count: self.total_orders,
            paid_revenue: self.paid_revenue,
            by_status: self.by_status.clone(),
        }
    }
}

/// A condensed view of a [`DailyReport`], used for the cashier's end-of-day overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub order_count: i64,
    pub paid_revenue: Money,
    pub by_status: BTreeMap<OrderStatusType, i64>,
}
