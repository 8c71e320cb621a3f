use std::fmt::Debug;

use chrono::NaiveDate;
use log::*;

use crate::{
    db::traits::ReportManagement,
    pos_api::errors::ReportApiError,
    report_objects::{DailyReport, DailySummary, ReportFilter, ReportPeriod},
};

/// `ReportApi` computes sales reports on demand. Nothing is cached; every call reads the current state of the order
/// store with a single grouped query.
pub struct ReportApi<B> {
    db: B,
}

impl<B> Debug for ReportApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReportApi")
    }
}

impl<B> ReportApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> ReportApi<B>
where B: ReportManagement
{
    /// Builds the report for the given server-local date (today if `None`), restricted to the orders matching
    /// `filter`.
    pub async fn daily_report(
        &self,
        date: Option<NaiveDate>,
        filter: ReportFilter,
    ) -> Result<DailyReport, ReportApiError> {
        let period = date.map(ReportPeriod::for_date).unwrap_or_else(ReportPeriod::today);
        let rows = self.db.aggregate_orders(&period, &filter).await.map_err(|e| {
            error!("📊️ Could not aggregate orders for {}. {e}", period.date);
            ReportApiError::from(e)
        })?;
        let report = DailyReport::from_rows(period.date, rows);
        debug!(
            "📊️ Report for {}: {} orders, {} paid, revenue {}",
            report.date, report.total_orders, report.paid_orders, report.paid_revenue
        );
        Ok(report)
    }

    pub async fn daily_summary(
        &self,
        date: Option<NaiveDate>,
        filter: ReportFilter,
    ) -> Result<DailySummary, ReportApiError> {
        self.daily_report(date, filter).await.map(|report| report.summary())
    }
}

/// Parses a report date in `YYYY-MM-DD` form.
pub fn parse_report_date(date: &str) -> Result<NaiveDate, ReportApiError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| ReportApiError::QueryError(format!("'{date}' is not a valid date. {e}")))
}
