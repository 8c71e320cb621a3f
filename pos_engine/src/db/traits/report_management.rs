use crate::{
    pos_api::errors::OrderStoreError,
    report_objects::{AggregateRow, ReportFilter, ReportPeriod},
};

/// Read-only aggregate queries used by the reporting engine.
#[allow(async_fn_in_trait)]
pub trait ReportManagement {
    /// Groups the orders created within `period` (and matching `filter`) by status, payment flag and payment method,
    /// returning the count and summed total of each group.
    async fn aggregate_orders(
        &self,
        period: &ReportPeriod,
        filter: &ReportFilter,
    ) -> Result<Vec<AggregateRow>, OrderStoreError>;
}
