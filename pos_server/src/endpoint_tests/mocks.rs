use chrono::{DateTime, Utc};
use mockall::mock;
use pos_engine::{
    db_types::{NewOrderItem, Order, OrderItem, OrderStatusType, PaymentMethod},
    order_objects::{OrderQueryFilter, OrderWithItems},
    report_objects::{AggregateRow, ReportFilter, ReportPeriod},
    transitions::TransitionGuard,
    OrderManagement,
    OrderStoreError,
    ReportManagement,
    UpdateOutcome,
};

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn create_order(&self, owner_id: i64, items: &[NewOrderItem]) -> Result<OrderWithItems, OrderStoreError>;
        async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderStoreError>;
        async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, OrderStoreError>;
        async fn search_orders(&self, filter: &OrderQueryFilter) -> Result<Vec<Order>, OrderStoreError>;
        async fn update_status(&self, order_id: i64, status: OrderStatusType, guard: &TransitionGuard) -> Result<UpdateOutcome, OrderStoreError>;
        async fn mark_paid(&self, order_id: i64, method: PaymentMethod, paid_at: DateTime<Utc>, guard: &TransitionGuard) -> Result<UpdateOutcome, OrderStoreError>;
    }
}

mock! {
    pub ReportManager {}
    impl ReportManagement for ReportManager {
        async fn aggregate_orders(&self, period: &ReportPeriod, filter: &ReportFilter) -> Result<Vec<AggregateRow>, OrderStoreError>;
    }
}
