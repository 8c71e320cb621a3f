use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::NaiveDate;
use pos_common::Money;
use pos_engine::{
    db_types::{OrderStatusType, PaymentMethod, Role},
    report_objects::{AggregateRow, DailyReport, DailySummary},
    OrderStoreError,
    ReportApi,
};

use super::helpers::{as_actor, send};
use crate::{
    endpoint_tests::mocks::MockReportManager,
    routes::{DailyReportRoute, DailySummaryRoute},
};

fn register(cfg: &mut ServiceConfig, db: MockReportManager) {
    cfg.service(DailyReportRoute::<MockReportManager>::new())
        .service(DailySummaryRoute::<MockReportManager>::new())
        .app_data(web::Data::new(ReportApi::new(db)));
}

fn row(status: OrderStatusType, method: Option<PaymentMethod>, order_count: i64, total: i64) -> AggregateRow {
    AggregateRow { status, paid: method.is_some(), payment_method: method, order_count, total: Money::from(total) }
}

fn configure_report(cfg: &mut ServiceConfig) {
    let mut db = MockReportManager::new();
    db.expect_aggregate_orders()
        .withf(|period, filter| period.date == NaiveDate::from_ymd_opt(2024, 5, 17).unwrap() && filter.owner_id.is_none())
        .returning(|_, _| {
            Ok(vec![
                row(OrderStatusType::Pending, None, 2, 1500),
                row(OrderStatusType::Delivered, Some(PaymentMethod::Cash), 2, 2000),
                row(OrderStatusType::InProgress, Some(PaymentMethod::Debit), 1, 1000),
            ])
        });
    register(cfg, db);
}

#[actix_web::test]
async fn admin_fetches_daily_report() {
    let req = as_actor(TestRequest::get().uri("/api/reports/daily?date=2024-05-17"), 1, Role::Admin);
    let (status, body) = send(req, configure_report).await;
    assert_eq!(status, StatusCode::OK);
    let report: DailyReport = serde_json::from_str(&body).unwrap();
    assert_eq!(report.total_orders, 5);
    assert_eq!(report.paid_orders, 3);
    assert_eq!(report.paid_revenue, Money::from(3000));
    assert_eq!(report.delivered_revenue, Money::from(2000));
    assert_eq!(report.average_ticket, Money::from(1000));
    assert_eq!(report.by_status[&OrderStatusType::Cancelled], 0);
    assert_eq!(report.by_payment_method[&PaymentMethod::Debit].total, Money::from(1000));
    assert_eq!(report.by_payment_method[&PaymentMethod::Transfer].count, 0);
}

fn configure_no_report(cfg: &mut ServiceConfig) {
    let mut db = MockReportManager::new();
    db.expect_aggregate_orders().never();
    register(cfg, db);
}

#[actix_web::test]
async fn only_admins_see_the_full_report() {
    let req = as_actor(TestRequest::get().uri("/api/reports/daily"), 5, Role::Cashier);
    let (status, _) = send(req, configure_no_report).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = TestRequest::get().uri("/api/reports/daily");
    let (status, _) = send(req, configure_no_report).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn bad_dates_are_rejected() {
    let req = as_actor(TestRequest::get().uri("/api/reports/daily?date=17-05-2024"), 1, Role::Admin);
    let (status, body) = send(req, configure_no_report).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("17-05-2024"), "{body}");
}

fn configure_cashier_summary(cfg: &mut ServiceConfig) {
    let mut db = MockReportManager::new();
    db.expect_aggregate_orders().withf(|_, filter| filter.owner_id == Some(5)).returning(|_, _| {
        Ok(vec![
            row(OrderStatusType::Cancelled, None, 1, 700),
            row(OrderStatusType::Delivered, Some(PaymentMethod::Credit), 1, 1200),
        ])
    });
    register(cfg, db);
}

#[actix_web::test]
async fn cashiers_summarise_their_own_orders() {
    let req = as_actor(TestRequest::get().uri("/api/reports/summary"), 5, Role::Cashier);
    let (status, body) = send(req, configure_cashier_summary).await;
    assert_eq!(status, StatusCode::OK);
    let summary: DailySummary = serde_json::from_str(&body).unwrap();
    assert_eq!(summary.order_count, 2);
    assert_eq!(summary.paid_revenue, Money::from(1200));
    assert_eq!(summary.by_status[&OrderStatusType::Cancelled], 1);
    assert_eq!(summary.by_status[&OrderStatusType::Pending], 0);

    let req = as_actor(TestRequest::get().uri("/api/reports/summary"), 9, Role::Kitchen);
    let (status, _) = send(req, configure_cashier_summary).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

fn configure_failing_store(cfg: &mut ServiceConfig) {
    let mut db = MockReportManager::new();
    db.expect_aggregate_orders().returning(|_, _| Err(OrderStoreError::DatabaseError("database is locked".into())));
    register(cfg, db);
}

#[actix_web::test]
async fn report_storage_failures_are_opaque() {
    let req = as_actor(TestRequest::get().uri("/api/reports/summary"), 1, Role::Admin);
    let (status, body) = send(req, configure_failing_store).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("locked"), "{body}");
}
