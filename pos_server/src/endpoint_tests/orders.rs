use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use pos_common::Money;
use pos_engine::{
    db_types::{NewOrderItem, OrderItem, OrderStatusType, PaymentMethod, Role},
    order_objects::{CreatedOrder, OrderWithItems, PaymentReceipt},
    pricing::PricingError,
    OrderFlowApi,
    OrderStoreError,
    UpdateOutcome,
};
use serde_json::json;

use super::helpers::{as_actor, sample_order, send};
use crate::{
    endpoint_tests::mocks::MockOrderManager,
    routes::{CollectPaymentRoute, CreateOrderRoute, OrderByIdRoute, OrdersRoute, UpdateStatusRoute},
};

fn register(cfg: &mut ServiceConfig, db: MockOrderManager) {
    cfg.service(CreateOrderRoute::<MockOrderManager>::new())
        .service(OrdersRoute::<MockOrderManager>::new())
        .service(OrderByIdRoute::<MockOrderManager>::new())
        .service(UpdateStatusRoute::<MockOrderManager>::new())
        .service(CollectPaymentRoute::<MockOrderManager>::new())
        .app_data(web::Data::new(OrderFlowApi::new(db)));
}

fn new_order_request(role: Role) -> TestRequest {
    let req = TestRequest::post()
        .uri("/api/orders")
        .set_json(json!({"items": [{"product_id": 1, "quantity": 2, "unit_price": 1}]}));
    as_actor(req, 5, role)
}

//----------------------------------------------   Create  ----------------------------------------------------
fn configure_create(cfg: &mut ServiceConfig) {
    let mut db = MockOrderManager::new();
    db.expect_create_order()
        .withf(|owner, items| *owner == 5 && items.to_vec() == vec![NewOrderItem::new(1, 2)])
        .returning(|_, _| {
            let order = sample_order(17, OrderStatusType::Pending, false);
            let items = vec![OrderItem {
                id: 1,
                order_id: 17,
                product_id: 1,
                product_name: Some("Burger".into()),
                quantity: 2,
                unit_price: Money::from(500),
                subtotal: Money::from(1000),
            }];
            Ok(OrderWithItems { order, items })
        });
    register(cfg, db);
}

#[actix_web::test]
async fn cashier_creates_order() -> anyhow::Result<()> {
    let (status, body) = send(new_order_request(Role::Cashier), configure_create).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: CreatedOrder = serde_json::from_str(&body)?;
    assert_eq!(created.order_id, 17);
    assert_eq!(created.total, Money::from(1000));
    assert_eq!(created.status, OrderStatusType::Pending);
    assert_eq!(body, r#"{"order_id":17,"total":1000,"status":"pending"}"#);
    Ok(())
}

#[actix_web::test]
async fn admin_creates_order() {
    let (status, _) = send(new_order_request(Role::Admin), configure_create).await;
    assert_eq!(status, StatusCode::CREATED);
}

fn configure_no_create(cfg: &mut ServiceConfig) {
    let mut db = MockOrderManager::new();
    db.expect_create_order().never();
    register(cfg, db);
}

#[actix_web::test]
async fn kitchen_cannot_create_orders() {
    let (status, body) = send(new_order_request(Role::Kitchen), configure_no_create).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"Insufficient Permissions. The kitchen role cannot perform this action"}"#);
}

#[actix_web::test]
async fn anonymous_requests_are_rejected() {
    let req = TestRequest::post().uri("/api/orders").set_json(json!({"items": []}));
    let (status, body) = send(req, configure_no_create).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Unauthenticated. The X-Actor-Id header is missing"}"#);
}

#[actix_web::test]
async fn empty_orders_are_rejected() {
    let req = as_actor(TestRequest::post().uri("/api/orders").set_json(json!({"items": []})), 5, Role::Cashier);
    let (status, body) = send(req, configure_no_create).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"The order has no items"}"#);

    let req = as_actor(
        TestRequest::post().uri("/api/orders").set_json(json!({"items": [{"product_id": 1, "quantity": -1}]})),
        5,
        Role::Cashier,
    );
    let (status, _) = send(req, configure_no_create).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_bodies_are_rejected() {
    let req = as_actor(
        TestRequest::post().uri("/api/orders").insert_header(("Content-Type", "application/json")).set_payload("{items"),
        5,
        Role::Cashier,
    );
    let (status, body) = send(req, configure_no_create).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"Could not read request body"#), "{body}");
}

fn configure_inactive_product(cfg: &mut ServiceConfig) {
    let mut db = MockOrderManager::new();
    db.expect_create_order().returning(|_, _| Err(OrderStoreError::PricingError(PricingError::InvalidProduct(1))));
    register(cfg, db);
}

#[actix_web::test]
async fn inactive_products_are_rejected() {
    let (status, body) = send(new_order_request(Role::Cashier), configure_inactive_product).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Invalid or inactive product: 1"}"#);
}

//----------------------------------------------   Read    ----------------------------------------------------
fn configure_kitchen_list(cfg: &mut ServiceConfig) {
    let mut db = MockOrderManager::new();
    db.expect_search_orders()
        .withf(|filter| {
            filter.statuses == [OrderStatusType::Pending, OrderStatusType::InProgress] &&
                filter.owner_id.is_none() &&
                filter.since.is_none()
        })
        .returning(|_| {
            Ok(vec![sample_order(2, OrderStatusType::InProgress, false), sample_order(1, OrderStatusType::Pending, true)])
        });
    register(cfg, db);
}

#[actix_web::test]
async fn kitchen_lists_open_orders() {
    let req = as_actor(TestRequest::get().uri("/api/orders"), 9, Role::Kitchen);
    let (status, body) = send(req, configure_kitchen_list).await;
    assert_eq!(status, StatusCode::OK);
    let orders: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["id"], 2);
    assert_eq!(orders[0]["status"], "in_progress");
    assert_eq!(orders[1]["payment_method"], "cash");
}

fn configure_cashier_list(cfg: &mut ServiceConfig) {
    let mut db = MockOrderManager::new();
    db.expect_search_orders()
        .withf(|filter| filter.since.is_some() && filter.until.is_some() && filter.statuses.is_empty())
        .returning(|_| Ok(vec![]));
    register(cfg, db);
}

#[actix_web::test]
async fn cashier_lists_todays_orders() {
    let req = as_actor(TestRequest::get().uri("/api/orders"), 5, Role::Cashier);
    let (status, body) = send(req, configure_cashier_list).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

fn configure_storage_failure(cfg: &mut ServiceConfig) {
    let mut db = MockOrderManager::new();
    db.expect_search_orders().returning(|_| Err(OrderStoreError::DatabaseError("disk I/O error".into())));
    register(cfg, db);
}

#[actix_web::test]
async fn storage_failures_are_opaque() {
    let req = as_actor(TestRequest::get().uri("/api/orders"), 1, Role::Admin);
    let (status, body) = send(req, configure_storage_failure).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("disk"), "{body}");
}

fn configure_get(cfg: &mut ServiceConfig) {
    let mut db = MockOrderManager::new();
    db.expect_fetch_order().returning(|id| Ok((id == 17).then(|| sample_order(17, OrderStatusType::Pending, false))));
    db.expect_fetch_order_items().returning(|_| Ok(vec![]));
    register(cfg, db);
}

#[actix_web::test]
async fn fetch_order_by_id() {
    let req = as_actor(TestRequest::get().uri("/api/orders/17"), 9, Role::Kitchen);
    let (status, body) = send(req, configure_get).await;
    assert_eq!(status, StatusCode::OK);
    let order: OrderWithItems = serde_json::from_str(&body).unwrap();
    assert_eq!(order.order.id, 17);

    let req = as_actor(TestRequest::get().uri("/api/orders/18"), 9, Role::Kitchen);
    let (status, body) = send(req, configure_get).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Order 18 does not exist"}"#);

    let req = as_actor(TestRequest::get().uri("/api/orders/abc"), 9, Role::Kitchen);
    let (status, _) = send(req, configure_get).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

//----------------------------------------------   Status  ----------------------------------------------------
fn configure_unpaid_delivery(cfg: &mut ServiceConfig) {
    let mut db = MockOrderManager::new();
    db.expect_update_status()
        .withf(|id, status, guard| *id == 17 && *status == OrderStatusType::Delivered && guard.paid == Some(true))
        .returning(|_, _, _| Ok(UpdateOutcome::NotApplied));
    db.expect_fetch_order().returning(|_| Ok(Some(sample_order(17, OrderStatusType::Pending, false))));
    register(cfg, db);
}

#[actix_web::test]
async fn unpaid_orders_are_not_delivered() {
    let req = as_actor(
        TestRequest::put().uri("/api/orders/17/status").set_json(json!({"status": "delivered"})),
        9,
        Role::Kitchen,
    );
    let (status, body) = send(req, configure_unpaid_delivery).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"The order is not paid and cannot be delivered"}"#);
}

fn configure_status_change(cfg: &mut ServiceConfig) {
    let mut db = MockOrderManager::new();
    db.expect_update_status()
        .withf(|_, status, guard| *status == OrderStatusType::InProgress && guard.is_unconditional())
        .returning(|_, _, _| Ok(UpdateOutcome::Updated));
    register(cfg, db);
}

#[actix_web::test]
async fn kitchen_moves_orders_along() {
    let req = as_actor(
        TestRequest::put().uri("/api/orders/17/status").set_json(json!({"status": "in_progress"})),
        9,
        Role::Kitchen,
    );
    let (status, body) = send(req, configure_status_change).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"order_id":17,"status":"in_progress"}"#);

    let req = as_actor(
        TestRequest::put().uri("/api/orders/17/status").set_json(json!({"status": "in_progress"})),
        5,
        Role::Cashier,
    );
    let (status, _) = send(req, configure_status_change).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = as_actor(
        TestRequest::put().uri("/api/orders/17/status").set_json(json!({"status": "shipped"})),
        9,
        Role::Kitchen,
    );
    let (status, body) = send(req, configure_status_change).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Invalid order status: shipped"}"#);
}

//----------------------------------------------   Payment  ---------------------------------------------------
fn configure_payment(cfg: &mut ServiceConfig) {
    let mut db = MockOrderManager::new();
    db.expect_mark_paid()
        .withf(|id, method, _, guard| *id == 17 && *method == PaymentMethod::Debit && guard.paid == Some(false))
        .returning(|_, _, _, _| Ok(UpdateOutcome::Updated));
    register(cfg, db);
}

#[actix_web::test]
async fn cashier_collects_payment() -> anyhow::Result<()> {
    let req = as_actor(
        TestRequest::put().uri("/api/orders/17/payment").set_json(json!({"payment_method": "debit"})),
        5,
        Role::Cashier,
    );
    let (status, body) = send(req, configure_payment).await;
    assert_eq!(status, StatusCode::OK);
    let receipt: PaymentReceipt = serde_json::from_str(&body)?;
    assert!(receipt.paid);
    assert_eq!(receipt.payment_method, PaymentMethod::Debit);

    let req = as_actor(
        TestRequest::put().uri("/api/orders/17/payment").set_json(json!({"payment_method": "debit"})),
        9,
        Role::Kitchen,
    );
    let (status, _) = send(req, configure_payment).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

fn configure_raced_payment(cfg: &mut ServiceConfig) {
    let mut db = MockOrderManager::new();
    db.expect_mark_paid().returning(|_, _, _, _| Ok(UpdateOutcome::NotApplied));
    // By the time the order is re-read, the conflicting change has been undone
    db.expect_fetch_order().returning(|_| Ok(Some(sample_order(17, OrderStatusType::Pending, false))));
    register(cfg, db);
}

#[actix_web::test]
async fn raced_payments_report_a_conflict() {
    let req = as_actor(
        TestRequest::put().uri("/api/orders/17/payment").set_json(json!({"payment_method": "cash"})),
        5,
        Role::Cashier,
    );
    let (status, body) = send(req, configure_raced_payment).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, r#"{"error":"Order 17 was modified by another request. Please try again"}"#);
}

fn configure_double_payment(cfg: &mut ServiceConfig) {
    let mut db = MockOrderManager::new();
    db.expect_mark_paid().returning(|_, _, _, _| Ok(UpdateOutcome::NotApplied));
    db.expect_fetch_order().returning(|_| Ok(Some(sample_order(17, OrderStatusType::Delivered, true))));
    register(cfg, db);
}

#[actix_web::test]
async fn orders_are_paid_once() {
    let req = as_actor(
        TestRequest::put().uri("/api/orders/17/payment").set_json(json!({"payment_method": "cash"})),
        1,
        Role::Admin,
    );
    let (status, body) = send(req, configure_double_payment).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"The order has already been paid"}"#);
}
