//! Order and report handlers, mounted under `/api`.
//!
//! Role checks happen in the `route!` macro. The handlers themselves only delegate to [`OrderFlowApi`] or
//! [`ReportApi`], so any real logic belongs in `pos_engine`.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use pos_engine::{
    db_types::Role,
    pos_api::report_api::parse_report_date,
    report_objects::{ReportFilter, ReportPeriod},
    OrderFlowApi,
    OrderManagement,
    ReportApi,
    ReportManagement,
};

use crate::{
    access::{order_scope, summary_scope},
    auth::Actor,
    data_objects::{NewOrderRequest, PaymentRequest, ReportQuery, StatusUpdateRequest},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires [$($roles:expr),*])  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders" impl OrderManagement where requires [Role::Cashier, Role::Admin]);
/// Route handler for taking a new order.
///
/// The order is attributed to the caller. Prices are looked up in the catalog; any prices in the request body are
/// ignored. Responds with `201 Created` and the new order's id, total and status.
pub async fn create_order<B: OrderManagement>(
    actor: Actor,
    body: web::Json<NewOrderRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let NewOrderRequest { items } = body.into_inner();
    debug!("💻️ POST new order with {} items from user #{}", items.len(), actor.id);
    let created = api.create_order(Some(actor.id), items).await?;
    Ok(HttpResponse::Created().json(created))
}

route!(orders => Get "/orders" impl OrderManagement);
/// Route handler for listing orders, newest first.
///
/// What the caller sees depends on their role. See [`order_scope`].
pub async fn orders<B: OrderManagement>(
    actor: Actor,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET orders for user #{} ({})", actor.id, actor.role);
    let filter = order_scope(&actor, &ReportPeriod::today());
    let orders = api.list_orders(&filter).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/orders/{order_id}" impl OrderManagement);
pub async fn order_by_id<B: OrderManagement>(
    actor: Actor,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ GET order #{order_id} for user #{}", actor.id);
    let order = api.fetch_order(order_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(update_status => Put "/orders/{order_id}/status" impl OrderManagement where requires [Role::Kitchen, Role::Admin]);
pub async fn update_status<B: OrderManagement>(
    path: web::Path<i64>,
    body: web::Json<StatusUpdateRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    let StatusUpdateRequest { status } = body.into_inner();
    debug!("💻️ PUT status of order #{order_id} to {status}");
    let change = api.set_status(order_id, &status).await?;
    Ok(HttpResponse::Ok().json(change))
}

route!(collect_payment => Put "/orders/{order_id}/payment" impl OrderManagement where requires [Role::Cashier, Role::Admin]);
pub async fn collect_payment<B: OrderManagement>(
    path: web::Path<i64>,
    body: web::Json<PaymentRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    let PaymentRequest { payment_method } = body.into_inner();
    debug!("💻️ PUT payment of order #{order_id} by {payment_method}");
    let receipt = api.collect_payment(order_id, &payment_method).await?;
    Ok(HttpResponse::Ok().json(receipt))
}

// ----------------------------------------------   Reports  ---------------------------------------------------
route!(daily_report => Get "/reports/daily" impl ReportManagement where requires [Role::Admin]);
/// Route handler for the full daily report of the whole store. Takes an optional `date` query parameter
/// (`YYYY-MM-DD`), and defaults to today.
pub async fn daily_report<B: ReportManagement>(
    query: web::Query<ReportQuery>,
    api: web::Data<ReportApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let date = query.into_inner().date.as_deref().map(parse_report_date).transpose()?;
    debug!("💻️ GET daily report for {}", date.map(|d| d.to_string()).unwrap_or_else(|| "today".into()));
    let report = api.daily_report(date, ReportFilter::all()).await?;
    Ok(HttpResponse::Ok().json(report))
}

route!(daily_summary => Get "/reports/summary" impl ReportManagement where requires [Role::Admin, Role::Cashier]);
/// Route handler for the condensed daily summary. Admins get the whole store, cashiers only their own orders.
pub async fn daily_summary<B: ReportManagement>(
    actor: Actor,
    query: web::Query<ReportQuery>,
    api: web::Data<ReportApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let date = query.into_inner().date.as_deref().map(parse_report_date).transpose()?;
    debug!("💻️ GET daily summary for user #{} ({})", actor.id, actor.role);
    let summary = api.daily_summary(date, summary_scope(&actor)).await?;
    Ok(HttpResponse::Ok().json(summary))
}
