use std::time::Duration;

use actix_web::{
    dev::Server,
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpServer,
};
use log::*;
use pos_engine::{OrderFlowApi, ReportApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        CollectPaymentRoute,
        CreateOrderRoute,
        DailyReportRoute,
        DailySummaryRoute,
        OrderByIdRoute,
        OrdersRoute,
        UpdateStatusRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = connect_database(&config).await?;
    let srv = create_server_instance(config, db.clone())?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    db.close().await;
    result
}

async fn connect_database(config: &ServerConfig) -> Result<SqliteDatabase, ServerError> {
    let url = config.database_url.as_str();
    let db = if config.auto_migrate {
        SqliteDatabase::create_and_migrate(url, config.max_connections).await
    } else {
        SqliteDatabase::new_with_url(url, config.max_connections).await
    }
    .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🚀️ Connected to database at {url}");
    Ok(db)
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone());
        let reports_api = ReportApi::new(db.clone());
        let api_scope = web::scope("/api")
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(OrdersRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
            .service(UpdateStatusRoute::<SqliteDatabase>::new())
            .service(CollectPaymentRoute::<SqliteDatabase>::new())
            .service(DailyReportRoute::<SqliteDatabase>::new())
            .service(DailySummaryRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %r").log_target("pos::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(reports_api))
            .app_data(json_config())
            .app_data(path_config())
            .app_data(query_config())
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed request bodies are reported with the same JSON error shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| ServerError::InvalidRequestPath(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| ServerError::InvalidQuery(err.to_string()).into())
}
