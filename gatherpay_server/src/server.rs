use std::time::Duration;

use actix_web::{
    dev::Server,
    error::{JsonPayloadError, PathError},
    http::KeepAlive,
    middleware::{DefaultHeaders, Logger},
    web,
    App,
    HttpRequest,
    HttpServer,
};
use gatherpay_engine::{events::EventProducers, helpers::CallbackVerifier, EventsApi, FundingFlowApi, SqliteDatabase};
use log::*;
use razorpay_tools::RazorpayApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::{notifications::create_organizer_notification_handlers, razorpay::RazorpayGateway},
    routes::{health, index, CreateOrderRoute, EventByIdRoute, EventsRoute, OrganizerEventsRoute, VerifyPaymentRoute},
};

const DB_MAX_CONNECTIONS: u32 = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, DB_MAX_CONNECTIONS)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🗃️ Database {} is ready", db.url());
    let gateway = RazorpayApi::new(config.razorpay.clone())
        .map(RazorpayGateway::new)
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = create_organizer_notification_handlers();
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db.clone(), gateway, producers)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    db.close().await;
    result
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: RazorpayGateway,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    if config.razorpay.key_secret.is_empty() {
        warn!("🔐️ No Razorpay key secret is configured. Every payment confirmation will be rejected.");
    }
    let verifier = CallbackVerifier::new(config.razorpay.key_secret.clone());
    let proxy = config.proxy;
    let cors_origin = config.cors_origin.clone();
    let currency = config.currency.clone();
    let tz = config.event_utc_offset;
    let srv = HttpServer::new(move || {
        let funding_api = FundingFlowApi::new(db.clone(), gateway.clone(), verifier.clone())
            .with_producers(producers.clone())
            .with_currency(currency.as_str());
        let events_api = EventsApi::new(db.clone(), tz);
        let mut headers = DefaultHeaders::new();
        if let Some(origin) = &cors_origin {
            headers = headers.add(("Access-Control-Allow-Origin", origin.as_str()));
        }
        let api_scope = web::scope("/api")
            .service(CreateOrderRoute::<SqliteDatabase, RazorpayGateway>::new())
            .service(VerifyPaymentRoute::<SqliteDatabase, RazorpayGateway>::new())
            .service(EventsRoute::<SqliteDatabase>::new())
            .service(EventByIdRoute::<SqliteDatabase>::new())
            .service(OrganizerEventsRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("gp::access_log"))
            .wrap(headers)
            .app_data(json_config())
            .app_data(path_config())
            .app_data(web::Data::new(proxy))
            .app_data(web::Data::new(funding_api))
            .app_data(web::Data::new(events_api))
            .service(health)
            .service(index)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed bodies get the same JSON error shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        debug!("💻️ Rejected request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        ServerError::InvalidRequestPath(err.to_string()).into()
    })
}
