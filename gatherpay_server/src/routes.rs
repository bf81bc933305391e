//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every handler here awaits the database or the payment gateway, so
//! they are all async, and a slow gateway only holds up the request that is waiting on it.
use std::str::FromStr;

use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use gatherpay_engine::{
    db_types::{EventId, OrganizerId},
    traits::{EventManagement, FundingDatabase, PaymentGateway},
    EventsApi,
    FundingError,
    FundingFlowApi,
};
use log::*;
use serde_json::json;

use crate::{
    config::ProxyConfig,
    data_objects::{CreateOrderRequest, VerifyPaymentRequest},
    errors::ServerError,
    helpers::get_remote_ip,
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
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "create_order": "POST /api/create-order",
            "verify_payment": "POST /api/verify-payment",
            "events": "GET /api/events",
            "event": "GET /api/event/{id}",
            "organizer_events": "GET /api/organizer/{organizer_id}/events",
        }
    }))
}

//----------------------------------------------   Funding  ----------------------------------------------------
route!(create_order => Post "/create-order" impl FundingDatabase, PaymentGateway);
/// Creates a gateway order for the event's fee. The client opens checkout against the returned order id.
///
/// Nothing is written to the ledger until the signed confirmation arrives at `/verify-payment`.
pub async fn create_order<B, G>(
    api: web::Data<FundingFlowApi<B, G>>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: FundingDatabase,
    G: PaymentGateway,
{
    let CreateOrderRequest { event_id, participant_id } = body.into_inner();
    trace!("💻️ Received order request from {participant_id} for event {event_id}");
    let order = api.create_order(&event_id, &participant_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(verify_payment => Post "/verify-payment" impl FundingDatabase, PaymentGateway);
/// Verifies the gateway's signed confirmation and records the contribution.
///
/// Presenting the same confirmation twice is harmless: the second call reports success with unchanged totals.
/// Presenting it for a different participant or event is refused with `409 Conflict`.
pub async fn verify_payment<B, G>(
    req: HttpRequest,
    proxy: web::Data<ProxyConfig>,
    api: web::Data<FundingFlowApi<B, G>>,
    body: web::Json<VerifyPaymentRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: FundingDatabase,
    G: PaymentGateway,
{
    let VerifyPaymentRequest { callback, event_id, participant_id, amount } = body.into_inner();
    trace!("💻️ Received payment confirmation for order {} on event {event_id}", callback.order_id);
    let result = api.verify_and_record(&callback, &event_id, &participant_id, amount).await.map_err(|e| {
        if let FundingError::SignatureInvalid(_) = e {
            let peer = get_remote_ip(&req, *proxy.get_ref());
            warn!("💻️ Rejected a payment confirmation with a bad signature from {peer:?}");
        }
        e
    })?;
    Ok(HttpResponse::Ok().json(result))
}

//----------------------------------------------   Events  ----------------------------------------------------
route!(events => Get "/events" impl EventManagement);
pub async fn events<B: EventManagement>(api: web::Data<EventsApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET events");
    let events = api.list_events(Utc::now()).await?;
    Ok(HttpResponse::Ok().json(events))
}

route!(event_by_id => Get "/event/{id}" impl EventManagement);
pub async fn event_by_id<B: EventManagement>(
    path: web::Path<String>,
    api: web::Data<EventsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let event_id = EventId::from_str(&path).map_err(|e| ServerError::InvalidRequestPath(e.to_string()))?;
    trace!("💻️ GET event {event_id}");
    let event = api.event_by_id(&event_id, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(event))
}

route!(organizer_events => Get "/organizer/{organizer_id}/events" impl EventManagement);
pub async fn organizer_events<B: EventManagement>(
    path: web::Path<OrganizerId>,
    api: web::Data<EventsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let organizer = path.into_inner();
    trace!("💻️ GET events for organizer {organizer}");
    let dashboard = api.events_for_organizer(&organizer, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}
