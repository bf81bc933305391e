use actix_web::{http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use gatherpay_engine::{
    db_types::{Contribution, Event, EventId, EventStatus, Money, Organizer, PaymentStatus},
    helpers::CallbackVerifier,
};
use gp_common::Secret;
use log::debug;
use serde_json::Value;

use crate::server::{json_config, path_config};

// Test key. DO NOT re-use it anywhere.
pub const KEY_SECRET: &str = "thisisatestsecretdonotuse";

pub fn verifier() -> CallbackVerifier {
    CallbackVerifier::new(Secret::new(KEY_SECRET.to_string()))
}

pub async fn get_request<F>(path: &str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    call(TestRequest::get().uri(path), configure).await
}

pub async fn post_request<F>(path: &str, body: Value, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    call(TestRequest::post().uri(path).set_json(body), configure).await
}

async fn call<F>(req: TestRequest, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new().app_data(json_config()).app_data(path_config()).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 6, 30, 0).unwrap()
}

pub fn paid(who: &str, amount: i64) -> Contribution {
    Contribution {
        participant: who.into(),
        amount: Money::from(amount),
        payment_status: PaymentStatus::Completed,
        payment_date: fixed_time(),
    }
}

/// An event far enough in the future to always be upcoming.
pub fn event(id: i64, organizer: &str, fee: i64) -> Event {
    Event {
        id: EventId(id),
        title: format!("Event {id}"),
        description: "A test event".to_string(),
        location: "Community hall".to_string(),
        category: "social".to_string(),
        date: NaiveDate::from_ymd_opt(2099, 12, 31).unwrap(),
        time: "18:00".to_string(),
        fee: Money::from(fee),
        organizer: Organizer { id: organizer.into(), name: format!("Organizer {organizer}") },
        stored_status: EventStatus::Upcoming,
        contributions: vec![],
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("Response was not JSON ({e}): {body}"))
}
