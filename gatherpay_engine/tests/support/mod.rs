#![allow(dead_code)]
use chrono::NaiveDate;
use gatherpay_engine::{
    db_types::{Event, Money, NewEvent, Organizer, OrganizerId, PaymentReference},
    helpers::{CallbackVerifier, PaymentCallback},
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    traits::{EventManagement, GatewayError, GatewayOrder, GatewayOrderRequest, PaymentGateway},
    SqliteDatabase,
};
use gp_common::Secret;
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

pub const KEY_SECRET: &str = "rzp_test_secret_for_integration";

/// Accepts every order and hands out sequential order ids.
#[derive(Debug, Default)]
pub struct FakeGateway {
    counter: std::sync::atomic::AtomicU64,
}

impl PaymentGateway for FakeGateway {
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let n = self.counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(GatewayOrder {
            order_id: format!("order_fake{n:06}"),
            amount: request.amount,
            currency: request.currency,
            receipt: format!("receipt_order_{n}"),
        })
    }
}

pub fn verifier() -> CallbackVerifier {
    CallbackVerifier::new(Secret::new(KEY_SECRET.to_string()))
}

pub fn signed_callback(order_id: &str, payment_id: &str) -> PaymentCallback {
    let signature = verifier().sign(order_id, payment_id).expect("Signing failed");
    PaymentCallback::new(order_id, payment_id, signature.as_str())
}

pub fn payment(payment_id: &str) -> PaymentReference {
    PaymentReference::new("order_fake000000", payment_id)
}

pub async fn setup() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 25).await.expect("Error creating database")
}

pub async fn tear_down(db: SqliteDatabase) {
    let url = db.url().to_string();
    db.close().await;
    if let Err(e) = Sqlite::drop_database(&url).await {
        warn!("🚀️ Could not remove test database {url}. {e}");
    }
}

pub fn new_event(title: &str, organizer: &str, fee: Money, date: NaiveDate, time: &str) -> NewEvent {
    let organizer = Organizer { id: OrganizerId::from(organizer), name: format!("{organizer} events") };
    NewEvent::new(title, date, time, fee, organizer)
}

pub async fn event_with_fee(db: &SqliteDatabase, fee: Money) -> Event {
    let date = NaiveDate::from_ymd_opt(2030, 6, 1).expect("valid date");
    db.insert_event(new_event("Fundraiser", "org-1", fee, date, "18:30")).await.expect("Error inserting event")
}
