use actix_web::{http::StatusCode, web, web::ServiceConfig};
use gatherpay_engine::{
    db_types::{EventId, Money},
    traits::{GatewayError, GatewayOrder, LedgerError, RecordOutcome, RecordResult},
    FundingFlowApi,
};
use serde_json::json;

use super::{
    helpers::{event, json, paid, post_request, verifier},
    mocks::{MockFundingStore, MockGateway},
};
use crate::{
    config::ProxyConfig,
    routes::{CreateOrderRoute, VerifyPaymentRoute},
};

fn configure(store: MockFundingStore, gateway: MockGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = FundingFlowApi::new(store, gateway, verifier());
        cfg.service(CreateOrderRoute::<MockFundingStore, MockGateway>::new())
            .service(VerifyPaymentRoute::<MockFundingStore, MockGateway>::new())
            .app_data(web::Data::new(ProxyConfig::default()))
            .app_data(web::Data::new(api));
    }
}

fn store_with_event(fee: i64) -> MockFundingStore {
    let mut store = MockFundingStore::new();
    store.expect_fetch_event().returning(move |id| Ok(Some(event(id.value(), "org-1", fee))));
    store
}

fn signed_payment(event_id: i64, amount: i64) -> serde_json::Value {
    let signature = verifier().sign("order_Jx1", "pay_Jx1").unwrap();
    json!({
        "razorpay_order_id": "order_Jx1",
        "razorpay_payment_id": "pay_Jx1",
        "razorpay_signature": signature,
        "event_id": event_id,
        "participant_id": "alice",
        "amount": amount,
    })
}

#[actix_web::test]
async fn create_order_for_a_paid_event() {
    let _ = env_logger::try_init().ok();
    let store = store_with_event(50_000);
    let mut gateway = MockGateway::new();
    gateway
        .expect_create_order()
        .withf(|req| {
            req.amount == Money::from(50_000) && req.event_id == EventId(7) && req.participant_id.as_str() == "alice"
        })
        .times(1)
        .returning(|req| {
            Ok(GatewayOrder {
                order_id: "order_Jx1".into(),
                amount: req.amount,
                currency: req.currency,
                receipt: "receipt_order_1709274600000".into(),
            })
        });
    let body = json!({ "event_id": 7, "participant_id": "alice" });
    let (status, body) = post_request("/create-order", body, configure(store, gateway)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!({ "order_id": "order_Jx1", "amount": 50000, "currency": "INR" }));
}

#[actix_web::test]
async fn create_order_for_an_unknown_event() {
    let _ = env_logger::try_init().ok();
    let mut store = MockFundingStore::new();
    store.expect_fetch_event().returning(|_| Ok(None));
    let mut gateway = MockGateway::new();
    gateway.expect_create_order().never();
    let body = json!({ "event_id": 404, "participant_id": "alice" });
    let (status, body) = post_request("/create-order", body, configure(store, gateway)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"], "Event #404 does not exist");
}

#[actix_web::test]
async fn create_order_when_the_gateway_is_down() {
    let _ = env_logger::try_init().ok();
    let store = store_with_event(50_000);
    let mut gateway = MockGateway::new();
    gateway.expect_create_order().returning(|_| Err(GatewayError::Unavailable("connection refused".into())));
    let body = json!({ "event_id": 7, "participant_id": "alice" });
    let (status, _) = post_request("/create-order", body, configure(store, gateway)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn create_order_for_a_free_event() {
    let _ = env_logger::try_init().ok();
    let store = store_with_event(0);
    let mut gateway = MockGateway::new();
    gateway.expect_create_order().never();
    let body = json!({ "event_id": 7, "participant_id": "alice" });
    let (status, _) = post_request("/create-order", body, configure(store, gateway)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn verified_payment_is_recorded() {
    let _ = env_logger::try_init().ok();
    let mut store = store_with_event(50_000);
    store
        .expect_record_contribution()
        .withf(|id, who, amount, payment| {
            *id == EventId(7) &&
                who.as_str() == "alice" &&
                *amount == Money::from(50_000) &&
                payment.payment_id == "pay_Jx1"
        })
        .times(1)
        .returning(|_, who, amount, _| {
            let mine = paid(who.as_str(), amount.value());
            Ok(RecordOutcome::new(RecordResult::Recorded(mine.clone()), vec![paid("bob", 50_000), mine]))
        });
    let (status, body) =
        post_request("/verify-payment", signed_payment(7, 50_000), configure(store, MockGateway::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!({ "success": true, "total_collection": 100000, "total_participants": 2 }));
}

#[actix_web::test]
async fn repeated_confirmation_is_still_a_success() {
    let _ = env_logger::try_init().ok();
    let mut store = store_with_event(50_000);
    store
        .expect_record_contribution()
        .returning(|_, who, amount, _| {
            let mine = paid(who.as_str(), amount.value());
            Ok(RecordOutcome::new(RecordResult::AlreadyRecorded(mine.clone()), vec![mine]))
        });
    let (status, body) =
        post_request("/verify-payment", signed_payment(7, 50_000), configure(store, MockGateway::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!({ "success": true, "total_collection": 50000, "total_participants": 1 }));
}

#[actix_web::test]
async fn payment_already_used_by_someone_else_is_a_conflict() {
    let _ = env_logger::try_init().ok();
    let mut store = store_with_event(50_000);
    store
        .expect_record_contribution()
        .times(1)
        .returning(|_, _, _, payment| Err(LedgerError::PaymentAlreadyClaimed(payment.payment_id.clone())));
    let mut payment = signed_payment(7, 50_000);
    payment["participant_id"] = json!("sock-puppet");
    let (status, body) = post_request("/verify-payment", payment, configure(store, MockGateway::new())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json(&body)["error"].as_str().unwrap().contains("pay_Jx1"));
}

#[actix_web::test]
async fn forged_signature_never_touches_the_ledger() {
    let _ = env_logger::try_init().ok();
    let mut store = MockFundingStore::new();
    store.expect_fetch_event().never();
    store.expect_record_contribution().never();
    let mut payment = signed_payment(7, 50_000);
    payment["razorpay_signature"] = json!("0".repeat(64));
    let (status, body) = post_request("/verify-payment", payment, configure(store, MockGateway::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().contains("signature"));
}

#[actix_web::test]
async fn tampered_payment_id_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut store = MockFundingStore::new();
    store.expect_record_contribution().never();
    let mut payment = signed_payment(7, 50_000);
    payment["razorpay_payment_id"] = json!("pay_Jx2");
    let (status, _) = post_request("/verify-payment", payment, configure(store, MockGateway::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn wrong_amount_is_unprocessable() {
    let _ = env_logger::try_init().ok();
    let mut store = store_with_event(50_000);
    store.expect_record_contribution().never();
    let (status, body) =
        post_request("/verify-payment", signed_payment(7, 5_000), configure(store, MockGateway::new())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json(&body)["error"].as_str().unwrap().contains("does not match"));
}

#[actix_web::test]
async fn malformed_body_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let mut store = MockFundingStore::new();
    store.expect_record_contribution().never();
    let payment = json!({ "razorpay_order_id": "order_Jx1", "event_id": "seven" });
    let (status, body) = post_request("/verify-payment", payment, configure(store, MockGateway::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].is_string());
}
