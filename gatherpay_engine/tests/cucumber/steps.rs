use chrono::{Duration, NaiveDate, TimeZone};
use cucumber::{given, then, when};
use gatherpay_engine::{
    db_types::{EventStatus, Money, ParticipantId},
    helpers::{parse_utc_offset, PaymentCallback},
    traits::{ContributionLedger, EventManagement},
    FundingError,
};

use crate::{
    cucumber::{world::FundingSystem, FundingWorld},
    support::{new_event, signed_callback},
};

/// Feature files talk in rupees. The ledger counts paise.
fn money(rupees: i64) -> Money {
    Money::from(rupees * 100)
}

#[given("a fresh install")]
async fn fresh_database(world: &mut FundingWorld) {
    world.system = Some(FundingSystem::new().await);
}

#[given(expr = "an event with a fee of {int}")]
async fn event_with_fee(world: &mut FundingWorld, fee: i64) {
    let date = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
    let event = new_event("Fundraiser", "org-1", money(fee), date, "18:30");
    let event = world.system().db.insert_event(event).await.expect("Error inserting event");
    world.event_id = Some(event.id);
}

#[given(expr = "an event on {string} at {string}")]
async fn event_on(world: &mut FundingWorld, date: String, time: String) {
    let date = date.parse::<NaiveDate>().expect("Dates look like 2024-03-15");
    let event = new_event("Scheduled", "org-1", money(100), date, time.as_str());
    let event = world.system().db.insert_event(event).await.expect("Error inserting event");
    world.event_id = Some(event.id);
}

#[given(expr = "the local time is {string} on {string}")]
async fn local_time(world: &mut FundingWorld, time: String, date: String) {
    let tz = parse_utc_offset("+05:30").unwrap();
    let local = format!("{date} {time}");
    let naive = chrono::NaiveDateTime::parse_from_str(&local, "%Y-%m-%d %H:%M").expect("Bad local time");
    world.now = Some(tz.from_local_datetime(&naive).unwrap().with_timezone(&chrono::Utc));
}

#[given(expr = "{int} hours pass")]
async fn time_passes(world: &mut FundingWorld, hours: i64) {
    let now = world.now();
    world.now = Some(now + Duration::hours(hours));
}

#[when(expr = "participant {word} requests an order")]
async fn request_order(world: &mut FundingWorld, participant: String) {
    let id = world.event_id();
    let order = world.system().funding.create_order(&id, &ParticipantId::from(participant)).await;
    world.last_order = Some(order.expect("Order creation failed"));
}

#[when(expr = "participant {word} pays {int} with payment {word}")]
async fn pay(world: &mut FundingWorld, participant: String, amount: i64, payment_id: String) {
    let callback = signed_callback("order_fake000000", &payment_id);
    submit(world, callback, participant, amount).await;
}

#[when(expr = "participant {word} redelivers payment {word}")]
async fn redeliver(world: &mut FundingWorld, participant: String, payment_id: String) {
    let id = world.event_id();
    let fee = world.system().db.fetch_event(&id).await.unwrap().expect("Event exists").fee;
    let callback = signed_callback("order_fake000000", &payment_id);
    submit(world, callback, participant, fee.value() / 100).await;
}

#[when(expr = "participant {word} submits a forged payment of {int}")]
async fn forged(world: &mut FundingWorld, participant: String, amount: i64) {
    let mut callback = signed_callback("order_fake000000", "pay_forged");
    // Flip the last character of an otherwise well-formed signature
    let last = if callback.signature.ends_with('0') { '1' } else { '0' };
    callback.signature.pop();
    callback.signature.push(last);
    submit(world, callback, participant, amount).await;
}

async fn submit(world: &mut FundingWorld, callback: PaymentCallback, participant: String, amount: i64) {
    let id = world.event_id();
    let participant = ParticipantId::from(participant);
    let result = world.system().funding.verify_and_record(&callback, &id, &participant, money(amount)).await;
    world.last_result = Some(result);
}

#[when("the event is cancelled")]
async fn cancel(world: &mut FundingWorld) {
    let id = world.event_id();
    world.system().db.cancel_event(&id).await.expect("Error cancelling event");
}

#[then(expr = "the order is for {int} in the smallest currency unit")]
async fn check_order(world: &mut FundingWorld, amount: i64) {
    let order = world.last_order.as_ref().expect("No order was created");
    assert_eq!(order.amount, Money::from(amount));
    assert_eq!(order.currency, "INR");
}

#[then("the payment succeeds")]
async fn payment_succeeds(world: &mut FundingWorld) {
    match world.last_result.as_ref().expect("Nothing was submitted") {
        Ok(result) => assert!(result.success),
        Err(e) => panic!("Payment failed: {e}"),
    }
}

#[then("the payment fails with an amount mismatch")]
async fn amount_mismatch(world: &mut FundingWorld) {
    let result = world.last_result.as_ref().expect("Nothing was submitted");
    assert!(matches!(result, Err(FundingError::AmountMismatch { .. })), "{result:?}");
}

#[then("the payment fails with an invalid signature")]
async fn invalid_signature(world: &mut FundingWorld) {
    let result = world.last_result.as_ref().expect("Nothing was submitted");
    assert!(matches!(result, Err(FundingError::SignatureInvalid(_))), "{result:?}");
}

#[then("the payment fails because the payment is already recorded")]
async fn payment_already_claimed(world: &mut FundingWorld) {
    let result = world.last_result.as_ref().expect("Nothing was submitted");
    assert!(matches!(result, Err(FundingError::PaymentAlreadyClaimed(_))), "{result:?}");
}

#[then(expr = "the payment reports {int} participant(s) and a collection of {int}")]
async fn check_reported_totals(world: &mut FundingWorld, participants: u64, collection: i64) {
    let result = world.last_result.as_ref().expect("Nothing was submitted");
    let totals = result.as_ref().expect("The payment failed").totals;
    assert_eq!(totals.total_participants, participants);
    assert_eq!(totals.total_collection, money(collection));
}

#[then(expr = "the event has {int} participant(s) and a collection of {int}")]
async fn check_totals(world: &mut FundingWorld, participants: u64, collection: i64) {
    let id = world.event_id();
    let now = world.now();
    let summary = world.system().events.event_by_id(&id, now).await.expect("Error fetching event");
    assert_eq!(summary.totals.total_participants, participants);
    assert_eq!(summary.totals.total_collection, money(collection));
}

#[then(expr = "the ledger holds {int} contribution(s)")]
async fn check_ledger(world: &mut FundingWorld, count: usize) {
    let id = world.event_id();
    let ledger = world.system().db.fetch_contributions(&id).await.expect("Error fetching ledger");
    assert_eq!(ledger.len(), count);
}

#[then(expr = "the event is {word}")]
async fn check_status(world: &mut FundingWorld, status: String) {
    let expected = status.parse::<EventStatus>().expect("Unknown status");
    let id = world.event_id();
    let now = world.now();
    let summary = world.system().events.event_by_id(&id, now).await.expect("Error fetching event");
    assert_eq!(summary.status, expected);
}
