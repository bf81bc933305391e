use actix_web::{http::StatusCode, web, web::ServiceConfig};
use gatherpay_engine::{
    db_types::{EventStatus, OrganizerId},
    helpers::parse_utc_offset,
    traits::EventQueryError,
    EventsApi,
};
use serde_json::json;

use super::{
    helpers::{event, get_request, json, paid},
    mocks::MockFundingStore,
};
use crate::routes::{EventByIdRoute, EventsRoute, OrganizerEventsRoute};

fn configure(store: MockFundingStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = EventsApi::new(store, parse_utc_offset("+05:30").unwrap());
        cfg.service(EventsRoute::<MockFundingStore>::new())
            .service(EventByIdRoute::<MockFundingStore>::new())
            .service(OrganizerEventsRoute::<MockFundingStore>::new())
            .app_data(web::Data::new(api));
    }
}

#[actix_web::test]
async fn list_events_puts_cancelled_events_last() {
    let _ = env_logger::try_init().ok();
    let mut store = MockFundingStore::new();
    store.expect_fetch_events().returning(|| {
        let mut cancelled = event(1, "org-1", 10_000);
        cancelled.stored_status = EventStatus::Cancelled;
        let mut busy = event(2, "org-2", 10_000);
        busy.contributions = vec![paid("alice", 10_000), paid("bob", 10_000)];
        Ok(vec![cancelled, busy])
    });
    let (status, body) = get_request("/events", configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    let events = json(&body);
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["id"], 2);
    assert_eq!(events[0]["status"], "upcoming");
    assert_eq!(events[0]["total_collection"], 20_000);
    assert_eq!(events[0]["total_participants"], 2);
    assert_eq!(events[1]["id"], 1);
    assert_eq!(events[1]["status"], "cancelled");
    assert_eq!(events[1]["total_participants"], 0);
}

#[actix_web::test]
async fn event_detail() {
    let _ = env_logger::try_init().ok();
    let mut store = MockFundingStore::new();
    store.expect_fetch_event().returning(|id| {
        let mut ev = event(id.value(), "org-1", 25_000);
        ev.contributions = vec![paid("alice", 25_000)];
        Ok(Some(ev))
    });
    let (status, body) = get_request("/event/3", configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    let ev = json(&body);
    assert_eq!(ev["id"], 3);
    assert_eq!(ev["title"], "Event 3");
    assert_eq!(ev["fee"], 25_000);
    assert_eq!(ev["status"], "upcoming");
    assert_eq!(ev["total_collection"], 25_000);
    assert_eq!(ev["contributions"][0]["participant"], "alice");
}

#[actix_web::test]
async fn event_detail_errors() {
    let _ = env_logger::try_init().ok();
    let mut store = MockFundingStore::new();
    store.expect_fetch_event().returning(|_| Ok(None));
    let (status, body) = get_request("/event/99", configure(store)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body), json!({ "error": "Event #99 does not exist" }));

    let mut store = MockFundingStore::new();
    store.expect_fetch_event().never();
    let (status, _) = get_request("/event/ninety-nine", configure(store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut store = MockFundingStore::new();
    store.expect_fetch_event().returning(|_| Err(EventQueryError::DatabaseError("database is locked".into())));
    let (status, body) = get_request("/event/1", configure(store)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("locked"));
}

#[actix_web::test]
async fn organizer_dashboard_totals() {
    let _ = env_logger::try_init().ok();
    let mut store = MockFundingStore::new();
    store
        .expect_fetch_events_for_organizer()
        .withf(|organizer| *organizer == OrganizerId::from("org-7"))
        .returning(|_| {
            let mut first = event(1, "org-7", 10_000);
            first.contributions = vec![paid("alice", 10_000)];
            let mut second = event(2, "org-7", 30_000);
            second.contributions = vec![paid("bob", 30_000), paid("carol", 30_000)];
            Ok(vec![first, second])
        });
    let (status, body) = get_request("/organizer/org-7/events", configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    let dashboard = json(&body);
    assert_eq!(dashboard["total_collection"], 70_000);
    assert_eq!(dashboard["total_participants"], 3);
    assert_eq!(dashboard["events"].as_array().unwrap().len(), 2);
}
