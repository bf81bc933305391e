use chrono::{DateTime, Utc};
use cucumber::World;
use gatherpay_engine::{
    db_types::EventId,
    funding_objects::{OrderHandle, VerificationResult},
    helpers::parse_utc_offset,
    EventsApi,
    FundingError,
    FundingFlowApi,
    SqliteDatabase,
};
use log::*;

use crate::support::{setup, verifier, FakeGateway};

#[derive(Default, Debug, World)]
pub struct FundingWorld {
    pub system: Option<FundingSystem>,
    pub event_id: Option<EventId>,
    pub last_order: Option<OrderHandle>,
    pub last_result: Option<Result<VerificationResult, FundingError>>,
    /// When set, status checks use this instant instead of the wall clock
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct FundingSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub funding: FundingFlowApi<SqliteDatabase, FakeGateway>,
    pub events: EventsApi<SqliteDatabase>,
}

impl FundingWorld {
    pub fn system(&self) -> &FundingSystem {
        self.system.as_ref().expect("System not initialised")
    }

    pub fn event_id(&self) -> EventId {
        self.event_id.expect("No event has been created")
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

impl FundingSystem {
    pub async fn new() -> Self {
        let db = setup().await;
        let db_path = db.url().to_string();
        debug!("🚀️ Created database: {db_path}");
        let funding = FundingFlowApi::new(db.clone(), FakeGateway::default(), verifier());
        let tz = parse_utc_offset("+05:30").expect("Valid offset");
        let events = EventsApi::new(db.clone(), tz);
        Self { db_path, db, funding, events }
    }
}
