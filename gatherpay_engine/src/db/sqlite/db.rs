use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{contributions, db_url, events, new_pool, SqliteDatabaseError};
use crate::{
    db::traits::{ContributionLedger, EventManagement, EventQueryError, LedgerError, RecordOutcome},
    db_types::{Contribution, Event, EventId, Money, NewEvent, OrganizerId, ParticipantId, PaymentReference},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl ContributionLedger for SqliteDatabase {
    /// Validates the amount against the event, performs an idempotent insert and reads back the event's ledger.
    ///
    /// No transaction is held across the fee lookup and the insert. The insert is a single statement guarded by the
    /// partial unique indexes, so holding a write lock around it would only add contention. The ledger is read on the
    /// same connection after the insert has committed, so it always contains the new row.
    async fn record_contribution(
        &self,
        event_id: &EventId,
        participant: &ParticipantId,
        amount: Money,
        payment: &PaymentReference,
    ) -> Result<RecordOutcome, LedgerError> {
        if !amount.is_positive() {
            return Err(SqliteDatabaseError::InvalidAmount(amount).into());
        }
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let fee = events::fetch_fee(event_id, &mut conn).await?.ok_or(SqliteDatabaseError::EventNotFound(*event_id))?;
        if fee != amount {
            warn!("🗃️ {participant} tried to record {amount} against event {event_id}, but the fee is {fee}");
            return Err(SqliteDatabaseError::AmountMismatch { expected: fee, claimed: amount }.into());
        }
        let result = contributions::idempotent_insert(event_id, participant, amount, payment, &mut conn).await?;
        let ledger = contributions::fetch_contributions(event_id, &mut conn).await?;
        Ok(RecordOutcome::new(result, ledger))
    }

    async fn fetch_contributions(&self, event_id: &EventId) -> Result<Vec<Contribution>, LedgerError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let result = contributions::fetch_contributions(event_id, &mut conn).await?;
        Ok(result)
    }
}

impl EventManagement for SqliteDatabase {
    async fn fetch_event(&self, event_id: &EventId) -> Result<Option<Event>, EventQueryError> {
        // A read transaction gives a consistent snapshot of the event and its ledger
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let event = events::fetch_event(event_id, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(event)
    }

    async fn fetch_events(&self) -> Result<Vec<Event>, EventQueryError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let events = events::fetch_events(None, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(events)
    }

    async fn fetch_events_for_organizer(&self, organizer: &OrganizerId) -> Result<Vec<Event>, EventQueryError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let events = events::fetch_events(Some(organizer), &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        trace!("🗃️ Organizer {organizer} has {} events", events.len());
        Ok(events)
    }

    async fn insert_event(&self, event: NewEvent) -> Result<Event, EventQueryError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let event = events::insert_event(event, &mut conn).await?;
        Ok(event)
    }

    async fn cancel_event(&self, event_id: &EventId) -> Result<Event, EventQueryError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let event = events::cancel_event(event_id, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(event)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using `GP_DATABASE_URL` or the default location.
    pub async fn new() -> Result<Self, SqliteDatabaseError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), 25).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Safe to call on every startup.
    pub async fn run_migrations(&self) -> Result<(), SqliteDatabaseError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
