use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, trace};
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db::sqlite::{contributions, SqliteDatabaseError},
    db_types::{Contribution, Event, EventId, EventStatus, Money, NewEvent, Organizer, OrganizerId},
    helpers::parse_scheduled_time,
};

#[derive(Debug, Clone, FromRow)]
struct EventRow {
    id: i64,
    title: String,
    description: String,
    location: String,
    category: String,
    date: NaiveDate,
    time: String,
    fee: i64,
    organizer_id: String,
    organizer_name: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EventRow {
    fn into_event(self, contributions: Vec<Contribution>) -> Event {
        Event {
            id: EventId(self.id),
            title: self.title,
            description: self.description,
            location: self.location,
            category: self.category,
            date: self.date,
            time: self.time,
            fee: Money::from(self.fee),
            organizer: Organizer { id: OrganizerId(self.organizer_id), name: self.organizer_name },
            stored_status: EventStatus::from(self.status),
            contributions,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const EVENT_COLUMNS: &str = "id, title, description, location, category, date, time, fee, organizer_id, \
                             organizer_name, status, created_at, updated_at";

fn validate(event: &NewEvent) -> Result<(), SqliteDatabaseError> {
    if event.title.trim().is_empty() {
        return Err(SqliteDatabaseError::InvalidEvent("An event needs a title".to_string()));
    }
    if event.fee.is_negative() {
        return Err(SqliteDatabaseError::InvalidEvent(format!("The fee cannot be negative. Got {}", event.fee)));
    }
    parse_scheduled_time(&event.time).map_err(|e| SqliteDatabaseError::InvalidEvent(e.to_string()))?;
    Ok(())
}

pub async fn insert_event(event: NewEvent, conn: &mut SqliteConnection) -> Result<Event, SqliteDatabaseError> {
    validate(&event)?;
    let now = Utc::now();
    let rows: Vec<EventRow> = sqlx::query_as(&format!(
        r#"
            INSERT INTO events (
                title, description, location, category, date, time, fee,
                organizer_id, organizer_name, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {EVENT_COLUMNS};
        "#
    ))
    .bind(&event.title)
    .bind(&event.description)
    .bind(&event.location)
    .bind(&event.category)
    .bind(event.date)
    .bind(&event.time)
    .bind(event.fee.value())
    .bind(&event.organizer.id.0)
    .bind(&event.organizer.name)
    .bind(EventStatus::Upcoming.to_string())
    .bind(now)
    .bind(now)
    .fetch_all(conn)
    .await?;
    let row = rows.into_iter().next().ok_or_else(|| SqliteDatabaseError::QueryError("Insert returned no row".into()))?;
    debug!("🗃️ Event {} '{}' saved for organizer {}", row.id, row.title, row.organizer_id);
    Ok(row.into_event(Vec::new()))
}

pub async fn fetch_event(
    event_id: &EventId,
    conn: &mut SqliteConnection,
) -> Result<Option<Event>, SqliteDatabaseError> {
    let rows: Vec<EventRow> = sqlx::query_as(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"))
        .bind(event_id.value())
        .fetch_all(&mut *conn)
        .await?;
    match rows.into_iter().next() {
        Some(row) => {
            let contributions = contributions::fetch_contributions(event_id, conn).await?;
            Ok(Some(row.into_event(contributions)))
        },
        None => Ok(None),
    }
}

/// The fee of the event, or `None` if there is no such event.
pub async fn fetch_fee(event_id: &EventId, conn: &mut SqliteConnection) -> Result<Option<Money>, SqliteDatabaseError> {
    let fees: Vec<i64> =
        sqlx::query_scalar("SELECT fee FROM events WHERE id = ?").bind(event_id.value()).fetch_all(conn).await?;
    Ok(fees.into_iter().next().map(Money::from))
}

/// Fetches events, newest first, with their contributions. If `organizer` is given, only that organizer's events are
/// returned.
pub async fn fetch_events(
    organizer: Option<&OrganizerId>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Event>, SqliteDatabaseError> {
    let rows: Vec<EventRow> = match organizer {
        Some(org) => {
            sqlx::query_as(&format!(
                "SELECT {EVENT_COLUMNS} FROM events WHERE organizer_id = ? ORDER BY created_at DESC, id DESC"
            ))
            .bind(&org.0)
            .fetch_all(&mut *conn)
            .await?
        },
        None => {
            sqlx::query_as(&format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC, id DESC"))
                .fetch_all(&mut *conn)
                .await?
        },
    };
    trace!("🗃️ Fetched {} events", rows.len());
    let mut ledger: HashMap<EventId, Vec<Contribution>> =
        contributions::fetch_contributions_for_organizer(organizer, conn).await?;
    let events = rows
        .into_iter()
        .map(|row| {
            let contributions = ledger.remove(&EventId(row.id)).unwrap_or_default();
            row.into_event(contributions)
        })
        .collect();
    Ok(events)
}

pub async fn cancel_event(event_id: &EventId, conn: &mut SqliteConnection) -> Result<Event, SqliteDatabaseError> {
    let result = sqlx::query("UPDATE events SET status = ?, updated_at = ? WHERE id = ?")
        .bind(EventStatus::Cancelled.to_string())
        .bind(Utc::now())
        .bind(event_id.value())
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(SqliteDatabaseError::EventNotFound(*event_id));
    }
    debug!("🗃️ Event {event_id} has been cancelled");
    fetch_event(event_id, conn).await?.ok_or(SqliteDatabaseError::EventNotFound(*event_id))
}
