use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::{debug, trace, warn};
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db::{sqlite::SqliteDatabaseError, traits::RecordResult},
    db_types::{Contribution, EventId, Money, OrganizerId, ParticipantId, PaymentReference, PaymentStatus},
};

#[derive(Debug, Clone, FromRow)]
struct ContributionRow {
    event_id: i64,
    participant_id: String,
    amount: i64,
    payment_status: String,
    payment_date: DateTime<Utc>,
}

impl TryFrom<ContributionRow> for Contribution {
    type Error = SqliteDatabaseError;

    fn try_from(row: ContributionRow) -> Result<Self, Self::Error> {
        let payment_status = row
            .payment_status
            .parse::<PaymentStatus>()
            .map_err(|e| SqliteDatabaseError::ConversionError(e.to_string()))?;
        Ok(Contribution {
            participant: ParticipantId(row.participant_id),
            amount: Money::from(row.amount),
            payment_status,
            payment_date: row.payment_date,
        })
    }
}

const CONTRIBUTION_COLUMNS: &str = "event_id, participant_id, amount, payment_status, payment_date";

/// Appends a completed contribution unless the participant already has one for this event, or the payment already
/// backs another contribution.
///
/// The checks before the insert are only a fast path. Two callers can both pass them, in which case one of the partial
/// unique indexes, on `(event_id, participant_id)` or on `payment_id`, rejects the slower one. The loser is then
/// classified by the same checks against the winner's row.
pub async fn idempotent_insert(
    event_id: &EventId,
    participant: &ParticipantId,
    amount: Money,
    payment: &PaymentReference,
    conn: &mut SqliteConnection,
) -> Result<RecordResult, SqliteDatabaseError> {
    if let Some(existing) = fetch_completed(event_id, participant, conn).await? {
        trace!("🗃️ {participant} has already paid for event {event_id}");
        return Ok(RecordResult::AlreadyRecorded(existing));
    }
    if payment_is_claimed(payment, conn).await? {
        warn!("🗃️ Payment {payment} is already recorded. Not recording it for {participant} on event {event_id}");
        return Err(SqliteDatabaseError::PaymentAlreadyClaimed(payment.payment_id.clone()));
    }
    match insert_completed(event_id, participant, amount, payment, conn).await {
        Ok(contribution) => Ok(RecordResult::Recorded(contribution)),
        Err(SqliteDatabaseError::DriverError(sqlx::Error::Database(e))) if e.is_unique_violation() => {
            debug!("🗃️ Concurrent contribution by {participant} for event {event_id} lost the race");
            if let Some(winner) = fetch_completed(event_id, participant, conn).await? {
                return Ok(RecordResult::AlreadyRecorded(winner));
            }
            if payment_is_claimed(payment, conn).await? {
                return Err(SqliteDatabaseError::PaymentAlreadyClaimed(payment.payment_id.clone()));
            }
            Err(SqliteDatabaseError::QueryError("Contribution vanished after a unique violation".into()))
        },
        Err(SqliteDatabaseError::DriverError(sqlx::Error::Database(e))) if e.is_foreign_key_violation() => {
            Err(SqliteDatabaseError::EventNotFound(*event_id))
        },
        Err(e) => Err(e),
    }
}

/// Inserts a single completed contribution. A single statement, so it either lands in full or not at all.
async fn insert_completed(
    event_id: &EventId,
    participant: &ParticipantId,
    amount: Money,
    payment: &PaymentReference,
    conn: &mut SqliteConnection,
) -> Result<Contribution, SqliteDatabaseError> {
    let rows: Vec<ContributionRow> = sqlx::query_as(&format!(
        r#"
            INSERT INTO contributions (
                event_id, participant_id, amount, payment_status, payment_date, order_id, payment_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {CONTRIBUTION_COLUMNS};
        "#
    ))
    .bind(event_id.value())
    .bind(participant.as_str())
    .bind(amount.value())
    .bind(PaymentStatus::Completed.to_string())
    .bind(Utc::now())
    .bind(payment.order_id.as_str())
    .bind(payment.payment_id.as_str())
    .fetch_all(conn)
    .await?;
    let row = rows.into_iter().next().ok_or_else(|| SqliteDatabaseError::QueryError("Insert returned no row".into()))?;
    debug!("🗃️ Contribution of {amount} by {participant} recorded for event {event_id} (payment {payment})");
    Contribution::try_from(row)
}

pub async fn fetch_completed(
    event_id: &EventId,
    participant: &ParticipantId,
    conn: &mut SqliteConnection,
) -> Result<Option<Contribution>, SqliteDatabaseError> {
    let rows: Vec<ContributionRow> = sqlx::query_as(&format!(
        "SELECT {CONTRIBUTION_COLUMNS} FROM contributions WHERE event_id = ? AND participant_id = ? AND payment_status \
         = 'completed'"
    ))
    .bind(event_id.value())
    .bind(participant.as_str())
    .fetch_all(conn)
    .await?;
    rows.into_iter().next().map(Contribution::try_from).transpose()
}

/// Whether the gateway payment already backs a completed contribution, for any event or participant.
pub async fn payment_is_claimed(
    payment: &PaymentReference,
    conn: &mut SqliteConnection,
) -> Result<bool, SqliteDatabaseError> {
    let ids: Vec<i64> =
        sqlx::query_scalar("SELECT id FROM contributions WHERE payment_id = ? AND payment_status = 'completed'")
            .bind(payment.payment_id.as_str())
            .fetch_all(conn)
            .await?;
    Ok(!ids.is_empty())
}

/// All contributions for the event, in the order they were appended.
pub async fn fetch_contributions(
    event_id: &EventId,
    conn: &mut SqliteConnection,
) -> Result<Vec<Contribution>, SqliteDatabaseError> {
    let rows: Vec<ContributionRow> =
        sqlx::query_as(&format!("SELECT {CONTRIBUTION_COLUMNS} FROM contributions WHERE event_id = ? ORDER BY id"))
            .bind(event_id.value())
            .fetch_all(conn)
            .await?;
    rows.into_iter().map(Contribution::try_from).collect()
}

/// Contributions grouped by event. If `organizer` is given, only contributions to that organizer's events are
/// returned.
pub async fn fetch_contributions_for_organizer(
    organizer: Option<&OrganizerId>,
    conn: &mut SqliteConnection,
) -> Result<HashMap<EventId, Vec<Contribution>>, SqliteDatabaseError> {
    let rows: Vec<ContributionRow> = match organizer {
        Some(org) => {
            sqlx::query_as(&format!(
                "SELECT {CONTRIBUTION_COLUMNS} FROM contributions WHERE event_id IN (SELECT id FROM events WHERE \
                 organizer_id = ?) ORDER BY id"
            ))
            .bind(&org.0)
            .fetch_all(conn)
            .await?
        },
        None => {
            sqlx::query_as(&format!("SELECT {CONTRIBUTION_COLUMNS} FROM contributions ORDER BY id"))
                .fetch_all(conn)
                .await?
        },
    };
    let mut result = HashMap::<EventId, Vec<Contribution>>::new();
    for row in rows {
        let event_id = EventId(row.event_id);
        result.entry(event_id).or_default().push(Contribution::try_from(row)?);
    }
    Ok(result)
}
