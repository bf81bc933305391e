use thiserror::Error;

use crate::{
    db::traits::{EventQueryError, LedgerError},
    db_types::{EventId, Money},
};

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Database query error: {0}")]
    QueryError(String),
    #[error("Could not convert stored value: {0}")]
    ConversionError(String),
    #[error("Event {0} does not exist")]
    EventNotFound(EventId),
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
    #[error("Contribution amounts must be positive. Got {0}")]
    InvalidAmount(Money),
    #[error("The contribution of {claimed} does not match the event fee of {expected}")]
    AmountMismatch { expected: Money, claimed: Money },
    #[error("Payment {0} has already been recorded for a different contribution")]
    PaymentAlreadyClaimed(String),
}

impl From<SqliteDatabaseError> for LedgerError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::EventNotFound(id) => LedgerError::EventNotFound(id),
            SqliteDatabaseError::InvalidAmount(amount) => LedgerError::InvalidAmount(amount),
            SqliteDatabaseError::AmountMismatch { expected, claimed } => {
                LedgerError::AmountMismatch { expected, claimed }
            },
            SqliteDatabaseError::PaymentAlreadyClaimed(payment_id) => LedgerError::PaymentAlreadyClaimed(payment_id),
            e => LedgerError::DatabaseError(e.to_string()),
        }
    }
}

impl From<SqliteDatabaseError> for EventQueryError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::EventNotFound(id) => EventQueryError::EventNotFound(id),
            SqliteDatabaseError::InvalidEvent(msg) => EventQueryError::InvalidEvent(msg),
            e => EventQueryError::DatabaseError(e.to_string()),
        }
    }
}
