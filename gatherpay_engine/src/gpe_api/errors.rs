use thiserror::Error;

use crate::{
    db::traits::{EventQueryError, LedgerError},
    db_types::{EventId, Money},
    helpers::ScheduleError,
};

/// Everything that can go wrong in the funding flows. A participant paying twice is not on this list; duplicates are
/// successes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FundingError {
    #[error("Event {0} does not exist")]
    EventNotFound(EventId),
    #[error("The payment signature is invalid. {0}")]
    SignatureInvalid(String),
    #[error("The amount of {claimed} does not match the event fee of {expected}")]
    AmountMismatch { expected: Money, claimed: Money },
    #[error("The payment gateway is unavailable. {0}")]
    GatewayUnavailable(String),
    #[error("The event schedule is invalid. {0}")]
    InvalidSchedule(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(Money),
    #[error("Payment {0} has already been recorded for a different contribution")]
    PaymentAlreadyClaimed(String),
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

impl From<LedgerError> for FundingError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::EventNotFound(id) => FundingError::EventNotFound(id),
            LedgerError::InvalidAmount(amount) => FundingError::InvalidAmount(amount),
            LedgerError::AmountMismatch { expected, claimed } => FundingError::AmountMismatch { expected, claimed },
            LedgerError::PaymentAlreadyClaimed(payment_id) => FundingError::PaymentAlreadyClaimed(payment_id),
            LedgerError::DatabaseError(msg) => FundingError::DatabaseError(msg),
        }
    }
}

impl From<EventQueryError> for FundingError {
    fn from(e: EventQueryError) -> Self {
        match e {
            EventQueryError::EventNotFound(id) => FundingError::EventNotFound(id),
            EventQueryError::InvalidEvent(msg) => FundingError::InvalidEvent(msg),
            EventQueryError::DatabaseError(msg) => FundingError::DatabaseError(msg),
        }
    }
}

impl From<ScheduleError> for FundingError {
    fn from(e: ScheduleError) -> Self {
        FundingError::InvalidSchedule(e.to_string())
    }
}
