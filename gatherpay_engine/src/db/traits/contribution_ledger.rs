use thiserror::Error;

use crate::{
    db_types::{Contribution, EventId, Money, ParticipantId, PaymentReference},
    helpers::{aggregate, Aggregates},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordResult {
    /// A new completed contribution was appended.
    Recorded(Contribution),
    /// The participant had already paid for this event. The existing contribution is returned and nothing changed.
    AlreadyRecorded(Contribution),
}

impl RecordResult {
    pub fn contribution(&self) -> &Contribution {
        match self {
            RecordResult::Recorded(c) | RecordResult::AlreadyRecorded(c) => c,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, RecordResult::Recorded(_))
    }
}

/// What [`ContributionLedger::record_contribution`] did, plus the event's ledger as it stood right after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub result: RecordResult,
    /// Every contribution for the event, read on the connection that made the write. It always includes
    /// `result.contribution()`.
    pub ledger: Vec<Contribution>,
}

impl RecordOutcome {
    pub fn new(result: RecordResult, ledger: Vec<Contribution>) -> Self {
        Self { result, ledger }
    }

    pub fn is_new(&self) -> bool {
        self.result.is_new()
    }

    pub fn contribution(&self) -> &Contribution {
        self.result.contribution()
    }

    pub fn totals(&self) -> Aggregates {
        aggregate(&self.ledger)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Event {0} does not exist")]
    EventNotFound(EventId),
    #[error("Contribution amounts must be positive. Got {0}")]
    InvalidAmount(Money),
    #[error("The contribution of {claimed} does not match the event fee of {expected}")]
    AmountMismatch { expected: Money, claimed: Money },
    #[error("Payment {0} has already been recorded for a different contribution")]
    PaymentAlreadyClaimed(String),
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

/// The append-only record of payments made against events.
#[allow(async_fn_in_trait)]
pub trait ContributionLedger {
    /// Records a completed contribution of `amount` by `participant` for the given event, backed by the gateway
    /// payment `payment`.
    ///
    /// * The event must exist, else [`LedgerError::EventNotFound`].
    /// * `amount` must be positive, else [`LedgerError::InvalidAmount`].
    /// * `amount` must equal the event's fee, else [`LedgerError::AmountMismatch`].
    /// * If the participant already has a completed contribution for the event, nothing is written and
    ///   [`RecordResult::AlreadyRecorded`] is returned. This is a success, not an error.
    /// * Otherwise, if `payment` already backs a completed contribution, nothing is written and
    ///   [`LedgerError::PaymentAlreadyClaimed`] is returned. One gateway payment is never counted twice.
    ///
    /// Implementations must make the insert atomic. Two concurrent calls for the same pair, or for the same payment,
    /// can never both append. The returned ledger must reflect the write.
    async fn record_contribution(
        &self,
        event_id: &EventId,
        participant: &ParticipantId,
        amount: Money,
        payment: &PaymentReference,
    ) -> Result<RecordOutcome, LedgerError>;

    /// All contributions for the event, in the order they were appended.
    async fn fetch_contributions(&self, event_id: &EventId) -> Result<Vec<Contribution>, LedgerError>;
}
