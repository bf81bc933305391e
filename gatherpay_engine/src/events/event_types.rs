use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Contribution, EventId},
    helpers::Aggregates,
};

/// Published once for every contribution that is newly appended to the ledger. Redelivered callbacks that hit an
/// existing contribution do not publish anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRecordedEvent {
    pub event_id: EventId,
    pub contribution: Contribution,
    /// The event's totals straight after this contribution landed.
    pub totals: Aggregates,
}

impl ContributionRecordedEvent {
    pub fn new(event_id: EventId, contribution: Contribution, totals: Aggregates) -> Self {
        Self { event_id, contribution, totals }
    }
}
