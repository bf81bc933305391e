use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Event, EventStatus, Money},
    helpers::Aggregates,
};

/// What the client needs to open checkout for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHandle {
    pub order_id: String,
    /// In the currency's smallest unit.
    pub amount: Money,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub success: bool,
    #[serde(flatten)]
    pub totals: Aggregates,
}

/// An event as presented to readers: the stored event, its derived status and its collection totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    #[serde(flatten)]
    pub event: Event,
    pub status: EventStatus,
    #[serde(flatten)]
    pub totals: Aggregates,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizerEvents {
    /// Grand totals over all of the organizer's events.
    #[serde(flatten)]
    pub totals: Aggregates,
    pub events: Vec<EventSummary>,
}
