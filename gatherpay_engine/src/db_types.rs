use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
pub use gp_common::Money;
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

//--------------------------------------        EventId        ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl From<i64> for EventId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for EventId {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self).map_err(|e| ConversionError(format!("Invalid event id '{s}'. {e}")))
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl EventId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

//--------------------------------------     ParticipantId     ---------------------------------------------------------
/// An opaque, stable identifier for the user paying for an event. Issued by the (external) user directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl<S: Into<String>> From<S> for ParticipantId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ParticipantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------      OrganizerId      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrganizerId(pub String);

impl<S: Into<String>> From<S> for OrganizerId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl Display for OrganizerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizer {
    pub id: OrganizerId,
    pub name: String,
}

//--------------------------------------      EventStatus      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// The event is scheduled for later than the current activity window.
    #[default]
    Upcoming,
    /// The event is inside its activity window today.
    Ongoing,
    /// The event's activity window has passed.
    Completed,
    /// Manually cancelled. This overrides the schedule.
    Cancelled,
}

impl EventStatus {
    /// Sort rank used by event listings: ongoing events first, cancelled ones last.
    pub fn rank(&self) -> u8 {
        match self {
            EventStatus::Ongoing => 1,
            EventStatus::Upcoming => 2,
            EventStatus::Completed => 3,
            EventStatus::Cancelled => 4,
        }
    }
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Upcoming => write!(f, "upcoming"),
            EventStatus::Ongoing => write!(f, "ongoing"),
            EventStatus::Completed => write!(f, "completed"),
            EventStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for EventStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid event status: {s}"))),
        }
    }
}

impl From<String> for EventStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid event status: {value}. But this conversion cannot fail. Defaulting to upcoming");
            EventStatus::Upcoming
        })
    }
}

//--------------------------------------     PaymentStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

//--------------------------------------     Contribution      ---------------------------------------------------------
/// The gateway's identifiers for one captured payment. A payment backs at most one completed contribution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentReference {
    pub order_id: String,
    pub payment_id: String,
}

impl PaymentReference {
    pub fn new<S: Into<String>>(order_id: S, payment_id: S) -> Self {
        Self { order_id: order_id.into(), payment_id: payment_id.into() }
    }
}

impl Display for PaymentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.order_id, self.payment_id)
    }
}

/// One payment result for an event. Contributions are immutable once they are in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub participant: ParticipantId,
    pub amount: Money,
    pub payment_status: PaymentStatus,
    pub payment_date: DateTime<Utc>,
}

impl Contribution {
    pub fn is_completed(&self) -> bool {
        self.payment_status == PaymentStatus::Completed
    }
}

//--------------------------------------         Event         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub date: NaiveDate,
    /// Local start time as `HH:MM`. Kept as stored, and only interpreted when the status is derived.
    pub time: String,
    /// The fee every participant pays.
    pub fee: Money,
    pub organizer: Organizer,
    /// The persisted status. Only a `Cancelled` value carries meaning; everything else is a stale cache and the
    /// current status is always derived from the schedule.
    #[serde(skip)]
    pub stored_status: EventStatus,
    pub contributions: Vec<Contribution>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// The manual override on this event, if there is one.
    pub fn status_override(&self) -> Option<EventStatus> {
        (self.stored_status == EventStatus::Cancelled).then_some(EventStatus::Cancelled)
    }

    pub fn completed_contribution_for(&self, participant: &ParticipantId) -> Option<&Contribution> {
        self.contributions.iter().find(|c| c.is_completed() && &c.participant == participant)
    }
}

//--------------------------------------        NewEvent       ---------------------------------------------------------
/// An event as handed over by the (external) event creation flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    pub date: NaiveDate,
    pub time: String,
    pub fee: Money,
    pub organizer: Organizer,
}

impl NewEvent {
    pub fn new<S: Into<String>>(title: S, date: NaiveDate, time: S, fee: Money, organizer: Organizer) -> Self {
        Self {
            title: title.into(),
            description: String::default(),
            location: String::default(),
            category: String::default(),
            date,
            time: time.into(),
            fee,
            organizer,
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_location<S: Into<String>>(mut self, location: S) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_category<S: Into<String>>(mut self, category: S) -> Self {
        self.category = category.into();
        self
    }
}
