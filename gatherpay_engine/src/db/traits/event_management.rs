use thiserror::Error;

use crate::db_types::{Event, EventId, NewEvent, OrganizerId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventQueryError {
    #[error("Event {0} does not exist")]
    EventNotFound(EventId),
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

#[allow(async_fn_in_trait)]
pub trait EventManagement {
    /// Fetches the event, with its contributions attached.
    async fn fetch_event(&self, event_id: &EventId) -> Result<Option<Event>, EventQueryError>;

    /// Fetches all events, newest first.
    async fn fetch_events(&self) -> Result<Vec<Event>, EventQueryError>;

    /// Fetches every event the organizer owns, newest first.
    async fn fetch_events_for_organizer(&self, organizer: &OrganizerId) -> Result<Vec<Event>, EventQueryError>;

    /// Stores a new event. The fee may not be negative and the start time must be a valid `HH:MM`.
    async fn insert_event(&self, event: NewEvent) -> Result<Event, EventQueryError>;

    /// Sets the `cancelled` override on an event. Cancelling twice is harmless.
    async fn cancel_event(&self, event_id: &EventId) -> Result<Event, EventQueryError>;
}
