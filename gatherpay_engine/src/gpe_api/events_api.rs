use std::{cmp::Ordering, fmt::Debug};

use chrono::{DateTime, FixedOffset, Utc};
use log::*;

use crate::{
    db::traits::EventManagement,
    db_types::{Event, EventId, NewEvent, OrganizerId},
    gpe_api::{
        errors::FundingError,
        funding_objects::{EventSummary, OrganizerEvents},
    },
    helpers::{aggregate, derive_status},
};

/// Read access to events. Every event handed out carries its derived status and its totals, both computed from the
/// schedule and the ledger at the moment of the call.
pub struct EventsApi<B> {
    db: B,
    tz: FixedOffset,
}

impl<B> Debug for EventsApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventsApi ({})", self.tz)
    }
}

impl<B> EventsApi<B> {
    /// `tz` is the fixed offset event dates and times are expressed in.
    pub fn new(db: B, tz: FixedOffset) -> Self {
        Self { db, tz }
    }

    pub fn time_zone(&self) -> &FixedOffset {
        &self.tz
    }
}

impl<B> EventsApi<B>
where B: EventManagement
{
    pub async fn event_by_id(&self, event_id: &EventId, now: DateTime<Utc>) -> Result<EventSummary, FundingError> {
        let event = self.db.fetch_event(event_id).await?.ok_or(FundingError::EventNotFound(*event_id))?;
        self.summarize(event, now)
    }

    /// All events, ongoing first, then upcoming, completed and cancelled. Newest first within each group.
    pub async fn list_events(&self, now: DateTime<Utc>) -> Result<Vec<EventSummary>, FundingError> {
        let events = self.db.fetch_events().await?;
        let summaries = self.summarize_all(events, now)?;
        trace!("📅️ Listing {} events", summaries.len());
        Ok(summaries)
    }

    /// The organizer's events in listing order, along with grand totals over all of them.
    pub async fn events_for_organizer(
        &self,
        organizer: &OrganizerId,
        now: DateTime<Utc>,
    ) -> Result<OrganizerEvents, FundingError> {
        let events = self.db.fetch_events_for_organizer(organizer).await?;
        let events = self.summarize_all(events, now)?;
        let totals = events.iter().map(|e| e.totals).sum();
        Ok(OrganizerEvents { totals, events })
    }

    /// Registers a new event on behalf of the event management layer.
    pub async fn create_event(&self, event: NewEvent, now: DateTime<Utc>) -> Result<EventSummary, FundingError> {
        let event = self.db.insert_event(event).await?;
        info!("📅️ Event {} '{}' created by {}", event.id, event.title, event.organizer.id);
        self.summarize(event, now)
    }

    /// Sets the cancelled override. The event keeps its ledger.
    pub async fn cancel_event(&self, event_id: &EventId, now: DateTime<Utc>) -> Result<EventSummary, FundingError> {
        let event = self.db.cancel_event(event_id).await?;
        info!("📅️ Event {event_id} has been cancelled");
        self.summarize(event, now)
    }

    fn summarize(&self, event: Event, now: DateTime<Utc>) -> Result<EventSummary, FundingError> {
        let status = derive_status(event.date, &event.time, now, event.status_override(), &self.tz).map_err(|e| {
            error!("📅️ Event {} has an invalid schedule. {e}", event.id);
            FundingError::from(e)
        })?;
        let totals = aggregate(&event.contributions);
        Ok(EventSummary { event, status, totals })
    }

    fn summarize_all(&self, events: Vec<Event>, now: DateTime<Utc>) -> Result<Vec<EventSummary>, FundingError> {
        let mut summaries = events.into_iter().map(|e| self.summarize(e, now)).collect::<Result<Vec<_>, _>>()?;
        summaries.sort_by(listing_order);
        Ok(summaries)
    }
}

fn listing_order(a: &EventSummary, b: &EventSummary) -> Ordering {
    a.status
        .rank()
        .cmp(&b.status.rank())
        .then_with(|| b.event.created_at.cmp(&a.event.created_at))
        .then_with(|| b.event.id.cmp(&a.event.id))
}
