//! Subscribers to funding events.
use std::{future::Future, pin::Pin};

use gatherpay_engine::events::{ContributionRecordedEvent, EventHandlers, EventHooks};
use log::*;

const NOTIFICATION_BUFFER_SIZE: usize = 25;

/// Hooks that let organizers know when money comes in. Delivery channels (email, push) sit outside this server, so
/// for now each new contribution is written to the `gp::notifications` log target, where they can be collected.
pub fn create_organizer_notification_handlers() -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks.on_contribution_recorded(notify_organizer);
    EventHandlers::new(NOTIFICATION_BUFFER_SIZE, hooks)
}

fn notify_organizer(ev: ContributionRecordedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async move {
        info!(
            target: "gp::notifications",
            "🔔️ Event {}: {} paid {}. {} participants, {} collected so far.",
            ev.event_id,
            ev.contribution.participant,
            ev.contribution.amount,
            ev.totals.total_participants,
            ev.totals.total_collection
        );
    })
}
