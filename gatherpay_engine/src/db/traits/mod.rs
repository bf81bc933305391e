//! # Backend traits
//!
//! A funding backend needs to do two things: keep the per-event contribution ledger, and store the events that
//! contributions are made against.
//!
//! * [`ContributionLedger`] appends contributions. It is the only way a contribution enters the system, and it
//!   guarantees that a participant has at most one completed contribution per event, even under concurrent calls.
//! * [`EventManagement`] stores and queries events, and carries the hooks the (external) event CRUD layer uses to
//!   register and cancel events.
//!
//! [`FundingDatabase`] is the union of the two and is what the public APIs are generic over. Any type implementing
//! both gets it for free.
mod contribution_ledger;
mod event_management;

pub use contribution_ledger::{ContributionLedger, LedgerError, RecordOutcome, RecordResult};
pub use event_management::{EventManagement, EventQueryError};

pub trait FundingDatabase: ContributionLedger + EventManagement {}

impl<T> FundingDatabase for T where T: ContributionLedger + EventManagement {}
