//! # GatherPay engine public API
//!
//! * [`funding_flow_api`] turns a participant's intent to pay into a gateway order, and a signed gateway callback into
//!   a ledger entry.
//! * [`events_api`] serves the read side: events with their derived status and collection totals, one at a time, as a
//!   listing, or as an organizer's dashboard.
//!
//! Both APIs are created by supplying a backend that implements the traits they need, e.g.
//!
//! ```rust,ignore
//! use gatherpay_engine::{EventsApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = EventsApi::new(db, tz);
//! let summary = api.event_by_id(&event_id, Utc::now()).await?;
//! ```
pub mod errors;
pub mod events_api;
pub mod funding_flow_api;
pub mod funding_objects;
