//! GatherPay Engine
//!
//! The funding core of GatherPay. Organizers publish events with a fee; participants pay through a third-party
//! gateway; this library turns the gateway's signed payment callbacks into a durable, non-duplicated ledger of
//! contributions and reports collection totals back to the organizer.
//!
//! The library is divided into these sections:
//! 1. Database management and control (`db`). SQLite is the supported backend. You should never need to access the
//!    database directly. Instead, use the public API. The exception is the data types used in the database. These are
//!    defined in the [`mod@db_types`] module and are public.
//! 2. The public API ([`FundingFlowApi`] and [`EventsApi`]). Backends implement the traits in [`mod@traits`] to act as
//!    a store for the APIs, and a payment gateway client implements [`traits::PaymentGateway`].
//! 3. [`mod@helpers`] holds the pure pieces: callback signature verification, event status derivation and
//!    aggregation.
//!
//! The engine also publishes events that other services can subscribe to. For example, when a new contribution is
//! recorded, a [`events::ContributionRecordedEvent`] is emitted. A simple actor framework is used so that you can hook
//! into these events and perform custom actions.
mod db;
mod gateway;
mod gpe_api;

pub mod db_types;
pub mod events;
pub mod helpers;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub mod traits {
    pub use crate::{
        db::traits::{
            ContributionLedger,
            EventManagement,
            EventQueryError,
            FundingDatabase,
            LedgerError,
            RecordOutcome,
            RecordResult,
        },
        gateway::{GatewayError, GatewayOrder, GatewayOrderRequest, PaymentGateway},
    };
}

#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use gpe_api::{
    errors::FundingError,
    events_api::EventsApi,
    funding_flow_api::{FundingFlowApi, DEFAULT_GATEWAY_TIMEOUT},
    funding_objects,
};
