//! # GatherPay server
//! This crate hosts the HTTP server for GatherPay. It is responsible for:
//! Handing out payment gateway orders sized to an event's fee.
//! Receiving the signed payment confirmations and recording contributions in the ledger.
//! Serving events, with their derived status and collection totals, to participants and organizers.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/`: The service name, version and the available endpoints.
//! * `/api/create-order`, `/api/verify-payment`: The funding flow.
//! * `/api/events`, `/api/event/{id}`, `/api/organizer/{organizer_id}/events`: Event listings.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod integrations;
pub mod routes;
pub mod server;
