//! A small client for the parts of the Razorpay REST API that GatherPay needs: creating orders.
//!
//! Checkout itself happens between the participant and Razorpay. What comes back to GatherPay is a signed
//! confirmation, which is verified by `gatherpay_engine`, not by this crate.
mod api;
mod config;
mod data_objects;
mod error;

pub mod helpers;

pub use api::RazorpayApi;
pub use config::RazorpayConfig;
pub use data_objects::{NewRazorpayOrder, RazorpayOrder};
pub use error::RazorpayApiError;
