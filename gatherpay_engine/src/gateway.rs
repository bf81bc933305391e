//! The payment gateway, as seen from the funding core.
//!
//! The core only ever asks the gateway for one thing: an order sized to an event's fee, against which the participant
//! completes checkout. Everything else (checkout, settlement) happens between the client and the gateway. The
//! concrete client is built at startup and injected into [`crate::FundingFlowApi`].
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::{EventId, Money, ParticipantId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrderRequest {
    /// Amount in the currency's smallest unit.
    pub amount: Money,
    pub currency: String,
    pub event_id: EventId,
    pub participant_id: ParticipantId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    /// The gateway's handle for the order. The signed callback refers back to it.
    pub order_id: String,
    pub amount: Money,
    pub currency: String,
    /// The merchant-side reference the gateway attached to the order.
    pub receipt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Timeouts, connection failures and 5xx responses. Worth retrying later.
    #[error("The payment gateway is unavailable. {0}")]
    Unavailable(String),
    /// The gateway understood the request and refused it.
    #[error("The payment gateway rejected the request. {0}")]
    Rejected(String),
}

#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError>;
}
