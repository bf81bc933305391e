use gatherpay_engine::{
    db_types::{EventId, Money, ParticipantId},
    helpers::PaymentCallback,
};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/create-order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(alias = "eventId")]
    pub event_id: EventId,
    #[serde(alias = "participantId")]
    pub participant_id: ParticipantId,
}

/// Body of `POST /api/verify-payment`: the three signed values the gateway handed the client after checkout, plus
/// the contribution they are being presented for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(flatten)]
    pub callback: PaymentCallback,
    #[serde(alias = "eventId")]
    pub event_id: EventId,
    #[serde(alias = "participantId")]
    pub participant_id: ParticipantId,
    /// In the currency's smallest unit.
    pub amount: Money,
}
