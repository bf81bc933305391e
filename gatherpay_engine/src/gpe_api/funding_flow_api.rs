use std::{fmt::Debug, time::Duration};

use gp_common::DEFAULT_CURRENCY_CODE;
use log::*;

use crate::{
    db::traits::{FundingDatabase, LedgerError},
    db_types::{EventId, Money, ParticipantId},
    events::{ContributionRecordedEvent, EventProducers},
    gateway::{GatewayError, GatewayOrderRequest, PaymentGateway},
    gpe_api::{
        errors::FundingError,
        funding_objects::{OrderHandle, VerificationResult},
    },
    helpers::{CallbackVerifier, PaymentCallback},
};

pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(15);

/// `FundingFlowApi` drives the two halves of a payment: creating a gateway order for an event, and turning the
/// gateway's signed callback into a contribution.
///
/// The gateway client is built by the caller and handed in. Nothing in here constructs one.
pub struct FundingFlowApi<B, G> {
    db: B,
    gateway: G,
    verifier: CallbackVerifier,
    producers: EventProducers,
    currency: String,
    gateway_timeout: Duration,
}

impl<B, G> Debug for FundingFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FundingFlowApi ({})", self.currency)
    }
}

impl<B, G> FundingFlowApi<B, G> {
    pub fn new(db: B, gateway: G, verifier: CallbackVerifier) -> Self {
        Self {
            db,
            gateway,
            verifier,
            producers: EventProducers::default(),
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }

    pub fn with_producers(mut self, producers: EventProducers) -> Self {
        self.producers = producers;
        self
    }

    pub fn with_currency<S: Into<String>>(mut self, currency: S) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_gateway_timeout(mut self, timeout: Duration) -> Self {
        self.gateway_timeout = timeout;
        self
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B, G> FundingFlowApi<B, G>
where
    B: FundingDatabase,
    G: PaymentGateway,
{
    /// Asks the gateway for an order sized to the event's fee. The ledger is not touched.
    ///
    /// Fails with
    /// * [`FundingError::EventNotFound`] if the event does not exist,
    /// * [`FundingError::InvalidAmount`] if the event is free, since there is nothing to pay,
    /// * [`FundingError::GatewayUnavailable`] if the gateway fails, refuses, or does not answer in time.
    pub async fn create_order(
        &self,
        event_id: &EventId,
        participant: &ParticipantId,
    ) -> Result<OrderHandle, FundingError> {
        let event = self.db.fetch_event(event_id).await?.ok_or(FundingError::EventNotFound(*event_id))?;
        if !event.fee.is_positive() {
            debug!("🔄️🧾️ Event {event_id} is free. No order is needed");
            return Err(FundingError::InvalidAmount(event.fee));
        }
        let request = GatewayOrderRequest {
            amount: event.fee,
            currency: self.currency.clone(),
            event_id: *event_id,
            participant_id: participant.clone(),
        };
        trace!("🔄️🧾️ Requesting a gateway order of {} for {participant} on event {event_id}", event.fee);
        let order = match tokio::time::timeout(self.gateway_timeout, self.gateway.create_order(request)).await {
            Ok(Ok(order)) => order,
            Ok(Err(GatewayError::Unavailable(msg))) => {
                warn!("🔄️🧾️ Payment gateway is unavailable. {msg}");
                return Err(FundingError::GatewayUnavailable(msg));
            },
            Ok(Err(GatewayError::Rejected(msg))) => {
                error!(
                    "🔄️🧾️ Payment gateway rejected the order for event {event_id}. Check the gateway credentials. {msg}"
                );
                return Err(FundingError::GatewayUnavailable(msg));
            },
            Err(_) => {
                warn!("🔄️🧾️ Payment gateway did not respond within {:?}", self.gateway_timeout);
                return Err(FundingError::GatewayUnavailable("The gateway timed out".to_string()));
            },
        };
        info!("🔄️🧾️ Order {} ({}) created for {participant} on event {event_id}", order.order_id, order.receipt);
        Ok(OrderHandle { order_id: order.order_id, amount: order.amount, currency: order.currency })
    }

    /// Verifies a gateway callback and records the participant's contribution.
    ///
    /// 1. The callback signature is checked first. A bad signature is logged as a possible forgery and nothing else
    ///    happens.
    /// 2. `claimed_amount` must equal the event's fee.
    /// 3. The contribution is recorded against the callback's payment id. A participant who has already paid is
    ///    reported as a success and the ledger is left as it was. A payment that already backs someone else's
    ///    contribution is refused with [`FundingError::PaymentAlreadyClaimed`].
    /// 4. The event's totals are computed from the ledger as the backend read it right after the write.
    pub async fn verify_and_record(
        &self,
        callback: &PaymentCallback,
        event_id: &EventId,
        participant: &ParticipantId,
        claimed_amount: Money,
    ) -> Result<VerificationResult, FundingError> {
        if let Err(e) = self.verifier.verify(callback) {
            warn!(
                "🔐️ Possible forgery: payment callback for order '{}' (event {event_id}, participant {participant}) was \
                 rejected. {e}",
                callback.order_id
            );
            return Err(FundingError::SignatureInvalid(e.to_string()));
        }
        trace!("🔐️ Signature for payment {} is valid", callback.payment_id);
        let event = self.db.fetch_event(event_id).await?.ok_or(FundingError::EventNotFound(*event_id))?;
        if claimed_amount != event.fee {
            warn!("🔄️💰️ {participant} claimed {claimed_amount} for event {event_id}, but the fee is {}", event.fee);
            return Err(FundingError::AmountMismatch { expected: event.fee, claimed: claimed_amount });
        }
        let payment = callback.reference();
        let outcome = match self.db.record_contribution(event_id, participant, claimed_amount, &payment).await {
            Ok(outcome) => outcome,
            Err(LedgerError::PaymentAlreadyClaimed(payment_id)) => {
                warn!(
                    "🔐️ Possible replay: payment {payment_id} was presented for {participant} on event {event_id}, \
                     but it is already recorded"
                );
                return Err(FundingError::PaymentAlreadyClaimed(payment_id));
            },
            Err(e) => return Err(e.into()),
        };
        let totals = outcome.totals();
        if outcome.is_new() {
            info!(
                "🔄️💰️ Payment {} of {claimed_amount} by {participant} recorded for event {event_id}",
                callback.payment_id
            );
            let ev = ContributionRecordedEvent::new(*event_id, outcome.contribution().clone(), totals);
            self.producers.publish_contribution_recorded(ev).await;
        } else {
            debug!("🔄️💰️ {participant} has already paid for event {event_id}. Nothing to record");
        }
        Ok(VerificationResult { success: true, totals })
    }
}
