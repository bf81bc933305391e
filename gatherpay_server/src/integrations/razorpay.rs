//! Razorpay as the [`PaymentGateway`] behind the funding flow.
use chrono::Utc;
use gatherpay_engine::traits::{GatewayError, GatewayOrder, GatewayOrderRequest, PaymentGateway};
use log::*;
use razorpay_tools::{helpers::receipt_for, NewRazorpayOrder, RazorpayApi, RazorpayApiError};

#[derive(Clone, Debug)]
pub struct RazorpayGateway {
    api: RazorpayApi,
}

impl RazorpayGateway {
    pub fn new(api: RazorpayApi) -> Self {
        Self { api }
    }
}

impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let order = new_razorpay_order(&request);
        let result = self.api.create_order(&order).await.map_err(|e| {
            debug!("💳️ Razorpay order for event {} failed. {e}", request.event_id);
            gateway_error(e)
        })?;
        let receipt = result.receipt.unwrap_or(order.receipt);
        Ok(GatewayOrder { order_id: result.id, amount: result.amount.into(), currency: result.currency, receipt })
    }
}

pub fn new_razorpay_order(request: &GatewayOrderRequest) -> NewRazorpayOrder {
    NewRazorpayOrder::new(request.amount.value(), request.currency.clone(), receipt_for(Utc::now()))
        .with_note("event_id", request.event_id.value().to_string())
        .with_note("participant_id", request.participant_id.as_str())
}

fn gateway_error(e: RazorpayApiError) -> GatewayError {
    if e.is_transient() {
        GatewayError::Unavailable(e.to_string())
    } else {
        GatewayError::Rejected(e.to_string())
    }
}
