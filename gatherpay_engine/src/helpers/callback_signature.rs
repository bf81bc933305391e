//! # Payment callback signatures
//!
//! Once a participant completes checkout, the gateway hands the client three values: the order id, the payment id and
//! a signature. The client forwards them to us, so nothing about them can be trusted until the signature checks out.
//!
//! ## Message format
//!
//! The signed message is the order id and the payment id joined by a pipe:
//!
//! ```text
//!    {order_id}|{payment_id}
//! ```
//!
//! The signature is `HMAC-SHA256` over that message, keyed with the merchant's API key secret, encoded as lowercase
//! hex.
//!
//! Verification fails closed. An empty field, an unconfigured secret, anything that is not 64 lowercase hex
//! characters, or a digest mismatch all reject the callback. Digests are compared in constant time.

use gp_common::Secret;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::db_types::PaymentReference;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_HEX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("The payment callback is missing the {0} field.")]
    MissingField(&'static str),
    #[error("The payment callback signature is malformed. {0}")]
    MalformedSignature(String),
    #[error("No signing secret has been configured.")]
    NoSecret,
    #[error("The payment callback signature does not match.")]
    Mismatch,
}

/// The confirmation the gateway issues after a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCallback {
    #[serde(rename = "razorpay_order_id", default)]
    pub order_id: String,
    #[serde(rename = "razorpay_payment_id", default)]
    pub payment_id: String,
    #[serde(rename = "razorpay_signature", default)]
    pub signature: String,
}

impl PaymentCallback {
    pub fn new<S: Into<String>>(order_id: S, payment_id: S, signature: S) -> Self {
        Self { order_id: order_id.into(), payment_id: payment_id.into(), signature: signature.into() }
    }

    pub fn message(&self) -> String {
        signature_message(&self.order_id, &self.payment_id)
    }

    /// The ids this callback vouches for, without the signature.
    pub fn reference(&self) -> PaymentReference {
        PaymentReference::new(self.order_id.as_str(), self.payment_id.as_str())
    }
}

pub fn signature_message(order_id: &str, payment_id: &str) -> String {
    format!("{order_id}|{payment_id}")
}

#[derive(Clone, Debug)]
pub struct CallbackVerifier {
    secret: Secret<String>,
}

impl CallbackVerifier {
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret }
    }

    fn mac(&self) -> Result<HmacSha256, SignatureError> {
        if self.secret.is_empty() {
            return Err(SignatureError::NoSecret);
        }
        HmacSha256::new_from_slice(self.secret.reveal().as_bytes()).map_err(|_| SignatureError::NoSecret)
    }

    /// Produces the signature the gateway would attach to the given order and payment.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> Result<String, SignatureError> {
        let mut mac = self.mac()?;
        mac.update(signature_message(order_id, payment_id).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    pub fn verify(&self, callback: &PaymentCallback) -> Result<(), SignatureError> {
        if callback.order_id.is_empty() {
            return Err(SignatureError::MissingField("order_id"));
        }
        if callback.payment_id.is_empty() {
            return Err(SignatureError::MissingField("payment_id"));
        }
        if callback.signature.is_empty() {
            return Err(SignatureError::MissingField("signature"));
        }
        let sig = callback.signature.as_str();
        if sig.len() != SIGNATURE_HEX_LENGTH {
            return Err(SignatureError::MalformedSignature(format!(
                "Expected {SIGNATURE_HEX_LENGTH} hex characters, found {}",
                sig.len()
            )));
        }
        // hex::decode is case-insensitive. Only lowercase is ever issued, so anything else is a different signature.
        if !sig.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) {
            return Err(SignatureError::MalformedSignature("Not a lowercase hex string".to_string()));
        }
        let expected = hex::decode(sig).map_err(|e| SignatureError::MalformedSignature(e.to_string()))?;
        let mut mac = self.mac()?;
        mac.update(callback.message().as_bytes());
        mac.verify_slice(&expected).map_err(|_| SignatureError::Mismatch)
    }

    pub fn is_valid(&self, callback: &PaymentCallback) -> bool {
        self.verify(callback).is_ok()
    }
}
