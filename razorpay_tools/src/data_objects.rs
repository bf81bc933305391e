use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Body of a `POST /orders` request.
///
/// `amount` is in the currency's smallest unit (paise for INR).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRazorpayOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub notes: HashMap<String, String>,
}

impl NewRazorpayOrder {
    pub fn new<S: Into<String>>(amount: i64, currency: S, receipt: S) -> Self {
        Self { amount, currency: currency.into(), receipt: receipt.into(), notes: HashMap::new() }
    }

    pub fn with_note<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.notes.insert(key.into(), value.into());
        self
    }
}

/// An order, as returned by Razorpay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default)]
    pub amount_due: i64,
    pub currency: String,
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub created_at: i64,
}
