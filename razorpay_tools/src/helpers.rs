use chrono::{DateTime, Utc};

/// Builds a receipt reference for a new order. Razorpay caps receipts at 40 characters.
pub fn receipt_for(timestamp: DateTime<Utc>) -> String {
    format!("receipt_order_{}", timestamp.timestamp_millis())
}
