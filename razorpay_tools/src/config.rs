use std::time::Duration;

use log::*;
use gp_common::Secret;

pub const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com/v1";
pub const DEFAULT_RAZORPAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// Base url of the REST API. Overridable so that tests and staging setups can point elsewhere.
    pub api_url: String,
    pub key_id: String,
    /// The key secret doubles as the HMAC key for payment confirmations.
    pub key_secret: Secret<String>,
    /// Upper bound on how long order creation may take before the gateway is considered unavailable.
    pub timeout: Duration,
}

impl Default for RazorpayConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_RAZORPAY_API_URL.to_string(),
            key_id: String::default(),
            key_secret: Secret::default(),
            timeout: DEFAULT_RAZORPAY_TIMEOUT,
        }
    }
}

impl RazorpayConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("GP_RAZORPAY_API_URL").unwrap_or_else(|_| {
            info!("🪛️ GP_RAZORPAY_API_URL not set, using {DEFAULT_RAZORPAY_API_URL}");
            DEFAULT_RAZORPAY_API_URL.to_string()
        });
        let key_id = std::env::var("GP_RAZORPAY_KEY_ID").unwrap_or_else(|_| {
            warn!("🪛️ GP_RAZORPAY_KEY_ID not set, using (probably useless) default");
            "rzp_test_00000000000000".to_string()
        });
        let key_secret = Secret::new(std::env::var("GP_RAZORPAY_KEY_SECRET").unwrap_or_else(|_| {
            error!(
                "🪛️ GP_RAZORPAY_KEY_SECRET not set. Order creation will fail and every payment confirmation will be \
                 rejected until it is configured."
            );
            String::default()
        }));
        let timeout = std::env::var("GP_RAZORPAY_TIMEOUT_SECS")
            .map_err(|_| {
                info!(
                    "🪛️ GP_RAZORPAY_TIMEOUT_SECS not set. Using the default of {}s.",
                    DEFAULT_RAZORPAY_TIMEOUT.as_secs()
                )
            })
            .and_then(|s| {
                s.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for GP_RAZORPAY_TIMEOUT_SECS. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_RAZORPAY_TIMEOUT);
        Self { api_url, key_id, key_secret, timeout }
    }
}
