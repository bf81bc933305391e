use std::env;

use chrono::{FixedOffset, Offset, Utc};
use gatherpay_engine::helpers::parse_utc_offset;
use gp_common::{parse_boolean_flag, DEFAULT_CURRENCY_CODE};
use log::*;
use razorpay_tools::RazorpayConfig;

const DEFAULT_GP_HOST: &str = "127.0.0.1";
const DEFAULT_GP_PORT: u16 = 8370;
const DEFAULT_GP_DATABASE_URL: &str = "sqlite://data/gatherpay.db";
/// Indian Standard Time. Event dates and times are entered as local wall-clock values.
const DEFAULT_EVENT_UTC_OFFSET: &str = "+05:30";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The offset that event dates and times are written in. Status derivation compares against "now" in this offset.
    pub event_utc_offset: FixedOffset,
    /// Currency that gateway orders are raised in.
    pub currency: String,
    pub razorpay: RazorpayConfig,
    /// The front end's origin, passed through to deployments that put a CORS layer in front of the server.
    pub cors_origin: Option<String>,
    pub proxy: ProxyConfig,
}

/// How to work out the client's address when the server sits behind a reverse proxy.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProxyConfig {
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address.
    pub use_forwarded: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_GP_HOST.to_string(),
            port: DEFAULT_GP_PORT,
            database_url: DEFAULT_GP_DATABASE_URL.to_string(),
            event_utc_offset: default_offset(),
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            razorpay: RazorpayConfig::default(),
            cors_origin: None,
            proxy: ProxyConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("GP_HOST").ok().unwrap_or_else(|| DEFAULT_GP_HOST.into());
        let port = env::var("GP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for GP_PORT. {e} Using the default, {DEFAULT_GP_PORT}.");
                    DEFAULT_GP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_GP_PORT);
        let database_url = env::var("GP_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ GP_DATABASE_URL is not set. Using {DEFAULT_GP_DATABASE_URL}");
            DEFAULT_GP_DATABASE_URL.to_string()
        });
        let event_utc_offset = configure_event_offset();
        let currency = env::var("GP_CURRENCY").map(|s| s.trim().to_uppercase()).unwrap_or_else(|_| {
            info!("🪛️ GP_CURRENCY is not set. Orders will be raised in {DEFAULT_CURRENCY_CODE}");
            DEFAULT_CURRENCY_CODE.to_string()
        });
        let razorpay = RazorpayConfig::new_from_env_or_default();
        let cors_origin = env::var("GP_CORS_ORIGIN").ok().filter(|s| !s.trim().is_empty());
        let use_x_forwarded_for = parse_boolean_flag(env::var("GP_USE_X_FORWARDED_FOR").ok(), false);
        let use_forwarded = parse_boolean_flag(env::var("GP_USE_FORWARDED").ok(), false);
        Self {
            host,
            port,
            database_url,
            event_utc_offset,
            currency,
            razorpay,
            cors_origin,
            proxy: ProxyConfig { use_x_forwarded_for, use_forwarded },
        }
    }
}

fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap_or(Utc.fix())
}

fn configure_event_offset() -> FixedOffset {
    let value = env::var("GP_EVENT_UTC_OFFSET").unwrap_or_else(|_| {
        info!("🪛️ GP_EVENT_UTC_OFFSET is not set. Using the default of {DEFAULT_EVENT_UTC_OFFSET}.");
        DEFAULT_EVENT_UTC_OFFSET.to_string()
    });
    parse_utc_offset(&value).unwrap_or_else(|e| {
        error!("🪛️ Invalid configuration value for GP_EVENT_UTC_OFFSET. {e}. Using {DEFAULT_EVENT_UTC_OFFSET}.");
        default_offset()
    })
}
