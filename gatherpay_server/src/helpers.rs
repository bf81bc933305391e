use std::{net::IpAddr, str::FromStr, sync::OnceLock};

use actix_web::HttpRequest;
use log::{debug, trace};
use regex::Regex;

use crate::config::ProxyConfig;

fn forwarded_for() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"for="?(?P<ip>[^;,"]+)"?"#).unwrap())
}

/// Get the remote IP address of the client. Sources, in decreasing order of preference:
/// 1. The first entry of the `X-Forwarded-For` header, iif `use_x_forwarded_for` is set in the proxy configuration.
/// 2. The first `for=` entry of the `Forwarded` header, iif `use_forwarded` is set.
/// 3. The peer address from the connection info.
///
/// Only used for logging. Nothing is authorised on the strength of this address.
pub fn get_remote_ip(req: &HttpRequest, proxy: ProxyConfig) -> Option<IpAddr> {
    let mut result = None;
    if proxy.use_x_forwarded_for {
        trace!("Checking X-Forwarded-For header");
        result = req
            .headers()
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| IpAddr::from_str(s.trim()).ok());
        if let Some(ip) = result {
            debug!("Using X-Forwarded-For header for remote address: {ip}");
        }
    }
    if proxy.use_forwarded && result.is_none() {
        trace!("Checking Forwarded header");
        result = req
            .headers()
            .get("Forwarded")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| forwarded_for().captures(v))
            .and_then(|caps| caps.name("ip"))
            .and_then(|m| IpAddr::from_str(m.as_str().trim()).ok());
        if let Some(ip) = result {
            debug!("Using Forwarded header for remote address: {ip}");
        }
    }
    result.or_else(|| {
        let peer = req.peer_addr().map(|a| a.ip());
        trace!("Using peer address for remote address: {peer:?}");
        peer
    })
}
