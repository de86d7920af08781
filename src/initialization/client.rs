//! HTTP client initialization.
//!
//! This module provides functions to initialize HTTP clients for the reachability probe
//! and for the proxy health check.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{PROXY_CONNECT_TIMEOUT_SECS, PROXY_HEALTH_TIMEOUT_SECS};
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used by the reachability probe.
///
/// Creates a `reqwest::Client` with redirects disabled so the probe can follow and
/// count them itself. When a proxy URL is given, both `http` and `https` requests go
/// through it; credentials embedded in the URL are sent as Basic auth.
///
/// # Arguments
///
/// * `timeout_seconds` - Total timeout for a single request
/// * `proxy_url` - Optional upstream proxy
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if the proxy URL is rejected or the
/// client cannot be built.
pub fn init_probe_client(
    timeout_seconds: u64,
    proxy_url: Option<&str>,
) -> Result<reqwest::Client, InitializationError> {
    let mut builder = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(timeout_seconds))
        .connect_timeout(Duration::from_secs(PROXY_CONNECT_TIMEOUT_SECS))
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
    if let Some(proxy_url) = proxy_url {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }
    Ok(builder.build()?)
}

/// Initializes the HTTP client used by the proxy health check.
///
/// Always routed through `proxy_url`, with a `PROXY_HEALTH_TIMEOUT_SECS` timeout.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if the proxy URL is rejected or the
/// client cannot be built.
pub fn init_health_client(proxy_url: &str) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(PROXY_HEALTH_TIMEOUT_SECS))
        .proxy(reqwest::Proxy::all(proxy_url)?)
        .build()?;
    Ok(client)
}
