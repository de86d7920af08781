//! Proxy connectivity pre-flight.
//!
//! Asks a geolocation service, through the proxy, where our requests appear to come
//! from. A successful answer proves the proxy works and tells us the egress country.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::Retry;

use crate::config::UNKNOWN;

/// Result of the pre-flight, retries included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyHealth {
    /// Whether any attempt succeeded
    pub connected: bool,
    /// Egress country reported by the geolocation service
    pub country: String,
    /// Attempts made, the successful one included
    pub attempts: u32,
}

/// Geolocation lookup through a proxied client.
#[derive(Debug, Clone)]
pub struct ProxyHealthCheck {
    client: reqwest::Client,
    endpoint: String,
}

impl ProxyHealthCheck {
    /// `client` should route through the proxy; see `init_health_client`.
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Performs one lookup.
    ///
    /// # Returns
    ///
    /// `(true, country)` on HTTP 200 with a JSON body (`country` is `"Unknown"` if the
    /// body has no `country_name`), `(false, "Unknown")` on any failure.
    pub async fn verify(&self) -> (bool, String) {
        let response = match self.client.get(&self.endpoint).send().await {
            Ok(response) => response,
            Err(e) => {
                log::debug!("Proxy health request failed: {e}");
                return (false, UNKNOWN.to_string());
            }
        };
        if response.status() != StatusCode::OK {
            log::debug!("Proxy health request returned {}", response.status());
            return (false, UNKNOWN.to_string());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log::debug!("Failed to read proxy health response: {e}");
                return (false, UNKNOWN.to_string());
            }
        };
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(fields)) => (true, country_name(fields.get("country_name"))),
            Ok(other) => {
                log::debug!("Proxy health response is not a JSON object: {other}");
                (false, UNKNOWN.to_string())
            }
            Err(e) => {
                log::debug!("Proxy health response is not valid JSON: {e}");
                (false, UNKNOWN.to_string())
            }
        }
    }

    /// Runs `verify` up to `max_attempts` times, `delay` apart, stopping at the first
    /// success.
    pub async fn verify_with_retry(&self, max_attempts: u32, delay: Duration) -> ProxyHealth {
        retry_fixed(max_attempts, delay, || self.verify()).await
    }
}

/// Strings are taken as is, other JSON values in their JSON text form.
fn country_name(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => UNKNOWN.to_string(),
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
    }
}

/// Fixed-delay retry of a `(connected, country)` check.
///
/// Never fails: exhausting the attempts yields `connected: false`.
pub(crate) async fn retry_fixed<F, Fut>(max_attempts: u32, delay: Duration, mut check: F) -> ProxyHealth
where
    F: FnMut() -> Fut,
    Fut: Future<Output = (bool, String)>,
{
    let max_attempts = max_attempts.max(1);
    let strategy = FixedInterval::new(delay).take(max_attempts as usize - 1);
    let counter = AtomicU32::new(0);
    let counter_ref = &counter;

    let outcome = Retry::spawn(strategy, move || {
        let attempt = counter_ref.fetch_add(1, Ordering::SeqCst) + 1;
        let pending = check();
        async move {
            match pending.await {
                (true, country) => Ok(country),
                (false, _) => {
                    if attempt < max_attempts {
                        log::warn!("Retry {attempt}/{max_attempts} - attempting to reconnect to proxy");
                    }
                    Err(())
                }
            }
        }
    })
    .await;

    let attempts = counter.load(Ordering::SeqCst);
    match outcome {
        Ok(country) => {
            log::info!("Proxy connected after {attempts} attempt(s), egress country: {country}");
            ProxyHealth {
                connected: true,
                country,
                attempts,
            }
        }
        Err(()) => {
            log::warn!("Proxy connection failed after {attempts} attempts");
            ProxyHealth {
                connected: false,
                country: UNKNOWN.to_string(),
                attempts,
            }
        }
    }
}
