//! HTTP reachability probe.
//!
//! Issues one GET against the target origin (following redirects) and reports status,
//! latency, redirect count, final URL and `Server` header. Transport failures are
//! returned as `HttpProbeResult::Failure`, never as errors.

mod redirects;

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::{MAX_REDIRECT_HOPS, UNKNOWN};
use crate::error_handling::{error_chain_message, HttpTransportError};

/// Outcome of the HTTP probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HttpProbeResult {
    /// A response was received.
    Success {
        /// Status code of the final response
        status_code: u16,
        /// Canonical reason phrase (empty if the code has none)
        reason: String,
        /// Wall-clock time of the whole exchange, two decimals
        latency_ms: f64,
        /// Number of redirects followed
        redirect_count: usize,
        /// URL of the final response
        final_url: String,
        /// `Server` header of the final response, or `"Unknown"`
        server_header: String,
    },
    /// No response could be obtained.
    Failure {
        /// Human-readable transport error
        error: String,
    },
}

impl HttpProbeResult {
    /// Whether a response was received (whatever its status).
    pub fn is_success(&self) -> bool {
        matches!(self, HttpProbeResult::Success { .. })
    }
}

/// Runs the HTTP probe with a prepared client.
///
/// The client must have redirects disabled; see `init_probe_client`.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProber {
    /// Creates a prober bounding the whole exchange by `timeout`.
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// GETs `url`, following redirects.
    pub async fn probe(&self, url: &str) -> HttpProbeResult {
        log::debug!("Probing {url}");
        let start = Instant::now();
        let outcome = match tokio::time::timeout(
            self.timeout,
            redirects::follow_redirects(&self.client, url, MAX_REDIRECT_HOPS),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(HttpTransportError::Timeout(self.timeout.as_secs())),
        };

        match outcome {
            Ok(response) => {
                let latency_ms = round_millis(start.elapsed());
                log::info!(
                    "HTTP probe of {url}: {} after {} redirect(s) in {latency_ms} ms",
                    response.status,
                    response.redirect_count
                );
                HttpProbeResult::Success {
                    status_code: response.status.as_u16(),
                    reason: response
                        .status
                        .canonical_reason()
                        .unwrap_or_default()
                        .to_string(),
                    latency_ms,
                    redirect_count: response.redirect_count,
                    final_url: response.final_url,
                    server_header: response.server.unwrap_or_else(|| UNKNOWN.to_string()),
                }
            }
            Err(e) => {
                let error = error_chain_message(&e);
                log::warn!("HTTP probe of {url} failed: {error}");
                HttpProbeResult::Failure { error }
            }
        }
    }
}

/// Converts a duration to milliseconds rounded to two decimals.
pub(crate) fn round_millis(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests;
