//! Configuration constants.
//!
//! This module defines the timeouts, retry parameters and fixed endpoints used by the
//! probes. Everything here is immutable and passed to the probes explicitly.

use std::time::Duration;

/// Maximum accepted target length, matching common browser and server URL limits.
pub const MAX_URL_LENGTH: usize = 2048;

/// Target used when the user just presses enter at the prompt.
pub const DEFAULT_PROMPT_TARGET: &str = "https://www.google.com";

// DNS
/// Per-query resolver timeout in seconds
pub const DNS_TIMEOUT_SECS: u64 = 2;
/// Outer lifetime bound for a single record-type query.
///
/// The resolver is configured with a single attempt, so this matches the resolver
/// timeout and only fires when the resolver itself overruns.
pub const DNS_QUERY_LIFETIME: Duration = Duration::from_secs(2);

// HTTP
/// Default total timeout for the HTTP probe in seconds (all redirect hops included)
pub const HTTP_TIMEOUT_SECS: u64 = 10;
/// Maximum number of redirect hops to follow
pub const MAX_REDIRECT_HOPS: usize = 10;
/// Value reported when the response carries no `Server` header
pub const UNKNOWN: &str = "Unknown";

// Proxy CONNECT
/// Timeout for connecting to the proxy and for reading its CONNECT reply
pub const PROXY_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Upper bound on the size of the proxy's CONNECT response head
pub const PROXY_RESPONSE_HEAD_LIMIT: usize = 4096;
/// Substring the first line of the proxy reply must contain.
///
/// Matched literally: `200 OK` or other casings are treated as failures.
pub const PROXY_SUCCESS_MARKER: &str = "200 Connection established";

// TLS
/// Port probed by the certificate inspector
pub const TLS_PORT: u16 = 443;
/// TCP connection timeout in seconds for direct TLS connections
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 3;
/// TLS handshake timeout in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;

// Proxy health check
/// Geolocation service queried through the proxy
pub const DEFAULT_GEOLOCATION_URL: &str = "https://ipapi.co/json/";
/// Timeout for a single health check request in seconds
pub const PROXY_HEALTH_TIMEOUT_SECS: u64 = 10;
/// Total number of health check attempts (initial attempt included)
pub const PROXY_HEALTH_MAX_ATTEMPTS: u32 = 5;
/// Fixed delay between health check attempts in milliseconds
pub const PROXY_HEALTH_RETRY_DELAY_MS: u64 = 1000;
