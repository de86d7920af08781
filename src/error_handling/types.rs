//! Error type definitions.
//!
//! Only `InvalidTarget`, `ProxyConfigError` and `InitializationError` are fatal. The probe
//! errors never leave their probe: they are folded into the probe's result value.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing an HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// The raw target could not be turned into a probe-able origin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidTarget {
    /// Nothing but whitespace was given.
    #[error("Target is empty")]
    Empty,

    /// The target exceeds the maximum URL length.
    #[error("Target exceeds maximum length ({length} > {max})")]
    TooLong {
        /// Length of the rejected input
        length: usize,
        /// Configured maximum
        max: usize,
    },

    /// The target uses a scheme other than http/https.
    #[error("Unsupported scheme '{0}'")]
    UnsupportedScheme(String),

    /// The URL parser rejected the target.
    #[error("Invalid URL '{url}': {reason}")]
    Unparseable {
        /// Normalized URL that failed to parse
        url: String,
        /// Parser message
        reason: String,
    },

    /// The URL parsed but has no host segment.
    #[error("URL '{0}' has no host component")]
    MissingHost(String),
}

/// The configured proxy URL cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyConfigError {
    /// The URL parser rejected the proxy URL.
    #[error("Malformed proxy URL: {0}")]
    Malformed(String),

    /// Only plain HTTP proxies speak CONNECT here.
    #[error("Unsupported proxy scheme '{0}' (expected http)")]
    UnsupportedScheme(String),

    /// Host or port is missing.
    #[error("Invalid proxy configuration")]
    MissingHostOrPort,
}

/// Transport-level failure of the HTTP probe.
#[derive(Error, Debug)]
pub enum HttpTransportError {
    /// The request itself failed (DNS, connect, TLS, timeout, body).
    #[error(transparent)]
    Request(#[from] ReqwestError),

    /// The start URL or a redirect location is not a valid URL.
    #[error("Invalid URL '{location}': {source}")]
    InvalidLocation {
        /// Raw `Location` header value
        location: String,
        /// Parser error
        #[source]
        source: url::ParseError,
    },

    /// The redirect chain is longer than allowed.
    #[error("Exceeded {0} redirects")]
    TooManyRedirects(usize),

    /// The whole exchange, all hops included, took too long.
    #[error("Request timed out after {0}s")]
    Timeout(u64),
}

/// Failure while opening a CONNECT tunnel through the proxy.
#[derive(Error, Debug)]
pub enum ProxyConnectError {
    /// TCP connection to the proxy failed.
    #[error("Failed to connect to proxy {address}: {source}")]
    Connect {
        /// `host:port` of the proxy
        address: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// The proxy did not answer in time.
    #[error("Proxy {address} timed out after {secs}s")]
    Timeout {
        /// `host:port` of the proxy
        address: String,
        /// Timeout that elapsed
        secs: u64,
    },

    /// Writing the CONNECT request or reading the reply failed.
    #[error("Proxy I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The proxy closed the connection before replying.
    #[error("Proxy closed the connection without a response")]
    Closed,

    /// The reply's first line lacks the success marker. Holds that line verbatim.
    #[error("Proxy connection failed: {0}")]
    Rejected(String),
}

/// Failure while inspecting a TLS certificate.
///
/// Each variant corresponds to one stage of the inspection; `Display` is what ends up in
/// `CertificateFacts::Invalid`.
#[derive(Error, Debug)]
pub enum TlsInspectError {
    /// The host is not a valid TLS server name.
    #[error("Invalid domain name: {0}")]
    InvalidServerName(String),

    /// Direct TCP connection failed.
    #[error("Failed to connect to {address}: {source}")]
    Connect {
        /// `host:port` of the target
        address: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// Direct TCP connection timed out.
    #[error("TCP connection timeout for {address} ({secs}s)")]
    ConnectTimeout {
        /// `host:port` of the target
        address: String,
        /// Timeout that elapsed
        secs: u64,
    },

    /// The CONNECT tunnel could not be opened.
    #[error(transparent)]
    Tunnel(#[from] ProxyConnectError),

    /// The TLS client configuration could not be built.
    #[error("TLS configuration error: {0}")]
    Config(String),

    /// The TLS handshake failed.
    #[error("TLS handshake failed for {host}: {source}")]
    Handshake {
        /// Server name used for SNI
        host: String,
        /// Underlying handshake error
        #[source]
        source: std::io::Error,
    },

    /// The TLS handshake timed out.
    #[error("TLS handshake timeout for {host} ({secs}s)")]
    HandshakeTimeout {
        /// Server name used for SNI
        host: String,
        /// Timeout that elapsed
        secs: u64,
    },

    /// The peer presented no certificate.
    #[error("No certificate found")]
    NoCertificate,

    /// The leaf certificate could not be parsed.
    #[error("Failed to parse certificate: {0}")]
    Parse(String),
}
