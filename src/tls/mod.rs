//! TLS certificate inspection.
//!
//! This module performs a TLS handshake with the target, directly or through a proxy
//! CONNECT tunnel, and reports facts about the leaf certificate:
//! - Expiry date (`notAfter`) and whole days remaining, negative once expired
//! - Issuer organization
//!
//! Uses `tokio-rustls` for the handshake and `x509-parser` for certificate parsing.
//! Every failure, from the TCP connect to the certificate parse, is reported as
//! `CertificateFacts::Invalid` rather than an error.

mod extract;
mod verifier;

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use log::{debug, info, warn};
use rustls::crypto::ring::default_provider;
use rustls::pki_types::ServerName;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::config::{TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS, TLS_PORT};
use crate::error_handling::{error_chain_message, TlsInspectError};
use crate::proxy::{open_tunnel, ProxyEndpoint};

pub use extract::parse_not_after;
pub(crate) use extract::facts_from_peer_certificates;
use verifier::ExpiryTolerantVerifier;

/// Outcome of a certificate inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CertificateFacts {
    /// The handshake succeeded and the leaf certificate was read.
    Valid {
        /// `notAfter` as `Mon DD HH:MM:SS YYYY GMT`
        not_after: String,
        /// Whole days until `not_after`, floored; negative once expired
        days_remaining: i64,
        /// Issuer organization, `"Unknown"` when absent
        issuer_org: String,
    },
    /// Connecting, tunnelling, handshaking or parsing failed.
    Invalid {
        /// Human-readable failure message
        error: String,
    },
}

impl CertificateFacts {
    /// Whether the leaf certificate could be read.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// How the inspector reaches the target.
#[derive(Debug, Clone, Copy)]
pub enum TlsRoute<'a> {
    /// Plain TCP to the target
    Direct,
    /// HTTP CONNECT tunnel through the proxy
    ViaProxy(&'a ProxyEndpoint),
}

/// Reusable TLS client for certificate inspection.
#[derive(Clone)]
pub struct TlsInspector {
    connector: TlsConnector,
    port: u16,
}

impl TlsInspector {
    /// Creates an inspector that trusts `roots`.
    ///
    /// # Errors
    ///
    /// Returns `TlsInspectError::Config` if the root store is empty or the protocol
    /// versions are unsupported by the crypto provider.
    pub fn new(roots: RootCertStore) -> Result<Self, TlsInspectError> {
        let provider = Arc::new(default_provider());
        let verifier = ExpiryTolerantVerifier::new(roots, Arc::clone(&provider))?;
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| TlsInspectError::Config(e.to_string()))?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(verifier))
            .with_no_client_auth();

        Ok(Self {
            connector: TlsConnector::from(Arc::new(config)),
            port: TLS_PORT,
        })
    }

    /// Creates an inspector that trusts the Mozilla root program (`webpki-roots`).
    pub fn with_webpki_roots() -> Result<Self, TlsInspectError> {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        Self::new(roots)
    }

    /// Overrides the target port (443 by default).
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Inspects the certificate `host` presents on the configured port.
    ///
    /// Never fails: errors become `CertificateFacts::Invalid`.
    pub async fn inspect(&self, host: &str, route: TlsRoute<'_>) -> CertificateFacts {
        match self.try_inspect(host, route).await {
            Ok(facts) => {
                info!("Certificate facts for {host}: {facts:?}");
                facts
            }
            Err(e) => {
                let error = error_chain_message(&e);
                warn!("Certificate inspection for {host} failed: {error}");
                CertificateFacts::Invalid { error }
            }
        }
    }

    async fn try_inspect(
        &self,
        host: &str,
        route: TlsRoute<'_>,
    ) -> Result<CertificateFacts, TlsInspectError> {
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| TlsInspectError::InvalidServerName(e.to_string()))?;

        let stream = match route {
            TlsRoute::Direct => self.connect_direct(host).await?,
            TlsRoute::ViaProxy(proxy) => {
                debug!("Opening tunnel to {host}:{} via {}", self.port, proxy.address());
                open_tunnel(proxy, host, self.port).await?.into_stream()
            }
        };

        let mut tls_stream = match tokio::time::timeout(
            Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
            self.connector.connect(server_name, stream),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(TlsInspectError::Handshake {
                    host: host.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(TlsInspectError::HandshakeTimeout {
                    host: host.to_string(),
                    secs: TLS_HANDSHAKE_TIMEOUT_SECS,
                })
            }
        };

        let (_, connection) = tls_stream.get_ref();
        debug!(
            "TLS session with {host}: {:?}, {:?}",
            connection.protocol_version(),
            connection.negotiated_cipher_suite().map(|cs| cs.suite())
        );
        let facts =
            facts_from_peer_certificates(connection.peer_certificates(), Local::now().naive_local());

        if let Err(e) = tls_stream.shutdown().await {
            debug!("TLS shutdown for {host} failed: {e}");
        }
        facts
    }

    async fn connect_direct(&self, host: &str) -> Result<TcpStream, TlsInspectError> {
        let address = format!("{host}:{}", self.port);
        debug!("Connecting to {address}");
        match tokio::time::timeout(
            Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
            TcpStream::connect((host, self.port)),
        )
        .await
        {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(source)) => Err(TlsInspectError::Connect { address, source }),
            Err(_) => Err(TlsInspectError::ConnectTimeout {
                address,
                secs: TCP_CONNECT_TIMEOUT_SECS,
            }),
        }
    }
}
