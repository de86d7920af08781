//! HTTP CONNECT tunnels.
//!
//! Opening a tunnel goes through two states:
//! - `ProxyConnection`: a plain TCP socket to the proxy
//! - `Tunnel`: the proxy accepted `CONNECT`, the socket is now a byte pipe to the target
//!
//! Every failure shuts the socket down before the error is returned. A `Tunnel` owns its
//! socket; dropping it closes the connection.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::ProxyEndpoint;
use crate::config::{
    PROXY_CONNECT_TIMEOUT_SECS, PROXY_RESPONSE_HEAD_LIMIT, PROXY_SUCCESS_MARKER,
};
use crate::error_handling::ProxyConnectError;

/// A plain TCP connection to the proxy, before `CONNECT`.
#[derive(Debug)]
pub struct ProxyConnection {
    stream: TcpStream,
    address: String,
}

/// An established CONNECT tunnel to `target`.
#[derive(Debug)]
pub struct Tunnel {
    stream: TcpStream,
    target: String,
}

impl Tunnel {
    /// `host:port` the tunnel leads to.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Hands the underlying socket over, e.g. to a TLS connector.
    pub fn into_stream(self) -> TcpStream {
        self.stream
    }
}

/// Opens a CONNECT tunnel to `target_host:target_port` through `proxy`.
///
/// # Errors
///
/// Returns `ProxyConnectError` if the proxy cannot be reached, does not answer in time,
/// or answers with anything but `200 Connection established`.
pub async fn open_tunnel(
    proxy: &ProxyEndpoint,
    target_host: &str,
    target_port: u16,
) -> Result<Tunnel, ProxyConnectError> {
    ProxyConnection::connect(proxy)
        .await?
        .establish(proxy, target_host, target_port)
        .await
}

impl ProxyConnection {
    /// Connects to the proxy, bounded by `PROXY_CONNECT_TIMEOUT_SECS`.
    pub async fn connect(proxy: &ProxyEndpoint) -> Result<Self, ProxyConnectError> {
        let address = proxy.address();
        log::debug!("Connecting to proxy {address}");
        let stream = match tokio::time::timeout(
            Duration::from_secs(PROXY_CONNECT_TIMEOUT_SECS),
            TcpStream::connect((proxy.host(), proxy.port())),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(ProxyConnectError::Connect { address, source }),
            Err(_) => {
                return Err(ProxyConnectError::Timeout {
                    address,
                    secs: PROXY_CONNECT_TIMEOUT_SECS,
                })
            }
        };
        Ok(Self { stream, address })
    }

    /// Sends `CONNECT` and validates the reply, consuming the connection.
    ///
    /// On failure the socket is shut down and dropped before the error is returned.
    pub async fn establish(
        mut self,
        proxy: &ProxyEndpoint,
        target_host: &str,
        target_port: u16,
    ) -> Result<Tunnel, ProxyConnectError> {
        let target = if target_host.contains(':') {
            format!("[{target_host}]:{target_port}")
        } else {
            format!("{target_host}:{target_port}")
        };
        let negotiated = tokio::time::timeout(
            Duration::from_secs(PROXY_CONNECT_TIMEOUT_SECS),
            self.negotiate(proxy, &target),
        )
        .await
        .unwrap_or_else(|_| {
            Err(ProxyConnectError::Timeout {
                address: self.address.clone(),
                secs: PROXY_CONNECT_TIMEOUT_SECS,
            })
        });

        match negotiated {
            Ok(()) => {
                log::debug!("Tunnel to {target} established via {}", self.address);
                Ok(Tunnel {
                    stream: self.stream,
                    target,
                })
            }
            Err(e) => {
                log::warn!("CONNECT to {target} via {} failed: {e}", self.address);
                self.close().await;
                Err(e)
            }
        }
    }

    async fn negotiate(
        &mut self,
        proxy: &ProxyEndpoint,
        target: &str,
    ) -> Result<(), ProxyConnectError> {
        let request = connect_request(target, &proxy.basic_auth());
        self.stream.write_all(request.as_bytes()).await?;

        let head = read_response_head(&mut self.stream).await?;
        let status_line = head.lines().next().unwrap_or_default().trim_end();
        if status_line.contains(PROXY_SUCCESS_MARKER) {
            Ok(())
        } else {
            Err(ProxyConnectError::Rejected(status_line.to_string()))
        }
    }

    async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            log::debug!("Shutdown of proxy socket {} failed: {e}", self.address);
        }
    }
}

/// Builds the CONNECT request for `target` (`host:port`).
pub(crate) fn connect_request(target: &str, authorization: &str) -> String {
    format!(
        "CONNECT {target} HTTP/1.1\r\n\
         Host: {target}\r\n\
         Proxy-Authorization: {authorization}\r\n\
         \r\n"
    )
}

/// Reads the proxy's reply up to the blank line ending its head.
///
/// Stops early at `PROXY_RESPONSE_HEAD_LIMIT` bytes or when the proxy closes the
/// connection after sending something.
async fn read_response_head(stream: &mut TcpStream) -> Result<String, ProxyConnectError> {
    let mut head = Vec::with_capacity(512);
    let mut buf = [0u8; 512];
    loop {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            if head.is_empty() {
                return Err(ProxyConnectError::Closed);
            }
            break;
        }
        head.extend_from_slice(&buf[..n]);
        if head.windows(4).any(|w| w == b"\r\n\r\n") || head.len() >= PROXY_RESPONSE_HEAD_LIMIT {
            break;
        }
    }
    Ok(String::from_utf8_lossy(&head).into_owned())
}
