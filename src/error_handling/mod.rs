//! Error handling.
//!
//! This module provides the error taxonomy of a diagnostic run:
//! - **Fatal**: initialization failures, an invalid target, an unusable proxy URL
//! - **Probe-local**: proxy tunnel and TLS inspection failures, which are converted into
//!   result values at the probe boundary and never abort the run
//!
//! DNS failures have no error type of their own: they are recorded inline in
//! `DnsRecordSet`. HTTP transport failures end up as `HttpProbeResult::Failure`.

mod types;

// Re-export public API
pub use types::{
    HttpTransportError, InitializationError, InvalidTarget, ProxyConfigError, ProxyConnectError,
    TlsInspectError,
};

/// Renders an error together with its chain of causes.
///
/// `reqwest` and `hickory` keep the interesting part of a failure (connection refused,
/// certificate expired, ...) in the source chain, while their own `Display` is generic.
pub fn error_chain_message(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_chain_message_includes_source() {
        let err = ProxyConnectError::Connect {
            address: "proxy.local:9000".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        };
        let message = error_chain_message(&err);
        assert!(message.starts_with("Failed to connect to proxy proxy.local:9000"));
        assert!(message.contains("refused"));
    }

    #[test]
    fn test_error_chain_message_does_not_repeat_causes() {
        // Display already embeds the source, so it must not be appended twice
        let err = TlsInspectError::Tunnel(ProxyConnectError::Rejected(
            "HTTP/1.1 407 Proxy Authentication Required".to_string(),
        ));
        assert_eq!(
            error_chain_message(&err),
            "Proxy connection failed: HTTP/1.1 407 Proxy Authentication Required"
        );
    }

    #[test]
    fn test_no_certificate_message() {
        assert_eq!(
            TlsInspectError::NoCertificate.to_string(),
            "No certificate found"
        );
    }
}
