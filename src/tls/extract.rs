//! Certificate extraction utilities.

use chrono::{DateTime, NaiveDateTime};
use rustls::pki_types::CertificateDer;
use x509_parser::certificate::X509Certificate;

use super::CertificateFacts;
use crate::config::UNKNOWN;
use crate::error_handling::TlsInspectError;

/// Textual form of `notAfter`, e.g. `Jun 01 12:00:00 2030 GMT`.
pub(crate) const NOT_AFTER_FORMAT: &str = "%b %d %H:%M:%S %Y GMT";

const SECONDS_PER_DAY: i64 = 86_400;

/// Parses a `notAfter` string in `NOT_AFTER_FORMAT`.
pub fn parse_not_after(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, NOT_AFTER_FORMAT).ok()
}

/// Builds the facts for the leaf of a presented chain.
///
/// `now` is a local wall-clock time; the difference to `notAfter` is taken without time
/// zone adjustment and floored to whole days.
///
/// # Errors
///
/// `NoCertificate` if the chain is absent or empty, `Parse` if the leaf is not a valid
/// X.509 certificate.
pub(crate) fn facts_from_peer_certificates(
    peer: Option<&[CertificateDer<'_>]>,
    now: NaiveDateTime,
) -> Result<CertificateFacts, TlsInspectError> {
    let leaf = peer
        .and_then(|chain| chain.first())
        .ok_or(TlsInspectError::NoCertificate)?;
    let (_, cert) = x509_parser::parse_x509_certificate(leaf.as_ref())
        .map_err(|e| TlsInspectError::Parse(e.to_string()))?;

    let not_after = format_not_after(&cert)?;
    let expires = parse_not_after(&not_after)
        .ok_or_else(|| TlsInspectError::Parse(format!("Unreadable expiry date '{not_after}'")))?;
    let days_remaining = (expires - now).num_seconds().div_euclid(SECONDS_PER_DAY);

    Ok(CertificateFacts::Valid {
        not_after,
        days_remaining,
        issuer_org: issuer_organization(&cert),
    })
}

fn format_not_after(cert: &X509Certificate<'_>) -> Result<String, TlsInspectError> {
    let timestamp = cert.validity().not_after.timestamp();
    DateTime::from_timestamp(timestamp, 0)
        .map(|at| at.format(NOT_AFTER_FORMAT).to_string())
        .ok_or_else(|| TlsInspectError::Parse(format!("notAfter out of range: {timestamp}")))
}

/// Issuer `organizationName`; the last attribute wins when there are several.
fn issuer_organization(cert: &X509Certificate<'_>) -> String {
    cert.issuer()
        .iter_organization()
        .last()
        .and_then(|attr| attr.as_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN.to_string())
}
