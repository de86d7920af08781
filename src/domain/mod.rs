//! Target normalization.
//!
//! Turns whatever the user typed (`example.com`, `https://example.com/path`,
//! `HTTP://Example.com:8443`) into the origin URL used by the HTTP probe and the bare
//! host name used by the DNS and TLS probes.

use log::debug;
use serde::Serialize;

use crate::config::MAX_URL_LENGTH;
use crate::error_handling::InvalidTarget;

/// A probe-able target: scheme-qualified origin plus bare host.
///
/// `origin_url` always carries an explicit scheme; `host` never carries a scheme, port or
/// path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedTarget {
    host: String,
    origin_url: String,
}

impl NormalizedTarget {
    /// Normalizes a raw target string.
    ///
    /// Adds an `https://` prefix if the input has no `http://`/`https://` prefix, then
    /// validates the result with the URL parser.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTarget` if the input is empty, too long, uses a non-HTTP scheme,
    /// cannot be parsed, or has no host.
    pub fn parse(raw: &str) -> Result<Self, InvalidTarget> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(InvalidTarget::Empty);
        }
        if raw.len() > MAX_URL_LENGTH {
            return Err(InvalidTarget::TooLong {
                length: raw.len(),
                max: MAX_URL_LENGTH,
            });
        }

        let origin_url = if has_http_scheme(raw) {
            raw.to_string()
        } else if let Some(scheme) = leading_scheme(raw) {
            return Err(InvalidTarget::UnsupportedScheme(scheme.to_string()));
        } else {
            format!("https://{raw}")
        };

        let parsed = url::Url::parse(&origin_url).map_err(|e| InvalidTarget::Unparseable {
            url: origin_url.clone(),
            reason: e.to_string(),
        })?;

        let host = match parsed.host() {
            Some(url::Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            Some(url::Host::Ipv4(ip)) => ip.to_string(),
            Some(url::Host::Ipv6(ip)) => ip.to_string(),
            _ => return Err(InvalidTarget::MissingHost(origin_url)),
        };

        debug!("Normalized target {raw:?} to {origin_url} (host: {host})");
        Ok(Self { host, origin_url })
    }

    /// Bare host name (or IP literal) of the target.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Scheme-qualified URL the HTTP probe starts from.
    pub fn origin_url(&self) -> &str {
        &self.origin_url
    }
}

fn has_http_scheme(raw: &str) -> bool {
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// The scheme of `raw` if it starts with `<scheme>://`.
///
/// A `://` later in the path or query (`example.com/?next=https://...`) is not a scheme.
fn leading_scheme(raw: &str) -> Option<&str> {
    let (scheme, _) = raw.split_once("://")?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    let well_formed = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    well_formed.then_some(scheme)
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
