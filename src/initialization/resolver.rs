//! DNS resolver initialization.
//!
//! This module provides functions to initialize the DNS resolver with proper
//! timeout configuration.

use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::system_conf::read_system_conf;
use hickory_resolver::TokioAsyncResolver;

/// Initializes the DNS resolver for record lookups.
///
/// Uses the host's resolver configuration (`/etc/resolv.conf` or the platform
/// equivalent). If it cannot be read, falls back to the resolver's built-in default
/// upstreams and logs a warning.
///
/// Each query gets a single attempt with a `DNS_TIMEOUT_SECS` timeout so that a
/// record type never takes much longer than the configured bound.
pub fn init_resolver() -> TokioAsyncResolver {
    let (config, mut opts) = match read_system_conf() {
        Ok(system) => system,
        Err(e) => {
            log::warn!("Failed to read system DNS configuration, using defaults: {e}");
            (ResolverConfig::default(), ResolverOpts::default())
        }
    };

    opts.timeout = Duration::from_secs(crate::config::DNS_TIMEOUT_SECS);
    opts.attempts = 1;
    // Set ndots to 0 to prevent search domain appending
    opts.ndots = 0;

    TokioAsyncResolver::tokio(config, opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_resolver_builds_without_network() {
        // Construction must not perform any query
        let _resolver = init_resolver();
    }
}
