//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the per-run resources:
//! - Logger
//! - HTTP clients (probe and proxy health check)
//! - DNS resolver
//! - rustls crypto provider
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;
mod resolver;

use rustls::crypto::{ring::default_provider, CryptoProvider};

// Re-export public API
pub use client::{init_health_client, init_probe_client};
pub use logger::init_logger_with;
pub use resolver::init_resolver;

/// Initializes the crypto provider for TLS operations.
///
/// Configures the global crypto provider for `rustls`. Must be called before any
/// TLS connection relies on the process default provider.
pub fn init_crypto_provider() {
    // Err means a provider is already installed
    let _ = CryptoProvider::install_default(default_provider());
}
