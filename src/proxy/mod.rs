//! Upstream proxy support.
//!
//! - `ProxyEndpoint`: connection parameters parsed from the proxy URL
//! - `open_tunnel`: raw HTTP CONNECT with Basic authentication, used by the TLS
//!   inspector
//! - `ProxyHealthCheck`: geolocation pre-flight with fixed-delay retry

mod endpoint;
mod health;
mod tunnel;

// Re-export public API
pub use endpoint::ProxyEndpoint;
pub use health::{ProxyHealth, ProxyHealthCheck};
pub use tunnel::{open_tunnel, ProxyConnection, Tunnel};
