//! Minimal forwarding HTTP proxy.
//!
//! A client connects, sends a URL, and gets back the origin's raw HTTP
//! response (or an empty reply if anything failed). The proxy issues a bare
//! `GET` to the origin and relays its bytes untouched, framing responses by
//! idleness since their length is not known in advance.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod proxy;
pub mod resilience;

pub use client::WebClient;
pub use config::ProxyConfig;
pub use error::ProxyError;
pub use lifecycle::Shutdown;
pub use proxy::ProxyServer;
