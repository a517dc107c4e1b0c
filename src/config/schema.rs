//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the forward proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listening socket settings.
    pub listener: ListenerConfig,

    /// Idle windows and connect deadline.
    pub timeouts: TimeoutConfig,

    /// How requests reach the origin and how failures are reported.
    pub forwarding: ForwardingConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host name or address to bind.
    pub host: String,

    /// Port to bind; 0 picks an ephemeral port.
    pub port: u16,

    /// OS listen backlog.
    pub backlog: u32,

    /// Maximum concurrent transactions (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 50015,
            backlog: 1,
            max_connections: 1024,
        }
    }
}

impl ListenerConfig {
    /// `host:port` form used in logs and errors.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Idle window when reading the URL from a client, in milliseconds.
    pub client_idle_ms: u64,

    /// Idle window when reading the origin response, in milliseconds.
    pub origin_idle_ms: u64,

    /// Origin connection deadline in seconds.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            client_idle_ms: 1000,
            origin_idle_ms: 2000,
            connect_secs: 10,
        }
    }
}

impl TimeoutConfig {
    pub fn client_idle(&self) -> Duration {
        Duration::from_millis(self.client_idle_ms)
    }

    pub fn origin_idle(&self) -> Duration {
        Duration::from_millis(self.origin_idle_ms)
    }

    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

/// How the end of an origin response is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Framing {
    /// Stop once no bytes arrive for the idle window.
    #[default]
    Idle,
    /// Stop once `Content-Length` says the response is complete,
    /// falling back to idle framing when the header is missing.
    ContentLength,
}

/// What a client receives when its transaction fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReporting {
    /// An empty payload, indistinguishable across failure kinds.
    #[default]
    Empty,
    /// A minimal HTTP response carrying a status and a reason.
    Status,
}

/// Origin-facing behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Port dialed when the URL host carries none.
    pub origin_port: u16,

    /// Response framing strategy.
    pub framing: Framing,

    /// Failure reply strategy.
    pub failure_reporting: FailureReporting,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            origin_port: 80,
            framing: Framing::Idle,
            failure_reporting: FailureReporting::Empty,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
