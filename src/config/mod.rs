//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (host, port, log level)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → ForwardSettings shared via Arc with every transaction
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the proxy runs with no file at all
//! - Validation separates syntactic (serde) from semantic checks
//! - Config is read once at startup; there is no reload

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    FailureReporting, ForwardingConfig, Framing, ListenerConfig, ObservabilityConfig, ProxyConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
