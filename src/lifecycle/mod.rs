//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Trigger → accept loop stops → listener dropped → process exits
//!
//! Signals (signals.rs):
//!     SIGINT (Ctrl-C) / SIGTERM → trigger shutdown
//! ```
//!
//! # Design Decisions
//! - In-flight transactions are not drained; they end with the runtime
//! - The accept loop is the only subscriber that must observe shutdown

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownReason};
