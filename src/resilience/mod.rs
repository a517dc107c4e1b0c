//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Connect to origin:
//!     → timeouts.rs (enforce connect deadline)
//!     → on elapse: TimedOut I/O error, reported as a connect failure
//! ```
//!
//! # Design Decisions
//! - Every outbound connect has a deadline
//! - No retries: a failed transaction is reported to the client once

pub mod timeouts;
