//! The forwarding proxy.
//!
//! # Data Flow
//! ```text
//! server.rs (accept loop)
//!     → one spawned task per accepted client
//!     → transaction.rs:
//!         Accepted → RequestParsed → OriginConnecting → OriginRequested
//!         → OriginResponding → Relaying → Closed-Success
//!         (any step may end in Closed-Failure with a failure reply)
//! ```
//!
//! # Design Decisions
//! - Transactions share nothing but read-only settings
//! - Every failure still answers the client, so no client waits forever
//! - A task owns both of its sockets and closes them on every exit path

pub mod server;
pub mod transaction;

pub use server::ProxyServer;
pub use transaction::{serve_transaction, ForwardSettings, Outcome, TransactionState};
