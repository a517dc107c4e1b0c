//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind with backlog, accept loop, connection limits)
//!     → connection.rs (ids, roles, active-connection tracking)
//!     → transport.rs (connect, send-all, receive-until-idle)
//!     → Hand off to the proxy transaction
//! ```
//!
//! # Design Decisions
//! - Bounded concurrency prevents resource exhaustion
//! - Each connection is tracked until both of its sockets are closed
//! - Receives are framed by idleness, never by a stored socket timeout

pub mod connection;
pub mod listener;
pub mod transport;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionRole, ConnectionTracker};
pub use listener::{open_listener, ConnectionPermit, Listener};
pub use transport::{
    connect, receive_framed, receive_text_until_idle, receive_until_idle, send_all,
    try_receive_framed,
};
