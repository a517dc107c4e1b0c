//! Error taxonomy shared by every subsystem.
//!
//! Errors raised while serving one client never leave that client's
//! transaction; only [`ProxyError::Bind`] and [`ProxyError::Accept`] reach
//! the process boundary.

use std::io;

use thiserror::Error;

use crate::http::UrlError;

/// Errors that can occur while proxying.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The listening socket could not be set up.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The accept loop failed at the socket level.
    #[error("Failed to accept: {0}")]
    Accept(#[source] io::Error),

    /// Outbound connection was refused, unresolvable or timed out.
    #[error("Couldn't connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Writing a payload failed before it was fully flushed.
    #[error("Send failed: {0}")]
    Send(#[source] io::Error),

    /// Reading failed mid-transfer.
    #[error("Receive failed: {0}")]
    Receive(#[source] io::Error),

    /// The requested URL could not be split into host and path.
    #[error("Invalid URL format: {0}")]
    Parse(#[from] UrlError),

    /// A payload was not valid UTF-8.
    #[error("Payload is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl ProxyError {
    /// Whether the error came from a deadline rather than the peer.
    pub fn is_timeout(&self) -> bool {
        match self {
            ProxyError::Connect { source, .. }
            | ProxyError::Send(source)
            | ProxyError::Receive(source) => source.kind() == io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
