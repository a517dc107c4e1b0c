//! TCP listener implementation with backpressure.
//!
//! # Responsibilities
//! - Resolve and bind the configured host and port with an explicit backlog
//! - Accept incoming TCP connections
//! - Enforce max_connections limit via semaphore

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::Semaphore;

use crate::config::ListenerConfig;
use crate::error::ProxyError;

/// Bind `host:port` and start listening with the given backlog.
pub async fn open_listener(host: &str, port: u16, backlog: u32) -> Result<TcpListener, ProxyError> {
    let address = format!("{host}:{port}");
    let bind_error = |source: io::Error| ProxyError::Bind {
        address: address.clone(),
        source,
    };

    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
        .await
        .map_err(bind_error)?
        .collect();
    let addr = pick_bind_address(&addrs).ok_or_else(|| {
        bind_error(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "host resolved to no addresses",
        ))
    })?;

    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4(),
        SocketAddr::V6(_) => TcpSocket::new_v6(),
    }
    .map_err(bind_error)?;

    socket.set_reuseaddr(true).map_err(bind_error)?;
    socket.bind(addr).map_err(bind_error)?;
    socket.listen(backlog).map_err(bind_error)
}

/// First IPv4 address, else the first address of any family.
///
/// `localhost` resolves to `::1` first on many dual-stack hosts; listening
/// there alone would refuse clients dialing 127.0.0.1.
fn pick_bind_address(addrs: &[SocketAddr]) -> Option<SocketAddr> {
    addrs
        .iter()
        .copied()
        .find(SocketAddr::is_ipv4)
        .or_else(|| addrs.first().copied())
}

/// A bounded TCP listener that limits concurrent transactions.
///
/// When the limit is reached, accepting waits until a transaction
/// releases its permit.
pub struct Listener {
    inner: TcpListener,
    connection_limit: Arc<Semaphore>,
    max_connections: usize,
}

impl Listener {
    /// Bind to the configured address with connection limits.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ProxyError> {
        let listener = open_listener(&config.host, config.port, config.backlog).await?;

        let local_addr = listener.local_addr().map_err(|source| ProxyError::Bind {
            address: config.address(),
            source,
        })?;

        tracing::info!(
            address = %local_addr,
            backlog = config.backlog,
            max_connections = config.max_connections,
            "Listener bound"
        );

        Ok(Self {
            inner: listener,
            connection_limit: Arc::new(Semaphore::new(config.max_connections)),
            max_connections: config.max_connections,
        })
    }

    /// Accept a new connection, respecting the connection limit.
    ///
    /// The returned permit must be held for the connection's lifetime.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr, ConnectionPermit), ProxyError> {
        // Acquire permit first (backpressure)
        let permit = Arc::clone(&self.connection_limit)
            .acquire_owned()
            .await
            .map_err(|e| ProxyError::Accept(io::Error::other(e)))?;

        let (stream, addr) = self.inner.accept().await.map_err(ProxyError::Accept)?;

        tracing::debug!(
            peer_addr = %addr,
            available_permits = self.connection_limit.available_permits(),
            "Connection accepted"
        );

        Ok((stream, addr, ConnectionPermit { _permit: permit }))
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Current free transaction slots.
    pub fn available_permits(&self) -> usize {
        self.connection_limit.available_permits()
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }
}

/// A transaction slot; released when dropped, even if the handler panics.
#[derive(Debug)]
pub struct ConnectionPermit {
    _permit: tokio::sync::OwnedSemaphorePermit,
}
