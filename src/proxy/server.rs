//! Accept loop and per-connection dispatch.
//!
//! # Responsibilities
//! - Own the listening socket
//! - Spawn one task per accepted client
//! - Stop accepting when shutdown is triggered
//! - Record per-transaction logs and metrics

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tracing::Instrument;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::lifecycle::ShutdownReason;
use crate::net::{ConnectionGuard, ConnectionPermit, ConnectionRole, ConnectionTracker, Listener};
use crate::observability::metrics;
use crate::proxy::transaction::{close, serve_transaction, ForwardSettings, Outcome};

/// The forwarding proxy server.
pub struct ProxyServer {
    listener: Listener,
    settings: Arc<ForwardSettings>,
    tracker: ConnectionTracker,
}

impl ProxyServer {
    /// Bind the listener described by `config`.
    pub async fn bind(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let listener = Listener::bind(&config.listener).await?;
        Ok(Self::from_listener(listener, ForwardSettings::from_config(config)))
    }

    pub fn from_listener(listener: Listener, settings: ForwardSettings) -> Self {
        Self {
            listener,
            settings: Arc::new(settings),
            tracker: ConnectionTracker::new(),
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle onto the live-connection count.
    pub fn tracker(&self) -> ConnectionTracker {
        self.tracker.clone()
    }

    /// Accept clients until `shutdown` fires.
    ///
    /// A dropped shutdown coordinator counts as a request to stop. Accept
    /// failures end the loop with an error; failures inside a transaction
    /// never do.
    pub async fn run(
        self,
        mut shutdown: broadcast::Receiver<ShutdownReason>,
    ) -> Result<ShutdownReason, ProxyError> {
        tracing::info!(
            address = ?self.listener.local_addr().ok(),
            "Ready to accept clients"
        );

        loop {
            tokio::select! {
                reason = shutdown.recv() => {
                    let reason = reason.unwrap_or(ShutdownReason::Requested);
                    tracing::info!(
                        ?reason,
                        in_flight = self.tracker.active_count(),
                        "Accept loop stopping"
                    );
                    return Ok(reason);
                }
                accepted = self.listener.accept() => {
                    let (stream, peer, permit) = accepted?;
                    let guard = self.tracker.track();
                    tracing::info!(
                        peer_addr = %peer,
                        connection_id = %guard.id(),
                        "Client has connected"
                    );
                    tokio::spawn(handle_connection(
                        stream,
                        peer,
                        Arc::clone(&self.settings),
                        guard,
                        permit,
                    ));
                }
            }
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    settings: Arc<ForwardSettings>,
    guard: ConnectionGuard,
    _permit: ConnectionPermit,
) {
    let span = tracing::info_span!(
        "transaction",
        connection_id = %guard.id(),
        peer_addr = %peer
    );

    async move {
        let started = Instant::now();
        let outcome = serve_transaction(&mut stream, &settings).await;
        close(stream, ConnectionRole::ClientFacing).await;

        metrics::record_transaction(outcome.label(), started);
        match outcome {
            Outcome::Relayed { bytes } => {
                metrics::record_relayed_bytes(bytes);
                tracing::info!(
                    bytes,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Successfully served the client"
                );
            }
            Outcome::Failed(_) | Outcome::ClientLost => {
                tracing::info!(outcome = outcome.label(), "Transaction closed");
            }
        }
        drop(guard);
    }
    .instrument(span)
    .await
}
