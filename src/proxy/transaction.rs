//! One client transaction: request line in, origin response out.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::config::{FailureReporting, Framing, ProxyConfig};
use crate::error::ProxyError;
use crate::http::{failure_reply, parse_url, FailureReason, UrlError};
use crate::net::{connect, receive_framed, receive_text_until_idle, send_all, ConnectionRole};

/// Read-only policy shared by every transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardSettings {
    pub client_idle: Duration,
    pub origin_idle: Duration,
    pub connect_timeout: Duration,
    pub origin_port: u16,
    pub framing: Framing,
    pub failure_reporting: FailureReporting,
}

impl ForwardSettings {
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            client_idle: config.timeouts.client_idle(),
            origin_idle: config.timeouts.origin_idle(),
            connect_timeout: config.timeouts.connect(),
            origin_port: config.forwarding.origin_port,
            framing: config.forwarding.framing,
            failure_reporting: config.forwarding.failure_reporting,
        }
    }
}

impl Default for ForwardSettings {
    fn default() -> Self {
        Self::from_config(&ProxyConfig::default())
    }
}

/// Steps of a transaction, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Accepted,
    RequestParsed,
    OriginConnecting,
    OriginRequested,
    OriginResponding,
    Relaying,
    ClosedSuccess,
    ClosedFailure,
}

/// How a transaction ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The origin response was relayed in full.
    Relayed { bytes: usize },
    /// The client was sent a failure reply.
    Failed(FailureReason),
    /// The client went away before the response could be relayed.
    ClientLost,
}

impl Outcome {
    /// Label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Relayed { .. } => "relayed",
            Outcome::Failed(reason) => reason.as_str(),
            Outcome::ClientLost => "client_lost",
        }
    }

    pub fn final_state(&self) -> TransactionState {
        match self {
            Outcome::Relayed { .. } => TransactionState::ClosedSuccess,
            Outcome::Failed(_) | Outcome::ClientLost => TransactionState::ClosedFailure,
        }
    }
}

enum Stop {
    Failed(FailureReason),
    RelayFailed(ProxyError),
}

impl From<FailureReason> for Stop {
    fn from(reason: FailureReason) -> Self {
        Stop::Failed(reason)
    }
}

/// Serve one transaction on `client`.
///
/// Never returns an error: every failure is answered on `client` and
/// reported through the [`Outcome`]. Closing `client` is left to the caller.
pub async fn serve_transaction<C>(client: &mut C, settings: &ForwardSettings) -> Outcome
where
    C: AsyncRead + AsyncWrite + Unpin,
{
    let outcome = match forward(client, settings).await {
        Ok(bytes) => Outcome::Relayed { bytes },
        Err(Stop::Failed(reason)) => {
            tracing::warn!(reason = reason.as_str(), "Couldn't serve the client: {}", reason);
            let reply = failure_reply(settings.failure_reporting, reason);
            if let Err(e) = send_all(client, &reply).await {
                tracing::debug!(error = %e, "Failure reply not delivered");
            }
            Outcome::Failed(reason)
        }
        Err(Stop::RelayFailed(e)) => {
            tracing::warn!(error = %e, "Couldn't relay the response to the client");
            Outcome::ClientLost
        }
    };

    tracing::debug!(state = ?outcome.final_state(), outcome = outcome.label(), "Transaction finished");
    outcome
}

async fn forward<C>(client: &mut C, settings: &ForwardSettings) -> Result<usize, Stop>
where
    C: AsyncRead + AsyncWrite + Unpin,
{
    enter(TransactionState::Accepted);
    let requested = receive_text_until_idle(client, settings.client_idle).await;
    let requested = requested.trim();
    let origin_request = parse_url(requested)
        .map_err(ProxyError::from)
        .map_err(|e| {
            let reason = rejection_reason(&e);
            if reason == FailureReason::MalformedUrl {
                tracing::warn!(url = requested, error = %e, "Rejected the request");
            }
            reason
        })?;
    tracing::info!(url = requested, "The client has requested a page");
    enter(TransactionState::RequestParsed);

    enter(TransactionState::OriginConnecting);
    let (host, port) = origin_request.origin_address(settings.origin_port);
    let mut origin = connect(host, port, settings.connect_timeout)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, timed_out = e.is_timeout(), "Origin unreachable");
            FailureReason::OriginUnreachable
        })?;
    tracing::info!(host = %origin_request.host, port, "Successfully connected to the origin");

    enter(TransactionState::OriginRequested);
    if let Err(e) = send_all(&mut origin, origin_request.to_request_text()).await {
        tracing::warn!(error = %e, "Couldn't send the request to the origin");
        close(origin, ConnectionRole::OriginFacing).await;
        return Err(FailureReason::OriginSendFailed.into());
    }

    enter(TransactionState::OriginResponding);
    let response = receive_framed(&mut origin, settings.origin_idle, settings.framing).await;
    if response.is_empty() {
        close(origin, ConnectionRole::OriginFacing).await;
        return Err(FailureReason::EmptyOriginResponse.into());
    }

    enter(TransactionState::Relaying);
    let relayed = send_all(client, &response).await;
    close(origin, ConnectionRole::OriginFacing).await;
    relayed.map_err(Stop::RelayFailed)?;

    tracing::info!(bytes = response.len(), "The page has been received and transferred");
    Ok(response.len())
}

/// Failure reported to a client whose request line could not be used.
fn rejection_reason(error: &ProxyError) -> FailureReason {
    match error {
        ProxyError::Parse(UrlError::Empty) => FailureReason::EmptyRequest,
        _ => FailureReason::MalformedUrl,
    }
}

fn enter(state: TransactionState) {
    tracing::debug!(?state, "Transaction state");
}

/// Shut down and drop `stream`, ignoring errors from an already-closed peer.
pub(crate) async fn close<S>(mut stream: S, role: ConnectionRole)
where
    S: AsyncWrite + Unpin,
{
    if let Err(e) = stream.shutdown().await {
        tracing::trace!(role = role.as_str(), error = %e, "Shutdown on close failed");
    }
    drop(stream);
    tracing::trace!(role = role.as_str(), "Socket closed");
}
