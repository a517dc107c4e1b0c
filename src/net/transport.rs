//! Socket transport primitives.
//!
//! # Responsibilities
//! - Open outbound connections with a deadline
//! - Write complete payloads
//! - Read messages whose length is unknown, ending on idleness
//!
//! # Design Decisions
//! - The idle window is applied per read via `tokio::time::timeout`; nothing
//!   is stored on the socket, so every receive leaves it as it found it
//! - Receives fail closed: an I/O error or undecodable text discards
//!   everything read so far instead of returning a truncated payload
//! - Operations are generic over `AsyncRead`/`AsyncWrite` so they work on any
//!   stream, not just TCP

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::Framing;
use crate::error::{ProxyError, Result};
use crate::http::is_complete_response;
use crate::resilience::timeouts::with_deadline;

/// Bytes requested per read.
pub const CHUNK_SIZE: usize = 1024;

/// Open a stream to `host:port`, giving up after `deadline`.
pub async fn connect(host: &str, port: u16, deadline: Duration) -> Result<TcpStream> {
    let stream = with_deadline(deadline, TcpStream::connect((host, port)))
        .await
        .map_err(|source| ProxyError::Connect {
            host: host.to_owned(),
            port,
            source,
        })?;

    tracing::debug!(host, port, "Connected");
    Ok(stream)
}

/// Write all of `payload` and flush it.
///
/// Text is sent as its UTF-8 bytes; an empty payload is a valid (empty)
/// message.
pub async fn send_all<W>(writer: &mut W, payload: impl AsRef<[u8]>) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let payload = payload.as_ref();
    writer.write_all(payload).await.map_err(ProxyError::Send)?;
    writer.flush().await.map_err(ProxyError::Send)?;
    tracing::trace!(bytes = payload.len(), "Payload sent");
    Ok(())
}

/// Read until the peer goes quiet for `idle`, closes, or `framing` says the
/// message is complete. I/O errors are returned.
pub async fn try_receive_framed<R>(reader: &mut R, idle: Duration, framing: Framing) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut received = Vec::new();
    let mut chunk = [0u8; CHUNK_SIZE];

    loop {
        let read = match tokio::time::timeout(idle, reader.read(&mut chunk)).await {
            Ok(read) => read.map_err(ProxyError::Receive)?,
            // idle window elapsed with nothing new
            Err(_) => break,
        };

        if read == 0 {
            break;
        }
        received.extend_from_slice(&chunk[..read]);

        if framing == Framing::ContentLength && is_complete_response(&received) {
            break;
        }
    }

    Ok(received)
}

/// Like [`try_receive_framed`], but any error yields an empty payload.
pub async fn receive_framed<R>(reader: &mut R, idle: Duration, framing: Framing) -> Vec<u8>
where
    R: AsyncRead + Unpin + ?Sized,
{
    match try_receive_framed(reader, idle, framing).await {
        Ok(received) => received,
        Err(e) => {
            tracing::warn!(error = %e, "Unable to receive data, discarding partial payload");
            Vec::new()
        }
    }
}

/// Read until the peer goes quiet for `idle` or closes.
///
/// Returns an empty payload when nothing arrived or a read failed.
pub async fn receive_until_idle<R>(reader: &mut R, idle: Duration) -> Vec<u8>
where
    R: AsyncRead + Unpin + ?Sized,
{
    receive_framed(reader, idle, Framing::Idle).await
}

/// [`receive_until_idle`] decoded as UTF-8; invalid text yields `""`.
pub async fn receive_text_until_idle<R>(reader: &mut R, idle: Duration) -> String
where
    R: AsyncRead + Unpin + ?Sized,
{
    let received = receive_until_idle(reader, idle).await;
    decode_text(received).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Unable to decode the received data");
        String::new()
    })
}

/// Strict UTF-8 decoding; no replacement characters.
pub fn decode_text(bytes: Vec<u8>) -> Result<String> {
    Ok(String::from_utf8(bytes)?)
}
