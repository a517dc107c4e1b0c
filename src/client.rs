//! Reference client for the proxy's wire protocol.
//!
//! Connects, sends one URL, reads until idle or until the proxy closes,
//! and hangs up. An empty result is how the proxy reports any failure.

use std::time::Duration;

use tokio::io::AsyncWriteExt;

use crate::error::{ProxyError, Result};
use crate::net::transport::decode_text;
use crate::net::{connect, receive_until_idle, send_all};

/// Default idle window when waiting for the proxy's reply.
pub const DEFAULT_IDLE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct WebClient {
    proxy_host: String,
    proxy_port: u16,
    idle_timeout: Duration,
    connect_timeout: Duration,
}

impl WebClient {
    pub fn new(proxy_host: impl Into<String>, proxy_port: u16) -> Self {
        Self {
            proxy_host: proxy_host.into(),
            proxy_port,
            idle_timeout: DEFAULT_IDLE,
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Idle window for the reply. Must exceed the proxy's total time to
    /// first byte, since the first read waits for it too.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Request `url` through the proxy and return the raw reply.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let mut stream = connect(&self.proxy_host, self.proxy_port, self.connect_timeout).await?;
        send_all(&mut stream, url).await?;
        let page = receive_until_idle(&mut stream, self.idle_timeout).await;
        if let Err(e) = stream.shutdown().await {
            tracing::trace!(error = %e, "Shutdown on close failed");
        }
        Ok(page)
    }

    /// [`WebClient::fetch`] decoded as UTF-8.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let page = self.fetch(url).await?;
        decode_text(page).or_else(|e| match e {
            ProxyError::Encoding(e) => {
                tracing::warn!(error = %e, "Unable to decode the received page");
                Ok(String::new())
            }
            other => Err(other),
        })
    }
}
