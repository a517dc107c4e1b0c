//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use forward_proxy::config::ProxyConfig;
use forward_proxy::error::ProxyError;
use forward_proxy::lifecycle::{Shutdown, ShutdownReason};
use forward_proxy::{ProxyServer, WebClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A loopback origin that records what it was asked.
pub struct MockOrigin {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    connections: Arc<AtomicUsize>,
}

impl MockOrigin {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

/// Start an origin answering every request with `respond(request_text)`.
///
/// After answering, the origin keeps the socket open for `hold_open` so the
/// proxy has to rely on its own framing to finish reading.
pub async fn start_origin<F>(respond: F, hold_open: Duration) -> MockOrigin
where
    F: Fn(&str) -> Vec<u8> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let connections = Arc::new(AtomicUsize::new(0));
    let respond = Arc::new(respond);

    let recorded = Arc::clone(&requests);
    let counted = Arc::clone(&connections);
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            counted.fetch_add(1, Ordering::SeqCst);
            let respond = Arc::clone(&respond);
            let recorded = Arc::clone(&recorded);

            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                recorded.lock().unwrap().push(request.clone());
                let _ = socket.write_all(&respond(&request)).await;
                tokio::time::sleep(hold_open).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockOrigin {
        addr,
        requests,
        connections,
    }
}

/// Origin that always sends the same bytes and then closes.
pub async fn start_fixed_origin(response: &'static [u8]) -> MockOrigin {
    start_origin(move |_| response.to_vec(), Duration::ZERO).await
}

/// Origin that accepts and reads but never answers.
pub async fn start_silent_origin() -> MockOrigin {
    start_origin(|_| Vec::new(), Duration::from_secs(3)).await
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut request = Vec::new();
    let mut chunk = [0u8; 512];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&request).into_owned()
}

/// A loopback port with nothing listening on it.
pub fn unused_port() -> u16 {
    let scratch = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    scratch.local_addr().unwrap().port()
}

/// Proxy config tuned for quick tests.
pub fn test_config() -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.listener.backlog = 16;
    config.timeouts.client_idle_ms = 100;
    config.timeouts.origin_idle_ms = 300;
    config.timeouts.connect_secs = 2;
    config
}

pub struct RunningProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<ShutdownReason, ProxyError>>,
}

impl RunningProxy {
    pub fn client(&self) -> WebClient {
        WebClient::new(self.addr.ip().to_string(), self.addr.port())
            .with_idle_timeout(Duration::from_secs(3))
    }
}

pub async fn start_proxy(config: ProxyConfig) -> RunningProxy {
    let server = ProxyServer::bind(&config).await.unwrap();
    let addr = server.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move { server.run(server_shutdown).await });

    RunningProxy {
        addr,
        shutdown,
        handle,
    }
}
