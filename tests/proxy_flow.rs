//! End-to-end transactions through a running proxy.

use std::time::{Duration, Instant};

use forward_proxy::config::{FailureReporting, Framing};
use forward_proxy::lifecycle::ShutdownReason;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

mod common;

const PAGE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<html>hello</html>";

#[tokio::test]
async fn relays_origin_response_verbatim() {
    let origin = common::start_origin(|_| PAGE.to_vec(), Duration::from_secs(1)).await;
    let proxy = common::start_proxy(common::test_config()).await;

    let page = proxy.client().fetch(&origin.url("/")).await.unwrap();

    assert_eq!(page, PAGE);
    assert_eq!(
        origin.requests(),
        [format!("GET / HTTP/1.1\r\nHOST: {}\r\n\r\n", origin.addr)]
    );
    proxy.shutdown.trigger(ShutdownReason::Requested);
}

#[tokio::test]
async fn relays_binary_payloads() {
    const BINARY: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\n\x00\xff\x10\x80";
    let origin = common::start_fixed_origin(BINARY).await;
    let proxy = common::start_proxy(common::test_config()).await;

    let page = proxy.client().fetch(&origin.url("/blob")).await.unwrap();

    assert_eq!(page, BINARY);
    assert!(origin.requests()[0].starts_with("GET /blob/ HTTP/1.1\r\n"));
}

#[tokio::test]
async fn malformed_url_gets_empty_reply_without_contacting_origin() {
    let origin = common::start_fixed_origin(PAGE).await;
    let proxy = common::start_proxy(common::test_config()).await;

    let page = proxy.client().fetch("not a url").await.unwrap();

    assert!(page.is_empty());
    assert_eq!(origin.connections(), 0);
}

#[tokio::test]
async fn unreachable_origin_gets_empty_reply() {
    let proxy = common::start_proxy(common::test_config()).await;
    let url = format!("http://127.0.0.1:{}/", common::unused_port());

    let page = proxy.client().fetch(&url).await.unwrap();

    assert!(page.is_empty());
}

#[tokio::test]
async fn silent_origin_gets_empty_reply() {
    let origin = common::start_silent_origin().await;
    let proxy = common::start_proxy(common::test_config()).await;

    let page = proxy.client().fetch(&origin.url("/slow")).await.unwrap();

    assert!(page.is_empty());
    assert_eq!(origin.requests().len(), 1);
}

#[tokio::test]
async fn client_that_sends_nothing_is_answered_and_closed() {
    let proxy = common::start_proxy(common::test_config()).await;
    let mut stream = TcpStream::connect(proxy.addr).await.unwrap();

    let mut reply = Vec::new();
    let read = tokio::time::timeout(Duration::from_secs(3), stream.read_to_end(&mut reply))
        .await
        .expect("proxy left the client hanging");

    assert_eq!(read.unwrap(), 0);
}

#[tokio::test]
async fn trailing_newline_from_line_clients_is_ignored() {
    let origin = common::start_fixed_origin(PAGE).await;
    let proxy = common::start_proxy(common::test_config()).await;

    let mut stream = TcpStream::connect(proxy.addr).await.unwrap();
    stream.write_all(format!("{}\n", origin.url("/")).as_bytes()).await.unwrap();

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).await.unwrap();
    assert_eq!(reply, PAGE);
}

#[tokio::test]
async fn status_reporting_describes_failures() {
    let mut config = common::test_config();
    config.forwarding.failure_reporting = FailureReporting::Status;
    let proxy = common::start_proxy(config).await;
    let client = proxy.client();

    let unreachable = format!("http://127.0.0.1:{}/", common::unused_port());
    let reply = client.fetch_text(&unreachable).await.unwrap();
    assert!(reply.starts_with("HTTP/1.1 502 Bad Gateway\r\n"), "{reply}");

    let reply = client.fetch_text("not a url").await.unwrap();
    assert!(reply.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{reply}");
}

#[tokio::test]
async fn content_length_framing_does_not_wait_for_idle() {
    const SIZED: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";
    let origin = common::start_origin(|_| SIZED.to_vec(), Duration::from_secs(5)).await;

    let mut config = common::test_config();
    config.timeouts.origin_idle_ms = 4000;
    config.forwarding.framing = Framing::ContentLength;
    let proxy = common::start_proxy(config).await;

    let started = Instant::now();
    let page = proxy
        .client()
        .with_idle_timeout(Duration::from_secs(6))
        .fetch(&origin.url("/"))
        .await
        .unwrap();

    assert_eq!(page, SIZED);
    assert!(started.elapsed() < Duration::from_secs(3), "took {:?}", started.elapsed());
}

#[tokio::test]
async fn shutdown_stops_accepting() {
    let proxy = common::start_proxy(common::test_config()).await;

    proxy.shutdown.trigger(ShutdownReason::Interrupt);
    let reason = proxy.handle.await.unwrap().unwrap();
    assert_eq!(reason, ShutdownReason::Interrupt);

    assert!(TcpStream::connect(proxy.addr).await.is_err());
}
