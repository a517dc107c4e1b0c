//! Concurrent transactions stay isolated.

use std::time::Duration;

mod common;

fn page(body: &str) -> Vec<u8> {
    format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{}", body.len(), body).into_bytes()
}

#[tokio::test]
async fn simultaneous_clients_get_their_own_responses() {
    let first = common::start_origin(|_| page(&"a".repeat(4000)), Duration::from_millis(500)).await;
    let second = common::start_origin(|_| page(&"b".repeat(4000)), Duration::from_millis(500)).await;
    let proxy = common::start_proxy(common::test_config()).await;

    let client = proxy.client();
    let (url_a, url_b) = (first.url("/a"), second.url("/b"));
    let (a, b) = tokio::join!(client.fetch(&url_a), client.fetch(&url_b));

    assert_eq!(a.unwrap(), page(&"a".repeat(4000)));
    assert_eq!(b.unwrap(), page(&"b".repeat(4000)));
}

#[tokio::test]
async fn many_clients_each_get_their_path_back() {
    // echo the request line back as the body
    let origin = common::start_origin(
        |request| page(request.lines().next().unwrap_or_default()),
        Duration::from_millis(200),
    )
    .await;
    let proxy = common::start_proxy(common::test_config()).await;
    let client = proxy.client();

    let fetches = (0..10).map(|i| {
        let client = client.clone();
        let url = origin.url(&format!("/item/{i}"));
        tokio::spawn(async move { (i, client.fetch_text(&url).await) })
    });

    for fetch in fetches.collect::<Vec<_>>() {
        let (i, reply) = fetch.await.unwrap();
        let reply = reply.unwrap();
        assert!(
            reply.ends_with(&format!("GET /item/{i}/ HTTP/1.1")),
            "client {i} got {reply:?}"
        );
    }
    assert_eq!(origin.connections(), 10);
}

#[tokio::test]
async fn connection_limit_queues_rather_than_drops() {
    let origin = common::start_origin(|_| page("ok"), Duration::from_millis(100)).await;
    let mut config = common::test_config();
    config.listener.max_connections = 1;
    let proxy = common::start_proxy(config).await;

    let client = proxy.client().with_idle_timeout(Duration::from_secs(5));
    let (url_1, url_2) = (origin.url("/1"), origin.url("/2"));
    let (a, b) = tokio::join!(client.fetch(&url_1), client.fetch(&url_2));

    assert_eq!(a.unwrap(), page("ok"));
    assert_eq!(b.unwrap(), page("ok"));
}
