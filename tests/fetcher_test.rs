// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Page fetcher against a mock origin

use std::time::{Duration, Instant};

use autocsp::http::{HttpClient, PageFetcher, DEFAULT_USER_AGENT};
use autocsp::{AnalyzerConfig, Error, ErrorKind};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn fetcher(timeout: Duration, retries: u32) -> PageFetcher {
    PageFetcher::new(HttpClient::new().unwrap(), timeout, retries)
}

#[tokio::test]
async fn test_follows_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", mock_server.uri()).as_str()),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>moved</p>"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/old", mock_server.uri());
    let page = fetcher(Duration::from_secs(5), 0).fetch(&url).await.unwrap();

    assert_eq!(page.url, url);
    assert_eq!(page.final_url, format!("{}/new", mock_server.uri()));
    assert_eq!(page.status, 200);
    assert_eq!(page.html, "<p>moved</p>");
    assert!(page.redirected());
}

#[tokio::test]
async fn test_extracts_csp_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Security-Policy", "default-src 'self'; object-src 'none'")
                .set_body_string("<html></html>"),
        )
        .mount(&mock_server)
        .await;

    let page = fetcher(Duration::from_secs(5), 0).fetch(&mock_server.uri()).await.unwrap();

    assert_eq!(page.csp_header.as_deref(), Some("default-src 'self'; object-src 'none'"));
    assert!(page.headers.contains_key("content-security-policy"));
}

#[tokio::test]
async fn test_error_status_body_returned() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<h1>Not here</h1>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let page = fetcher(Duration::from_secs(5), 2)
        .fetch(&format!("{}/missing", mock_server.uri()))
        .await
        .unwrap();

    // Status codes are not retried
    assert_eq!(page.status, 404);
    assert_eq!(page.html, "<h1>Not here</h1>");
    assert!(!page.is_success());
}

#[tokio::test]
async fn test_sends_product_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let fetcher = PageFetcher::from_config(&AnalyzerConfig::new()).unwrap();
    let page = fetcher.fetch(&mock_server.uri()).await.unwrap();

    assert_eq!(page.status, 200);
    assert!(DEFAULT_USER_AGENT.starts_with("AutoCSP/"));
}

#[tokio::test]
async fn test_timeout_classified_and_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let start = Instant::now();
    let err = fetcher(Duration::from_millis(200), 1)
        .fetch(&mock_server.uri())
        .await
        .unwrap_err();

    match err {
        Error::Fetch(e) => {
            assert_eq!(e.kind, ErrorKind::Timeout);
            assert_eq!(e.attempt, 2);
            assert_eq!(e.retries, 1);
        }
        other => panic!("Expected fetch error, got {:?}", other),
    }
    // Two 200ms attempts plus one 150ms backoff, well short of the server delay
    assert!(start.elapsed() < Duration::from_secs(2));
}

/// Serve one response that promises 100 body bytes but sends only a few,
/// holding the connection open for `hold` before closing it.
async fn short_body_server(hold: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 100\r\n\r\n<html>")
                .await;
            tokio::time::sleep(hold).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_truncated_body_degrades_to_empty() {
    let url = short_body_server(Duration::ZERO).await;

    let page = fetcher(Duration::from_secs(5), 0).fetch(&url).await.unwrap();

    assert_eq!(page.status, 200);
    assert_eq!(page.html, "");
    assert_eq!(page.content_type(), Some("text/html"));
}

#[tokio::test]
async fn test_stalled_body_degrades_to_empty() {
    let url = short_body_server(Duration::from_secs(3)).await;

    let start = Instant::now();
    let page = fetcher(Duration::from_millis(500), 0).fetch(&url).await.unwrap();

    // Headers arrived in time; the body read shares the attempt deadline
    assert_eq!(page.status, 200);
    assert_eq!(page.html, "");
    assert!(start.elapsed() < Duration::from_secs(2));
}
