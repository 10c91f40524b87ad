// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Crawler over HTTP against a mock site

use std::sync::Arc;
use std::time::Duration;

use autocsp::http::{HttpClient, PageFetcher};
use autocsp::{CrawlConfig, Crawler, ErrorKind, PageStatus};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn crawler(config: CrawlConfig, timeout: Duration) -> Crawler {
    let fetcher = PageFetcher::new(HttpClient::new().unwrap(), timeout, 0);
    Crawler::new(Arc::new(fetcher), config)
}

async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawler_link_following() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
            <script src="https://cdn.example.com/app.js"></script>
            <a href="/page2">Page 2</a>
            <a href="/page3">Page 3</a>
            <a href="https://elsewhere.example.org/">Off-site</a>
        </body></html>"#,
    )
    .await;
    mount_page(&mock_server, "/page2", r#"<img src="https://img.example.com/a.png">"#).await;
    mount_page(&mock_server, "/page3", "<style>body{color:red}</style>").await;

    let report = crawler(CrawlConfig::new().max_depth(1), Duration::from_secs(5))
        .crawl(&mock_server.uri())
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 3);
    assert!(report.pages.iter().all(|p| p.starts_with(&mock_server.uri())));
    assert!(report.resources.external_script_origins.contains("https://cdn.example.com"));
    assert!(report.resources.image_origins.contains("https://img.example.com"));
    assert_eq!(report.resources.inline_styles, vec!["body{color:red}"]);
    assert_eq!(report.collected(), 3);
}

#[tokio::test]
async fn test_crawler_depth_limit() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/level1">1</a>"#).await;
    mount_page(&mock_server, "/level1", r#"<a href="/level2">2</a>"#).await;
    mount_page(&mock_server, "/level2", r#"<a href="/level3">3</a>"#).await;
    mount_page(&mock_server, "/level3", "<p>bottom</p>").await;

    let report = crawler(CrawlConfig::new().max_depth(2), Duration::from_secs(5))
        .crawl(&mock_server.uri())
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 3);
    assert!(!report.pages.iter().any(|p| p.ends_with("/level3")));
    assert_eq!(report.outcomes.last().map(|o| o.depth), Some(2));
}

#[tokio::test]
async fn test_crawler_max_pages() {
    let mock_server = MockServer::start().await;

    let links: String = (0..20).map(|i| format!(r#"<a href="/p{}">{}</a>"#, i, i)).collect();
    mount_page(&mock_server, "/", &links).await;
    for i in 0..20 {
        mount_page(&mock_server, &format!("/p{}", i), "<p>leaf</p>").await;
    }

    let report = crawler(CrawlConfig::new().max_depth(3).max_pages(5), Duration::from_secs(5))
        .crawl(&mock_server.uri())
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 5);
}

#[tokio::test]
async fn test_crawler_survives_failing_pages() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/slow">slow</a><a href="/gone">gone</a><a href="/fine">fine</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/fine", "<script>fine()</script>").await;

    let report = crawler(CrawlConfig::new().max_depth(1), Duration::from_millis(500))
        .crawl(&mock_server.uri())
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 4);
    assert_eq!(report.resources.inline_scripts, vec!["fine()"]);

    let slow = report.outcomes.iter().find(|o| o.url.ends_with("/slow")).unwrap();
    match &slow.status {
        PageStatus::Skipped(reason) => assert_eq!(reason.kind, Some(ErrorKind::Timeout)),
        other => panic!("Expected skipped page, got {:?}", other),
    }

    // An unmatched route is a 404, which still counts as a fetched page
    let gone = report.outcomes.iter().find(|o| o.url.ends_with("/gone")).unwrap();
    match &gone.status {
        PageStatus::Collected { http_status, .. } => assert_eq!(*http_status, 404),
        other => panic!("Expected collected page, got {:?}", other),
    }
}
