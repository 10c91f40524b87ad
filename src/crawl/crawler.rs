// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Breadth-first crawler aggregating resources across pages

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::collect::{collect_resources, ResourceManifest};
use crate::config::{AnalyzerConfig, DEFAULT_MAX_PAGES, MAX_DEPTH};
use crate::error::{ErrorKind, Result};
use crate::http::PageSource;
use crate::policy::OrderedSet;

lazy_static! {
    static ref ANCHOR_HREF: Regex = Regex::new(r#"(?i)<a[^>]+href=["']([^"'#?]+)["']"#).unwrap();
}

/// Crawler configuration
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Maximum link depth followed from the start page (0..=3)
    pub max_depth: u32,
    /// Maximum pages to visit
    pub max_pages: usize,
    /// Stay on the start page's origin
    pub same_origin_only: bool,
    /// Delay between requests
    pub delay: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 0,
            max_pages: DEFAULT_MAX_PAGES,
            same_origin_only: true,
            delay: Duration::ZERO,
        }
    }
}

impl CrawlConfig {
    /// Create a new crawler config
    pub fn new() -> Self {
        Self::default()
    }

    /// Crawl settings carried by an analyzer config
    pub fn from_analyzer(config: &AnalyzerConfig) -> Self {
        Self::new()
            .max_depth(config.depth)
            .max_pages(config.max_pages)
            .same_origin_only(config.same_origin_only)
            .delay(config.crawl_delay)
    }

    /// Set max depth, clamped to 3
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth.min(MAX_DEPTH);
        self
    }

    /// Set max pages
    pub fn max_pages(mut self, pages: usize) -> Self {
        self.max_pages = pages;
        self
    }

    /// Set same origin only
    pub fn same_origin_only(mut self, same_origin: bool) -> Self {
        self.same_origin_only = same_origin;
        self
    }

    /// Set delay between requests
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Why a page contributed nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipReason {
    /// Failure class, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    pub message: String,
}

/// What happened to one visited page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum PageStatus {
    /// Fetched and collected
    #[serde(rename_all = "camelCase")]
    Collected {
        final_url: String,
        http_status: u16,
        /// Links enqueued from this page
        links_queued: usize,
    },
    /// Fetch failed; the crawl carried on without it
    Skipped(SkipReason),
}

/// Per-page crawl record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageOutcome {
    pub url: String,
    pub depth: u32,
    pub status: PageStatus,
}

impl PageOutcome {
    pub fn is_collected(&self) -> bool {
        matches!(self.status, PageStatus::Collected { .. })
    }
}

/// Crawl result
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlReport {
    /// Every visited URL, fetched or not, in visit order
    pub pages: Vec<String>,
    /// Resources merged across collected pages
    pub resources: ResourceManifest,
    /// One record per visited URL
    pub outcomes: Vec<PageOutcome>,
}

impl CrawlReport {
    /// Number of pages that were actually collected
    pub fn collected(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_collected()).count()
    }
}

/// Sequential BFS crawler
///
/// Pages are fetched one at a time so `max_pages` is exact and the target
/// never sees concurrent requests.
pub struct Crawler {
    config: CrawlConfig,
    source: Arc<dyn PageSource>,
}

impl Crawler {
    /// Create a new crawler
    pub fn new(source: Arc<dyn PageSource>, config: CrawlConfig) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawl from `start_url`
    ///
    /// Fails only when `start_url` itself is not an absolute URL. Individual
    /// page failures are recorded as skipped outcomes.
    pub async fn crawl(&self, start_url: &str) -> Result<CrawlReport> {
        let start = Url::parse(start_url)?;
        let origin = start.origin();

        let mut visited: OrderedSet<String> = OrderedSet::new();
        let mut queue: VecDeque<(String, u32)> = VecDeque::new();
        let mut report = CrawlReport::default();
        queue.push_back((start.to_string(), 0));

        info!(
            "Crawling {} (depth {}, max {} pages)",
            start, self.config.max_depth, self.config.max_pages
        );

        while visited.len() < self.config.max_pages {
            let Some((url, depth)) = queue.pop_front() else {
                break;
            };
            if !visited.insert(url.clone()) {
                continue;
            }

            if !report.outcomes.is_empty() && !self.config.delay.is_zero() {
                tokio::time::sleep(self.config.delay).await;
            }

            debug!("Crawl step: {} at depth {}", url, depth);
            let status = match self.source.fetch(&url).await {
                Ok(page) => {
                    report
                        .resources
                        .merge(collect_resources(&page.html, &page.final_url));

                    let mut links_queued = 0;
                    if depth < self.config.max_depth {
                        for link in extract_links(&page.html, &page.final_url) {
                            if self.config.same_origin_only && link.origin() != origin {
                                continue;
                            }
                            let link = link.to_string();
                            if !visited.contains(link.as_str()) {
                                queue.push_back((link, depth + 1));
                                links_queued += 1;
                            }
                        }
                    }

                    PageStatus::Collected {
                        final_url: page.final_url,
                        http_status: page.status,
                        links_queued,
                    }
                }
                Err(e) => {
                    warn!("Skipping {}: {}", url, e);
                    PageStatus::Skipped(SkipReason {
                        kind: e.kind(),
                        message: e.to_string(),
                    })
                }
            };

            report.outcomes.push(PageOutcome { url, depth, status });
        }

        report.pages = visited.into_vec();
        info!(
            "Crawl finished: {} visited, {} collected",
            report.pages.len(),
            report.collected()
        );
        Ok(report)
    }
}

/// Anchor targets in raw HTML, resolved against `base`
///
/// A pattern scan rather than a DOM walk. Hrefs carrying a query or fragment
/// are not matched; only http(s) results are returned, de-duplicated in
/// document order.
pub fn extract_links(html: &str, base: &str) -> Vec<Url> {
    let Ok(base) = Url::parse(base) else {
        return Vec::new();
    };
    let mut seen = OrderedSet::new();
    for capture in ANCHOR_HREF.captures_iter(html) {
        if let Ok(link) = base.join(capture[1].trim()) {
            if matches!(link.scheme(), "http" | "https") {
                seen.insert(link);
            }
        }
    }
    seen.into_vec()
}
