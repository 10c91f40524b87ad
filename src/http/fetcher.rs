// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Page fetcher with per-attempt deadline and linear retry backoff

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use super::client::{HttpClient, HttpClientConfig};
use super::response::FetchedPage;
use crate::config::AnalyzerConfig;
use crate::error::{ErrorKind, FetchError, Result};

/// Backoff unit; attempt `n` sleeps `n * RETRY_BACKOFF` before retrying
pub const RETRY_BACKOFF: Duration = Duration::from_millis(150);

/// Anything that can turn a URL into a fetched page
///
/// The crawler is written against this trait so tests can substitute an
/// in-memory site.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch a single page
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// Fetches pages over HTTP
///
/// Only transport failures (timeouts, connection errors) are retried. A
/// 4xx/5xx response is a successful fetch and its body is still returned.
#[derive(Clone)]
pub struct PageFetcher {
    client: HttpClient,
    timeout: Duration,
    max_retries: u32,
}

impl PageFetcher {
    /// Create a fetcher
    pub fn new(client: HttpClient, timeout: Duration, max_retries: u32) -> Self {
        Self {
            client,
            timeout,
            max_retries,
        }
    }

    /// Create a fetcher from analyzer options
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        let client = HttpClient::with_config(
            HttpClientConfig::default().user_agent(config.user_agent.clone()),
        )?;
        Ok(Self::new(client, config.timeout, config.max_retries))
    }

    /// Per-attempt deadline
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retry budget
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Fetch a URL, retrying transport failures
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let parsed = Url::parse(url)?;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            debug!("GET {} (attempt {}/{})", url, attempt, self.max_retries + 1);

            match self.attempt(url, &parsed).await {
                Ok(page) => {
                    info!("Fetched {} -> {} [{}]", url, page.final_url, page.status);
                    return Ok(page);
                }
                Err((kind, message)) => {
                    if attempt > self.max_retries {
                        warn!("Giving up on {} after {} attempt(s): {}", url, attempt, message);
                        let err = match kind {
                            ErrorKind::Timeout => {
                                FetchError::timeout(url, message, attempt, self.max_retries)
                            }
                            _ => FetchError::network(url, message, attempt, self.max_retries),
                        };
                        return Err(err.into());
                    }

                    let backoff = RETRY_BACKOFF * attempt;
                    warn!(
                        "Fetch of {} failed ({}): {}; retrying in {}ms",
                        url,
                        kind,
                        message,
                        backoff.as_millis()
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    /// One attempt bounded by the deadline
    async fn attempt(
        &self,
        url: &str,
        parsed: &Url,
    ) -> std::result::Result<FetchedPage, (ErrorKind, String)> {
        let start = Instant::now();

        let response = match tokio::time::timeout(self.timeout, self.client.get(parsed)).await {
            Err(_) => {
                return Err((
                    ErrorKind::Timeout,
                    format!("no response within {}ms", self.timeout.as_millis()),
                ))
            }
            Ok(Err(e)) if e.is_timeout() => return Err((ErrorKind::Timeout, e.to_string())),
            Ok(Err(e)) => return Err((ErrorKind::Network, e.to_string())),
            Ok(Ok(response)) => response,
        };

        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let headers = FetchedPage::flatten_headers(response.headers());

        // The body shares the attempt deadline; a failed read degrades to "".
        let remaining = self.timeout.saturating_sub(start.elapsed());
        let html = match tokio::time::timeout(remaining, response.bytes()).await {
            Ok(Ok(body)) => String::from_utf8_lossy(&body).into_owned(),
            Ok(Err(e)) => {
                debug!("Body read failed for {}: {}", final_url, e);
                String::new()
            }
            Err(_) => {
                debug!("Body read timed out for {}", final_url);
                String::new()
            }
        };

        Ok(FetchedPage::new(url, final_url, status, headers, html))
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        PageFetcher::fetch(self, url).await
    }
}
