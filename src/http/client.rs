// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;

use super::{headers, DEFAULT_USER_AGENT, HTML_ACCEPT};
use crate::error::Result;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Connect timeout (the per-attempt deadline is enforced by the fetcher)
    pub connect_timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Default headers
    pub default_headers: HeaderMap,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(headers::ACCEPT, HeaderValue::from_static(HTML_ACCEPT));

        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 10,
            default_headers,
        }
    }
}

impl HttpClientConfig {
    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Thin wrapper over a redirect-following reqwest client
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout)
            .redirect(Policy::limited(config.max_redirects))
            .default_headers(config.default_headers.clone())
            .build()?;

        Ok(Self { client, config })
    }

    /// Send a GET request, following redirects
    ///
    /// Returns as soon as response headers arrive; the body is left unread.
    pub async fn get(&self, url: &Url) -> reqwest::Result<reqwest::Response> {
        self.client.get(url.clone()).send().await
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}
