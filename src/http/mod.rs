// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for AutoCSP
//!
//! Provides the reqwest-backed client and the page fetcher with its
//! timeout and retry policy.

mod client;
mod fetcher;
mod response;

pub use client::{HttpClient, HttpClientConfig};
pub use fetcher::{PageFetcher, PageSource, RETRY_BACKOFF};
pub use response::FetchedPage;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!(
    "AutoCSP/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/Habbi2/AutoCPS)"
);

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const CONTENT_SECURITY_POLICY: &str = "content-security-policy";
    pub const USER_AGENT: &str = "user-agent";
}

/// Accept header sent with page fetches
pub const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
