// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Fetched page representation

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use super::headers;

/// A page as returned by the fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedPage {
    /// URL as requested
    pub url: String,
    /// URL after following redirects
    pub final_url: String,
    /// Response status code
    pub status: u16,
    /// Response headers, names lower-cased
    pub headers: BTreeMap<String, String>,
    /// Response body (lossy UTF-8), empty when the body could not be read
    pub html: String,
    /// `content-security-policy` header, when the site sends one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csp_header: Option<String>,
}

impl FetchedPage {
    /// Create a page, extracting the CSP header from `headers`
    pub fn new(
        url: impl Into<String>,
        final_url: impl Into<String>,
        status: u16,
        headers: BTreeMap<String, String>,
        html: String,
    ) -> Self {
        let csp_header = headers.get(headers::CONTENT_SECURITY_POLICY).cloned();
        Self {
            url: url.into(),
            final_url: final_url.into(),
            status,
            headers,
            html,
            csp_header,
        }
    }

    /// Flatten a reqwest header map
    ///
    /// Names are lower-cased and repeated headers are joined with `", "`.
    pub fn flatten_headers(map: &HeaderMap) -> BTreeMap<String, String> {
        let mut out: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in map.iter() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            out.entry(name.as_str().to_ascii_lowercase())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }
        out
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header(headers::CONTENT_TYPE)
    }

    /// Whether the page was reached through a redirect
    pub fn redirected(&self) -> bool {
        self.url != self.final_url
    }
}
