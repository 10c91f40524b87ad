// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Analyzer configuration

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::http::DEFAULT_USER_AGENT;

/// Smallest per-attempt fetch timeout accepted
pub const MIN_TIMEOUT: Duration = Duration::from_millis(3_000);
/// Largest per-attempt fetch timeout accepted
pub const MAX_TIMEOUT: Duration = Duration::from_millis(45_000);
/// Default per-attempt fetch timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);
/// Deepest crawl level accepted
pub const MAX_DEPTH: u32 = 3;
/// Default crawl page cap
pub const DEFAULT_MAX_PAGES: usize = 15;
/// Default retry budget for transport failures
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Page lifecycle event the runtime collector waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
    /// `load` event
    Load,
    /// `DOMContentLoaded` event
    DomContentLoaded,
    /// No network activity for a short while
    #[default]
    NetworkIdle,
}

impl fmt::Display for WaitUntil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WaitUntil::Load => "load",
            WaitUntil::DomContentLoaded => "domcontentloaded",
            WaitUntil::NetworkIdle => "networkidle",
        };
        f.write_str(s)
    }
}

impl FromStr for WaitUntil {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "load" => Ok(WaitUntil::Load),
            "domcontentloaded" => Ok(WaitUntil::DomContentLoaded),
            "networkidle" => Ok(WaitUntil::NetworkIdle),
            other => Err(format!("unknown wait condition: {}", other)),
        }
    }
}

/// Options for one analysis run
///
/// Setters clamp `depth` and `timeout` into their accepted ranges, so a
/// config built through the builder is always in bounds.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Make the strict variant the active policy
    pub strict: bool,
    /// Engage the runtime (headless browser) collector
    pub runtime: bool,
    /// Crawl depth, 0 disables crawling
    pub depth: u32,
    /// Per-attempt fetch timeout
    pub timeout: Duration,
    /// Additional attempts after a transport failure
    pub max_retries: u32,
    /// Crawl page cap
    pub max_pages: usize,
    /// Only follow links on the start page's origin
    pub same_origin_only: bool,
    /// Pause between crawl requests
    pub crawl_delay: Duration,
    /// Lifecycle event for the runtime collector
    pub wait_until: WaitUntil,
    /// User agent sent with every fetch
    pub user_agent: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            strict: false,
            runtime: false,
            depth: 0,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            max_pages: DEFAULT_MAX_PAGES,
            same_origin_only: true,
            crawl_delay: Duration::ZERO,
            wait_until: WaitUntil::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Create a new analyzer config
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `AUTOCSP_*` environment variables
    pub fn from_env() -> Self {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup; malformed values are ignored
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("AUTOCSP_DEPTH") {
            match raw.trim().parse::<u32>() {
                Ok(depth) => self = self.depth(depth),
                Err(_) => warn!("Ignoring malformed AUTOCSP_DEPTH={}", raw),
            }
        }
        if let Some(raw) = lookup("AUTOCSP_TIMEOUT_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self = self.timeout(Duration::from_millis(ms)),
                Err(_) => warn!("Ignoring malformed AUTOCSP_TIMEOUT_MS={}", raw),
            }
        }
        if let Some(raw) = lookup("AUTOCSP_MAX_RETRIES") {
            match raw.trim().parse::<u32>() {
                Ok(retries) => self = self.max_retries(retries),
                Err(_) => warn!("Ignoring malformed AUTOCSP_MAX_RETRIES={}", raw),
            }
        }
        if let Some(raw) = lookup("AUTOCSP_CRAWL_DELAY_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self = self.crawl_delay(Duration::from_millis(ms)),
                Err(_) => warn!("Ignoring malformed AUTOCSP_CRAWL_DELAY_MS={}", raw),
            }
        }
        if let Some(raw) = lookup("AUTOCSP_RUNTIME") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.runtime = true,
                "0" | "false" | "no" | "" => self.runtime = false,
                _ => warn!("Ignoring malformed AUTOCSP_RUNTIME={}", raw),
            }
        }
        self
    }

    /// Select the strict variant as the active policy
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Enable/disable the runtime collector
    pub fn runtime(mut self, runtime: bool) -> Self {
        self.runtime = runtime;
        self
    }

    /// Set crawl depth, clamped to `0..=3`
    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = depth.min(MAX_DEPTH);
        self
    }

    /// Set per-attempt timeout, clamped to 3s..=45s
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.clamp(MIN_TIMEOUT, MAX_TIMEOUT);
        self
    }

    /// Set retry budget
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set crawl page cap
    pub fn max_pages(mut self, pages: usize) -> Self {
        self.max_pages = pages;
        self
    }

    /// Set same origin only
    pub fn same_origin_only(mut self, same_origin: bool) -> Self {
        self.same_origin_only = same_origin;
        self
    }

    /// Set pause between crawl requests
    pub fn crawl_delay(mut self, delay: Duration) -> Self {
        self.crawl_delay = delay;
        self
    }

    /// Set runtime wait condition
    pub fn wait_until(mut self, wait_until: WaitUntil) -> Self {
        self.wait_until = wait_until;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::new();
        assert_eq!(config.timeout, Duration::from_millis(15_000));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.max_pages, 15);
        assert_eq!(config.depth, 0);
        assert!(config.same_origin_only);
        assert_eq!(config.wait_until, WaitUntil::NetworkIdle);
    }

    #[test]
    fn test_clamping() {
        let config = AnalyzerConfig::new()
            .depth(9)
            .timeout(Duration::from_millis(100));
        assert_eq!(config.depth, 3);
        assert_eq!(config.timeout, MIN_TIMEOUT);

        let config = AnalyzerConfig::new().timeout(Duration::from_secs(600));
        assert_eq!(config.timeout, MAX_TIMEOUT);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("AUTOCSP_DEPTH", "2"),
            ("AUTOCSP_TIMEOUT_MS", "50000"),
            ("AUTOCSP_RUNTIME", "true"),
            ("AUTOCSP_MAX_RETRIES", "nope"),
            ("AUTOCSP_CRAWL_DELAY_MS", "250"),
        ]
        .into_iter()
        .collect();

        let config = AnalyzerConfig::new().apply_env(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.depth, 2);
        assert_eq!(config.timeout, MAX_TIMEOUT);
        assert!(config.runtime);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.crawl_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_wait_until_parse() {
        assert_eq!("networkidle".parse::<WaitUntil>().unwrap(), WaitUntil::NetworkIdle);
        assert_eq!("DOMContentLoaded".parse::<WaitUntil>().unwrap(), WaitUntil::DomContentLoaded);
        assert!("idle".parse::<WaitUntil>().is_err());
        assert_eq!(WaitUntil::Load.to_string(), "load");
    }
}
