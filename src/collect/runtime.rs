// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Runtime resource collection
//!
//! Loads a page in a headless browser, records every response it sees and
//! runs the static collector over the post-execution DOM snapshot. The real
//! driver is only compiled in with the `chrome` feature; without it the
//! [`NoopRuntime`] stands in and the pipeline keeps the static manifest.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::collector::collect_resources;
use super::manifest::{ResourceClass, ResourceManifest};
use super::origin::resolve_origin;
use crate::config::{AnalyzerConfig, WaitUntil};
use crate::error::{Error, Result};

/// Pause after load so late requests are still observed
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Outcome of the runtime stage as reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeStatus {
    /// Runtime collection was not requested
    Disabled,
    /// Browser ran and its manifest was used
    Ok,
    /// Requested but the browser was missing or failed
    Unavailable,
}

impl fmt::Display for RuntimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeStatus::Disabled => write!(f, "disabled"),
            RuntimeStatus::Ok => write!(f, "ok"),
            RuntimeStatus::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// A headless browser capable of reporting what a page loads
#[async_trait]
pub trait RuntimeCollector: Send + Sync {
    /// Driver name for logs
    fn name(&self) -> &str;

    /// Load `url`, wait for `wait_until`, and return the observed manifest
    async fn collect_runtime(&self, url: &str, wait_until: WaitUntil) -> Result<ResourceManifest>;
}

/// Stand-in used when no browser engine is compiled in
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRuntime;

#[async_trait]
impl RuntimeCollector for NoopRuntime {
    fn name(&self) -> &str {
        "noop"
    }

    async fn collect_runtime(&self, _url: &str, _wait_until: WaitUntil) -> Result<ResourceManifest> {
        Err(Error::runtime_unavailable(
            "no browser engine available (build with the `chrome` feature)",
        ))
    }
}

/// Origins observed on the wire during a page load, by class
#[derive(Debug, Clone, Default)]
pub struct NetworkCapture {
    scripts: BTreeSet<String>,
    styles: BTreeSet<String>,
    images: BTreeSet<String>,
    fonts: BTreeSet<String>,
    connects: BTreeSet<String>,
}

impl NetworkCapture {
    /// Create an empty capture
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed request
    ///
    /// Returns false when the type has no directive or the URL has no origin.
    pub fn record(&mut self, resource_type: &str, url: &str) -> bool {
        let Some(class) = ResourceClass::from_resource_type(resource_type) else {
            return false;
        };
        let Some(origin) = resolve_origin(url, None) else {
            return false;
        };
        let set = match class {
            ResourceClass::Script => &mut self.scripts,
            ResourceClass::Style => &mut self.styles,
            ResourceClass::Image => &mut self.images,
            ResourceClass::Font => &mut self.fonts,
            ResourceClass::Connect => &mut self.connects,
        };
        set.insert(origin);
        true
    }

    /// Number of distinct origins recorded
    pub fn len(&self) -> usize {
        self.scripts.len() + self.styles.len() + self.images.len() + self.fonts.len() + self.connects.len()
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn into_manifest(self) -> ResourceManifest {
        ResourceManifest {
            external_script_origins: self.scripts,
            external_style_origins: self.styles,
            image_origins: self.images,
            font_origins: self.fonts,
            connect_origins: self.connects,
            ..ResourceManifest::default()
        }
    }
}

/// Static collection over a DOM snapshot plus the network observations
pub fn assemble_runtime_manifest(snapshot: &str, url: &str, capture: NetworkCapture) -> ResourceManifest {
    collect_resources(snapshot, url).merged(capture.into_manifest())
}

/// Run the runtime collector, falling back to `fallback` on any failure
pub async fn collect_runtime_or_fallback(
    collector: &dyn RuntimeCollector,
    url: &str,
    wait_until: WaitUntil,
    fallback: ResourceManifest,
) -> (ResourceManifest, RuntimeStatus) {
    info!("Runtime collection of {} via {} (wait until {})", url, collector.name(), wait_until);
    match collector.collect_runtime(url, wait_until).await {
        Ok(manifest) => (manifest, RuntimeStatus::Ok),
        Err(e) => {
            warn!("Runtime collection failed, continuing with static parse: {}", e);
            (fallback, RuntimeStatus::Unavailable)
        }
    }
}

/// The best runtime collector this build provides
#[cfg(feature = "chrome")]
pub fn default_runtime(config: &AnalyzerConfig) -> Box<dyn RuntimeCollector> {
    Box::new(ChromeRuntime::new(config.timeout))
}

/// The best runtime collector this build provides
#[cfg(not(feature = "chrome"))]
pub fn default_runtime(_config: &AnalyzerConfig) -> Box<dyn RuntimeCollector> {
    Box::new(NoopRuntime)
}

/// Headless Chrome driver
#[cfg(feature = "chrome")]
#[derive(Debug, Clone)]
pub struct ChromeRuntime {
    timeout: Duration,
}

#[cfg(feature = "chrome")]
impl ChromeRuntime {
    /// Create a driver whose browser idles out after `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn collect_sync(url: &str, wait_until: WaitUntil, timeout: Duration) -> Result<ResourceManifest> {
        use std::sync::Arc;

        use headless_chrome::{Browser, LaunchOptions};
        use parking_lot::Mutex;

        let options = LaunchOptions::default_builder()
            .headless(true)
            .idle_browser_timeout(timeout)
            .build()
            .map_err(|e| Error::runtime_unavailable(format!("launch options: {}", e)))?;

        let browser = Browser::new(options)
            .map_err(|e| Error::runtime_unavailable(format!("failed to launch Chrome: {}", e)))?;
        let tab = browser
            .new_tab()
            .map_err(|e| Error::runtime_unavailable(format!("tab error: {}", e)))?;

        let capture = Arc::new(Mutex::new(NetworkCapture::new()));
        let sink = Arc::clone(&capture);
        tab.register_response_handling(
            "autocsp-capture",
            Box::new(move |params, _body| {
                let resource_type = format!("{:?}", params.Type).to_ascii_lowercase();
                sink.lock().record(&resource_type, &params.response.url);
            }),
        )
        .map_err(|e| Error::runtime_unavailable(format!("network capture: {}", e)))?;

        tab.navigate_to(url)
            .map_err(|e| Error::runtime_unavailable(format!("navigate error: {}", e)))?;
        tab.wait_until_navigated()
            .map_err(|e| Error::runtime_unavailable(format!("navigation timeout: {}", e)))?;

        // Navigation completes at load; network idle gets one more settle period.
        if wait_until == WaitUntil::NetworkIdle {
            std::thread::sleep(SETTLE_DELAY);
        }
        std::thread::sleep(SETTLE_DELAY);

        let snapshot = tab
            .get_content()
            .map_err(|e| Error::runtime_unavailable(format!("snapshot error: {}", e)))?;

        let capture = std::mem::take(&mut *capture.lock());
        info!("[Runtime] {} origins observed on the wire for {}", capture.len(), url);
        Ok(assemble_runtime_manifest(&snapshot, url, capture))
    }
}

#[cfg(feature = "chrome")]
#[async_trait]
impl RuntimeCollector for ChromeRuntime {
    fn name(&self) -> &str {
        "chrome"
    }

    async fn collect_runtime(&self, url: &str, wait_until: WaitUntil) -> Result<ResourceManifest> {
        info!("[Runtime] Launching browser for: {}", url);
        let url_owned = url.to_string();
        let timeout = self.timeout;

        // headless_chrome is synchronous
        tokio::task::spawn_blocking(move || Self::collect_sync(&url_owned, wait_until, timeout))
            .await
            .map_err(|e| Error::runtime_unavailable(format!("browser task panicked: {}", e)))?
    }
}
