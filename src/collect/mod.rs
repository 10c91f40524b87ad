// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Resource discovery
//!
//! - Resource manifest (the aggregate every collector produces)
//! - Static collection from raw HTML
//! - Runtime collection through a headless browser (optional)

mod collector;
mod manifest;
mod origin;
mod runtime;

pub use collector::{collect_resources, css_urls};
pub use manifest::{DataUriCounts, ResourceClass, ResourceManifest};
pub use origin::{is_data_uri, origin_of, resolve_origin};
pub use runtime::{
    assemble_runtime_manifest, collect_runtime_or_fallback, default_runtime, NetworkCapture,
    NoopRuntime, RuntimeCollector, RuntimeStatus, SETTLE_DELAY,
};

#[cfg(feature = "chrome")]
pub use runtime::ChromeRuntime;
