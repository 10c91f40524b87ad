// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # AutoCSP - Content-Security-Policy generator
//!
//! Fetches a page, discovers the resources it loads and synthesizes a CSP
//! header for it in two variants: a baseline that allows every discovered
//! origin, and a strict one limited to `'self'` plus hashes of inline code.
//!
//! ## Features
//!
//! - Static discovery: scripts, stylesheets, images, connection hints, inline code
//! - Runtime discovery through headless Chrome (`chrome` feature)
//! - Same-origin BFS crawl to widen coverage
//! - Deterministic policy builder with SHA-256 inline hashes
//! - Heuristic risk scoring and clause-level policy diffs
//!
//! ## Example
//!
//! ```rust,no_run
//! use autocsp::{Analyzer, AnalyzerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let analyzer = Analyzer::new(AnalyzerConfig::new().depth(1))?;
//!     let report = analyzer.analyze("https://example.com").await?;
//!
//!     println!("Content-Security-Policy: {}", report.policy);
//!     println!("Risk: {} ({})", report.risk.active.score, report.risk.active.level);
//!     Ok(())
//! }
//! ```

pub mod collect;
pub mod config;
pub mod crawl;
pub mod dom;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod policy;
pub mod risk;

// Re-exports for convenience

// Pipeline
pub use pipeline::{AnalysisReport, Analyzer, PolicyMode, VariantReport};

// Configuration
pub use config::{AnalyzerConfig, WaitUntil};

// Errors
pub use error::{Error, ErrorKind, FetchError, Result};

// HTTP
pub use http::{FetchedPage, HttpClient, PageFetcher, PageSource};

// Resource discovery
pub use collect::{
    collect_resources, collect_runtime_or_fallback, NoopRuntime, ResourceManifest, RuntimeCollector,
    RuntimeStatus,
};
#[cfg(feature = "chrome")]
pub use collect::ChromeRuntime;

// Crawler
pub use crawl::{CrawlConfig, CrawlReport, Crawler, PageOutcome, PageStatus};

// Policy
pub use policy::{
    diff_policies, BuildOptions, DirectiveSet, PolicyBuilder, PolicyDiff, PolicyResult, PolicySummary,
};

// Risk
pub use risk::{assess_policy, RiskAssessment, RiskAssessor, RiskLevel, RiskRubric};

/// AutoCSP version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
