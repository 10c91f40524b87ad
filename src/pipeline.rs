// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! End-to-end analysis
//!
//! fetch -> static collect -> runtime collect (optional) -> crawl (optional)
//! -> baseline + strict build -> risk -> diffs -> [`AnalysisReport`].
//!
//! Only the top-level fetch can fail the run. Every later stage degrades to
//! partial data.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::collect::{
    collect_resources, collect_runtime_or_fallback, default_runtime, DataUriCounts, ResourceManifest,
    RuntimeCollector, RuntimeStatus,
};
use crate::config::AnalyzerConfig;
use crate::crawl::{CrawlConfig, Crawler, PageOutcome};
use crate::error::Result;
use crate::http::{PageFetcher, PageSource};
use crate::policy::{
    diff_policies, recommended_headers, serialize_header_map, BuildOptions, DirectiveSet, PolicyBuilder,
    PolicyDiff, PolicyResult, PolicySummary, RecommendedHeader,
};
use crate::risk::{RiskAssessment, RiskAssessor};

/// Which variant is the headline policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    Baseline,
    Strict,
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyMode::Baseline => write!(f, "baseline"),
            PolicyMode::Strict => write!(f, "strict"),
        }
    }
}

/// One policy variant as reported
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantReport {
    pub policy: String,
    pub notes: Vec<String>,
    /// Diff against the site's existing CSP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_existing: Option<PolicyDiff>,
    #[serde(skip)]
    pub directives: DirectiveSet,
}

impl From<PolicyResult> for VariantReport {
    fn from(result: PolicyResult) -> Self {
        Self {
            policy: result.policy,
            notes: result.notes,
            diff_existing: result.diff,
            directives: result.directives,
        }
    }
}

/// Pages covered by the analysis
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub depth: u32,
    pub pages: Vec<String>,
    pub count: usize,
    /// Per-page crawl records; empty when no crawl ran
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outcomes: Vec<PageOutcome>,
}

/// Risk of the active, baseline and strict policies
#[derive(Debug, Clone, Serialize)]
pub struct RiskSummary {
    pub active: RiskAssessment,
    pub baseline: RiskAssessment,
    pub strict: RiskAssessment,
}

/// Directive summaries of both variants
#[derive(Debug, Clone, Serialize)]
pub struct Summaries {
    pub baseline: PolicySummary,
    pub strict: PolicySummary,
}

/// Everything one analysis produced
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// URL as given
    pub input: String,
    pub final_url: String,
    pub status: u16,
    /// CSP the site already sends
    pub existing: Option<String>,
    pub baseline: VariantReport,
    pub strict: VariantReport,
    pub active_mode: PolicyMode,
    /// Active variant's policy
    pub policy: String,
    /// Active variant's notes
    pub notes: Vec<String>,
    /// Whether runtime collection was requested
    pub runtime: bool,
    pub runtime_status: RuntimeStatus,
    pub crawl: CrawlSummary,
    /// Baseline to strict
    pub diff_modes: PolicyDiff,
    #[serde(serialize_with = "serialize_header_map")]
    pub headers: Vec<RecommendedHeader>,
    pub risk: RiskSummary,
    pub summaries: Summaries,
    pub data_uris: DataUriCounts,
    pub generated_at: DateTime<Utc>,
    /// Aggregate the policies were built from
    #[serde(skip)]
    pub manifest: ResourceManifest,
}

impl AnalysisReport {
    /// The active variant
    pub fn active(&self) -> &VariantReport {
        match self.active_mode {
            PolicyMode::Baseline => &self.baseline,
            PolicyMode::Strict => &self.strict,
        }
    }
}

/// Runs analyses with a fixed configuration
pub struct Analyzer {
    config: AnalyzerConfig,
    source: Arc<dyn PageSource>,
    runtime: Box<dyn RuntimeCollector>,
    builder: PolicyBuilder,
    assessor: RiskAssessor,
}

impl Analyzer {
    /// Analyzer over HTTP with the best runtime driver this build provides
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let source: Arc<dyn PageSource> = Arc::new(PageFetcher::from_config(&config)?);
        let runtime = default_runtime(&config);
        Ok(Self::with_parts(config, source, runtime))
    }

    /// Analyzer over caller-supplied collaborators
    pub fn with_parts(
        config: AnalyzerConfig,
        source: Arc<dyn PageSource>,
        runtime: Box<dyn RuntimeCollector>,
    ) -> Self {
        Self {
            config,
            source,
            runtime,
            builder: PolicyBuilder::new(),
            assessor: RiskAssessor::new(),
        }
    }

    /// Replace the risk assessor
    pub fn with_assessor(mut self, assessor: RiskAssessor) -> Self {
        self.assessor = assessor;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a URL
    ///
    /// Fails only when the page itself cannot be fetched.
    pub async fn analyze(&self, url: &str) -> Result<AnalysisReport> {
        let page = self.source.fetch(url).await?;
        let mut manifest = collect_resources(&page.html, &page.final_url);

        let runtime_status = if self.config.runtime {
            let (collected, status) = collect_runtime_or_fallback(
                self.runtime.as_ref(),
                &page.final_url,
                self.config.wait_until,
                manifest,
            )
            .await;
            manifest = collected;
            status
        } else {
            RuntimeStatus::Disabled
        };

        let mut pages = vec![page.final_url.clone()];
        let mut outcomes = Vec::new();
        if self.config.depth > 0 {
            let crawler = Crawler::new(self.source.clone(), CrawlConfig::from_analyzer(&self.config));
            match crawler.crawl(&page.final_url).await {
                Ok(report) => {
                    pages = report.pages;
                    let revisited = report.outcomes.first().is_some_and(|o| o.is_collected());
                    outcomes = report.outcomes;
                    if revisited {
                        // The crawl already counted the start page; its aggregate is the base.
                        let first_page = std::mem::replace(&mut manifest, report.resources);
                        manifest.absorb(first_page);
                    } else {
                        manifest.merge(report.resources);
                    }
                }
                Err(e) => warn!("Crawl from {} failed, using the first page only: {}", page.final_url, e),
            }
        }

        let existing = page.csp_header.clone();
        let baseline = self
            .builder
            .build(&manifest, &BuildOptions::baseline().existing(existing.clone()));
        let strict = self
            .builder
            .build(&manifest, &BuildOptions::strict().existing(existing.clone()));

        let active_mode = if self.config.strict {
            PolicyMode::Strict
        } else {
            PolicyMode::Baseline
        };
        let active = match active_mode {
            PolicyMode::Baseline => &baseline,
            PolicyMode::Strict => &strict,
        };

        let risk = RiskSummary {
            active: self.assessor.assess(&active.policy),
            baseline: self.assessor.assess(&baseline.policy),
            strict: self.assessor.assess(&strict.policy),
        };
        let summaries = Summaries {
            baseline: PolicySummary::of(&baseline.directives),
            strict: PolicySummary::of(&strict.directives),
        };
        let diff_modes = diff_policies(&baseline.policy, &strict.policy);
        let policy = active.policy.clone();
        let notes = active.notes.clone();

        info!(
            "Analyzed {}: {} page(s), {} risk {} ({})",
            url,
            pages.len(),
            active_mode,
            risk.active.score,
            risk.active.level
        );

        Ok(AnalysisReport {
            input: url.to_string(),
            final_url: page.final_url,
            status: page.status,
            existing,
            baseline: baseline.into(),
            strict: strict.into(),
            active_mode,
            policy,
            notes,
            runtime: self.config.runtime,
            runtime_status,
            crawl: CrawlSummary {
                depth: self.config.depth,
                count: pages.len(),
                pages,
                outcomes,
            },
            diff_modes,
            headers: recommended_headers(),
            risk,
            summaries,
            data_uris: manifest.data_uris,
            generated_at: Utc::now(),
            manifest,
        })
    }
}
