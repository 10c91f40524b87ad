// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Heuristic policy scoring

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::rubric::RiskRubric;
use crate::policy::{names, sources, DirectiveSet};

lazy_static! {
    static ref HASH_TOKEN: Regex = Regex::new(r"'sha256-[A-Za-z0-9+/=]+'").unwrap();
}

/// Starting score before deductions
pub const MAX_SCORE: u32 = 100;

/// Coarse risk rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// One triggered check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskIssue {
    pub id: String,
    pub message: String,
    pub weight: u32,
}

/// Score, level and the issues that produced them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 0..=100
    pub score: u32,
    pub level: RiskLevel,
    /// Issues in evaluation order
    pub issues: Vec<RiskIssue>,
}

/// Scores policies against a rubric
#[derive(Debug, Clone, Default)]
pub struct RiskAssessor {
    rubric: RiskRubric,
}

impl RiskAssessor {
    /// Assessor with the stock rubric
    pub fn new() -> Self {
        Self::default()
    }

    /// Assessor with a custom rubric
    pub fn with_rubric(rubric: RiskRubric) -> Self {
        Self { rubric }
    }

    pub fn rubric(&self) -> &RiskRubric {
        &self.rubric
    }

    /// Level for a score
    pub fn level_for(&self, score: u32) -> RiskLevel {
        if score >= self.rubric.low_threshold {
            RiskLevel::Low
        } else if score >= self.rubric.medium_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Score a serialized policy
    pub fn assess(&self, policy: &str) -> RiskAssessment {
        let rubric = &self.rubric;
        let directives = DirectiveSet::parse(policy);
        let mut issues = Vec::new();
        let mut add = |id: String, message: String, weight: u32| {
            issues.push(RiskIssue { id, message, weight });
        };

        for name in rubric.required {
            if !directives.contains(name) {
                add(
                    format!("missing-{}", name),
                    format!("Missing directive: {}", name),
                    rubric.missing_directive,
                );
            }
        }

        if directives
            .get(names::DEFAULT_SRC)
            .is_some_and(|d| d.contains(sources::WILDCARD))
        {
            add(
                "default-wildcard".into(),
                "default-src allows * (overly permissive)".into(),
                rubric.default_wildcard,
            );
        }

        for name in rubric.source_directives {
            let Some(directive) = directives.get(name) else {
                continue;
            };
            if directive.contains(sources::WILDCARD) {
                add(format!("{}-wildcard", name), format!("{} has *", name), rubric.source_wildcard);
            }
            if directive.tokens.iter().any(|t| t.starts_with("http:")) {
                add(
                    format!("{}-http", name),
                    format!("{} includes insecure http: origin", name),
                    rubric.insecure_http,
                );
            }
            if directive.contains(sources::UNSAFE_INLINE) {
                add(
                    format!("{}-unsafe-inline", name),
                    format!("{} uses 'unsafe-inline'", name),
                    rubric.unsafe_inline,
                );
            }
            if directive.contains(sources::UNSAFE_EVAL) {
                add(
                    format!("{}-unsafe-eval", name),
                    format!("{} uses 'unsafe-eval'", name),
                    rubric.unsafe_eval,
                );
            }
        }

        if directives
            .get(names::OBJECT_SRC)
            .is_some_and(|d| !d.contains(sources::NONE))
        {
            add(
                "object-not-none".into(),
                "object-src should be 'none'".into(),
                rubric.object_not_none,
            );
        }

        if directives
            .get(names::FRAME_ANCESTORS)
            .is_some_and(|d| d.contains(sources::WILDCARD))
        {
            add(
                "frame-any".into(),
                "frame-ancestors uses * (clickjacking risk)".into(),
                rubric.frame_ancestors_wildcard,
            );
        }

        if !directives.contains(names::UPGRADE_INSECURE_REQUESTS) {
            add(
                "missing-upgrade".into(),
                "Missing upgrade-insecure-requests (recommended)".into(),
                rubric.missing_upgrade,
            );
        }

        let hash_count = HASH_TOKEN.find_iter(policy).count();
        if hash_count == 0
            && directives
                .get(names::SCRIPT_SRC)
                .is_some_and(|d| !d.tokens.is_empty() && !d.contains(sources::UNSAFE_INLINE))
        {
            add(
                "no-hashes".into(),
                "No script hashes detected (consider hashing inline scripts)".into(),
                rubric.no_hashes,
            );
        }

        let deducted: u32 = issues.iter().map(|i| i.weight).sum();
        let score = MAX_SCORE.saturating_sub(deducted);

        RiskAssessment {
            score,
            level: self.level_for(score),
            issues,
        }
    }
}

/// Score a policy with the stock rubric
pub fn assess_policy(policy: &str) -> RiskAssessment {
    RiskAssessor::new().assess(policy)
}
