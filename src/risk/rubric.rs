// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Risk rubric: point deductions and level thresholds

use serde::Serialize;

/// Deduction weights and thresholds used by the assessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRubric {
    /// Directives whose absence is penalized
    pub required: &'static [&'static str],
    /// Directives checked for wildcards, http: and unsafe keywords
    pub source_directives: &'static [&'static str],
    pub missing_directive: u32,
    pub default_wildcard: u32,
    pub source_wildcard: u32,
    pub insecure_http: u32,
    pub unsafe_inline: u32,
    pub unsafe_eval: u32,
    pub object_not_none: u32,
    pub frame_ancestors_wildcard: u32,
    pub missing_upgrade: u32,
    pub no_hashes: u32,
    /// Lowest score still rated low risk
    pub low_threshold: u32,
    /// Lowest score still rated medium risk
    pub medium_threshold: u32,
}

impl RiskRubric {
    /// The stock rubric
    pub const DEFAULT: RiskRubric = RiskRubric {
        required: &["default-src", "object-src", "frame-ancestors", "base-uri"],
        source_directives: &["script-src", "style-src", "img-src", "connect-src"],
        missing_directive: 8,
        default_wildcard: 15,
        source_wildcard: 12,
        insecure_http: 10,
        unsafe_inline: 14,
        unsafe_eval: 10,
        object_not_none: 10,
        frame_ancestors_wildcard: 12,
        missing_upgrade: 4,
        no_hashes: 5,
        low_threshold: 80,
        medium_threshold: 55,
    };
}

impl Default for RiskRubric {
    fn default() -> Self {
        Self::DEFAULT
    }
}
