// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Content Security Policy synthesis
//!
//! - Directive model with insertion-ordered, de-duplicated tokens
//! - Baseline and strict policy construction
//! - Clause diffs between policies
//! - Per-directive summaries and recommended companion headers

mod builder;
mod diff;
mod directives;
mod headers;
mod ordered_set;
mod summary;

pub use builder::{
    hash_source, BuildOptions, PolicyBuilder, PolicyResult, DIFF_NOTE, HARDENING_FLOOR,
    STRICT_DIRECTIVES, STRICT_NOTE,
};
pub use diff::{diff_policies, PolicyDiff};
pub use directives::{names, sources, Directive, DirectiveSet};
pub use headers::{
    recommended_headers, serialize_header_map, RecommendedHeader, PERMISSIONS_POLICY_FEATURES,
    RECOMMENDED_HEADERS,
};
pub use ordered_set::OrderedSet;
pub use summary::{DirectiveSummary, PolicySummary};
