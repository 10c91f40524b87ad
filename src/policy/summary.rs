// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-directive token statistics

use lazy_static::lazy_static;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::directives::{sources, Directive, DirectiveSet};

lazy_static! {
    static ref ORIGIN_TOKEN: Regex = Regex::new(r"(?i)^https?://").unwrap();
}

/// Token counts for one directive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct DirectiveSummary {
    /// All tokens
    pub sources: usize,
    /// `'sha256-...'` tokens
    pub hashes: usize,
    /// `http(s)://` origins
    pub origins: usize,
    /// `*` tokens
    pub wildcards: usize,
}

impl DirectiveSummary {
    /// Summarize a directive
    pub fn of(directive: &Directive) -> Self {
        let mut summary = Self {
            sources: directive.tokens.len(),
            ..Self::default()
        };
        for token in &directive.tokens {
            if token.starts_with(sources::SHA256_PREFIX) {
                summary.hashes += 1;
            }
            if ORIGIN_TOKEN.is_match(token) {
                summary.origins += 1;
            }
            if token == sources::WILDCARD {
                summary.wildcards += 1;
            }
        }
        summary
    }
}

/// Summaries keyed by directive name, in policy order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicySummary(Vec<(String, DirectiveSummary)>);

impl PolicySummary {
    /// Summarize every directive of a set
    pub fn of(directives: &DirectiveSet) -> Self {
        Self(
            directives
                .iter()
                .map(|d| (d.name.clone(), DirectiveSummary::of(d)))
                .collect(),
        )
    }

    /// Look up one directive's summary
    pub fn get(&self, name: &str) -> Option<&DirectiveSummary> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, DirectiveSummary)> {
        self.0.iter()
    }
}

impl Serialize for PolicySummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, summary) in &self.0 {
            map.serialize_entry(name, summary)?;
        }
        map.end()
    }
}
