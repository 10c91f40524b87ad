// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Clause-level policy diff

use serde::{Deserialize, Serialize};

use super::ordered_set::OrderedSet;

/// Directive clauses added and removed between two policies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDiff {
    /// Clauses in the new policy that the old one lacks
    pub added: Vec<String>,
    /// Clauses in the old policy that the new one lacks
    pub removed: Vec<String>,
}

impl PolicyDiff {
    /// True if both sides are empty
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Diff two serialized policies
///
/// Each `;`-separated clause (trimmed) is an opaque set element, so a single
/// changed token shows up as one clause removed and one added.
pub fn diff_policies(old: &str, new: &str) -> PolicyDiff {
    if old == new {
        return PolicyDiff::default();
    }

    let old_clauses = clauses(old);
    let new_clauses = clauses(new);

    PolicyDiff {
        added: new_clauses
            .iter()
            .filter(|c| !old_clauses.contains(c.as_str()))
            .cloned()
            .collect(),
        removed: old_clauses
            .iter()
            .filter(|c| !new_clauses.contains(c.as_str()))
            .cloned()
            .collect(),
    }
}

fn clauses(policy: &str) -> OrderedSet<String> {
    policy
        .split(';')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
