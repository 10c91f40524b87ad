// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSP directives and their serialized form

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::ordered_set::OrderedSet;

/// Directive names the builder emits
pub mod names {
    pub const DEFAULT_SRC: &str = "default-src";
    pub const OBJECT_SRC: &str = "object-src";
    pub const BASE_URI: &str = "base-uri";
    pub const FRAME_ANCESTORS: &str = "frame-ancestors";
    pub const SCRIPT_SRC: &str = "script-src";
    pub const STYLE_SRC: &str = "style-src";
    pub const IMG_SRC: &str = "img-src";
    pub const FONT_SRC: &str = "font-src";
    pub const CONNECT_SRC: &str = "connect-src";
    pub const UPGRADE_INSECURE_REQUESTS: &str = "upgrade-insecure-requests";
}

/// Source keywords and scheme sources
pub mod sources {
    pub const SELF: &str = "'self'";
    pub const NONE: &str = "'none'";
    pub const DATA: &str = "data:";
    pub const WILDCARD: &str = "*";
    pub const UNSAFE_INLINE: &str = "'unsafe-inline'";
    pub const UNSAFE_EVAL: &str = "'unsafe-eval'";
    /// Prefix of a hash source
    pub const SHA256_PREFIX: &str = "'sha256-";
}

/// A named directive and its de-duplicated source tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub tokens: OrderedSet<String>,
}

impl Directive {
    /// Create a directive with no tokens
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tokens: OrderedSet::new(),
        }
    }

    /// Create a directive from tokens; repeats collapse to the first
    pub fn with_tokens<I, S>(name: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether a token is present
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// `name token...`, or just `name` for a boolean directive
    pub fn serialize(&self) -> String {
        if self.tokens.is_empty() {
            return self.name.clone();
        }
        let tokens: Vec<&str> = self.tokens.iter().map(String::as_str).collect();
        format!("{} {}", self.name, tokens.join(" "))
    }
}

/// Directives in insertion order
///
/// Setting a directive that already exists replaces its tokens but keeps its
/// original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveSet {
    directives: Vec<Directive>,
}

impl DirectiveSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a serialized policy
    ///
    /// Clauses are split on `;`; the first whitespace-delimited word of each
    /// clause is the directive name (lower-cased), the rest are its tokens. A
    /// repeated directive overwrites the earlier one.
    pub fn parse(policy: &str) -> Self {
        let mut set = Self::new();
        for clause in policy.split(';') {
            let mut parts = clause.split_whitespace();
            let Some(name) = parts.next() else {
                continue;
            };
            set.set(Directive::with_tokens(name.to_ascii_lowercase(), parts));
        }
        set
    }

    /// Insert or replace a directive
    pub fn set(&mut self, directive: Directive) {
        match self.directives.iter_mut().find(|d| d.name == directive.name) {
            Some(existing) => *existing = directive,
            None => self.directives.push(directive),
        }
    }

    /// Look up a directive by name
    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }

    /// Mutable lookup
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Directive> {
        self.directives.iter_mut().find(|d| d.name == name)
    }

    /// Check presence
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Directive> {
        self.directives.iter()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Every token of every directive
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.directives
            .iter()
            .flat_map(|d| d.tokens.iter().map(String::as_str))
    }

    /// Serialized policy, clauses joined by `"; "`
    pub fn serialize(&self) -> String {
        self.directives
            .iter()
            .map(Directive::serialize)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<'a> IntoIterator for &'a DirectiveSet {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}

/// Serialized as a JSON object keyed by directive name, in insertion order
impl Serialize for DirectiveSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.directives.len()))?;
        for directive in &self.directives {
            map.serialize_entry(&directive.name, &directive.tokens)?;
        }
        map.end()
    }
}
