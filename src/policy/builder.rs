// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Policy builder
//!
//! Turns a [`ResourceManifest`] into a serialized CSP. Directive order is
//! fixed, so identical manifests always produce identical policies.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::diff::{diff_policies, PolicyDiff};
use super::directives::{names, sources, Directive, DirectiveSet};
use crate::collect::ResourceManifest;

/// Directives every policy starts with
pub static HARDENING_FLOOR: &[(&str, &[&str])] = &[
    (names::DEFAULT_SRC, &[sources::SELF]),
    (names::OBJECT_SRC, &[sources::NONE]),
    (names::BASE_URI, &[sources::SELF]),
    (names::FRAME_ANCESTORS, &[sources::NONE]),
];

/// Directives the strict transform narrows to self + hashes
pub static STRICT_DIRECTIVES: &[&str] = &[names::SCRIPT_SRC, names::STYLE_SRC];

/// Note attached to strict builds
pub const STRICT_NOTE: &str = "Strict mode: external script/style origins removed; only self + hashes allowed.";

/// Note attached when the policy differs from the site's current one
pub const DIFF_NOTE: &str = "Diff computed vs existing CSP.";

/// `'sha256-<base64 digest>'` source for an inline block
///
/// The digest covers the exact text, whitespace included.
pub fn hash_source(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    format!("{}{}'", sources::SHA256_PREFIX, STANDARD.encode(digest))
}

/// Build options
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Narrow script-src/style-src to self + hashes
    pub strict: bool,
    /// Policy the site already sends, diffed against the result
    pub existing: Option<String>,
}

impl BuildOptions {
    /// Baseline build, no existing policy
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Strict build, no existing policy
    pub fn strict() -> Self {
        Self {
            strict: true,
            existing: None,
        }
    }

    /// Diff against an existing policy; empty strings are ignored
    pub fn existing(mut self, existing: Option<impl Into<String>>) -> Self {
        self.existing = existing.map(Into::into).filter(|p: &String| !p.trim().is_empty());
        self
    }
}

/// A built policy
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResult {
    /// Serialized header value
    pub policy: String,
    pub directives: DirectiveSet,
    /// Clause diff against the existing policy, when one was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<PolicyDiff>,
    pub notes: Vec<String>,
}

/// Builds policies from manifests
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyBuilder;

impl PolicyBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a policy
    pub fn build(&self, manifest: &ResourceManifest, options: &BuildOptions) -> PolicyResult {
        let mut notes = Vec::new();
        let mut directives = self.baseline(manifest);

        if options.strict {
            tighten_to_hashes(&mut directives);
            notes.push(STRICT_NOTE.to_string());
        }

        let policy = directives.serialize();

        let diff = options
            .existing
            .as_deref()
            .map(|existing| diff_policies(existing, &policy));
        if diff.as_ref().is_some_and(|d| !d.is_empty()) {
            notes.push(DIFF_NOTE.to_string());
        }

        PolicyResult {
            policy,
            directives,
            diff,
            notes,
        }
    }

    fn baseline(&self, manifest: &ResourceManifest) -> DirectiveSet {
        let mut set = DirectiveSet::new();

        for (name, tokens) in HARDENING_FLOOR {
            set.set(Directive::with_tokens(*name, tokens.iter().copied()));
        }

        let mut script = Directive::with_tokens(names::SCRIPT_SRC, [sources::SELF]);
        script.tokens.extend(manifest.external_script_origins.iter().cloned());
        script.tokens.extend(manifest.inline_scripts.iter().map(|s| hash_source(s)));
        set.set(script);

        let mut style = Directive::with_tokens(names::STYLE_SRC, [sources::SELF]);
        style.tokens.extend(manifest.external_style_origins.iter().cloned());
        style.tokens.extend(manifest.inline_styles.iter().map(|s| hash_source(s)));
        set.set(style);

        let mut img = Directive::with_tokens(names::IMG_SRC, [sources::SELF, sources::DATA]);
        img.tokens.extend(manifest.image_origins.iter().cloned());
        set.set(img);

        if !manifest.font_origins.is_empty() {
            let mut font = Directive::with_tokens(names::FONT_SRC, [sources::SELF]);
            font.tokens.extend(manifest.font_origins.iter().cloned());
            set.set(font);
        }

        let mut connect = Directive::with_tokens(names::CONNECT_SRC, [sources::SELF]);
        connect.tokens.extend(manifest.connect_origins.iter().cloned());
        set.set(connect);

        set.set(Directive::new(names::UPGRADE_INSECURE_REQUESTS));
        set
    }
}

/// Keep only `'self'` and hash sources in the strict directives
fn tighten_to_hashes(set: &mut DirectiveSet) {
    for name in STRICT_DIRECTIVES {
        if let Some(directive) = set.get_mut(name) {
            directive
                .tokens
                .retain(|t| t == sources::SELF || t.starts_with(sources::SHA256_PREFIX));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::ResourceClass;

    fn tokens<'a>(result: &'a PolicyResult, name: &str) -> Vec<&'a str> {
        result
            .directives
            .get(name)
            .map(|d| d.tokens.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn rich_manifest() -> ResourceManifest {
        let mut m = ResourceManifest::new();
        m.inline_scripts.push("console.log(\"hi\")".into());
        m.inline_styles.push("body{color:red}".into());
        m.add_origin(ResourceClass::Script, "https://cdn.example.com");
        m.add_origin(ResourceClass::Style, "https://styles.example.com");
        m.add_origin(ResourceClass::Image, "https://img.cdn.com");
        m.add_origin(ResourceClass::Font, "https://fonts.example.com");
        m.add_origin(ResourceClass::Connect, "https://api.example.com");
        m
    }

    #[test]
    fn test_hash_source() {
        // echo -n 'console.log(1)' | openssl dgst -sha256 -binary | base64
        assert_eq!(hash_source("console.log(1)"), "'sha256-CihokcEcBW4atb/CW/XWsvWwbTjqwQlE9nj9ii5ww5M='");
        assert_ne!(hash_source("console.log(1)"), hash_source("console.log(1) "));
    }

    #[test]
    fn test_inline_script_scenario() {
        let mut m = ResourceManifest::new();
        m.inline_scripts.push("console.log(1)".into());

        let baseline = PolicyBuilder::new().build(&m, &BuildOptions::baseline());
        let script = tokens(&baseline, "script-src");
        assert_eq!(script.len(), 2);
        assert_eq!(script[0], "'self'");
        assert!(script[1].starts_with("'sha256-"));
        assert_eq!(tokens(&baseline, "object-src"), vec!["'none'"]);

        let strict = PolicyBuilder::new().build(&m, &BuildOptions::strict());
        assert_eq!(tokens(&strict, "script-src"), script);
    }

    #[test]
    fn test_cdn_scenario() {
        let mut m = ResourceManifest::new();
        m.add_origin(ResourceClass::Script, "https://cdn.example.com");

        let baseline = PolicyBuilder::new().build(&m, &BuildOptions::baseline());
        assert_eq!(tokens(&baseline, "script-src"), vec!["'self'", "https://cdn.example.com"]);

        let strict = PolicyBuilder::new().build(&m, &BuildOptions::strict());
        assert_eq!(tokens(&strict, "script-src"), vec!["'self'"]);
        assert_eq!(strict.notes, vec![STRICT_NOTE]);
    }

    #[test]
    fn test_directive_order() {
        let result = PolicyBuilder::new().build(&rich_manifest(), &BuildOptions::baseline());
        let order: Vec<&str> = result.directives.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "default-src",
                "object-src",
                "base-uri",
                "frame-ancestors",
                "script-src",
                "style-src",
                "img-src",
                "font-src",
                "connect-src",
                "upgrade-insecure-requests",
            ]
        );
        assert!(result.policy.ends_with("; upgrade-insecure-requests"));
        assert!(result.policy.starts_with("default-src 'self'; object-src 'none'; base-uri 'self'; frame-ancestors 'none'; "));
    }

    #[test]
    fn test_empty_manifest() {
        let result = PolicyBuilder::new().build(&ResourceManifest::new(), &BuildOptions::baseline());
        assert_eq!(
            result.policy,
            "default-src 'self'; object-src 'none'; base-uri 'self'; frame-ancestors 'none'; \
             script-src 'self'; style-src 'self'; img-src 'self' data:; connect-src 'self'; \
             upgrade-insecure-requests"
        );
        assert!(result.notes.is_empty());
        assert!(result.diff.is_none());
    }

    #[test]
    fn test_strict_is_subset_of_baseline() {
        let m = rich_manifest();
        let baseline = PolicyBuilder::new().build(&m, &BuildOptions::baseline());
        let strict = PolicyBuilder::new().build(&m, &BuildOptions::strict());

        for name in STRICT_DIRECTIVES {
            let base = tokens(&baseline, name);
            for token in tokens(&strict, name) {
                assert!(base.contains(&token));
                assert!(token == "'self'" || token.starts_with("'sha256-"));
            }
        }
        // Other directives are untouched
        assert_eq!(tokens(&strict, "img-src"), tokens(&baseline, "img-src"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let m = rich_manifest();
        let a = PolicyBuilder::new().build(&m, &BuildOptions::strict());
        let b = PolicyBuilder::new().build(&m, &BuildOptions::strict());
        assert_eq!(a.policy, b.policy);
    }

    #[test]
    fn test_duplicate_inline_blocks_hash_once() {
        let mut m = ResourceManifest::new();
        m.inline_scripts.push("a()".into());
        m.inline_scripts.push("a()".into());
        let result = PolicyBuilder::new().build(&m, &BuildOptions::baseline());
        assert_eq!(tokens(&result, "script-src").len(), 2);
    }

    #[test]
    fn test_diff_against_existing() {
        let m = ResourceManifest::new();
        let options = BuildOptions::baseline().existing(Some("default-src 'self'; script-src *"));
        let result = PolicyBuilder::new().build(&m, &options);

        let diff = result.diff.as_ref().unwrap();
        assert!(diff.removed.contains(&"script-src *".to_string()));
        assert!(diff.added.contains(&"script-src 'self'".to_string()));
        assert!(result.notes.contains(&DIFF_NOTE.to_string()));
    }

    #[test]
    fn test_identical_existing_adds_no_note() {
        let m = ResourceManifest::new();
        let policy = PolicyBuilder::new().build(&m, &BuildOptions::baseline()).policy;
        let result = PolicyBuilder::new().build(&m, &BuildOptions::baseline().existing(Some(policy)));

        assert_eq!(result.diff, Some(PolicyDiff::default()));
        assert!(result.notes.is_empty());
    }

    #[test]
    fn test_blank_existing_ignored() {
        let options = BuildOptions::strict().existing(Some("   "));
        assert!(options.existing.is_none());
    }
}
