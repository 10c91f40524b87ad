// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Resource manifest - the aggregate produced by every collector

use std::collections::BTreeSet;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Resource class a discovered origin is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceClass {
    /// External scripts
    Script,
    /// External stylesheets
    Style,
    /// Images
    Image,
    /// Fonts
    Font,
    /// fetch / XHR / WebSocket endpoints and connection hints
    Connect,
}

impl ResourceClass {
    /// Map a browser resource type name onto a class
    ///
    /// Accepts the lower-cased DevTools names (`script`, `stylesheet`,
    /// `image`, `font`, `xhr`, `fetch`, `websocket`, `eventsource`). Anything
    /// else (documents, media, manifests) has no directive of its own here.
    pub fn from_resource_type(resource_type: &str) -> Option<Self> {
        match resource_type.to_ascii_lowercase().as_str() {
            "script" => Some(ResourceClass::Script),
            "stylesheet" => Some(ResourceClass::Style),
            "image" => Some(ResourceClass::Image),
            "font" => Some(ResourceClass::Font),
            "xhr" | "fetch" | "websocket" | "eventsource" => Some(ResourceClass::Connect),
            _ => None,
        }
    }
}

/// Counters for `data:` resources, informational only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataUriCounts {
    pub scripts: u32,
    pub images: u32,
    pub styles: u32,
}

impl DataUriCounts {
    /// Total of all counters
    pub fn total(&self) -> u32 {
        self.scripts + self.images + self.styles
    }
}

impl AddAssign for DataUriCounts {
    fn add_assign(&mut self, other: Self) {
        self.scripts += other.scripts;
        self.images += other.images;
        self.styles += other.styles;
    }
}

/// Everything a page (or set of pages) was seen to load
///
/// Origin sets are ordered (`BTreeSet`) so that merging is commutative and
/// the policies built from a manifest are byte-for-byte reproducible. Inline
/// sequences keep duplicates; each entry is hashed on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceManifest {
    /// Inline `<script>` bodies, verbatim
    pub inline_scripts: Vec<String>,
    /// Inline `<style>` bodies, verbatim
    pub inline_styles: Vec<String>,
    pub external_script_origins: BTreeSet<String>,
    pub external_style_origins: BTreeSet<String>,
    pub image_origins: BTreeSet<String>,
    pub font_origins: BTreeSet<String>,
    pub connect_origins: BTreeSet<String>,
    /// `data:` resources seen per class
    pub data_uris: DataUriCounts,
}

impl ResourceManifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Origin set for a class
    pub fn origins(&self, class: ResourceClass) -> &BTreeSet<String> {
        match class {
            ResourceClass::Script => &self.external_script_origins,
            ResourceClass::Style => &self.external_style_origins,
            ResourceClass::Image => &self.image_origins,
            ResourceClass::Font => &self.font_origins,
            ResourceClass::Connect => &self.connect_origins,
        }
    }

    fn origins_mut(&mut self, class: ResourceClass) -> &mut BTreeSet<String> {
        match class {
            ResourceClass::Script => &mut self.external_script_origins,
            ResourceClass::Style => &mut self.external_style_origins,
            ResourceClass::Image => &mut self.image_origins,
            ResourceClass::Font => &mut self.font_origins,
            ResourceClass::Connect => &mut self.connect_origins,
        }
    }

    /// Record an origin under a class; returns false if already present
    pub fn add_origin(&mut self, class: ResourceClass, origin: impl Into<String>) -> bool {
        self.origins_mut(class).insert(origin.into())
    }

    /// Fold another manifest into this one
    ///
    /// Sets are unioned, inline sequences concatenated, counters summed.
    pub fn merge(&mut self, other: ResourceManifest) {
        self.inline_scripts.extend(other.inline_scripts);
        self.inline_styles.extend(other.inline_styles);
        self.external_script_origins.extend(other.external_script_origins);
        self.external_style_origins.extend(other.external_style_origins);
        self.image_origins.extend(other.image_origins);
        self.font_origins.extend(other.font_origins);
        self.connect_origins.extend(other.connect_origins);
        self.data_uris += other.data_uris;
    }

    /// Builder-style merge
    pub fn merged(mut self, other: ResourceManifest) -> Self {
        self.merge(other);
        self
    }

    /// Fold in a manifest describing pages this one already covers
    ///
    /// Sets are unioned and only inline blocks not yet present are added.
    /// Counters are left alone, since `other` re-counts the same pages.
    pub fn absorb(&mut self, other: ResourceManifest) {
        for script in other.inline_scripts {
            if !self.inline_scripts.contains(&script) {
                self.inline_scripts.push(script);
            }
        }
        for style in other.inline_styles {
            if !self.inline_styles.contains(&style) {
                self.inline_styles.push(style);
            }
        }
        self.external_script_origins.extend(other.external_script_origins);
        self.external_style_origins.extend(other.external_style_origins);
        self.image_origins.extend(other.image_origins);
        self.font_origins.extend(other.font_origins);
        self.connect_origins.extend(other.connect_origins);
    }

    /// Total number of distinct origins across all classes
    pub fn origin_count(&self) -> usize {
        self.external_script_origins.len()
            + self.external_style_origins.len()
            + self.image_origins.len()
            + self.font_origins.len()
            + self.connect_origins.len()
    }

    /// True if nothing at all was discovered
    pub fn is_empty(&self) -> bool {
        self.inline_scripts.is_empty()
            && self.inline_styles.is_empty()
            && self.origin_count() == 0
            && self.data_uris.total() == 0
    }
}
