// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Multi-page resource discovery

mod crawler;

pub use crawler::{
    extract_links, CrawlConfig, CrawlReport, Crawler, PageOutcome, PageStatus, SkipReason,
};
