// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Static resource collector
//!
//! Walks the parsed HTML once and files every script, stylesheet, image,
//! connection hint and inline code block into a [`ResourceManifest`].
//! Discovery is best-effort: references that do not resolve are skipped.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;
use url::Url;

use super::manifest::{ResourceClass, ResourceManifest};
use super::origin::{is_data_uri, resolve_origin};
use crate::dom::{attribute, child_text, descendants, has_rel_token, parse_html, tag_name, Handle};

lazy_static! {
    static ref CSS_URL: Regex = Regex::new(r"(?i)url\(([^)]+)\)").unwrap();
}

/// Collect resources referenced by a page's HTML
///
/// `page_url` is the base for relative references; if it does not parse,
/// only absolute references produce origins.
pub fn collect_resources(html: &str, page_url: &str) -> ResourceManifest {
    let base = Url::parse(page_url).ok();
    if base.is_none() {
        debug!("Page URL {:?} is not absolute; relative references will be skipped", page_url);
    }

    let dom = parse_html(html);
    let mut manifest = ResourceManifest::new();

    for node in descendants(&dom.document) {
        let Some(tag) = tag_name(&node) else {
            continue;
        };
        match tag.as_str() {
            "script" => collect_script(&node, base.as_ref(), &mut manifest),
            "link" => collect_link(&node, base.as_ref(), &mut manifest),
            "img" => collect_image(&node, base.as_ref(), &mut manifest),
            "style" => collect_style(&node, base.as_ref(), &mut manifest),
            _ => {}
        }
    }

    debug!(
        "Collected {} inline scripts, {} inline styles, {} origins from {}",
        manifest.inline_scripts.len(),
        manifest.inline_styles.len(),
        manifest.origin_count(),
        page_url
    );

    manifest
}

/// `url(...)` references in a stylesheet, quotes stripped
pub fn css_urls(css: &str) -> Vec<String> {
    CSS_URL
        .captures_iter(css)
        .map(|c| c[1].replace(['"', '\''], "").trim().to_string())
        .filter(|u| !u.is_empty())
        .collect()
}

fn non_empty_attribute(node: &Handle, name: &str) -> Option<String> {
    attribute(node, name).filter(|v| !v.trim().is_empty())
}

fn collect_script(node: &Handle, base: Option<&Url>, manifest: &mut ResourceManifest) {
    match non_empty_attribute(node, "src") {
        Some(src) if is_data_uri(&src) => manifest.data_uris.scripts += 1,
        Some(src) => {
            if let Some(origin) = resolve_origin(&src, base) {
                manifest.add_origin(ResourceClass::Script, origin);
            }
        }
        None => {
            let code = child_text(node);
            if !code.trim().is_empty() {
                manifest.inline_scripts.push(code);
            }
        }
    }
}

fn collect_link(node: &Handle, base: Option<&Url>, manifest: &mut ResourceManifest) {
    let Some(href) = non_empty_attribute(node, "href") else {
        return;
    };
    let rel = attribute(node, "rel").unwrap_or_default();

    if has_rel_token(&rel, "stylesheet") {
        if is_data_uri(&href) {
            manifest.data_uris.styles += 1;
        } else if let Some(origin) = resolve_origin(&href, base) {
            manifest.add_origin(ResourceClass::Style, origin);
        }
    }

    // Connection hints are the only static signal for connect-src.
    if has_rel_token(&rel, "preconnect") || has_rel_token(&rel, "dns-prefetch") {
        if let Some(origin) = resolve_origin(&href, base) {
            manifest.add_origin(ResourceClass::Connect, origin);
        }
    }
}

fn collect_image(node: &Handle, base: Option<&Url>, manifest: &mut ResourceManifest) {
    let Some(src) = non_empty_attribute(node, "src") else {
        return;
    };
    if is_data_uri(&src) {
        manifest.data_uris.images += 1;
    } else if let Some(origin) = resolve_origin(&src, base) {
        manifest.add_origin(ResourceClass::Image, origin);
    }
}

fn collect_style(node: &Handle, base: Option<&Url>, manifest: &mut ResourceManifest) {
    let css = child_text(node);
    if css.trim().is_empty() {
        return;
    }

    // Every non-data url() in an inline sheet is treated as a font source.
    for reference in css_urls(&css) {
        if is_data_uri(&reference) {
            continue;
        }
        if let Some(origin) = resolve_origin(&reference, base) {
            manifest.add_origin(ResourceClass::Font, origin);
        }
    }

    manifest.inline_styles.push(css);
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://example.com/index.html";

    #[test]
    fn test_scripts() {
        let html = r#"
            <html><head>
                <script src="https://cdn.example.net/lib.js"></script>
                <script src="/local.js"></script>
                <script src="data:text/javascript,alert(1)"></script>
                <script>console.log(1)</script>
                <script>   </script>
            </head></html>
        "#;
        let m = collect_resources(html, PAGE);

        assert!(m.external_script_origins.contains("https://cdn.example.net"));
        assert!(m.external_script_origins.contains("https://example.com"));
        assert_eq!(m.external_script_origins.len(), 2);
        assert_eq!(m.inline_scripts, vec!["console.log(1)"]);
        assert_eq!(m.data_uris.scripts, 1);
    }

    #[test]
    fn test_links() {
        let html = r#"
            <link rel="stylesheet" href="https://styles.example.net/site.css">
            <link rel="alternate stylesheet" href="https://alt.example.net/alt.css">
            <link rel="preconnect" href="https://api.example.org">
            <link rel="dns-prefetch" href="//metrics.example.org">
            <link rel="icon" href="https://icons.example.net/favicon.ico">
            <link rel="stylesheet">
        "#;
        let m = collect_resources(html, PAGE);

        assert_eq!(m.external_style_origins.len(), 2);
        assert!(m.external_style_origins.contains("https://alt.example.net"));
        assert!(m.connect_origins.contains("https://api.example.org"));
        assert!(m.connect_origins.contains("https://metrics.example.org"));
        assert!(m.image_origins.is_empty());
    }

    #[test]
    fn test_images() {
        let html = r#"
            <img src="https://img.example.net/a.png">
            <img src="data:image/png;base64,iVBORw0KGgo=">
            <img src="data:image/gif;base64,R0lGODlh">
            <img alt="no source">
        "#;
        let m = collect_resources(html, PAGE);

        assert_eq!(m.image_origins.len(), 1);
        assert_eq!(m.data_uris.images, 2);
    }

    #[test]
    fn test_inline_style_and_fonts() {
        let css = r#"
            @font-face { src: url("https://fonts.example.net/a.woff2") format("woff2"); }
            @font-face { src: url(data:font/woff2;base64,AAAA); }
            body { background: url('/bg.png'); }
        "#;
        let html = format!("<style>{}</style>", css);
        let m = collect_resources(&html, PAGE);

        assert_eq!(m.inline_styles, vec![css.to_string()]);
        assert!(m.font_origins.contains("https://fonts.example.net"));
        assert!(m.font_origins.contains("https://example.com"));
        assert_eq!(m.font_origins.len(), 2);
    }

    #[test]
    fn test_malformed_references_skipped() {
        let html = r#"
            <script src="http://[bad"></script>
            <img src="javascript:alert(1)">
        "#;
        let m = collect_resources(html, PAGE);
        assert_eq!(m.origin_count(), 0);
    }

    #[test]
    fn test_broken_html_never_fails() {
        let m = collect_resources("<<<>>><script", PAGE);
        assert_eq!(m.origin_count(), 0);

        let m = collect_resources("", "not a url");
        assert!(m.is_empty());
    }

    #[test]
    fn test_css_urls() {
        let urls = css_urls(r#"a{b:URL( "x.woff" )} c{d:url('y.ttf')}"#);
        assert_eq!(urls, vec!["x.woff", "y.ttf"]);
    }
}
