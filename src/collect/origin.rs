// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Origin resolution

use url::Url;

/// Whether a resource reference is a `data:` URI
pub fn is_data_uri(reference: &str) -> bool {
    let trimmed = reference.trim_start();
    trimmed
        .get(..5)
        .map(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .unwrap_or(false)
}

/// Resolve a resource reference to its serialized origin
///
/// Relative references are joined onto `base`. Returns `None` for `data:`
/// URIs, malformed references, and URLs without a tuple origin (`blob:`,
/// `javascript:`, `about:` and friends), which cannot appear in a source list.
pub fn resolve_origin(reference: &str, base: Option<&Url>) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() || is_data_uri(reference) {
        return None;
    }

    let url = match base {
        Some(base) => base.join(reference).ok()?,
        None => Url::parse(reference).ok()?,
    };

    let origin = url.origin();
    if !origin.is_tuple() {
        return None;
    }

    Some(origin.ascii_serialization())
}

/// Origin of an absolute URL
pub fn origin_of(url: &str) -> Option<String> {
    resolve_origin(url, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post.html").unwrap()
    }

    #[test]
    fn test_absolute_reference() {
        assert_eq!(
            resolve_origin("https://cdn.example.net/lib/app.js?v=2", Some(&base())),
            Some("https://cdn.example.net".to_string())
        );
    }

    #[test]
    fn test_relative_reference_uses_page() {
        assert_eq!(
            resolve_origin("../static/app.js", Some(&base())),
            Some("https://example.com".to_string())
        );
        assert_eq!(
            resolve_origin("//fonts.example.org/css", Some(&base())),
            Some("https://fonts.example.org".to_string())
        );
    }

    #[test]
    fn test_ports_are_kept() {
        assert_eq!(
            origin_of("http://localhost:8080/a.js"),
            Some("http://localhost:8080".to_string())
        );
        assert_eq!(origin_of("https://example.com:443/"), Some("https://example.com".to_string()));
    }

    #[test]
    fn test_unusable_references() {
        assert_eq!(resolve_origin("data:image/png;base64,AAAA", Some(&base())), None);
        assert_eq!(resolve_origin("  DATA:text/javascript,1", Some(&base())), None);
        assert_eq!(resolve_origin("javascript:void(0)", Some(&base())), None);
        assert_eq!(resolve_origin("http://[::1", Some(&base())), None);
        assert_eq!(resolve_origin("relative.js", None), None);
        assert_eq!(resolve_origin("", Some(&base())), None);
    }

    #[test]
    fn test_is_data_uri() {
        assert!(is_data_uri("data:,"));
        assert!(is_data_uri("Data:image/gif;base64,R0lG"));
        assert!(!is_data_uri("dat"));
        assert!(!is_data_uri("https://data.example.com"));
    }
}
