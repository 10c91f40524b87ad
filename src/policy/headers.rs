// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Extra response headers recommended alongside the CSP

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A header name/value pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecommendedHeader {
    pub name: &'static str,
    pub value: &'static str,
}

/// Browser features disabled (or limited to self) by `Permissions-Policy`
pub static PERMISSIONS_POLICY_FEATURES: &[(&str, &str)] = &[
    ("accelerometer", "()"),
    ("ambient-light-sensor", "()"),
    ("autoplay", "(self)"),
    ("battery", "()"),
    ("camera", "()"),
    ("display-capture", "()"),
    ("encrypted-media", "()"),
    ("fullscreen", "(self)"),
    ("geolocation", "()"),
    ("gyroscope", "()"),
    ("magnetometer", "()"),
    ("microphone", "()"),
    ("midi", "()"),
    ("payment", "()"),
    ("picture-in-picture", "(self)"),
    ("publickey-credentials-get", "(self)"),
    ("screen-wake-lock", "()"),
    ("sync-xhr", "(self)"),
    ("usb", "()"),
    ("xr-spatial-tracking", "()"),
];

/// `PERMISSIONS_POLICY_FEATURES` rendered as a header value
const PERMISSIONS_POLICY: &str = "accelerometer=(), ambient-light-sensor=(), autoplay=(self), \
battery=(), camera=(), display-capture=(), encrypted-media=(), fullscreen=(self), geolocation=(), \
gyroscope=(), magnetometer=(), microphone=(), midi=(), payment=(), picture-in-picture=(self), \
publickey-credentials-get=(self), screen-wake-lock=(), sync-xhr=(self), usb=(), xr-spatial-tracking=()";

/// Headers suggested with every generated policy
pub static RECOMMENDED_HEADERS: &[RecommendedHeader] = &[
    RecommendedHeader {
        name: "Referrer-Policy",
        value: "strict-origin-when-cross-origin",
    },
    RecommendedHeader {
        name: "Permissions-Policy",
        value: PERMISSIONS_POLICY,
    },
];

/// The recommended headers as an owned list
pub fn recommended_headers() -> Vec<RecommendedHeader> {
    RECOMMENDED_HEADERS.to_vec()
}

/// Serialize headers as a `{name: value}` object, in list order
pub fn serialize_header_map<S: Serializer>(
    headers: &[RecommendedHeader],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(headers.len()))?;
    for header in headers {
        map.serialize_entry(header.name, header.value)?;
    }
    map.end()
}
