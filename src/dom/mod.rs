// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML parse tree access
//!
//! Thin layer over html5ever's `RcDom`: parsing plus the handful of
//! traversal helpers the resource collector needs.

mod parser;
mod walk;

pub use parser::parse_html;
pub use walk::{attribute, child_text, descendants, has_rel_token, tag_name, Handle};
