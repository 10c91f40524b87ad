// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Traversal helpers over `RcDom` handles

use markup5ever_rcdom::NodeData;

pub use markup5ever_rcdom::Handle;

/// Lower-cased tag name, `None` for non-element nodes
pub fn tag_name(handle: &Handle) -> Option<String> {
    match handle.data {
        NodeData::Element { ref name, .. } => Some((*name.local).to_ascii_lowercase()),
        _ => None,
    }
}

/// Attribute value by case-insensitive name
pub fn attribute(handle: &Handle, name: &str) -> Option<String> {
    match handle.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| (*a.name.local).eq_ignore_ascii_case(name))
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Concatenated text of the node's direct text children
///
/// This is the verbatim body of raw-text elements such as `<script>` and
/// `<style>`.
pub fn child_text(handle: &Handle) -> String {
    let mut out = String::new();
    for child in handle.children.borrow().iter() {
        if let NodeData::Text { ref contents } = child.data {
            out.push_str(&contents.borrow());
        }
    }
    out
}

/// Whether a space-separated `rel` value contains `token`
pub fn has_rel_token(rel: &str, token: &str) -> bool {
    rel.split_ascii_whitespace()
        .any(|t| t.eq_ignore_ascii_case(token))
}

/// All nodes below `root` in document order (pre-order), excluding `root`
pub fn descendants(root: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    let mut stack: Vec<Handle> = root.children.borrow().iter().rev().cloned().collect();

    while let Some(node) = stack.pop() {
        stack.extend(node.children.borrow().iter().rev().cloned());
        out.push(node);
    }

    out
}
