//! Marker injection for extracted pseudo-element rules.

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::counter::CounterTracker;
use crate::dom::{DocumentTree, Placement};
use crate::rules::{PseudoElementRule, PseudoKind, StyleMap};

lazy_static! {
    /// Leading tag name of a simple selector component.
    static ref TAG_RE: Regex = Regex::new(r"^[a-zA-Z][a-zA-Z0-9]*").unwrap();
}

const OFFSET_PROPS: [&str; 4] = ["left", "right", "top", "bottom"];

/// Applies every rule to the tree, inserting one marker per matched node.
/// Returns the number of markers inserted; zero means the tree was not
/// touched at all.
///
/// Rules are processed in source order; within one rule, matched nodes in
/// document order, which is also the order counters advance in. A rule whose
/// selector matches nothing, or that no query can run for, is skipped.
pub fn inject_rules<T: DocumentTree>(tree: &T, rules: &[PseudoElementRule]) -> usize {
    let mut injected = 0;
    for rule in rules {
        let targets = find_targets(tree, rule);
        if targets.is_empty() {
            debug!("selector '{}' matched no nodes, rule skipped", rule.selector);
            continue;
        }

        let style = marker_style(rule);
        let placement = match rule.kind {
            PseudoKind::Before => Placement::FirstChild,
            PseudoKind::After => Placement::LastChild,
        };

        let mut counters = CounterTracker::new();
        for node in &targets {
            if let Some(updated) = with_position_context(tree.inline_style(node).as_deref()) {
                tree.set_inline_style(node, &updated);
            }

            let text = rule
                .content
                .resolve_static(|name| tree.attribute(node, name))
                .unwrap_or_else(|| counters.advance(tree.parent_key(node)).to_string());

            tree.insert_marker(node, placement, &text, &style);
            injected += 1;
        }
    }
    injected
}

/// Runs the rule's query, falling back to a bare tag match when the backend
/// rejects the selector.
///
/// The fallback drops any ancestor constraint and so can over-match; it is
/// kept for parity with how themes expect degraded selectors to behave.
fn find_targets<T: DocumentTree>(tree: &T, rule: &PseudoElementRule) -> Vec<T::Node> {
    match tree.query(&rule.selector) {
        Ok(nodes) => nodes,
        Err(err) => {
            warn!("{err}, falling back to bare tag match");
            let Some(tag) = bare_tag(&rule.selector) else {
                return Vec::new();
            };
            tree.query(&tag).unwrap_or_default()
        }
    }
}

/// Tag name of the last component of a descendant chain, if it has one.
fn bare_tag(selector: &str) -> Option<String> {
    let last = selector
        .split_whitespace()
        .rev()
        .find(|part| !matches!(*part, ">" | "+" | "~"))?;
    TAG_RE
        .find(last)
        .map(|m| m.as_str().to_ascii_lowercase())
}

/// New inline style giving the target a position context, or `None` when its
/// existing style already sets `position` (never overwritten).
///
/// Computed as a pure function of the existing style and applied once, so
/// the "only set if absent" rule cannot half-apply.
fn with_position_context(existing: Option<&str>) -> Option<String> {
    let existing = existing.unwrap_or("").trim();
    let has_position = existing
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .any(|(prop, _)| prop.trim().eq_ignore_ascii_case("position"));
    if has_position {
        return None;
    }

    if existing.is_empty() {
        Some("position: relative".to_string())
    } else {
        Some(format!(
            "{}; position: relative",
            existing.trim_end_matches(';').trim_end()
        ))
    }
}

/// Final inline style for a marker.
///
/// Starts from the rule's declarations, forces absolute positioning and
/// disabled pointer interaction, and defaults the offsets when the rule sets
/// none: `before` markers to the top-left corner, `after` markers to the
/// top-right, so emulated content stays visible without explicit positioning.
fn marker_style(rule: &PseudoElementRule) -> String {
    let mut styles: StyleMap = rule.styles.clone();
    styles.insert("position".to_string(), "absolute".to_string());
    styles.insert("pointer-events".to_string(), "none".to_string());

    let has_offset = OFFSET_PROPS.iter().any(|prop| styles.contains_key(*prop));
    if !has_offset {
        let (first, second) = match rule.kind {
            PseudoKind::Before => ("left", "top"),
            PseudoKind::After => ("right", "top"),
        };
        styles.insert(first.to_string(), "0".to_string());
        styles.insert(second.to_string(), "0".to_string());
    }

    styles
        .iter()
        .map(|(prop, value)| format!("{prop}: {value}"))
        .collect::<Vec<_>>()
        .join("; ")
}
