//! Pseudo-element rule extraction from theme stylesheets.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::content::ContentSpec;
use crate::css::{scan_blocks, split_declarations};

lazy_static! {
    /// Preview-container wrappers that themes prepend to every selector but
    /// that do not exist in the bare HTML fragment handed to the engine.
    /// The boundary keeps longer class names (`.markdown-body-dark`) intact.
    static ref CONTAINER_PREFIX_RE: Regex =
        Regex::new(r"^(?:\.markdown-body|\.markdown-preview)(?:\s+|$)").unwrap();
}

/// Ordered property -> value mapping for a rule's non-`content` declarations.
pub type StyleMap = IndexMap<String, String>;

/// Which pseudo-element a rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoKind {
    Before,
    After,
}

/// One `selector::before|after { ... }` block from the stylesheet.
///
/// Immutable after extraction; consumed once by the injector.
#[derive(Debug, Clone)]
pub struct PseudoElementRule {
    /// Cleaned selector with the pseudo suffix and any container prefix removed.
    pub selector: String,
    pub kind: PseudoKind,
    pub content: ContentSpec,
    /// Every non-`content` declaration, in source order, `!important` stripped.
    pub styles: StyleMap,
}

/// Extracts pseudo-element rules from a stylesheet, in source order.
///
/// Blocks the scanner cannot balance are dropped there; blocks without a
/// `content` declaration default to an empty literal. Extraction is
/// best-effort and never fails.
pub fn extract_rules(css: &str) -> Vec<PseudoElementRule> {
    let mut rules = Vec::new();

    for block in scan_blocks(css) {
        let Some((prefix, kind)) = pseudo_suffix(&block.selector) else {
            continue;
        };
        let selector = clean_selector(prefix);

        let mut content = None;
        let mut styles = StyleMap::new();
        for (prop, value) in split_declarations(&block.body) {
            if prop == "content" {
                content = Some(ContentSpec::parse(&value));
            } else {
                styles.insert(prop, value);
            }
        }

        debug!("extracted {:?} rule for selector '{}'", kind, selector);
        rules.push(PseudoElementRule {
            selector,
            kind,
            content: content.unwrap_or_else(|| ContentSpec::Literal(String::new())),
            styles,
        });
    }

    rules
}

/// Splits a selector into its prefix and pseudo-element kind, recognizing
/// both `::before`/`::after` and the single-colon legacy forms.
pub(crate) fn pseudo_suffix(selector: &str) -> Option<(&str, PseudoKind)> {
    for (suffix, kind) in [
        ("::before", PseudoKind::Before),
        ("::after", PseudoKind::After),
        (":before", PseudoKind::Before),
        (":after", PseudoKind::After),
    ] {
        if let Some(prefix) = selector.strip_suffix(suffix) {
            return Some((prefix, kind));
        }
    }
    None
}

fn clean_selector(prefix: &str) -> String {
    let mut selector = prefix.trim();
    while let Some(found) = CONTAINER_PREFIX_RE.find(selector) {
        selector = &selector[found.end()..];
    }
    selector.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_before_and_after() {
        let css = "ol li::before { content: counter(item); } h1::after { content: \"#\"; }";
        let rules = extract_rules(css);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].selector, "ol li");
        assert_eq!(rules[0].kind, PseudoKind::Before);
        assert_eq!(rules[0].content, ContentSpec::Counter("item".to_string()));
        assert_eq!(rules[1].selector, "h1");
        assert_eq!(rules[1].kind, PseudoKind::After);
        assert_eq!(rules[1].content, ContentSpec::Literal("#".to_string()));
    }

    #[test]
    fn test_recognizes_legacy_single_colon() {
        let rules = extract_rules("blockquote:before { content: '\u{201C}'; }");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].kind, PseudoKind::Before);
        assert_eq!(rules[0].selector, "blockquote");
    }

    #[test]
    fn test_non_pseudo_blocks_are_ignored() {
        let rules = extract_rules("p { color: red } a:hover { color: blue }");
        assert!(rules.is_empty());
    }

    #[test]
    fn test_styles_keep_source_order_and_drop_important() {
        let css = "p::before { content: \"*\"; color: red !important; margin-left: 4px; }";
        let rules = extract_rules(css);
        let styles: Vec<_> = rules[0]
            .styles
            .iter()
            .map(|(p, v)| (p.as_str(), v.as_str()))
            .collect();
        assert_eq!(styles, vec![("color", "red"), ("margin-left", "4px")]);
    }

    #[test]
    fn test_missing_content_defaults_to_empty_literal() {
        let rules = extract_rules("p::before { color: red }");
        assert_eq!(rules[0].content, ContentSpec::Literal(String::new()));
    }

    #[test]
    fn test_container_prefix_is_dropped() {
        let rules = extract_rules(".markdown-body ol li::before { content: counter(item) }");
        assert_eq!(rules[0].selector, "ol li");
    }

    #[test]
    fn test_container_prefix_alone_leaves_empty_selector() {
        let rules = extract_rules(".markdown-body::before { content: '*' }");
        assert_eq!(rules[0].selector, "");
    }

    #[test]
    fn test_longer_class_names_are_not_over_stripped() {
        let rules = extract_rules(
            ".markdown-body-dark li::before { content: 'a' }\n\
             .markdown-preview2 p::before { content: 'b' }",
        );
        assert_eq!(rules[0].selector, ".markdown-body-dark li");
        assert_eq!(rules[1].selector, ".markdown-preview2 p");
    }

    #[test]
    fn test_rules_appear_in_source_order() {
        let css = "b::after { content: '2' } a::before { content: '1' }";
        let rules = extract_rules(css);
        assert_eq!(rules[0].selector, "b");
        assert_eq!(rules[1].selector, "a");
    }

    #[test]
    fn test_unbalanced_block_is_skipped() {
        let rules = extract_rules("p::before { content: 'x'");
        assert!(rules.is_empty());
    }
}
