//! The `(html, css) -> (html, css)` rewrite entry point.

use log::debug;

use crate::dom::{DocumentTree, KuchikiTree};
use crate::inject::inject_rules;
use crate::rules::extract_rules;
use crate::sanitize::sanitize_css;

/// Result of one rewrite pass: HTML with markers injected and CSS with the
/// corresponding pseudo-element blocks removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutput {
    pub html: String,
    pub css: String,
}

/// Rewrites the pseudo-element rules of `css` into real nodes inside `html`.
///
/// Absent or blank CSS short-circuits to the unchanged HTML and an empty
/// stylesheet; CSS without pseudo rules passes both inputs through verbatim.
/// Otherwise: extract rules, inject markers, sanitize the stylesheet. When
/// no rule matches anything, the input HTML also passes through byte-exact.
///
/// The function is pure over its inputs and holds no state across calls, so
/// callers that re-render repeatedly can memoize on `(html, css)` equality.
/// Re-running it on its own output is safe: the sanitized CSS carries no
/// pseudo rules, so nothing is injected twice.
pub fn rewrite(html: &str, css: Option<&str>) -> RewriteOutput {
    let css = match css {
        Some(css) if !css.trim().is_empty() => css,
        _ => {
            return RewriteOutput {
                html: html.to_string(),
                css: String::new(),
            }
        }
    };

    let rules = extract_rules(css);
    if rules.is_empty() {
        return RewriteOutput {
            html: html.to_string(),
            css: css.to_string(),
        };
    }
    debug!("rewriting {} pseudo-element rule(s)", rules.len());

    let tree = KuchikiTree::parse(html);
    let injected = inject_rules(&tree, &rules);

    // An untouched tree keeps the input HTML byte-exact instead of
    // re-serializing it.
    let html = if injected == 0 {
        html.to_string()
    } else {
        tree.to_html()
    };

    RewriteOutput {
        html,
        css: sanitize_css(css),
    }
}
