//! Stylesheet sanitization.
//!
//! Removes every pseudo-element block the extractor recognizes so the
//! remaining CSS can be applied in a host that would otherwise choke on (or
//! double-render) `::before`/`::after` rules. Text outside matched blocks,
//! including whitespace, is left untouched.

use crate::css::scan_blocks;
use crate::rules::pseudo_suffix;

/// Strips pseudo-element blocks from a stylesheet.
///
/// A no-op on CSS without pseudo blocks, and idempotent: the output never
/// contains a block the scanner would match again.
pub fn sanitize_css(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut cursor = 0;

    for block in scan_blocks(css) {
        if pseudo_suffix(&block.selector).is_none() {
            continue;
        }
        out.push_str(&css[cursor..block.span.start]);
        cursor = block.span.end;
    }
    out.push_str(&css[cursor..]);

    out
}
