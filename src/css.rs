//! Low-level CSS text scanning.
//!
//! This module provides the block scanner shared by rule extraction and
//! stylesheet sanitization: an explicit state machine over the CSS text that
//! tracks brace depth and skips comments and quoted strings, so nested braces
//! (e.g. inside `@media`) and `/* ... */` runs cannot desynchronize the two
//! consumers. Both must agree on block shape, which is why this lives in one
//! place.

use std::ops::Range;

/// One top-level `selector { body }` block found in a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CssBlock {
    /// Selector text with comments stripped and surrounding whitespace trimmed.
    pub selector: String,
    /// Raw declaration body between the outermost braces.
    pub body: String,
    /// Byte range of the whole block (selector through closing brace).
    pub span: Range<usize>,
}

/// Scans a stylesheet for top-level blocks.
///
/// Nested braces inside a body belong to that body. A block whose closing
/// brace never arrives is dropped. Stray closing braces outside any block are
/// skipped and reset the selector accumulator.
pub(crate) fn scan_blocks(css: &str) -> Vec<CssBlock> {
    let bytes = css.as_bytes();
    let mut blocks = Vec::new();
    let mut sel_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_comment(bytes, i);
            }
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
            }
            b'}' => {
                // Stray close outside any block.
                i += 1;
                sel_start = i;
            }
            b'{' => {
                let selector_text = &css[sel_start..i];
                let body_start = i + 1;
                match find_block_end(bytes, body_start) {
                    Some(close) => {
                        // Span starts at the selector's first non-whitespace
                        // byte so surrounding whitespace survives removal.
                        let lead = selector_text.len() - selector_text.trim_start().len();
                        blocks.push(CssBlock {
                            selector: strip_comments(selector_text).trim().to_string(),
                            body: css[body_start..close].to_string(),
                            span: sel_start + lead..close + 1,
                        });
                        i = close + 1;
                        sel_start = i;
                    }
                    // Unbalanced trailing block.
                    None => break,
                }
            }
            _ => i += 1,
        }
    }

    blocks
}

/// Splits a declaration body into `(property, value)` pairs.
///
/// Splitting on `;` is quote-aware so a `content` string may contain
/// semicolons. Property names are lowercased and trimmed; `!important`
/// markers are stripped from values. Declarations without a `:` are dropped.
pub(crate) fn split_declarations(body: &str) -> Vec<(String, String)> {
    let body = strip_comments(body);
    let mut declarations = Vec::new();

    for raw in split_outside_quotes(&body, ';') {
        let Some((prop, value)) = raw.split_once(':') else {
            continue;
        };
        let prop = prop.trim().to_ascii_lowercase();
        if prop.is_empty() {
            continue;
        }
        declarations.push((prop, strip_important(value.trim()).to_string()));
    }

    declarations
}

/// Removes a trailing `!important` marker, including spaced forms.
fn strip_important(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    let Some(pos) = lower.rfind('!') else {
        return value;
    };
    if lower[pos + 1..].trim() == "important" {
        value[..pos].trim_end()
    } else {
        value
    }
}

/// Removes `/* ... */` runs from a CSS fragment.
fn strip_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i = skip_comment(bytes, i);
        } else if bytes[i] == b'"' || bytes[i] == b'\'' {
            let end = skip_string(bytes, i);
            out.push_str(&text[i..end]);
            i = end;
        } else {
            // Advance by whole chars so multi-byte text survives.
            let ch = text[i..].chars().next().unwrap();
            out.push(ch);
            i += ch.len_utf8();
        }
    }

    out
}

fn split_outside_quotes(text: &str, separator: char) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'"' || bytes[i] == b'\'' {
            i = skip_string(bytes, i);
        } else if bytes[i] == separator as u8 {
            pieces.push(&text[start..i]);
            i += 1;
            start = i;
        } else {
            i += 1;
        }
    }
    pieces.push(&text[start..]);

    pieces
}

/// Index of the byte after the `*/` closing the comment at `start`.
fn skip_comment(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 2;
    while i < bytes.len() {
        if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

/// Index of the byte after the quote closing the string at `start`,
/// honoring backslash escapes.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Index of the `}` closing the block whose body starts at `body_start`,
/// or `None` when the stylesheet ends first.
fn find_block_end(bytes: &[u8], body_start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = body_start;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_comment(bytes, i);
            }
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
            }
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_single_block() {
        let blocks = scan_blocks("p { color: red; }");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].selector, "p");
        assert_eq!(blocks[0].body, " color: red; ");
    }

    #[test]
    fn test_scan_multiple_blocks_in_order() {
        let blocks = scan_blocks("a { x: 1 } b { y: 2 }\nc { z: 3 }");
        let selectors: Vec<_> = blocks.iter().map(|b| b.selector.as_str()).collect();
        assert_eq!(selectors, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_scan_tracks_nested_braces() {
        let css = "@media screen { p { color: red } } h1 { font-size: 2em }";
        let blocks = scan_blocks(css);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].selector, "@media screen");
        assert_eq!(blocks[0].body, " p { color: red } ");
        assert_eq!(blocks[1].selector, "h1");
    }

    #[test]
    fn test_scan_ignores_braces_in_comments_and_strings() {
        let css = "/* } { */ p::before { content: \"}\"; }";
        let blocks = scan_blocks(css);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].selector, "p::before");
        assert_eq!(blocks[0].body, " content: \"}\"; ");
    }

    #[test]
    fn test_scan_drops_unbalanced_trailing_block() {
        let blocks = scan_blocks("a { x: 1 } b { y: 2");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].selector, "a");
    }

    #[test]
    fn test_scan_span_covers_selector_and_braces() {
        let css = "  p { color: red }  ";
        let blocks = scan_blocks(css);
        assert_eq!(&css[blocks[0].span.clone()], "p { color: red }");
    }

    #[test]
    fn test_scan_recovers_after_stray_close_brace() {
        let blocks = scan_blocks("} p { color: red }");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].selector, "p");
    }

    #[test]
    fn test_split_declarations_basic() {
        let decls = split_declarations("color: red; font-size: 12px");
        assert_eq!(
            decls,
            vec![
                ("color".to_string(), "red".to_string()),
                ("font-size".to_string(), "12px".to_string()),
            ]
        );
    }

    #[test]
    fn test_split_declarations_strips_important() {
        let decls = split_declarations("color: red !important; margin: 0 ! important");
        assert_eq!(decls[0].1, "red");
        assert_eq!(decls[1].1, "0");
    }

    #[test]
    fn test_split_declarations_keeps_semicolon_inside_quotes() {
        let decls = split_declarations("content: \"a;b\"; color: red");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].1, "\"a;b\"");
    }

    #[test]
    fn test_split_declarations_drops_malformed_entries() {
        let decls = split_declarations("nonsense; color: red; ;");
        assert_eq!(decls, vec![("color".to_string(), "red".to_string())]);
    }

    #[test]
    fn test_split_declarations_lowercases_property() {
        let decls = split_declarations("COLOR: Red");
        assert_eq!(decls[0].0, "color");
        assert_eq!(decls[0].1, "Red");
    }

    #[test]
    fn test_split_declarations_ignores_comments() {
        let decls = split_declarations("/* note */ color: red");
        assert_eq!(decls, vec![("color".to_string(), "red".to_string())]);
    }
}
