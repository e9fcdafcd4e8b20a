//! Pseudofill
//!
//! Emulates CSS pseudo-elements (`::before`/`::after`) for hosts that cannot
//! render them: theme rules relying on pseudo-elements are rewritten into
//! real, inert nodes injected into the markdown-derived HTML, and the
//! stylesheet is sanitized so the remaining CSS is safe to apply directly.
//!
//! The whole pipeline is the pure function [`rewrite`]: `(html, css)` in,
//! `(html, css)` out, with no shared state across calls and no fatal error
//! paths — a malformed theme rule degrades to that rule going unapplied.

pub mod content;
pub mod counter;
pub(crate) mod css;
pub mod dom;
pub mod engine;
pub mod error;
pub mod inject;
pub mod rules;
pub mod sanitize;

pub use content::ContentSpec;
pub use counter::CounterTracker;
pub use dom::{DocumentTree, KuchikiTree, Placement};
pub use engine::{rewrite, RewriteOutput};
pub use error::QueryError;
pub use inject::inject_rules;
pub use rules::{extract_rules, PseudoElementRule, PseudoKind, StyleMap};
pub use sanitize::sanitize_css;
