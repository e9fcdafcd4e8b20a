//! Error types surfaced by document-tree backends.
//!
//! The rewrite pipeline itself has no fatal error conditions: every failure
//! degrades to leaving one rule's effect unapplied.

use thiserror::Error;

/// A structural query a backend could not run.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The backend rejected the selector syntax.
    #[error("invalid selector '{0}'")]
    InvalidSelector(String),
}
