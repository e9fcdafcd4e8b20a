//! Document tree capability and its kuchiki backend.
//!
//! The injector only needs a handful of tree operations, captured by
//! [`DocumentTree`] so it stays implementable against any DOM-like backend.
//! [`KuchikiTree`] is the production implementation over an HTML fragment.

use std::rc::Rc;

use kuchiki::traits::TendrilSink;
use kuchiki::{Attribute, ExpandedName, NodeRef};
use markup5ever::{local_name, namespace_url, ns, QualName};

use crate::error::QueryError;

/// Where a marker is inserted among its target's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    FirstChild,
    LastChild,
}

/// The tree operations the injector needs from an HTML backend.
pub trait DocumentTree {
    type Node: Clone;

    /// All nodes matching a structural selector, in document order.
    /// Fails only when the backend rejects the selector syntax.
    fn query(&self, selector: &str) -> Result<Vec<Self::Node>, QueryError>;

    /// Value of a named attribute on a node.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Raw inline `style` attribute of a node.
    fn inline_style(&self, node: &Self::Node) -> Option<String>;

    /// Replaces the inline `style` attribute of a node.
    fn set_inline_style(&self, node: &Self::Node, style: &str);

    /// Stable identity key of a node's parent, if it has one. Two nodes
    /// share a key exactly when they share a parent.
    fn parent_key(&self, node: &Self::Node) -> Option<u64>;

    /// Inserts an inert, non-semantic marker child carrying `text` and an
    /// inline `style`. The marker must be excluded from accessibility
    /// traversal.
    fn insert_marker(&self, target: &Self::Node, placement: Placement, text: &str, style: &str);

    /// Serializes the tree back to an HTML fragment string.
    fn to_html(&self) -> String;
}

/// [`DocumentTree`] over a kuchiki DOM parsed from an HTML fragment.
///
/// Parsing wraps the fragment in a full document; serialization returns only
/// the body's children so the output stays a fragment.
pub struct KuchikiTree {
    document: NodeRef,
}

impl KuchikiTree {
    /// Parses an HTML fragment. HTML parsing is total, so this cannot fail.
    pub fn parse(html: &str) -> Self {
        Self {
            document: kuchiki::parse_html().one(html),
        }
    }
}

impl DocumentTree for KuchikiTree {
    type Node = NodeRef;

    fn query(&self, selector: &str) -> Result<Vec<NodeRef>, QueryError> {
        let matches = self
            .document
            .select(selector)
            .map_err(|()| QueryError::InvalidSelector(selector.to_string()))?;
        Ok(matches.map(|m| m.as_node().clone()).collect())
    }

    fn attribute(&self, node: &NodeRef, name: &str) -> Option<String> {
        let element = node.as_element()?;
        let attributes = element.attributes.borrow();
        attributes.get(name).map(str::to_string)
    }

    fn inline_style(&self, node: &NodeRef) -> Option<String> {
        self.attribute(node, "style")
    }

    fn set_inline_style(&self, node: &NodeRef, style: &str) {
        if let Some(element) = node.as_element() {
            element
                .attributes
                .borrow_mut()
                .insert("style", style.to_string());
        }
    }

    fn parent_key(&self, node: &NodeRef) -> Option<u64> {
        node.parent().map(|parent| Rc::as_ptr(&parent.0) as u64)
    }

    fn insert_marker(&self, target: &NodeRef, placement: Placement, text: &str, style: &str) {
        let marker = NodeRef::new_element(
            QualName::new(None, ns!(html), local_name!("span")),
            vec![
                (
                    ExpandedName::new("", "aria-hidden"),
                    Attribute {
                        prefix: None,
                        value: "true".to_string(),
                    },
                ),
                (
                    ExpandedName::new("", "style"),
                    Attribute {
                        prefix: None,
                        value: style.to_string(),
                    },
                ),
            ],
        );
        if !text.is_empty() {
            marker.append(NodeRef::new_text(text));
        }
        match placement {
            Placement::FirstChild => target.prepend(marker),
            Placement::LastChild => target.append(marker),
        }
    }

    fn to_html(&self) -> String {
        match self.document.select_first("body") {
            Ok(body) => body.as_node().children().map(|child| child.to_string()).collect(),
            // A parsed document always has a body; serialize whole tree if not.
            Err(()) => self.document.to_string(),
        }
    }
}
