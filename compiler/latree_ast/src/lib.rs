//! Formula tree for latree.
//!
//! This crate defines the finalized tree a formula is built into, the
//! serializer that turns it back into text, and utilities for traversing,
//! printing and permuting it.

pub mod ast;
pub mod conversions;
pub mod permute;
pub mod visit;

// Re-export commonly used types
pub use ast::{Children, GroupNode, Joiner, LeafNode, Node, Operand, OperatorNode};
pub use permute::permutations;
pub use visit::{Span, VisitError, VisitResult, Visitable, Visitor};

use std::error::Error;
use std::fmt::Write as _;

/// A result type for tree operations.
pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

/// Serializes a tree to a JSON string.
///
/// # Example
///
/// ```
/// use latree_ast::{to_json, Node};
///
/// let json = to_json(&Node::leaf("x")).unwrap();
/// assert!(json.contains(r#""type": "Leaf""#));
/// assert!(json.contains(r#""text": "x""#));
/// ```
#[cfg(feature = "serde")]
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Deserializes a tree from a JSON string.
#[cfg(feature = "serde")]
pub fn from_json<T: for<'de> serde::Deserialize<'de>>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Prints a tree as an indented outline, one node per line.
///
/// ```text
/// operator +
///   leaf a
///   - leaf b
/// ```
#[derive(Default)]
pub struct TreePrinter {
    indent: usize,
    joiner: Option<String>,
    out: String,
}

impl TreePrinter {
    /// Creates a new `TreePrinter`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prints a tree to a string.
    pub fn print(mut self, node: &Node) -> VisitResult<String> {
        node.accept(&mut self)?;
        Ok(self.out)
    }

    fn line(&mut self, text: &str) -> VisitResult {
        let pad = "  ".repeat(self.indent);
        match self.joiner.take() {
            Some(joiner) => writeln!(self.out, "{pad}{joiner} {text}")?,
            None => writeln!(self.out, "{pad}{text}")?,
        }
        Ok(())
    }

    fn nested<T: Visitable + ?Sized>(&mut self, node: &T) -> VisitResult {
        self.indent += 1;
        let result = node.visit_children(self);
        self.indent -= 1;
        result
    }
}

impl Visitor for TreePrinter {
    type Output = ();

    fn visit_leaf(&mut self, node: &LeafNode) -> VisitResult {
        self.line(&format!("leaf {}", node.text))
    }

    fn visit_operator(&mut self, node: &OperatorNode) -> VisitResult {
        self.line(&format!("operator {}", node.operator))?;
        self.nested(node)
    }

    fn visit_operand(&mut self, node: &Operand) -> VisitResult {
        self.joiner = node.joiner.as_ref().map(ToString::to_string);
        self.visit_node(&node.node)
    }

    fn visit_group(&mut self, node: &GroupNode) -> VisitResult {
        if node.is_sequence() {
            self.line("sequence")?;
        } else {
            self.line(&format!("group {} {}", node.open, node.close))?;
        }
        self.nested(node)
    }
}
