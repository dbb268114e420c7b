//! Visitor pattern implementation for traversing the formula tree.
//!
//! Implement [`Visitor`] to run an operation over a tree; every node type
//! implements [`Visitable`] so traversal can start anywhere.

use crate::ast::*;

/// The result type for visitor operations.
pub type VisitResult<T = ()> = Result<T, VisitError>;

/// An error that can occur during tree traversal.
#[derive(Debug, thiserror::Error)]
pub enum VisitError {
    /// An error with a custom message.
    #[error("{0}")]
    Custom(String),
}

impl VisitError {
    pub fn custom<T: Into<String>>(msg: T) -> Self {
        VisitError::Custom(msg.into())
    }
}

impl From<std::fmt::Error> for VisitError {
    fn from(_: std::fmt::Error) -> Self {
        VisitError::custom("formatter error")
    }
}

/// A trait for types that can be visited by a `Visitor`.
pub trait Visitable {
    /// Accepts a visitor and calls the appropriate visit method.
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult<V::Output>;

    /// Visits the children of this node with the given visitor.
    ///
    /// The default implementation does nothing.
    fn visit_children<V: Visitor + ?Sized>(&self, _visitor: &mut V) -> VisitResult<V::Output> {
        Ok(Default::default())
    }
}

/// A visitor for traversing the tree.
///
/// The default implementations walk into children and return the default output.
pub trait Visitor {
    /// The output type of the visitor.
    type Output: Default;

    fn visit_node(&mut self, node: &Node) -> VisitResult<Self::Output> {
        match node {
            Node::Leaf(leaf) => self.visit_leaf(leaf),
            Node::Operator(op) => self.visit_operator(op),
            Node::Group(group) => self.visit_group(group),
        }
    }

    fn visit_leaf(&mut self, node: &LeafNode) -> VisitResult<Self::Output> {
        self.visit_children(node)
    }

    fn visit_operator(&mut self, node: &OperatorNode) -> VisitResult<Self::Output> {
        self.visit_children(node)
    }

    fn visit_operand(&mut self, node: &Operand) -> VisitResult<Self::Output> {
        self.visit_children(node)
    }

    fn visit_group(&mut self, node: &GroupNode) -> VisitResult<Self::Output> {
        self.visit_children(node)
    }

    // Helper to visit children of a node
    fn visit_children<T: Visitable + ?Sized>(&mut self, node: &T) -> VisitResult<Self::Output> {
        node.visit_children(self)
    }
}

impl Visitable for Node {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult<V::Output> {
        visitor.visit_node(self)
    }

    fn visit_children<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult<V::Output> {
        match self {
            Node::Leaf(leaf) => leaf.visit_children(visitor),
            Node::Operator(op) => op.visit_children(visitor),
            Node::Group(group) => group.visit_children(visitor),
        }
    }
}

impl Visitable for LeafNode {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult<V::Output> {
        visitor.visit_leaf(self)
    }
}

impl Visitable for OperatorNode {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult<V::Output> {
        visitor.visit_operator(self)
    }

    fn visit_children<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult<V::Output> {
        for operand in &self.operands {
            visitor.visit_operand(operand)?;
        }
        Ok(Default::default())
    }
}

impl Visitable for Operand {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult<V::Output> {
        visitor.visit_operand(self)
    }

    fn visit_children<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult<V::Output> {
        visitor.visit_node(&self.node)
    }
}

impl Visitable for GroupNode {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult<V::Output> {
        visitor.visit_group(self)
    }

    fn visit_children<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult<V::Output> {
        for child in &self.children {
            visitor.visit_node(child)?;
        }
        Ok(Default::default())
    }
}

/// A span in the formula text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// The starting byte index (inclusive).
    pub start: usize,
    /// The ending byte index (exclusive).
    pub end: usize,
    /// The line number (1-based).
    pub line: u32,
    /// The column number (1-based, in characters).
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span of `len` bytes at byte `offset` of `source`, with line and column
    /// computed from the text before it.
    pub fn locate(source: &str, offset: usize, len: usize) -> Self {
        let offset = offset.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() as u32 + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() as u32 + 1;
        Self {
            start: offset,
            end: (offset + len).min(source.len()),
            line,
            column,
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            column: 1,
        }
    }
}

/// Counts nodes by role.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeCounter {
    pub leaves: usize,
    pub operators: usize,
    pub groups: usize,
}

impl Visitor for NodeCounter {
    type Output = ();

    fn visit_leaf(&mut self, _node: &LeafNode) -> VisitResult<Self::Output> {
        self.leaves += 1;
        Ok(())
    }

    fn visit_operator(&mut self, node: &OperatorNode) -> VisitResult<Self::Output> {
        self.operators += 1;
        self.visit_children(node)
    }

    fn visit_group(&mut self, node: &GroupNode) -> VisitResult<Self::Output> {
        self.groups += 1;
        self.visit_children(node)
    }
}
