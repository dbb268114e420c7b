// Formula tree definitions.
// A node is exactly one of: a literal leaf, an operator application, or a group.

use std::borrow::Cow;
use std::fmt;

use latree_ops::{Delimiter, Operator, Symbol, Unary};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type")
)]
pub enum Node {
    Leaf(LeafNode),
    Operator(OperatorNode),
    Group(GroupNode),
}

/// Operand text: an identifier, a number, or any run the builder does not
/// recognize as an operator or delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeafNode {
    pub text: String,
}

/// An n-ary application of one operator family.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatorNode {
    pub operator: Operator,
    pub operands: Vec<Operand>,
}

/// One operand of an [`OperatorNode`] together with the symbol written in
/// front of it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operand {
    pub joiner: Option<Joiner>,
    pub node: Node,
}

/// The exact symbol that introduced an operand, e.g. `-` or `\cdot`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Joiner {
    pub text: Cow<'static, str>,
    pub unary: Option<Unary>,
}

/// A delimited group, or (with no delimiter and empty markers) a sequence of
/// operands written side by side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupNode {
    /// Opening marker including any decoration written before it, e.g. `\sin\left(`
    pub open: String,
    pub close: String,
    pub delimiter: Option<Delimiter>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf<S: Into<String>>(text: S) -> Self {
        Node::Leaf(LeafNode { text: text.into() })
    }

    /// A juxtaposition sequence.
    pub fn sequence(children: Vec<Node>) -> Self {
        Node::Group(GroupNode {
            children,
            ..GroupNode::default()
        })
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, Node::Operator(_))
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Node::Group(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Group(group) if group.is_sequence())
    }

    /// True for a childless group, which is also what empty input builds.
    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Group(group) if group.children.is_empty())
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Node::Leaf(leaf) => Some(&leaf.text),
            _ => None,
        }
    }

    pub fn operator(&self) -> Option<&Operator> {
        match self {
            Node::Operator(op) => Some(&op.operator),
            _ => None,
        }
    }

    pub fn left_marker(&self) -> &str {
        match self {
            Node::Group(group) => &group.open,
            _ => "",
        }
    }

    pub fn right_marker(&self) -> &str {
        match self {
            Node::Group(group) => &group.close,
            _ => "",
        }
    }

    /// Children in source order.
    pub fn children(&self) -> Children<'_> {
        match self {
            Node::Leaf(_) => Children::None,
            Node::Operator(op) => Children::Operands(op.operands.iter()),
            Node::Group(group) => Children::Nodes(group.children.iter()),
        }
    }

    /// Levels from this node down to its deepest leaf, counting this node.
    pub fn depth(&self) -> usize {
        1 + self.children().map(Node::depth).max().unwrap_or(0)
    }

    /// Serializes the tree back to formula text.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Checks the shape rules every built tree satisfies:
    /// leaves carry text, every operand after the first has a joiner, and only
    /// delimited groups carry markers.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Node::Leaf(leaf) => !leaf.text.is_empty(),
            Node::Operator(op) => {
                !op.operands.is_empty()
                    && op.operands.iter().skip(1).all(|o| o.joiner.is_some())
                    && op.operands.iter().all(|o| o.node.is_well_formed())
            }
            Node::Group(group) => {
                let markers_ok = match group.delimiter {
                    Some(_) => !group.open.is_empty() && !group.close.is_empty(),
                    None => group.open.is_empty() && group.close.is_empty(),
                };
                markers_ok && group.children.iter().all(Node::is_well_formed)
            }
        }
    }
}

impl GroupNode {
    pub fn is_sequence(&self) -> bool {
        self.delimiter.is_none() && self.open.is_empty() && self.close.is_empty()
    }
}

impl OperatorNode {
    /// The joiner used for operands written without an alternate meaning:
    /// the first one seen in the source, otherwise the family sign.
    pub fn plain_joiner(&self) -> Joiner {
        self.operands
            .iter()
            .filter_map(|o| o.joiner.as_ref())
            .find(|j| j.unary.is_none())
            .cloned()
            .unwrap_or_else(|| Joiner {
                text: self.operator.sign.clone(),
                unary: None,
            })
    }
}

impl Joiner {
    pub fn is_plain(&self) -> bool {
        self.unary.is_none()
    }
}

impl From<&Symbol> for Joiner {
    fn from(symbol: &Symbol) -> Self {
        Joiner {
            text: symbol.text.clone(),
            unary: symbol.unary,
        }
    }
}

/// Iterator over a node's children.
pub enum Children<'a> {
    None,
    Operands(std::slice::Iter<'a, Operand>),
    Nodes(std::slice::Iter<'a, Node>),
}

impl<'a> Iterator for Children<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Children::None => None,
            Children::Operands(iter) => iter.next().map(|o| &o.node),
            Children::Nodes(iter) => iter.next(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf(leaf) => f.write_str(&leaf.text),
            Node::Operator(op) => write!(f, "{op}"),
            Node::Group(group) => write!(f, "{group}"),
        }
    }
}

impl fmt::Display for OperatorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for operand in &self.operands {
            write!(f, "{operand}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(joiner) = &self.joiner {
            f.write_str(&joiner.text)?;
        }
        write!(f, "{}", self.node)
    }
}

impl fmt::Display for GroupNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.open)?;
        for child in &self.children {
            write!(f, "{child}")?;
        }
        f.write_str(&self.close)
    }
}

impl fmt::Display for Joiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
