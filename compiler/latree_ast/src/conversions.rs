use super::ast::{GroupNode, LeafNode, Node, Operand, OperatorNode};

impl From<LeafNode> for Node {
    fn from(leaf: LeafNode) -> Self {
        Node::Leaf(leaf)
    }
}

impl From<OperatorNode> for Node {
    fn from(op: OperatorNode) -> Self {
        Node::Operator(op)
    }
}

impl From<GroupNode> for Node {
    fn from(group: GroupNode) -> Self {
        Node::Group(group)
    }
}

/// An operand written without a symbol in front of it.
impl From<Node> for Operand {
    fn from(node: Node) -> Self {
        Operand { joiner: None, node }
    }
}
