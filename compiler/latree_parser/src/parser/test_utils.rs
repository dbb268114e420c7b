//! Test utilities for the builder

use latree_ast::{Node, Operand};

/// Compact one-line rendering of a tree's structure.
///
/// Operators print as `sign[operands]`, delimited groups as
/// `open[children]close` and sequences as `seq[children]`. Operands keep their
/// joiner only when it carries an alternate meaning, so `a-b+c` prints as
/// `+[a,-b,c]`.
pub fn shape(node: &Node) -> String {
    match node {
        Node::Leaf(leaf) => leaf.text.clone(),
        Node::Operator(op) => {
            let operands: Vec<String> = op.operands.iter().map(operand_shape).collect();
            format!("{}[{}]", op.operator, operands.join(","))
        }
        Node::Group(group) => {
            let children: Vec<String> = group.children.iter().map(shape).collect();
            if group.is_sequence() {
                format!("seq[{}]", children.join(","))
            } else {
                format!("{}[{}]{}", group.open, children.join(","), group.close)
            }
        }
    }
}

fn operand_shape(operand: &Operand) -> String {
    match &operand.joiner {
        Some(joiner) if !joiner.is_plain() => format!("{joiner}{}", shape(&operand.node)),
        _ => shape(&operand.node),
    }
}

/// Builds `input` with the default builder and returns its shape.
pub fn shape_of(input: &str) -> String {
    match super::build(input) {
        Ok(node) => shape(&node),
        Err(err) => format!("error: {err}"),
    }
}
