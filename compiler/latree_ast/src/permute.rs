//! Reorderings of commutative operands.
//!
//! `a+b*c` has the permutations `a+b*c`, `a+c*b`, `b*c+a` and `c*b+a`. Joiners
//! are moved along with their operands so every result still renders as a
//! formula with the same meaning.

use latree_ops::Unary;

use crate::ast::{GroupNode, Joiner, Node, Operand, OperatorNode};

/// Every distinct tree obtained by reordering the operands of commutative
/// operator nodes, recursively. The input ordering comes first and at most
/// `limit` trees are returned.
pub fn permutations(node: &Node, limit: usize) -> Vec<Node> {
    if limit == 0 {
        return Vec::new();
    }
    variants(node, limit)
}

fn variants(node: &Node, limit: usize) -> Vec<Node> {
    match node {
        Node::Leaf(_) => vec![node.clone()],
        Node::Group(group) => {
            let choices: Vec<Vec<Node>> = group
                .children
                .iter()
                .map(|child| variants(child, limit))
                .collect();
            product(&choices, limit)
                .into_iter()
                .map(|children| {
                    Node::Group(GroupNode {
                        open: group.open.clone(),
                        close: group.close.clone(),
                        delimiter: group.delimiter,
                        children,
                    })
                })
                .collect()
        }
        Node::Operator(op) => operator_variants(op, limit),
    }
}

fn operator_variants(op: &OperatorNode, limit: usize) -> Vec<Node> {
    let choices: Vec<Vec<Node>> = op
        .operands
        .iter()
        .map(|operand| variants(&operand.node, limit))
        .collect();
    let plain = op.plain_joiner();

    let mut out: Vec<Node> = Vec::new();
    for nodes in product(&choices, limit) {
        let operands: Vec<Operand> = op
            .operands
            .iter()
            .zip(nodes)
            .map(|(original, node)| Operand {
                joiner: original.joiner.clone(),
                node,
            })
            .collect();

        if !op.operator.commutative || operands.len() < 2 {
            push_unique(&mut out, op, operands);
            if out.len() >= limit {
                return out;
            }
            continue;
        }

        let classes = Classes::of(&operands, &plain);
        let written = classes.ids.clone();
        let mut order = written.clone();
        order.sort_unstable();

        push_unique(&mut out, op, operands.clone());
        if out.len() >= limit {
            return out;
        }
        loop {
            if classes.reciprocal[order[0]] {
                // Jump to the last ordering with this lead so the next one
                // brings in another operand
                order[1..].sort_unstable_by(|a, b| b.cmp(a));
            } else if order != written {
                let arranged = arrange(&operands, &classes, &order, &plain);
                push_unique(&mut out, op, arranged);
                if out.len() >= limit {
                    return out;
                }
            }
            if !next_permutation(&mut order) {
                break;
            }
        }
    }
    out
}

fn push_unique(out: &mut Vec<Node>, op: &OperatorNode, operands: Vec<Operand>) {
    let node = Node::Operator(OperatorNode {
        operator: op.operator.clone(),
        operands,
    });
    if !out.contains(&node) {
        out.push(node);
    }
}

/// Operands grouped into classes of interchangeable ones: same node and same
/// joiner once the leading operand is given the plain joiner. Permuting class
/// ids instead of positions visits each distinct ordering once.
struct Classes {
    /// Class of each operand, in written order
    ids: Vec<usize>,
    /// Operand positions of each class
    members: Vec<Vec<usize>>,
    reciprocal: Vec<bool>,
}

impl Classes {
    fn of(operands: &[Operand], plain: &Joiner) -> Self {
        let joiner = |operand: &Operand| operand.joiner.clone().unwrap_or_else(|| plain.clone());
        let mut ids = Vec::with_capacity(operands.len());
        let mut members: Vec<Vec<usize>> = Vec::new();
        let mut reciprocal = Vec::new();
        for (index, operand) in operands.iter().enumerate() {
            let found = members.iter().position(|class| {
                let first = &operands[class[0]];
                first.node == operand.node && joiner(first) == joiner(operand)
            });
            let id = match found {
                Some(id) => {
                    members[id].push(index);
                    id
                }
                None => {
                    members.push(vec![index]);
                    reciprocal.push(joiner(operand).unary == Some(Unary::Reciprocal));
                    members.len() - 1
                }
            };
            ids.push(id);
        }
        Self {
            ids,
            members,
            reciprocal,
        }
    }
}

/// Operands laid out by class order with joiners fixed up for their new
/// position. The leading class is never a reciprocal.
fn arrange(
    operands: &[Operand],
    classes: &Classes,
    order: &[usize],
    plain: &Joiner,
) -> Vec<Operand> {
    let mut taken = vec![0; classes.members.len()];
    let mut arranged = Vec::with_capacity(order.len());
    for (position, &class) in order.iter().enumerate() {
        let index = classes.members[class][taken[class]];
        taken[class] += 1;
        let mut operand = operands[index].clone();
        if position == 0 {
            if operand.joiner.as_ref().and_then(|j| j.unary) != Some(Unary::Negate) {
                operand.joiner = None;
            }
        } else if operand.joiner.is_none() {
            operand.joiner = Some(plain.clone());
        }
        arranged.push(operand);
    }
    arranged
}

/// Advances `v` to the next lexicographic permutation, returning false once
/// the last one has been passed.
fn next_permutation(v: &mut [usize]) -> bool {
    if v.len() < 2 {
        return false;
    }
    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}

/// Cartesian product of the choices, first choice of every list first,
/// truncated to `limit` combinations.
fn product<T: Clone>(choices: &[Vec<T>], limit: usize) -> Vec<Vec<T>> {
    let mut acc: Vec<Vec<T>> = vec![Vec::new()];
    for options in choices {
        let mut next = Vec::new();
        'outer: for prefix in &acc {
            for option in options {
                let mut combo = prefix.clone();
                combo.push(option.clone());
                next.push(combo);
                if next.len() >= limit {
                    break 'outer;
                }
            }
        }
        acc = next;
    }
    acc
}
