//! The tree under construction.
//!
//! Slots live in a flat arena and refer to each other by index. Children are
//! owned through `children` edges; `parent` is a plain back-reference kept in
//! sync by every primitive here and used only for upward walks.

use latree_ast::{GroupNode, Joiner, LeafNode, Node, Operand, OperatorNode};
use latree_ops::{Delimiter, Operator, Unary};

use super::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

/// Identity of an operator for merging: the family sign, plus the unary
/// alternate when alternates are kept apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeKey {
    pub sign: String,
    pub unary: Option<Unary>,
}

#[derive(Debug)]
pub struct Edge {
    pub joiner: Option<Joiner>,
    pub child: SlotId,
}

#[derive(Debug)]
pub struct OperatorSlot {
    pub operator: Operator,
    pub key: MergeKey,
    /// Joiner for the operand being waited for; `Some` while the operator
    /// expects its next operand
    pub expecting: Option<Joiner>,
    /// Created by a sign with nothing to its left, as in `-b` or `a=-b`
    pub prefix: bool,
}

#[derive(Debug)]
pub struct GroupSlot {
    pub open: String,
    /// `None` while the group is open
    pub close: Option<String>,
    pub delimiter: Option<Delimiter>,
}

#[derive(Debug)]
pub enum Role {
    Leaf(String),
    Operator(OperatorSlot),
    Group(GroupSlot),
}

#[derive(Debug)]
pub struct Slot {
    pub role: Role,
    pub parent: Option<SlotId>,
    pub children: Vec<Edge>,
    /// Byte offset of the text that created the slot
    pub at: usize,
}

impl Slot {
    pub fn is_open_group(&self) -> bool {
        matches!(&self.role, Role::Group(g) if g.close.is_none())
    }

    /// The delimiter of a group still waiting for its closer.
    pub fn open_delimiter(&self) -> Option<&Delimiter> {
        match &self.role {
            Role::Group(g) if g.close.is_none() => g.delimiter.as_ref(),
            _ => None,
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(&self.role, Role::Group(g) if g.delimiter.is_none())
    }

    pub fn operator(&self) -> Option<&OperatorSlot> {
        match &self.role {
            Role::Operator(op) => Some(op),
            _ => None,
        }
    }

    pub fn operator_mut(&mut self) -> Option<&mut OperatorSlot> {
        match &mut self.role {
            Role::Operator(op) => Some(op),
            _ => None,
        }
    }

    pub fn group_mut(&mut self) -> Option<&mut GroupSlot> {
        match &mut self.role {
            Role::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn is_expecting(&self) -> bool {
        self.operator().is_some_and(|op| op.expecting.is_some())
    }
}

#[derive(Debug, Default)]
pub struct Arena {
    slots: Vec<Slot>,
    root: Option<SlotId>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<SlotId> {
        self.root
    }

    pub fn set_root(&mut self, id: SlotId) {
        debug_assert!(self.slots[id.0].parent.is_none());
        self.root = Some(id);
    }

    pub fn alloc(&mut self, role: Role, at: usize) -> SlotId {
        self.slots.push(Slot {
            role,
            parent: None,
            children: Vec::new(),
            at,
        });
        SlotId(self.slots.len() - 1)
    }

    pub fn leaf(&mut self, text: String, at: usize) -> SlotId {
        self.alloc(Role::Leaf(text), at)
    }

    /// A juxtaposition sequence: closed from the start, no markers.
    pub fn sequence(&mut self, at: usize) -> SlotId {
        self.alloc(
            Role::Group(GroupSlot {
                open: String::new(),
                close: Some(String::new()),
                delimiter: None,
            }),
            at,
        )
    }

    pub fn get(&self, id: SlotId) -> &Slot {
        &self.slots[id.0]
    }

    pub fn get_mut(&mut self, id: SlotId) -> &mut Slot {
        &mut self.slots[id.0]
    }

    pub fn parent(&self, id: SlotId) -> Option<SlotId> {
        self.slots[id.0].parent
    }

    /// Appends `child` to `parent`'s children. `child` must be detached.
    pub fn push_child(&mut self, parent: SlotId, joiner: Option<Joiner>, child: SlotId) {
        debug_assert!(self.slots[child.0].parent.is_none() && self.root != Some(child));
        self.slots[child.0].parent = Some(parent);
        self.slots[parent.0].children.push(Edge { joiner, child });
    }

    /// Detaches and returns `parent`'s last child edge.
    pub fn pop_last_child(&mut self, parent: SlotId) -> Option<Edge> {
        let edge = self.slots[parent.0].children.pop()?;
        self.slots[edge.child.0].parent = None;
        Some(edge)
    }

    /// Puts detached `new` where `old` is, keeping the joiner of `old`'s edge,
    /// and leaves `old` detached.
    pub fn replace(&mut self, old: SlotId, new: SlotId) {
        debug_assert!(self.slots[new.0].parent.is_none());
        match self.slots[old.0].parent.take() {
            Some(parent) => {
                if let Some(edge) = self.slots[parent.0]
                    .children
                    .iter_mut()
                    .find(|edge| edge.child == old)
                {
                    edge.child = new;
                }
                self.slots[new.0].parent = Some(parent);
            }
            None => {
                if self.root == Some(old) {
                    self.root = Some(new);
                }
            }
        }
    }

    /// Inserts detached `new_parent` at `node`'s position and makes `node` its
    /// first child.
    pub fn splice_above(&mut self, node: SlotId, new_parent: SlotId) {
        self.replace(node, new_parent);
        self.push_child(new_parent, None, node);
    }

    /// `node` itself or the nearest ancestor satisfying `predicate`.
    pub fn closest_ancestor_where<P>(&self, node: SlotId, mut predicate: P) -> Option<SlotId>
    where
        P: FnMut(SlotId, &Slot) -> bool,
    {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            let slot = &self.slots[id.0];
            if predicate(id, slot) {
                return Some(id);
            }
            cursor = slot.parent;
        }
        None
    }

    /// Checks that every child edge points back at its parent and that each
    /// slot reachable from the root has exactly one owner.
    pub fn is_consistent(&self) -> bool {
        let Some(root) = self.root else {
            return true;
        };
        if self.slots[root.0].parent.is_some() {
            return false;
        }
        let mut seen = vec![false; self.slots.len()];
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id.0], true) {
                return false;
            }
            for edge in &self.slots[id.0].children {
                if self.slots[edge.child.0].parent != Some(id) {
                    return false;
                }
                stack.push(edge.child);
            }
        }
        true
    }

    /// Converts the arena into the finalized tree without recursion.
    ///
    /// Fails with `NestingTooDeep` before building anything when a slot lies
    /// more than `max_depth` levels below the top.
    pub fn into_node(self, max_depth: usize) -> Result<Node, ParseError> {
        let Some(root) = self.root else {
            return Ok(Node::sequence(Vec::new()));
        };

        // Pre-order with depths; reversed it lists children before parents.
        let mut order = Vec::with_capacity(self.slots.len());
        let mut stack = vec![(root, 1usize)];
        while let Some((id, depth)) = stack.pop() {
            if depth > max_depth {
                return Err(ParseError::NestingTooDeep {
                    offset: self.slots[id.0].at,
                    limit: max_depth,
                });
            }
            order.push(id);
            for edge in &self.slots[id.0].children {
                stack.push((edge.child, depth + 1));
            }
        }

        let mut slots: Vec<Option<Slot>> = self.slots.into_iter().map(Some).collect();
        let mut built: Vec<Option<Node>> = (0..slots.len()).map(|_| None).collect();
        for id in order.into_iter().rev() {
            let Some(slot) = slots[id.0].take() else {
                continue;
            };
            let mut operands = Vec::with_capacity(slot.children.len());
            for edge in slot.children {
                if let Some(node) = built[edge.child.0].take() {
                    operands.push(Operand {
                        joiner: edge.joiner,
                        node,
                    });
                }
            }
            let node = match slot.role {
                Role::Leaf(text) => Node::Leaf(LeafNode { text }),
                Role::Operator(op) => Node::Operator(OperatorNode {
                    operator: op.operator,
                    operands,
                }),
                Role::Group(group) => Node::Group(GroupNode {
                    open: group.open,
                    close: group.close.unwrap_or_default(),
                    delimiter: group.delimiter,
                    children: operands.into_iter().map(|operand| operand.node).collect(),
                }),
            };
            built[id.0] = Some(node);
        }

        Ok(built[root.0].take().unwrap_or_else(|| Node::sequence(Vec::new())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latree_ops::Registry;
    use pretty_assertions::assert_eq;

    fn plus(arena: &mut Arena) -> SlotId {
        let operator = Registry::standard().operator("+").unwrap().clone();
        arena.alloc(
            Role::Operator(OperatorSlot {
                key: MergeKey {
                    sign: "+".into(),
                    unary: None,
                },
                operator,
                expecting: None,
                prefix: false,
            }),
            0,
        )
    }

    fn joiner() -> Option<Joiner> {
        Registry::standard().symbol("+").map(Joiner::from)
    }

    #[test]
    fn test_push_and_pop_keep_links() {
        let mut arena = Arena::new();
        let op = plus(&mut arena);
        arena.set_root(op);
        let a = arena.leaf("a".into(), 0);
        let b = arena.leaf("b".into(), 2);
        arena.push_child(op, None, a);
        arena.push_child(op, joiner(), b);
        assert!(arena.is_consistent());
        assert_eq!(arena.parent(b), Some(op));

        let edge = arena.pop_last_child(op).unwrap();
        assert_eq!(edge.child, b);
        assert_eq!(arena.parent(b), None);
        assert!(arena.is_consistent());
    }

    #[test]
    fn test_splice_above_root_moves_root() {
        let mut arena = Arena::new();
        let a = arena.leaf("a".into(), 0);
        arena.set_root(a);
        let seq = arena.sequence(1);
        arena.splice_above(a, seq);
        assert_eq!(arena.root(), Some(seq));
        assert_eq!(arena.parent(a), Some(seq));
        assert!(arena.is_consistent());
    }

    #[test]
    fn test_splice_above_keeps_joiner_on_parent_edge() {
        let mut arena = Arena::new();
        let outer = plus(&mut arena);
        arena.set_root(outer);
        let a = arena.leaf("a".into(), 0);
        let b = arena.leaf("b".into(), 2);
        arena.push_child(outer, None, a);
        arena.push_child(outer, joiner(), b);

        let seq = arena.sequence(3);
        arena.splice_above(b, seq);
        let c = arena.leaf("c".into(), 3);
        arena.push_child(seq, None, c);
        assert!(arena.is_consistent());

        let node = arena.into_node(16).unwrap();
        assert_eq!(node.render(), "a+bc");
        assert!(node.children().nth(1).is_some_and(Node::is_sequence));
    }

    #[test]
    fn test_closest_ancestor_includes_self() {
        let mut arena = Arena::new();
        let op = plus(&mut arena);
        arena.set_root(op);
        let a = arena.leaf("a".into(), 0);
        arena.push_child(op, None, a);
        assert_eq!(arena.closest_ancestor_where(a, |_, _| true), Some(a));
        assert_eq!(
            arena.closest_ancestor_where(a, |_, slot| slot.operator().is_some()),
            Some(op)
        );
        assert_eq!(arena.closest_ancestor_where(a, |_, _| false), None);
    }

    fn nested_sequences() -> Arena {
        let mut arena = Arena::new();
        let outer = arena.sequence(0);
        arena.set_root(outer);
        let inner = arena.sequence(1);
        arena.push_child(outer, None, inner);
        let leaf = arena.leaf("x".into(), 2);
        arena.push_child(inner, None, leaf);
        arena
    }

    #[test]
    fn test_into_node_depth_limit() {
        let err = nested_sequences().into_node(2).unwrap_err();
        assert_eq!(
            err,
            ParseError::NestingTooDeep {
                offset: 2,
                limit: 2
            }
        );
        assert_eq!(nested_sequences().into_node(3).unwrap().depth(), 3);
    }

    #[test]
    fn test_empty_arena_is_empty_sequence() {
        let node = Arena::new().into_node(1).unwrap();
        assert!(node.is_empty());
        assert_eq!(node.render(), "");
    }
}
