//! The single-pass tree builder.
//!
//! There is no token list and no operator stack. A cursor points at the slot
//! currently taking input; operators either merge into it, descend below it to
//! bind the last operand tighter, or walk up its ancestors and splice in above
//! the highest one they bind looser than.

use latree_ast::{Joiner, Node};
use latree_ops::{Associativity, Delimiter, Operator, Registry, Symbol};

use super::config::{BuilderConfig, EqualPrecedence};
use super::error::ParseError;
use super::scan::{marker_at, Marker};
use super::tree::{Arena, GroupSlot, MergeKey, OperatorSlot, Role, SlotId};

/// Builds formula trees with a fixed registry and configuration.
///
/// A builder holds no state between calls; one instance can build any number
/// of formulas, from any number of threads.
#[derive(Debug, Clone)]
pub struct TreeBuilder<'r> {
    registry: &'r Registry,
    config: BuilderConfig,
}

impl Default for TreeBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder<'static> {
    /// A builder over the standard registry with default configuration.
    pub fn new() -> Self {
        Self::with_registry(Registry::standard())
    }
}

impl<'r> TreeBuilder<'r> {
    pub fn with_registry(registry: &'r Registry) -> Self {
        Self {
            registry,
            config: BuilderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Builds the tree for `input` in one left-to-right pass.
    pub fn build(&self, input: &str) -> Result<Node, ParseError> {
        log::debug!("building `{input}`");
        let mut cursor = Cursor::new(self.registry, &self.config);
        cursor.scan(input)?;
        cursor.finish()
    }
}

/// Builds `input` with the standard registry and default configuration.
pub fn build(input: &str) -> Result<Node, ParseError> {
    TreeBuilder::new().build(input)
}

/// Builds `input` with the standard registry and the given configuration.
pub fn build_with(input: &str, config: BuilderConfig) -> Result<Node, ParseError> {
    TreeBuilder::new().with_config(config).build(input)
}

/// An operator symbol on its way into the tree.
struct Incoming<'r> {
    symbol: &'r Symbol,
    operator: &'r Operator,
    key: MergeKey,
    at: usize,
}

/// What an existing operator slot does with an incoming operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    /// Same commutative operator: the slot takes another operand
    Merge,
    /// Incoming binds tighter: it takes the slot's last operand
    Descend,
    /// Incoming binds looser: keep walking up
    Climb,
    /// Equal precedence, no merge, and the policy refuses to pick
    Ambiguous,
}

/// What the slot under the cursor is doing.
#[derive(Debug, Clone, Copy)]
enum State {
    OpenGroup,
    /// Operator waiting for its next operand
    Expecting,
    /// Operator application with all operands so far in place
    Complete,
    /// Closed group, sequence or leaf, with its parent
    Finished(Option<SlotId>),
}

/// Where a new slot goes relative to the cursor.
enum Spot {
    Root,
    Operand(SlotId),
    Child(SlotId),
    After(SlotId),
}

struct Cursor<'r, 'c> {
    registry: &'r Registry,
    config: &'c BuilderConfig,
    arena: Arena,
    current: Option<SlotId>,
    pending: String,
    pending_at: usize,
    last_operator: Option<(usize, String)>,
}

impl<'r, 'c> Cursor<'r, 'c> {
    fn new(registry: &'r Registry, config: &'c BuilderConfig) -> Self {
        Self {
            registry,
            config,
            arena: Arena::new(),
            current: None,
            pending: String::new(),
            pending_at: 0,
            last_operator: None,
        }
    }

    fn scan(&mut self, input: &str) -> Result<(), ParseError> {
        let mut pos = 0;
        while let Some(c) = input[pos..].chars().next() {
            if c.is_whitespace() {
                pos += c.len_utf8();
                continue;
            }
            let escaped = trailing_backslashes(&self.pending) % 2 == 1;
            match marker_at(&input[pos..], self.registry, escaped) {
                Some((marker, len)) => {
                    let text = &input[pos..pos + len];
                    log::trace!("marker `{text}` at {pos}");
                    match marker {
                        Marker::Operator(symbol) => self.operator(symbol, text, pos)?,
                        Marker::Open(delimiter) => self.open(delimiter, text, pos),
                        Marker::Close(delimiter) => self.close(delimiter, text, pos)?,
                    }
                    pos += len;
                }
                None => {
                    self.push_pending(c, pos);
                    pos += c.len_utf8();
                }
            }
        }
        Ok(())
    }

    fn push_pending(&mut self, c: char, at: usize) {
        if self.pending.is_empty() {
            self.pending_at = at;
        }
        self.pending.push(c);
    }

    fn finish(mut self) -> Result<Node, ParseError> {
        if let Some(current) = self.current {
            if self.arena.get(current).is_expecting() && self.pending.is_empty() {
                let (offset, operator) = self.last_operator.take().unwrap_or_default();
                return Err(ParseError::TrailingPendingText { offset, operator });
            }
        }
        self.commit_pending();

        if let Some(current) = self.current {
            let unterminated = self
                .arena
                .closest_ancestor_where(current, |_, slot| slot.is_open_group());
            if let Some(group) = unterminated {
                let slot = self.arena.get(group);
                let open = match &slot.role {
                    Role::Group(group) => group.open.clone(),
                    _ => String::new(),
                };
                return Err(ParseError::UnterminatedGroup {
                    offset: slot.at,
                    open,
                });
            }
        }

        debug_assert!(self.arena.is_consistent());
        self.arena.into_node(self.config.max_depth)
    }

    // ---- operators ----

    fn operator(&mut self, symbol: &'r Symbol, text: &str, at: usize) -> Result<(), ParseError> {
        let Some(operator) = self.registry.operator(&symbol.sign) else {
            // Registries are validated on build, so every symbol has a family
            text.chars().for_each(|c| self.push_pending(c, at));
            return Ok(());
        };
        let incoming = Incoming {
            symbol,
            operator,
            key: self.key_for(symbol),
            at,
        };
        self.last_operator = Some((at, symbol.text().to_string()));

        if !self.pending.is_empty() && self.has_finished_operand() {
            log::debug!("`{}` written next to the previous operand", self.pending);
            self.commit_pending();
        }

        loop {
            let Some(id) = self.current else {
                return self.start_operator(&incoming, None);
            };
            match self.state(id) {
                State::OpenGroup => return self.start_operator(&incoming, Some(id)),
                State::Expecting if self.pending.is_empty() => return self.start_prefix(&incoming),
                State::Expecting => self.commit_pending(),
                State::Complete => return self.apply(&incoming, id),
                State::Finished(Some(parent)) => self.current = Some(parent),
                State::Finished(None) => {
                    log::debug!("`{}` takes the whole formula so far", symbol);
                    let new = self.new_operator(&incoming, false);
                    self.arena.splice_above(id, new);
                    self.expect(new, symbol);
                    return Ok(());
                }
            }
        }
    }

    fn state(&self, id: SlotId) -> State {
        let slot = self.arena.get(id);
        match &slot.role {
            Role::Group(group) if group.close.is_none() => State::OpenGroup,
            Role::Operator(op) if op.expecting.is_some() => State::Expecting,
            Role::Operator(_) => State::Complete,
            Role::Group(_) | Role::Leaf(_) => State::Finished(slot.parent),
        }
    }

    /// No operator is active at the cursor: the new one becomes the first
    /// operator at the top level or inside an open group.
    fn start_operator(
        &mut self,
        incoming: &Incoming<'r>,
        group: Option<SlotId>,
    ) -> Result<(), ParseError> {
        let first = if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            Some(self.arena.leaf(text, self.pending_at))
        } else {
            group
                .and_then(|g| self.arena.pop_last_child(g))
                .map(|edge| edge.child)
        };
        let Some(first) = first else {
            return self.start_prefix(incoming);
        };

        log::debug!("`{}` starts an application", incoming.symbol);
        let new = self.new_operator(incoming, false);
        self.arena.push_child(new, None, first);
        match group {
            Some(g) => self.arena.push_child(g, None, new),
            None => self.arena.set_root(new),
        }
        self.expect(new, incoming.symbol);
        Ok(())
    }

    /// A sign with nothing to its left, as in `-a` or `a=-b`.
    fn start_prefix(&mut self, incoming: &Incoming<'r>) -> Result<(), ParseError> {
        if !incoming.symbol.prefix {
            return Err(ParseError::MissingOperand {
                offset: incoming.at,
                operator: incoming.symbol.text().to_string(),
            });
        }
        log::debug!("`{}` prefixes the next operand", incoming.symbol);
        let new = self.new_operator(incoming, true);
        self.place(new);
        self.expect(new, incoming.symbol);
        Ok(())
    }

    /// The cursor is a complete operator application.
    fn apply(&mut self, incoming: &Incoming<'r>, id: SlotId) -> Result<(), ParseError> {
        match self.relation(id, incoming) {
            Relation::Merge => {
                log::debug!("`{}` merges into the current application", incoming.symbol);
                self.expect(id, incoming.symbol);
                Ok(())
            }
            Relation::Descend => {
                log::debug!("`{}` binds the last operand tighter", incoming.symbol);
                self.descend(incoming, id);
                Ok(())
            }
            Relation::Ambiguous => Err(self.ambiguous(id, incoming)),
            Relation::Climb => self.climb(incoming, id),
        }
    }

    fn descend(&mut self, incoming: &Incoming<'r>, id: SlotId) {
        let new = self.new_operator(incoming, false);
        if let Some(edge) = self.arena.pop_last_child(id) {
            self.arena.push_child(new, None, edge.child);
            self.arena.push_child(id, edge.joiner, new);
        } else {
            self.arena.push_child(id, None, new);
        }
        self.expect(new, incoming.symbol);
    }

    fn climb(&mut self, incoming: &Incoming<'r>, id: SlotId) -> Result<(), ParseError> {
        let mut top = id;
        let mut stopped_by = None;
        let stop = match self.arena.parent(id) {
            None => None,
            Some(parent) => self.arena.closest_ancestor_where(parent, |ancestor, slot| {
                if slot.operator().is_none() {
                    return true;
                }
                match self.relation(ancestor, incoming) {
                    Relation::Climb => {
                        top = ancestor;
                        false
                    }
                    other => {
                        stopped_by = Some(other);
                        true
                    }
                }
            }),
        };

        match (stop, stopped_by) {
            (Some(ancestor), Some(Relation::Merge)) => {
                log::debug!("`{}` climbs and merges into an ancestor", incoming.symbol);
                self.expect(ancestor, incoming.symbol);
                Ok(())
            }
            (Some(ancestor), Some(Relation::Ambiguous)) => Err(self.ambiguous(ancestor, incoming)),
            _ => {
                log::debug!("`{}` splices in above a completed application", incoming.symbol);
                let new = self.new_operator(incoming, false);
                self.arena.splice_above(top, new);
                self.expect(new, incoming.symbol);
                Ok(())
            }
        }
    }

    /// How the operator slot `id` treats `incoming`.
    ///
    /// A prefix application sitting under another operator (`-b` in `a*-b+c`)
    /// is sealed unless that operator would let `incoming` descend into it.
    fn relation(&self, id: SlotId, incoming: &Incoming<'r>) -> Relation {
        let mut chain = vec![id];
        let mut node = id;
        while let (Some(op), Some(parent)) = (self.arena.get(node).operator(), self.arena.parent(node)) {
            if !op.prefix || self.arena.get(parent).operator().is_none() {
                break;
            }
            chain.push(parent);
            node = parent;
        }

        let mut relation = self.plain_relation(node, incoming);
        for &below in chain.iter().rev().skip(1) {
            relation = match relation {
                Relation::Descend => self.plain_relation(below, incoming),
                _ => Relation::Climb,
            };
        }
        relation
    }

    fn plain_relation(&self, id: SlotId, incoming: &Incoming<'r>) -> Relation {
        let Some(op) = self.arena.get(id).operator() else {
            return Relation::Descend;
        };
        let same = op.key == incoming.key;
        if same && op.operator.commutative {
            return Relation::Merge;
        }
        let (held, new) = (op.operator.precedence, incoming.operator.precedence);
        if held > new {
            Relation::Climb
        } else if held < new {
            Relation::Descend
        } else if same || self.config.equal_precedence == EqualPrecedence::LeftToRight {
            match incoming.operator.associativity {
                Associativity::Right => Relation::Descend,
                Associativity::Left => Relation::Climb,
            }
        } else {
            Relation::Ambiguous
        }
    }

    fn ambiguous(&self, id: SlotId, incoming: &Incoming<'r>) -> ParseError {
        let left = self
            .arena
            .get(id)
            .operator()
            .map(|op| op.operator.sign().to_string())
            .unwrap_or_default();
        ParseError::AmbiguousEqualPrecedence {
            offset: incoming.at,
            left,
            right: incoming.symbol.text().to_string(),
        }
    }

    fn key_for(&self, symbol: &Symbol) -> MergeKey {
        MergeKey {
            sign: symbol.sign.to_string(),
            unary: if self.config.merge_alternates {
                None
            } else {
                symbol.unary
            },
        }
    }

    fn new_operator(&mut self, incoming: &Incoming<'r>, prefix: bool) -> SlotId {
        self.arena.alloc(
            Role::Operator(OperatorSlot {
                operator: incoming.operator.clone(),
                key: incoming.key.clone(),
                expecting: None,
                prefix,
            }),
            incoming.at,
        )
    }

    /// Marks `id` as waiting for an operand introduced by `symbol` and moves
    /// the cursor there.
    fn expect(&mut self, id: SlotId, symbol: &Symbol) {
        if let Some(op) = self.arena.get_mut(id).operator_mut() {
            op.expecting = Some(Joiner::from(symbol));
        }
        self.current = Some(id);
    }

    // ---- groups ----

    fn open(&mut self, delimiter: Delimiter, text: &str, at: usize) {
        let start = if self.pending.is_empty() {
            at
        } else {
            self.pending_at
        };
        let mut open = std::mem::take(&mut self.pending);
        open.push_str(text);
        log::debug!("group `{open}` opens at {start}");

        let group = self.arena.alloc(
            Role::Group(GroupSlot {
                open,
                close: None,
                delimiter: Some(delimiter),
            }),
            start,
        );
        self.place(group);
        self.current = Some(group);
    }

    fn close(&mut self, delimiter: Delimiter, text: &str, at: usize) -> Result<(), ParseError> {
        let unmatched = || ParseError::UnmatchedCloser {
            offset: at,
            close: text.to_string(),
        };
        let current = self.current.ok_or_else(unmatched)?;
        let group = self
            .arena
            .closest_ancestor_where(current, |_, slot| {
                slot.open_delimiter()
                    .is_some_and(|opener| delimiter.closes(opener))
            })
            .ok_or_else(unmatched)?;

        // A group of another kind opened inside the matching one is still open
        let innermost = self
            .arena
            .closest_ancestor_where(current, |_, slot| slot.is_open_group());
        if let Some(inner) = innermost.filter(|&inner| inner != group) {
            let expected = self
                .arena
                .get(inner)
                .open_delimiter()
                .map(|opener| opener.close_marker())
                .unwrap_or_default();
            return Err(ParseError::MismatchedCloser {
                offset: at,
                expected,
                found: text.to_string(),
            });
        }

        if self.arena.get(current).is_expecting() && self.pending.is_empty() {
            let (offset, operator) = self.last_operator.take().unwrap_or_default();
            return Err(ParseError::MissingOperand { offset, operator });
        }
        self.commit_pending();

        if let Some(slot) = self.arena.get_mut(group).group_mut() {
            slot.close = Some(text.to_string());
        }
        log::debug!("group closes with `{text}` at {at}");
        self.current = Some(self.arena.parent(group).unwrap_or(group));
        Ok(())
    }

    // ---- placement ----

    /// Whether the cursor already holds a finished operand that new literal
    /// text would have to sit next to.
    fn has_finished_operand(&self) -> bool {
        let Some(id) = self.current else {
            return false;
        };
        let slot = self.arena.get(id);
        match &slot.role {
            Role::Operator(op) => op.expecting.is_none(),
            Role::Group(group) => group.close.is_some() || !slot.children.is_empty(),
            Role::Leaf(_) => true,
        }
    }

    /// Turns pending text into a leaf at the cursor.
    fn commit_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending);
        let leaf = self.arena.leaf(text, self.pending_at);
        self.place(leaf);
        if let Some(parent) = self.arena.parent(leaf) {
            self.current = Some(parent);
        }
    }

    /// Attaches a detached slot at the cursor: as the awaited operand, as the
    /// content of an empty group, or next to whatever was written last.
    fn place(&mut self, node: SlotId) {
        let spot = match self.current {
            None => Spot::Root,
            Some(id) => {
                let slot = self.arena.get(id);
                match &slot.role {
                    Role::Operator(op) if op.expecting.is_some() => Spot::Operand(id),
                    Role::Group(group) if group.close.is_none() => match slot.children.last() {
                        None => Spot::Child(id),
                        Some(edge) => Spot::After(edge.child),
                    },
                    Role::Group(_) if slot.is_sequence() => Spot::Child(id),
                    Role::Operator(_) => match slot.children.last() {
                        None => Spot::Child(id),
                        Some(edge) => Spot::After(edge.child),
                    },
                    Role::Group(_) | Role::Leaf(_) => Spot::After(id),
                }
            }
        };

        match spot {
            Spot::Root => self.arena.set_root(node),
            Spot::Operand(id) => {
                let joiner = self
                    .arena
                    .get_mut(id)
                    .operator_mut()
                    .and_then(|op| op.expecting.take());
                self.arena.push_child(id, joiner, node);
            }
            Spot::Child(id) => self.arena.push_child(id, None, node),
            Spot::After(last) => {
                let sequence = if self.arena.get(last).is_sequence() {
                    last
                } else {
                    log::debug!("juxtaposition starts a sequence");
                    let sequence = self.arena.sequence(self.arena.get(last).at);
                    self.arena.splice_above(last, sequence);
                    sequence
                };
                self.arena.push_child(sequence, None, node);
            }
        }
    }
}

/// Backslashes at the end of `text`; an even run is a `\\` line break rather
/// than an escape.
fn trailing_backslashes(text: &str) -> usize {
    text.chars().rev().take_while(|&c| c == '\\').count()
}
