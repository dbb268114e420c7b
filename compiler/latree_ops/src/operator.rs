use std::borrow::Cow;
use std::fmt;

/// How a chain of the same non-merging operator nests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Associativity {
    /// `a-b-c` nests as `(a-b)-c`
    Left,
    /// `a^b^c` nests as `a^(b^c)`
    Right,
}

/// The alternate meaning a symbol gives the operand it introduces.
///
/// `-` is written against the `+` family and negates its operand, `/` is written
/// against the `*` family and takes the reciprocal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unary {
    Negate,
    Reciprocal,
}

/// An operator family: what the tree records on an operator node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operator {
    /// Canonical sign of the family, e.g. `+` for both `+` and `-`
    pub sign: Cow<'static, str>,
    /// Higher binds tighter
    pub precedence: u8,
    /// Whether repeated applications collapse into one n-ary node
    pub commutative: bool,
    pub associativity: Associativity,
}

impl Operator {
    pub const fn new(
        sign: &'static str,
        precedence: u8,
        commutative: bool,
        associativity: Associativity,
    ) -> Self {
        Self {
            sign: Cow::Borrowed(sign),
            precedence,
            commutative,
            associativity,
        }
    }

    pub fn sign(&self) -> &str {
        &self.sign
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sign)
    }
}

/// A spelling of an operator as it appears in formula text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol {
    /// Exact source text, e.g. `-` or `\cdot`
    pub text: Cow<'static, str>,
    /// Sign of the [`Operator`] family this symbol belongs to
    pub sign: Cow<'static, str>,
    pub unary: Option<Unary>,
    /// Whether the symbol may stand in front of an operand with nothing to its
    /// left, as in `-a+b` or `a=-b`
    pub prefix: bool,
}

impl Symbol {
    pub const fn new(text: &'static str, sign: &'static str) -> Self {
        Self {
            text: Cow::Borrowed(text),
            sign: Cow::Borrowed(sign),
            unary: None,
            prefix: false,
        }
    }

    pub fn with_unary(mut self, unary: Unary) -> Self {
        self.unary = Some(unary);
        self
    }

    pub fn allow_prefix(mut self) -> Self {
        self.prefix = true;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Command-style symbols such as `\cdot` only count as operators when the
    /// next character does not continue the command name.
    pub fn needs_word_boundary(&self) -> bool {
        self.text
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_alphabetic())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
