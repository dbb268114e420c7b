use thiserror::Error;

/// A structural failure. No partial tree is returned alongside it.
///
/// Every variant carries the byte offset into the input it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("group opened by `{open}` at offset {offset} is never closed")]
    UnterminatedGroup { offset: usize, open: String },

    #[error("`{close}` at offset {offset} matches no open group")]
    UnmatchedCloser { offset: usize, close: String },

    #[error("`{found}` at offset {offset} closes an outer group while `{expected}` is still missing")]
    MismatchedCloser {
        offset: usize,
        /// Closer the innermost open group is waiting for; `found` matches an
        /// enclosing group
        expected: String,
        found: String,
    },

    #[error("`{left}` and `{right}` at offset {offset} have equal precedence and do not merge")]
    AmbiguousEqualPrecedence {
        offset: usize,
        left: String,
        right: String,
    },

    #[error("formula ends right after `{operator}` at offset {offset}")]
    TrailingPendingText { offset: usize, operator: String },

    #[error("`{operator}` at offset {offset} is missing an operand")]
    MissingOperand { offset: usize, operator: String },

    #[error("formula nests deeper than {limit} levels (at offset {offset})")]
    NestingTooDeep { offset: usize, limit: usize },
}

/// The kind of a [`ParseError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnterminatedGroup,
    UnmatchedCloser,
    MismatchedCloser,
    AmbiguousEqualPrecedence,
    TrailingPendingText,
    MissingOperand,
    NestingTooDeep,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::UnterminatedGroup { .. } => ErrorKind::UnterminatedGroup,
            ParseError::UnmatchedCloser { .. } => ErrorKind::UnmatchedCloser,
            ParseError::MismatchedCloser { .. } => ErrorKind::MismatchedCloser,
            ParseError::AmbiguousEqualPrecedence { .. } => ErrorKind::AmbiguousEqualPrecedence,
            ParseError::TrailingPendingText { .. } => ErrorKind::TrailingPendingText,
            ParseError::MissingOperand { .. } => ErrorKind::MissingOperand,
            ParseError::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
        }
    }

    /// Byte offset into the input.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnterminatedGroup { offset, .. }
            | ParseError::UnmatchedCloser { offset, .. }
            | ParseError::MismatchedCloser { offset, .. }
            | ParseError::AmbiguousEqualPrecedence { offset, .. }
            | ParseError::TrailingPendingText { offset, .. }
            | ParseError::MissingOperand { offset, .. }
            | ParseError::NestingTooDeep { offset, .. } => *offset,
        }
    }

    /// Length in bytes of the text the error points at, at least one.
    pub fn span_len(&self) -> usize {
        let text = match self {
            ParseError::UnterminatedGroup { open, .. } => open.as_str(),
            ParseError::UnmatchedCloser { close, .. } => close.as_str(),
            ParseError::MismatchedCloser { found, .. } => found.as_str(),
            ParseError::AmbiguousEqualPrecedence { right, .. } => right.as_str(),
            ParseError::TrailingPendingText { operator, .. }
            | ParseError::MissingOperand { operator, .. } => operator.as_str(),
            ParseError::NestingTooDeep { .. } => "",
        };
        text.len().max(1)
    }
}
