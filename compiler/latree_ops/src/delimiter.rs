//! Group delimiters: the bracket families a formula can use to force grouping.

use std::fmt;

/// Decoration prefix of a sized opening delimiter.
pub const LEFT: &str = "\\left";
/// Decoration prefix of a sized closing delimiter.
pub const RIGHT: &str = "\\right";

/// Bracket family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DelimiterKind {
    Paren,
    Bracket,
    Brace,
    Pipe,
    Angle,
}

/// Whether the delimiter is written bare (`(`) or sized with `\left`/`\right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DelimiterStyle {
    Bare,
    Sized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delimiter {
    pub kind: DelimiterKind,
    pub style: DelimiterStyle,
}

impl DelimiterKind {
    /// Opening glyph as written after `\left`.
    pub fn open_glyph(self) -> &'static str {
        match self {
            DelimiterKind::Paren => "(",
            DelimiterKind::Bracket => "[",
            DelimiterKind::Brace => "\\{",
            DelimiterKind::Pipe => "|",
            DelimiterKind::Angle => "\\langle",
        }
    }

    /// Closing glyph as written after `\right`.
    pub fn close_glyph(self) -> &'static str {
        match self {
            DelimiterKind::Paren => ")",
            DelimiterKind::Bracket => "]",
            DelimiterKind::Brace => "\\}",
            DelimiterKind::Pipe => "|",
            DelimiterKind::Angle => "\\rangle",
        }
    }

    /// Bare spelling, if the family has one. Pipes and angles are only groups
    /// when sized, since a bare `|` cannot tell opening from closing.
    pub fn bare(self) -> Option<(char, char)> {
        match self {
            DelimiterKind::Paren => Some(('(', ')')),
            DelimiterKind::Bracket => Some(('[', ']')),
            DelimiterKind::Brace => Some(('{', '}')),
            DelimiterKind::Pipe | DelimiterKind::Angle => None,
        }
    }

    pub const ALL: [DelimiterKind; 5] = [
        DelimiterKind::Paren,
        DelimiterKind::Bracket,
        DelimiterKind::Brace,
        DelimiterKind::Pipe,
        DelimiterKind::Angle,
    ];
}

impl Delimiter {
    pub const fn bare(kind: DelimiterKind) -> Self {
        Self {
            kind,
            style: DelimiterStyle::Bare,
        }
    }

    pub const fn sized(kind: DelimiterKind) -> Self {
        Self {
            kind,
            style: DelimiterStyle::Sized,
        }
    }

    /// The full opening marker, e.g. `\left(` or `(`.
    pub fn open_marker(&self) -> String {
        match (self.style, self.kind.bare()) {
            (DelimiterStyle::Bare, Some((open, _))) => open.to_string(),
            _ => format!("{LEFT}{}", self.kind.open_glyph()),
        }
    }

    /// The full closing marker, e.g. `\right)` or `)`.
    pub fn close_marker(&self) -> String {
        match (self.style, self.kind.bare()) {
            (DelimiterStyle::Bare, Some((_, close))) => close.to_string(),
            _ => format!("{RIGHT}{}", self.kind.close_glyph()),
        }
    }

    /// A closer only matches an opener of the same family written the same way.
    pub fn closes(&self, opener: &Delimiter) -> bool {
        self == opener
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}…{}", self.open_marker(), self.close_marker())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_markers() {
        let sized = Delimiter::sized(DelimiterKind::Brace);
        assert_eq!(sized.open_marker(), "\\left\\{");
        assert_eq!(sized.close_marker(), "\\right\\}");

        let bare = Delimiter::bare(DelimiterKind::Bracket);
        assert_eq!(bare.open_marker(), "[");
        assert_eq!(bare.close_marker(), "]");
    }

    #[test]
    fn test_style_must_match() {
        let sized = Delimiter::sized(DelimiterKind::Paren);
        let bare = Delimiter::bare(DelimiterKind::Paren);
        assert!(sized.closes(&sized));
        assert!(!bare.closes(&sized));
        assert!(!Delimiter::sized(DelimiterKind::Bracket).closes(&sized));
    }
}
