//! Marker recognition.
//!
//! The builder never tokenizes the whole input. At each position it asks
//! [`marker_at`] whether an operator symbol or a group delimiter starts there;
//! anything else is literal operand text.

use latree_ops::delimiter::{LEFT, RIGHT};
use latree_ops::{Delimiter, DelimiterKind, Registry, Symbol};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{one_of, satisfy};
use nom::combinator::{map, not};
use nom::error::{Error as NomError, ErrorKind};
use nom::sequence::{preceded, terminated};
use nom::IResult;

/// Something the builder reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker<'r> {
    Operator(&'r Symbol),
    Open(Delimiter),
    Close(Delimiter),
}

/// Recognizes the marker starting at the beginning of `input`, returning it
/// together with the number of bytes it spans.
///
/// `escaped` is set when the literal text so far ends in an odd run of
/// backslashes, which turns a following bare bracket into literal text (`\{`).
pub fn marker_at<'r>(
    input: &str,
    registry: &'r Registry,
    escaped: bool,
) -> Option<(Marker<'r>, usize)> {
    let (rest, marker) = alt((
        map(sized_open, |kind| Marker::Open(Delimiter::sized(kind))),
        map(sized_close, |kind| Marker::Close(Delimiter::sized(kind))),
        |i| operator_symbol(i, registry),
    ))(input)
    .ok()
    .or_else(|| if escaped { None } else { bare_marker(input).ok() })?;

    Some((marker, input.len() - rest.len()))
}

fn sized_open(input: &str) -> IResult<&str, DelimiterKind> {
    preceded(tag(LEFT), |i| glyph(i, DelimiterKind::open_glyph))(input)
}

fn sized_close(input: &str) -> IResult<&str, DelimiterKind> {
    preceded(tag(RIGHT), |i| glyph(i, DelimiterKind::close_glyph))(input)
}

fn glyph(input: &str, spelling: fn(DelimiterKind) -> &'static str) -> IResult<&str, DelimiterKind> {
    for kind in DelimiterKind::ALL {
        if let Ok((rest, _)) = tag::<_, _, NomError<&str>>(spelling(kind))(input) {
            return Ok((rest, kind));
        }
    }
    Err(nom::Err::Error(NomError::new(input, ErrorKind::Alt)))
}

fn operator_symbol<'a, 'r>(input: &'a str, registry: &'r Registry) -> IResult<&'a str, Marker<'r>> {
    // Symbols come longest first, so `\cdot` is tried before any shorter prefix
    for symbol in registry.symbols() {
        let matched = if symbol.needs_word_boundary() {
            terminated(
                tag::<_, _, NomError<&str>>(symbol.text()),
                not(satisfy(|c: char| c.is_ascii_alphabetic())),
            )(input)
        } else {
            tag::<_, _, NomError<&str>>(symbol.text())(input)
        };
        if let Ok((rest, _)) = matched {
            return Ok((rest, Marker::Operator(symbol)));
        }
    }
    Err(nom::Err::Error(NomError::new(input, ErrorKind::Tag)))
}

fn bare_marker(input: &str) -> IResult<&str, Marker<'static>> {
    map(one_of("()[]{}"), |c| match c {
        '(' => Marker::Open(Delimiter::bare(DelimiterKind::Paren)),
        ')' => Marker::Close(Delimiter::bare(DelimiterKind::Paren)),
        '[' => Marker::Open(Delimiter::bare(DelimiterKind::Bracket)),
        ']' => Marker::Close(Delimiter::bare(DelimiterKind::Bracket)),
        '{' => Marker::Open(Delimiter::bare(DelimiterKind::Brace)),
        _ => Marker::Close(Delimiter::bare(DelimiterKind::Brace)),
    })(input)
}
