//! Formulas shared by the cross-crate tests.

use latree_parser::parser::ErrorKind;

#[cfg(test)]
mod malformed;
#[cfg(test)]
mod permutations;
#[cfg(test)]
mod round_trip;

/// Canonical (whitespace-free) formulas that must render back unchanged.
pub const ROUND_TRIP_CORPUS: &[&str] = &[
    "x",
    "42",
    "a+b",
    "a+b*c",
    "a*b+c",
    "a+b+c",
    "a-b-c",
    "a/b/c",
    "a^b^c",
    "-a",
    "-a+b",
    "a=-b",
    "a=-b+c",
    "a*-b+c",
    "--a",
    "(a+b)*c",
    "((a+b)*c)",
    "[a+b]^2",
    "x^{2}",
    "\\{a\\}",
    "\\cdotp",
    "\\alpha_1+\\beta_2",
    "\\left(a\\right)b+c",
    "\\left(a-b\\right)\\times\\left(a+b\\right)=a^2-b^2",
    "\\sin\\left(x\\right)^2+\\cos\\left(x\\right)^2=1",
    "2\\cdot\\sum_{n=0}^{\\infty}\\frac{1}{n+1}",
    "\\frac{-b+\\sqrt{b^2-4*a*c}}{2*a}",
    "\\left|x-y\\right|\\le\\left|x\\right|+\\left|y\\right|",
    "\\left\\langle\\alpha,\\beta\\right\\rangle=\\left\\{1\\right\\}",
    "f(x)=a\\div\\left(b\\ast\\pi\\right)",
    "()",
];

/// Inputs every builder configuration refuses, with the error they raise.
pub const MALFORMED: &[(&str, ErrorKind)] = &[
    ("(a+b", ErrorKind::UnterminatedGroup),
    ("\\left(x", ErrorKind::UnterminatedGroup),
    ("{a}{b", ErrorKind::UnterminatedGroup),
    ("a+b)", ErrorKind::UnmatchedCloser),
    ("a}", ErrorKind::UnmatchedCloser),
    ("(a]", ErrorKind::UnmatchedCloser),
    ("\\left[a\\right)", ErrorKind::UnmatchedCloser),
    ("\\left(a)", ErrorKind::UnmatchedCloser),
    ("{(a}", ErrorKind::MismatchedCloser),
    ("\\left|[x\\right|", ErrorKind::MismatchedCloser),
    ("a+", ErrorKind::TrailingPendingText),
    ("a=b=", ErrorKind::TrailingPendingText),
    ("-", ErrorKind::TrailingPendingText),
    ("*a", ErrorKind::MissingOperand),
    ("a+*b", ErrorKind::MissingOperand),
    ("(a+)", ErrorKind::MissingOperand),
    ("a^=b", ErrorKind::MissingOperand),
];
