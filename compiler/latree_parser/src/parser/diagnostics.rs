use latree_ast::visit::Span;

use super::error::ParseError;

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Info,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Info => "info",
        }
    }
}

/// A human-readable problem report anchored in the formula text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic with an explicit span
    pub fn at_span<S: Into<String>>(span: Span, message: S) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
            help: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_help<S: Into<String>>(mut self, help: S) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Describe a build failure of `source`
    pub fn from_parse_error(err: &ParseError, source: &str) -> Self {
        let span = Span::locate(source, err.offset(), err.span_len());
        Self {
            severity: Severity::Error,
            message: err.to_string(),
            span,
            help: help_for(err),
        }
    }
}

fn help_for(err: &ParseError) -> Option<String> {
    let help = match err {
        ParseError::UnterminatedGroup { open, .. } => {
            format!("Add the closer for `{open}` before the end of the formula")
        }
        ParseError::UnmatchedCloser { .. } => {
            "Remove the closer or add the opener it belongs to".to_string()
        }
        ParseError::MismatchedCloser { expected, .. } => {
            format!("The innermost open group is waiting for `{expected}`")
        }
        ParseError::AmbiguousEqualPrecedence { .. } => {
            "Add a group around the part that should be applied first".to_string()
        }
        ParseError::TrailingPendingText { .. } => {
            "An operator needs an operand after it".to_string()
        }
        ParseError::MissingOperand { .. } => {
            "Only `+` and `-` may stand in front of an operand with nothing before them"
                .to_string()
        }
        ParseError::NestingTooDeep { .. } => {
            "Raise the depth limit with --max-depth or LATREE_MAX_DEPTH".to_string()
        }
    };
    Some(help)
}

/// Render a diagnostic with the offending source line and an underline:
///
/// ```text
/// error: `)` at offset 3 matches no open group
///  --> line 1, col 4
///   |
/// 1 | a+b)
///   |    ^
/// help: Remove the closer or add the opener it belongs to
/// ```
pub fn render_snippet(diag: &Diagnostic, source: &str) -> String {
    let line_no = diag.span.line.max(1);
    let line_text = source.lines().nth(line_no as usize - 1).unwrap_or("");
    let gutter = " ".repeat(line_no.to_string().len());

    let column = diag.span.column.max(1) as usize;
    let width = source
        .get(diag.span.start..diag.span.end)
        .map_or(1, |s| s.lines().next().unwrap_or("").chars().count())
        .max(1);
    let underline = if width == 1 {
        "^".to_string()
    } else {
        "~".repeat(width)
    };

    let mut out = format!(
        "{}: {}\n{gutter}--> line {line_no}, col {column}\n{gutter} |\n{line_no} | {line_text}\n{gutter} | {}{underline}",
        diag.severity.label(),
        diag.message,
        " ".repeat(column - 1),
    );
    if let Some(help) = &diag.help {
        out.push_str("\nhelp: ");
        out.push_str(help);
    }
    out
}
