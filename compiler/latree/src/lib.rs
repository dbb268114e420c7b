use latree_ast::Node;
use latree_parser::parser::{render_snippet, Diagnostic};
use latree_parser::{BuilderConfig, ParseError, TreeBuilder};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub kind: String,
    pub offset: usize,
    pub message: String,
    pub snippet: String,
}

impl ErrorReport {
    pub fn new(err: &ParseError, source: &str) -> Self {
        let diag = Diagnostic::from_parse_error(err, source);
        Self {
            kind: format!("{:?}", err.kind()),
            offset: err.offset(),
            message: err.to_string(),
            snippet: render_snippet(&diag, source),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FormulaReport {
    pub formula: String,
    pub rendered: Option<String>,
    /// Whether rendering reproduced the formula, whitespace aside
    pub round_trip: bool,
    pub tree: Option<Node>,
    pub error: Option<ErrorReport>,
}

/// The formula as the builder sees it: whitespace is never part of a tree.
pub fn canonical(formula: &str) -> String {
    formula.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Build `formula` and collect everything a caller may want to show about it.
pub fn analyze_formula(formula: &str, config: &BuilderConfig) -> FormulaReport {
    let builder = TreeBuilder::new().with_config(config.clone());
    match builder.build(formula) {
        Ok(tree) => {
            let rendered = tree.render();
            let round_trip = rendered == canonical(formula);
            if !round_trip {
                log::warn!("`{formula}` renders back as `{rendered}`");
            }
            FormulaReport {
                formula: formula.to_string(),
                rendered: Some(rendered),
                round_trip,
                tree: Some(tree),
                error: None,
            }
        }
        Err(err) => {
            log::debug!("`{formula}` rejected: {err}");
            FormulaReport {
                formula: formula.to_string(),
                rendered: None,
                round_trip: false,
                tree: None,
                error: Some(ErrorReport::new(&err, formula)),
            }
        }
    }
}
