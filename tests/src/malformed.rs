use crate::MALFORMED;
use latree_parser::parser::{render_snippet, Diagnostic, Severity};
use latree_parser::{build_with, BuilderConfig, EqualPrecedence};
use pretty_assertions::assert_eq;

#[test]
fn malformed_inputs_fail_under_every_configuration() {
    let configs = [
        BuilderConfig::default(),
        BuilderConfig::new().merge_alternates(false),
        BuilderConfig::new().equal_precedence(EqualPrecedence::Reject),
    ];
    for config in configs {
        for &(input, kind) in MALFORMED {
            match build_with(input, config.clone()) {
                Ok(tree) => panic!("`{input}` built {tree:?} with {config:?}"),
                Err(err) => assert_eq!(err.kind(), kind, "`{input}`"),
            }
        }
    }
}

#[test]
fn every_failure_renders_a_diagnostic() {
    for &(input, _) in MALFORMED {
        let err = build_with(input, BuilderConfig::default()).unwrap_err();
        assert!(err.offset() <= input.len(), "`{input}`: {err}");

        let diag = Diagnostic::from_parse_error(&err, input);
        assert_eq!(diag.severity, Severity::Error);
        assert!(diag.help.is_some());

        let snippet = render_snippet(&diag, input);
        assert!(snippet.starts_with("error: "), "{snippet}");
        assert!(snippet.contains(&format!("1 | {input}")), "{snippet}");
    }
}

#[test]
fn diagnostics_find_the_right_line() {
    let source = "a+b\n=c)";
    let err = build_with(source, BuilderConfig::default()).unwrap_err();
    let diag = Diagnostic::from_parse_error(&err, source);
    assert_eq!((diag.span.line, diag.span.column), (2, 3));
    assert!(render_snippet(&diag, source).contains("2 | =c)"));
}
