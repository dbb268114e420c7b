use latree_parser::{build, build_with, BuilderConfig, EqualPrecedence};
use proptest::prelude::*;

fn operand() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]",
        "[0-9]{1,3}",
        "[a-z]_[0-9]",
        Just("\\alpha".to_string()),
        Just("\\pi".to_string()),
    ]
}

fn operator() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("+"),
        Just("-"),
        Just("*"),
        Just("/"),
        Just("="),
        Just("^"),
    ]
}

fn delimiters() -> impl Strategy<Value = (&'static str, &'static str)> {
    prop_oneof![
        Just(("(", ")")),
        Just(("[", "]")),
        Just(("{", "}")),
        Just(("\\left(", "\\right)")),
        Just(("\\left[", "\\right]")),
        Just(("\\left|", "\\right|")),
        Just(("\\sqrt{", "}")),
    ]
}

/// Canonical formulas: no whitespace, every operator between two operands,
/// optionally negated on its right.
fn formula() -> impl Strategy<Value = String> {
    let expr = operand().prop_recursive(5, 48, 4, |inner| {
        prop_oneof![
            (inner.clone(), operator(), any::<bool>(), inner.clone()).prop_map(
                |(left, op, negate, right)| {
                    format!("{left}{op}{}{right}", if negate { "-" } else { "" })
                }
            ),
            (inner, delimiters()).prop_map(|(body, (open, close))| format!("{open}{body}{close}")),
        ]
    });
    (any::<bool>(), expr).prop_map(|(negate, body)| {
        if negate {
            format!("-{body}")
        } else {
            body
        }
    })
}

proptest! {
    #[test]
    fn round_trip_law(input in formula()) {
        let tree = build(&input).map_err(|e| TestCaseError::fail(format!("{input}: {e}")))?;
        prop_assert_eq!(tree.render(), input);
    }

    #[test]
    fn built_trees_are_well_formed(input in formula()) {
        let tree = build(&input).map_err(|e| TestCaseError::fail(format!("{input}: {e}")))?;
        prop_assert!(tree.is_well_formed(), "{} built {:?}", input, tree);
    }

    #[test]
    fn round_trip_holds_without_merging(input in formula()) {
        let config = BuilderConfig::new().merge_alternates(false);
        let tree = build_with(&input, config)
            .map_err(|e| TestCaseError::fail(format!("{input}: {e}")))?;
        prop_assert_eq!(tree.render(), input);
    }

    #[test]
    fn whitespace_is_insignificant(input in formula()) {
        let spaced = format!(" {} ", input.replace('+', " + ").replace('=', " = "));
        prop_assert_eq!(build(&spaced), build(&input));
    }

    #[test]
    fn reject_policy_never_changes_accepted_trees(input in formula()) {
        let config = BuilderConfig::new().equal_precedence(EqualPrecedence::Reject);
        if let Ok(tree) = build_with(&input, config) {
            prop_assert_eq!(Ok(tree), build(&input));
        }
    }

    #[test]
    fn unbalanced_input_is_rejected(input in formula()) {
        let truncated = format!("({input}");
        prop_assert!(build(&truncated).is_err());
    }
}
