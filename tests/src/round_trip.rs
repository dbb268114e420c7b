use crate::ROUND_TRIP_CORPUS;
use latree_ast::visit::NodeCounter;
use latree_ast::{from_json, to_json, Node, TreePrinter, Visitable};
use latree_parser::{build, build_with, BuilderConfig, EqualPrecedence};
use pretty_assertions::assert_eq;

fn configurations() -> Vec<BuilderConfig> {
    vec![
        BuilderConfig::default(),
        BuilderConfig::new().merge_alternates(false),
        BuilderConfig::new().equal_precedence(EqualPrecedence::Reject),
    ]
}

#[test]
fn corpus_round_trips_under_every_configuration() {
    for config in configurations() {
        for &formula in ROUND_TRIP_CORPUS {
            let tree = build_with(formula, config.clone())
                .unwrap_or_else(|e| panic!("`{formula}` failed with {config:?}: {e}"));
            assert_eq!(tree.render(), formula, "with {config:?}");
            assert!(tree.is_well_formed(), "`{formula}` built {tree:?}");
        }
    }
}

#[test]
fn corpus_trees_survive_json() {
    for &formula in ROUND_TRIP_CORPUS {
        let tree = build(formula).unwrap();
        let json = to_json(&tree).unwrap();
        let back: Node = from_json(&json).unwrap();
        assert_eq!(back, tree, "{json}");
    }
}

#[test]
fn outline_of_worked_example() {
    let tree = build("\\left(a-b\\right)\\times\\left(a+b\\right)=a^2-b^2").unwrap();
    let outline = TreePrinter::new().print(&tree).unwrap();
    let expected = [
        "operator =",
        "  operator *",
        "    group \\left( \\right)",
        "      operator +",
        "        leaf a",
        "        - leaf b",
        "    \\times group \\left( \\right)",
        "      operator +",
        "        leaf a",
        "        + leaf b",
        "  = operator +",
        "    operator ^",
        "      leaf a",
        "      ^ leaf 2",
        "    - operator ^",
        "      leaf b",
        "      ^ leaf 2",
    ];
    assert_eq!(outline.lines().collect::<Vec<_>>(), expected);
}

#[test]
fn node_counts_of_worked_example() {
    let tree = build("\\sin\\left(x\\right)^2+\\cos\\left(x\\right)^2=1").unwrap();
    let mut counter = NodeCounter::default();
    tree.accept(&mut counter).unwrap();
    assert_eq!(counter.leaves, 5);
    assert_eq!(counter.operators, 4);
    assert_eq!(counter.groups, 2);
}

#[test]
fn empty_input_builds_an_empty_tree() {
    for input in ["", " ", "\n\t"] {
        let tree = build(input).unwrap();
        assert!(tree.is_empty());
        assert!(tree.is_sequence());
        assert_eq!(tree.render(), "");
    }
}
