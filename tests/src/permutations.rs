use latree_ast::{permutations, Node};
use latree_parser::build;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn leaves(node: &Node) -> Vec<String> {
    let mut out = Vec::new();
    collect(node, &mut out);
    out.sort();
    out
}

fn collect(node: &Node, out: &mut Vec<String>) {
    match node.value() {
        Some(text) => out.push(text.to_string()),
        None => node.children().for_each(|child| collect(child, out)),
    }
}

fn rendered(formula: &str, limit: usize) -> Vec<String> {
    let tree = build(formula).unwrap();
    permutations(&tree, limit).iter().map(Node::render).collect()
}

#[test]
fn difference_moves_its_sign_along() {
    assert_eq!(rendered("a-b", 10), vec!["a-b", "-b+a"]);
}

#[test]
fn reciprocal_never_leads() {
    assert_eq!(
        rendered("a/b*c", 10),
        vec!["a/b*c", "a*c/b", "c*a/b", "c/b*a"]
    );
}

#[test]
fn non_commutative_operators_keep_their_order() {
    assert_eq!(rendered("a^b", 10), vec!["a^b"]);
    assert_eq!(rendered("\\frac{a}{b}", 10), vec!["\\frac{a}{b}"]);
}

#[test]
fn nested_products_are_permuted_too() {
    assert_eq!(
        rendered("a+b*c", 10),
        vec!["a+b*c", "b*c+a", "a+c*b", "c*b+a"]
    );
}

#[test]
fn limit_caps_the_result() {
    let all = rendered("a+b+c+d", 100);
    assert_eq!(all.len(), 24);
    assert_eq!(rendered("a+b+c+d", 5), all[..5].to_vec());
}

#[test]
fn repeated_terms_are_arranged_once() {
    let formula = "x+x+x+x+x+x+x+x+x+x+x";
    assert_eq!(rendered(formula, 5), vec![formula]);
    assert_eq!(rendered("a*b*a", 10), vec!["a*b*a", "a*a*b", "b*a*a"]);
}

#[test]
fn permutations_of_worked_example_are_formulas() {
    let tree = build("\\left(a-b\\right)\\times\\left(a+b\\right)=a^2-b^2").unwrap();
    let found = permutations(&tree, 1000);
    assert_eq!(found[0], tree);
    for permuted in &found {
        let text = permuted.render();
        let rebuilt = build(&text).unwrap_or_else(|e| panic!("`{text}` failed: {e}"));
        assert_eq!(rebuilt.render(), text);
        assert_eq!(leaves(permuted), leaves(&tree));
    }
}

fn operand() -> impl Strategy<Value = String> {
    prop_oneof!["[a-z]", "[0-9]{1,2}"]
}

fn sum_of_products() -> impl Strategy<Value = String> {
    let product = prop::collection::vec(operand(), 1..4).prop_map(|factors| factors.join("*"));
    prop::collection::vec((any::<bool>(), product), 1..4).prop_map(|terms| {
        let mut out = String::new();
        for (i, (negate, term)) in terms.into_iter().enumerate() {
            match (i, negate) {
                (0, false) => {}
                (_, true) => out.push('-'),
                (_, false) => out.push('+'),
            }
            out.push_str(&term);
        }
        out
    })
}

proptest! {
    #[test]
    fn permuted_formulas_rebuild(input in sum_of_products()) {
        let tree = build(&input).map_err(|e| TestCaseError::fail(format!("{input}: {e}")))?;
        let found = permutations(&tree, 50);
        prop_assert!(!found.is_empty());
        prop_assert_eq!(&found[0], &tree);
        for permuted in &found {
            let text = permuted.render();
            let rebuilt = build(&text).map_err(|e| TestCaseError::fail(format!("{text}: {e}")))?;
            prop_assert_eq!(rebuilt.render(), text);
            prop_assert_eq!(leaves(permuted), leaves(&tree));
        }
    }
}
