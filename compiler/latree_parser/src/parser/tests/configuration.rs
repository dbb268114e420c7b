use super::super::test_utils::shape;
use super::super::*;
use crate::init_test_logger;
use latree_ops::{Associativity, Operator, Registry, Symbol};
use pretty_assertions::assert_eq;

fn shape_with(input: &str, config: BuilderConfig) -> String {
    match build_with(input, config) {
        Ok(node) => shape(&node),
        Err(err) => format!("error: {err}"),
    }
}

fn separate() -> BuilderConfig {
    BuilderConfig::new().merge_alternates(false)
}

#[test]
fn test_alternates_kept_apart() {
    init_test_logger();
    assert_eq!(shape_with("a+b-c", separate()), "+[+[a,b],-c]");
    assert_eq!(shape_with("a-b-c", separate()), "+[a,-b,-c]");
    assert_eq!(shape_with("a-b+c", separate()), "+[+[a,-b],c]");
    assert_eq!(shape_with("a/b*c", separate()), "*[*[a,/b],c]");
}

#[test]
fn test_reject_equal_precedence() {
    let config = separate().equal_precedence(EqualPrecedence::Reject);
    assert_eq!(
        build_with("a+b-c", config.clone()),
        Err(ParseError::AmbiguousEqualPrecedence {
            offset: 3,
            left: "+".into(),
            right: "-".into(),
        })
    );
    // same symbol chains still merge
    assert_eq!(shape_with("a-b-c", config.clone()), "+[a,-b,-c]");
    // merging alternates leaves nothing ambiguous in the standard table
    let merged = BuilderConfig::new().equal_precedence(EqualPrecedence::Reject);
    assert_eq!(shape_with("a+b-c", merged), "+[a,b,-c]");
}

#[test]
fn test_depth_limit_from_config() {
    let err = build_with("a+b*c", BuilderConfig::new().max_depth(2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
    assert!(build_with("a+b*c", BuilderConfig::new().max_depth(3)).is_ok());
}

fn modular() -> Registry {
    Registry::builder()
        .operator(Operator::new("+", 13, true, Associativity::Left))
        .operator(Operator::new("mod", 14, false, Associativity::Left))
        .symbol(Symbol::new("+", "+").allow_prefix())
        .symbol(Symbol::new("\\bmod", "mod"))
        .symbol(Symbol::new("%", "mod"))
        .build()
        .unwrap()
}

#[test]
fn test_custom_registry() {
    init_test_logger();
    let registry = modular();
    let builder = TreeBuilder::with_registry(&registry);
    let shape_of = |input: &str| shape(&builder.build(input).unwrap());

    assert_eq!(shape_of("a%b%c"), "mod[mod[a,b],c]");
    assert_eq!(shape_of("a+b\\bmod c"), "+[a,mod[b,c]]");
    // `*` is not an operator here
    assert_eq!(shape_of("a*b+c"), "+[a*b,c]");
    assert_eq!(builder.build("a\\bmod").unwrap_err().kind(), ErrorKind::TrailingPendingText);
}

#[test]
fn test_builder_is_shared_across_threads() {
    let builder = TreeBuilder::new().with_config(separate());
    let builder = &builder;
    let inputs = ["a+b-c", "a^b^c", "(a+b)*c", "a=-b"];
    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| scope.spawn(move || builder.build(input).map(|node| node.render())))
            .collect();
        for (handle, input) in handles.into_iter().zip(inputs) {
            assert_eq!(handle.join().unwrap(), Ok(input.to_string()));
        }
    });
}
