//! Facade Tests
//!
//! End-to-end builds of JSON-encoded parse trees through the `jpql` facade,
//! the way the CLI drives them.

use jpql::ast::{Expression, Literal, PredicateKind};
use jpql::builder::{BuilderConfig, FunctionKind};
use jpql::diagnostics::{JPQL0001, JPQL0008};
use jpql::{build_expression, build_predicate, BuildContext, SyntaxNode};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn tree(json: &str) -> SyntaxNode {
    serde_json::from_str(json).unwrap()
}

const CONFIG: &str = r#"{
    "options": { "min_entity_segment_count": 1 },
    "functions": { "group_concat": "AGGREGATE" },
    "enums": [ { "name": "com.example.Color", "constants": ["RED", "GREEN"], "literal": true } ],
    "entities": [ { "name": "Cat", "type_name": "com.example.Cat" } ]
}"#;

#[test]
fn test_build_from_json_tree() {
    let source = "UPPER(c.name)";
    let node = tree(
        r#"{
            "kind": {"FunctionInvocation": {
                "name": "UPPER",
                "arguments": [
                    {"kind": {"Path": {"subpath": {"segments": ["c", "name"]}}}, "span": {"start": 6, "end": 12}}
                ]
            }},
            "span": {"start": 0, "end": 13}
        }"#,
    );
    let registries = BuilderConfig::default().registries();
    let (expr, used_macros) = build_expression(&node, BuildContext::new(&registries, source)).unwrap();

    assert_eq!(
        expr,
        Expression::function("UPPER", vec![Expression::dotted("c.name")])
    );
    assert!(used_macros.is_empty());
}

#[test]
fn test_config_driven_build() {
    let config = BuilderConfig::from_json(CONFIG).unwrap();
    let registries = config.registries();
    assert_eq!(
        registries.functions.get("group_concat"),
        Some(FunctionKind::Aggregate)
    );
    let ctx = BuildContext::new(&registries, "").with_options(config.options);

    let node = tree(r#"{"kind": {"Path": {"subpath": {"segments": ["Color", "RED"]}}}}"#);
    let (expr, _) = build_expression(&node, ctx).unwrap();
    assert!(matches!(expr, Expression::Literal(Literal::Enum(_))));

    let node = tree(r#"{"kind": {"Identifier": "Cat"}}"#);
    let (expr, _) = build_expression(&node, ctx).unwrap();
    assert!(matches!(expr, Expression::Literal(Literal::EntityType(_))));
}

#[test]
fn test_build_predicate_from_json() {
    let node = tree(
        r#"{"kind": {"Comparison": {
            "op": "Ne",
            "left": {"kind": {"Path": {"subpath": {"segments": ["c", "age"]}}}},
            "right": {"kind": {"Numeric": {"text": "3", "kind": "Integer"}}}
        }}}"#,
    );
    let registries = BuilderConfig::default().registries();
    let (predicate, _) = build_predicate(&node, BuildContext::new(&registries, "")).unwrap();

    assert!(predicate.is_negated());
    assert!(matches!(predicate.kind, PredicateKind::Comparison { .. }));
}

#[rstest]
#[case(r#"{"kind": {"FunctionInvocation": {"name": "nope"}}, "span": {"start": 0, "end": 6}}"#, JPQL0008)]
#[case(
    r#"{"kind": {"FunctionInvocation": {"name": "lower", "distinct": true}}, "span": {"start": 0, "end": 6}}"#,
    JPQL0001
)]
fn test_failures_carry_source_text(#[case] json: &str, #[case] code: jpql::diagnostics::ErrorCode) {
    let source = "nope()";
    let registries = BuilderConfig::default().registries();
    let err = build_expression(&tree(json), BuildContext::new(&registries, source)).unwrap_err();

    assert_eq!(err.code(), code);
    assert_eq!(err.expression(), source);
    assert_eq!(err.location().map(|loc| (loc.line, loc.column)), Some((1, 1)));
}
