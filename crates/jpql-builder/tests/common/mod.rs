//! Shared fixtures for builder integration tests

#![allow(dead_code)]

use indexmap::IndexSet;
use jpql_ast::{EntityLiteral, Expression, Literal, Predicate};
use jpql_builder::{
    build_expression, build_predicate, BuildContext, BuilderOptions, EntityType, EnumType,
    Registries,
};
use jpql_diagnostics::{JpqlError, MacroError};
use jpql_syntax::SyntaxNode;

/// Standard functions plus a small model:
///
/// - `com.example.Color` (inline literals) and `com.example.Size` (bound
///   parameters)
/// - entity `Cat` of type `com.example.Cat`
/// - macros `VIEW_ROOT`, `IDS` and `BROKEN`
pub fn registries() -> Registries {
    let mut registries = Registries::standard();
    registries
        .enums
        .register_literal(EnumType::new("com.example.Color", ["RED", "GREEN", "BLUE"]));
    registries
        .enums
        .register(EnumType::new("com.example.Size", ["SMALL", "LARGE"]));
    registries
        .entities
        .register(EntityType::new("Cat", "com.example.Cat"));
    registries.macros.register(
        "view_root",
        |arguments: Vec<Expression>| -> Result<Expression, MacroError> {
            let mut arguments = arguments.into_iter();
            match (arguments.next(), arguments.next()) {
                (None, _) => Ok(Expression::property("root")),
                (Some(Expression::Path(mut path)), None) => {
                    path.push(jpql_ast::PathElement::Property("root".into()));
                    Ok(Expression::Path(path))
                }
                _ => Err(MacroError::new("VIEW_ROOT expects at most one path")),
            }
        },
    );
    registries
        .macros
        .register("ids", |_: Vec<Expression>| -> Result<Expression, MacroError> {
            Ok(Expression::parameter("ids"))
        });
    registries
        .macros
        .register("broken", |_: Vec<Expression>| -> Result<Expression, MacroError> {
            Err(MacroError::new("always fails"))
        });
    registries
}

pub fn build(node: &SyntaxNode) -> Expression {
    try_build(node, BuilderOptions::default()).unwrap()
}

pub fn try_build(node: &SyntaxNode, options: BuilderOptions) -> Result<Expression, JpqlError> {
    try_build_source(node, options, "")
}

pub fn try_build_source(
    node: &SyntaxNode,
    options: BuilderOptions,
    source: &str,
) -> Result<Expression, JpqlError> {
    let registries = registries();
    let ctx = BuildContext::new(&registries, source).with_options(options);
    let mut used_macros = IndexSet::new();
    build_expression(node, ctx, &mut used_macros)
}

pub fn predicate(node: &SyntaxNode) -> Predicate {
    let registries = registries();
    let ctx = BuildContext::new(&registries, "");
    let mut used_macros = IndexSet::new();
    build_predicate(node, ctx, &mut used_macros).unwrap()
}

pub fn cat() -> Expression {
    Expression::Literal(Literal::EntityType(EntityLiteral {
        entity_name: "Cat".into(),
        type_name: "com.example.Cat".into(),
        original_text: "Cat".into(),
    }))
}
