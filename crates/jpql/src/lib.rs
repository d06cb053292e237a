//! JPQL.Next expression builder for Rust
//!
//! This crate bundles the expression builder workspace:
//! - The parse tree handed over by the grammar (`syntax`)
//! - The expression and predicate AST (`ast`)
//! - Literal disambiguation, function resolution and AST construction
//!   (`builder`)
//! - Error codes and diagnostics (`diagnostics`)
//!
//! # Example
//!
//! ```ignore
//! use jpql::{build_expression, BuildContext, Registries};
//! use jpql::syntax::build::{call, path};
//!
//! let registries = Registries::standard();
//! let tree = call("UPPER", vec![path("c.name")]);
//! let ctx = BuildContext::new(&registries, "UPPER(c.name)");
//! let (expr, used_macros) = build_expression(&tree, ctx)?;
//! ```

// Re-export all public APIs from internal crates
pub use jpql_ast as ast;
pub use jpql_builder as builder;
pub use jpql_diagnostics as diagnostics;
pub use jpql_syntax as syntax;

// Convenience re-exports
pub use jpql_ast::{Expression, Predicate};
pub use jpql_builder::{BuildContext, BuilderConfig, BuilderOptions, Registries};
pub use jpql_diagnostics::{JpqlError, Result};
pub use jpql_syntax::SyntaxNode;

use indexmap::IndexSet;

/// Build the expression of a parse tree together with the names of the
/// macros expanded along the way
pub fn build_expression(
    node: &SyntaxNode,
    ctx: BuildContext<'_>,
) -> Result<(Expression, IndexSet<String>)> {
    let mut used_macros = IndexSet::new();
    let expression = jpql_builder::build_expression(node, ctx, &mut used_macros)?;
    Ok((expression, used_macros))
}

/// Build the predicate of a parse tree together with the names of the
/// macros expanded along the way
pub fn build_predicate(
    node: &SyntaxNode,
    ctx: BuildContext<'_>,
) -> Result<(Predicate, IndexSet<String>)> {
    let mut used_macros = IndexSet::new();
    let predicate = jpql_builder::build_predicate(node, ctx, &mut used_macros)?;
    Ok((predicate, used_macros))
}

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
