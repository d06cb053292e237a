//! JPQL.Next expression builder
//!
//! Turns the parse tree of an expression or predicate (see `jpql-syntax`)
//! into the AST of `jpql-ast`. Along the way it
//!
//! - decodes string, numeric and temporal literals,
//! - resolves dotted names to enum constants, entity types or paths,
//! - resolves function calls against the built-in table, the function kind
//!   registry and registered macros,
//! - validates clause usage (DISTINCT, WITHIN GROUP, FILTER, OVER) per
//!   function kind.
//!
//! ```ignore
//! use indexmap::IndexSet;
//! use jpql_builder::{build_expression, BuildContext, Registries};
//!
//! let registries = Registries::standard();
//! let ctx = BuildContext::new(&registries, "UPPER(c.name)");
//! let mut used_macros = IndexSet::new();
//! let expr = build_expression(&tree, ctx, &mut used_macros)?;
//! ```

pub mod builder;
pub mod context;
pub mod disambiguate;
pub mod error;
pub mod function;
pub mod literal;
pub mod registry;
pub mod window;

pub use builder::ExpressionBuilder;
pub use context::{
    BuildContext, BuilderConfig, BuilderOptions, ConfigError, EnumConfig, Registries,
    DEFAULT_MAX_DEPTH,
};
pub use error::{Clause, ResolveError, ResolveResult};
pub use literal::{IsoTemporalConverter, TemporalConverter};
pub use registry::{
    EntityRegistry, EntityType, EnumRegistry, EnumType, FunctionKind, FunctionRegistry,
    MacroFunction, MacroRegistry, BUILTIN_FUNCTIONS,
};

use indexmap::IndexSet;
use jpql_ast::{Expression, Predicate};
use jpql_diagnostics::Result;
use jpql_syntax::SyntaxNode;

/// Build an expression, recording expanded macros in `used_macros`
pub fn build_expression(
    node: &SyntaxNode,
    ctx: BuildContext<'_>,
    used_macros: &mut IndexSet<String>,
) -> Result<Expression> {
    ExpressionBuilder::new(ctx, used_macros).build_expression(node)
}

/// Build a predicate, recording expanded macros in `used_macros`
pub fn build_predicate(
    node: &SyntaxNode,
    ctx: BuildContext<'_>,
    used_macros: &mut IndexSet<String>,
) -> Result<Predicate> {
    ExpressionBuilder::new(ctx, used_macros).build_predicate(node)
}
