//! JPQL.Next Abstract Syntax Tree definitions
//!
//! This crate defines the expression and predicate nodes produced by the
//! expression builder and consumed by renderers and analyzers. Nodes are
//! plain owned values; once a build pass returns them they are treated as
//! read-only.

mod expression;
mod literal;
mod operator;
mod path;
mod predicate;
mod window;

pub use expression::*;
pub use literal::*;
pub use operator::*;
pub use path::*;
pub use predicate::*;
pub use window::*;

/// Type alias for boxed expressions
pub type BoxExpr = Box<Expression>;

/// Type alias for optional boxed expressions
pub type OptBoxExpr = Option<Box<Expression>>;
