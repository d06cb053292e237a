//! JPQL.Next parse tree
//!
//! The grammar and tokenizer live outside this workspace. This crate fixes
//! the shape of the tree they hand over: one [`SyntaxKind`] variant per
//! grammar alternative, each wrapped in a [`SyntaxNode`] carrying the byte
//! span of the alternative in the query text. Trees are serde
//! deserializable so tools can load them from JSON.
//!
//! Token text is kept raw: string literals keep their delimiters and escape
//! sequences, temporal literal bodies keep their quotes. Decoding them is the
//! job of the expression builder.

pub mod build;
mod clause;
mod node;
mod path;

pub use clause::*;
pub use node::*;
pub use path::*;

pub use jpql_ast::{FrameExclusion, FrameMode, NumericKind, Trimspec};
pub use jpql_diagnostics::Span;
