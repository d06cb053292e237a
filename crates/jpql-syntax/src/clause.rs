//! Clauses shared by several alternatives: case branches, function calls,
//! windows and order-by items

use crate::{FrameExclusion, FrameMode, OverSyntax, Span, SyntaxNode};
use serde::{Deserialize, Serialize};

/// `WHEN condition THEN result`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenSyntax {
    pub condition: SyntaxNode,
    pub result: SyntaxNode,
}

/// Generic function invocation `name([DISTINCT] args) [WITHIN GROUP (...)]
/// [FILTER (WHERE ...)] [OVER ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallSyntax {
    /// Name as written
    pub name: String,
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    pub arguments: Vec<SyntaxNode>,
    /// `WITHIN GROUP (ORDER BY ...)`
    #[serde(default)]
    pub within_group: Option<Vec<OrderByItemSyntax>>,
    /// Predicate of `FILTER (WHERE ...)`
    #[serde(default)]
    pub filter: Option<Box<SyntaxNode>>,
    #[serde(default)]
    pub over: Option<OverSyntax>,
}

impl FunctionCallSyntax {
    /// Plain call without clauses
    pub fn new(name: impl Into<String>, arguments: Vec<SyntaxNode>) -> Self {
        Self {
            name: name.into(),
            distinct: false,
            arguments,
            within_group: None,
            filter: None,
            over: None,
        }
    }
}

/// Inline window definition `OVER ([base] [PARTITION BY ...] [ORDER BY ...] [frame])`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowSyntax {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub partition_by: Vec<SyntaxNode>,
    #[serde(default)]
    pub order_by: Vec<OrderByItemSyntax>,
    #[serde(default)]
    pub frame: Option<FrameSyntax>,
}

/// `ROWS | RANGE | GROUPS` frame clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSyntax {
    pub mode: FrameMode,
    pub start: FrameBoundSyntax,
    #[serde(default)]
    pub end: Option<FrameBoundSyntax>,
    #[serde(default)]
    pub exclusion: Option<FrameExclusion>,
}

/// Frame boundary as written; bounded offsets are numbers or parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrameBoundSyntax {
    UnboundedPreceding,
    Preceding(Box<SyntaxNode>),
    CurrentRow,
    Following(Box<SyntaxNode>),
    UnboundedFollowing,
}

/// `NULLS FIRST` or `NULLS LAST`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NullsOrder {
    First,
    Last,
}

/// `expr [COLLATE 'x'] [ASC | DESC] [NULLS FIRST | NULLS LAST]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByItemSyntax {
    pub expression: SyntaxNode,
    #[serde(default)]
    pub descending: bool,
    #[serde(default)]
    pub nulls: Option<NullsOrder>,
    #[serde(default)]
    pub collation: Option<String>,
    #[serde(default)]
    pub span: Span,
}

impl OrderByItemSyntax {
    pub fn new(expression: SyntaxNode) -> Self {
        Self {
            expression,
            descending: false,
            nulls: None,
            collation: None,
            span: Span::default(),
        }
    }
}
