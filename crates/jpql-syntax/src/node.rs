//! Parse tree nodes

use crate::{
    FunctionCallSyntax, NumericKind, PathSyntax, Span, Trimspec, WhenSyntax, WindowSyntax,
};
use serde::{Deserialize, Serialize};

/// A grammar alternative with its source span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    /// Byte range of the alternative in the query text
    #[serde(default)]
    pub span: Span,
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Replace the span
    pub fn at(mut self, start: usize, end: usize) -> Self {
        self.span = Span::new(start, end);
        self
    }
}

impl From<SyntaxKind> for SyntaxNode {
    fn from(kind: SyntaxKind) -> Self {
        Self {
            kind,
            span: Span::default(),
        }
    }
}

/// `*`, `/` or `%`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultiplicativeOp {
    Multiply,
    Divide,
    Modulo,
}

/// `+` or `-`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdditiveOp {
    Plus,
    Minus,
}

/// Comparison token, `<>` and `!=` are [`ComparisonToken::Ne`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonToken {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Quantifier keyword of a quantified comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantifierToken {
    Any,
    Some,
    All,
}

/// Kind of a JDBC escape temporal literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemporalKind {
    /// `{d '...'}`
    Date,
    /// `{t '...'}`
    Time,
    /// `{ts '...'}`
    Timestamp,
}

/// One variant per grammar alternative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyntaxKind {
    // === Expressions ===
    /// Parenthesized expression or predicate
    Grouped(Box<SyntaxNode>),
    /// `left || right`
    Concatenation {
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
    },
    Multiplicative {
        left: Box<SyntaxNode>,
        op: MultiplicativeOp,
        right: Box<SyntaxNode>,
    },
    Additive {
        left: Box<SyntaxNode>,
        op: AdditiveOp,
        right: Box<SyntaxNode>,
    },
    UnaryMinus(Box<SyntaxNode>),
    UnaryPlus(Box<SyntaxNode>),
    SimpleCase {
        operand: Box<SyntaxNode>,
        when_clauses: Vec<WhenSyntax>,
        otherwise: Option<Box<SyntaxNode>>,
    },
    GeneralCase {
        when_clauses: Vec<WhenSyntax>,
        otherwise: Option<Box<SyntaxNode>>,
    },

    // === Literals ===
    Null,
    Boolean(bool),
    /// String or character literal, raw text including delimiters
    StringLiteral(String),
    /// Numeric literal text including its type suffix
    Numeric {
        text: String,
        kind: NumericKind,
        /// Preceded by a minus sign token
        #[serde(default)]
        negative: bool,
    },
    /// Temporal literal, body kept with its quotes
    TemporalLiteral {
        kind: TemporalKind,
        text: String,
    },
    /// `:name`
    NamedParameter(String),
    /// `?1`
    PositionalParameter(String),
    /// `TYPE(path)` or `TYPE(:param)`
    EntityType(Box<SyntaxNode>),
    /// Dotted name that must resolve to an enum constant or an entity
    EntityTypeOrEnumLiteral(Vec<String>),

    // === Functions ===
    Trim {
        trimspec: Option<Trimspec>,
        character: Option<Box<SyntaxNode>>,
        operand: Box<SyntaxNode>,
    },
    /// `CURRENT_DATE`, `CURRENT_TIME` or `CURRENT_TIMESTAMP`, as written
    TemporalFunction(String),
    /// `COUNT(...)`, the argument is `None` for `COUNT(*)`
    Count {
        #[serde(default)]
        distinct: bool,
        argument: Option<Box<SyntaxNode>>,
        #[serde(default)]
        filter: Option<Box<SyntaxNode>>,
        #[serde(default)]
        over: Option<OverSyntax>,
    },
    FunctionInvocation(FunctionCallSyntax),

    // === Paths ===
    /// Path in expression position
    Path(PathSyntax),
    /// Dot separated identifiers without index or qualifier
    SimpleSubpath(Vec<String>),
    /// `TREAT(path AS Entity)`
    TreatPath {
        path: PathSyntax,
        entity_name: String,
    },
    /// `OBJECT(alias)`
    ObjectSelect(String),
    /// `VALUE(path)`
    ValuePath(PathSyntax),
    /// `KEY(path)`
    MapKeyPath(PathSyntax),
    /// `ENTRY(path)`
    MapEntrySelect(PathSyntax),
    /// `NEW a.b.C(args)`
    Constructor {
        class_name: Vec<String>,
        arguments: Vec<SyntaxNode>,
    },
    /// Macro call in path position
    MacroPath {
        name: String,
        arguments: Vec<SyntaxNode>,
    },
    /// `OUTER(subpath)` or `OUTER(MACRO(...))`
    OuterPath(Box<SyntaxNode>),
    Identifier(String),

    // === Predicates ===
    Or {
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
    },
    And {
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
    },
    /// `NOT predicate`
    Negated(Box<SyntaxNode>),
    Exists {
        #[serde(default)]
        not: bool,
        operand: Box<SyntaxNode>,
    },
    IsNull {
        #[serde(default)]
        not: bool,
        operand: Box<SyntaxNode>,
    },
    IsEmpty {
        #[serde(default)]
        not: bool,
        operand: Box<SyntaxNode>,
    },
    MemberOf {
        #[serde(default)]
        not: bool,
        element: Box<SyntaxNode>,
        collection: PathSyntax,
    },
    Between {
        #[serde(default)]
        not: bool,
        operand: Box<SyntaxNode>,
        low: Box<SyntaxNode>,
        high: Box<SyntaxNode>,
    },
    Like {
        #[serde(default)]
        not: bool,
        operand: Box<SyntaxNode>,
        pattern: Box<SyntaxNode>,
        #[serde(default)]
        escape: Option<Box<SyntaxNode>>,
    },
    In {
        #[serde(default)]
        not: bool,
        operand: Box<SyntaxNode>,
        items: Vec<SyntaxNode>,
        /// The item list was written in parentheses
        #[serde(default)]
        parenthesized: bool,
    },
    Comparison {
        op: ComparisonToken,
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
    },
    /// Comparison against a subquery alias, `x > ALL sq`
    QuantifiedComparison {
        op: ComparisonToken,
        left: Box<SyntaxNode>,
        quantifier: Option<QuantifierToken>,
        right: Box<SyntaxNode>,
    },

    /// Input the grammar could not match, with its text
    Error(String),
}

impl SyntaxKind {
    /// Name of the alternative, for logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grouped(_) => "Grouped",
            Self::Concatenation { .. } => "Concatenation",
            Self::Multiplicative { .. } => "Multiplicative",
            Self::Additive { .. } => "Additive",
            Self::UnaryMinus(_) => "UnaryMinus",
            Self::UnaryPlus(_) => "UnaryPlus",
            Self::SimpleCase { .. } => "SimpleCase",
            Self::GeneralCase { .. } => "GeneralCase",
            Self::Null => "Null",
            Self::Boolean(_) => "Boolean",
            Self::StringLiteral(_) => "StringLiteral",
            Self::Numeric { .. } => "Numeric",
            Self::TemporalLiteral { .. } => "TemporalLiteral",
            Self::NamedParameter(_) => "NamedParameter",
            Self::PositionalParameter(_) => "PositionalParameter",
            Self::EntityType(_) => "EntityType",
            Self::EntityTypeOrEnumLiteral(_) => "EntityTypeOrEnumLiteral",
            Self::Trim { .. } => "Trim",
            Self::TemporalFunction(_) => "TemporalFunction",
            Self::Count { .. } => "Count",
            Self::FunctionInvocation(_) => "FunctionInvocation",
            Self::Path(_) => "Path",
            Self::SimpleSubpath(_) => "SimpleSubpath",
            Self::TreatPath { .. } => "TreatPath",
            Self::ObjectSelect(_) => "ObjectSelect",
            Self::ValuePath(_) => "ValuePath",
            Self::MapKeyPath(_) => "MapKeyPath",
            Self::MapEntrySelect(_) => "MapEntrySelect",
            Self::Constructor { .. } => "Constructor",
            Self::MacroPath { .. } => "MacroPath",
            Self::OuterPath(_) => "OuterPath",
            Self::Identifier(_) => "Identifier",
            Self::Or { .. } => "Or",
            Self::And { .. } => "And",
            Self::Negated(_) => "Negated",
            Self::Exists { .. } => "Exists",
            Self::IsNull { .. } => "IsNull",
            Self::IsEmpty { .. } => "IsEmpty",
            Self::MemberOf { .. } => "MemberOf",
            Self::Between { .. } => "Between",
            Self::Like { .. } => "Like",
            Self::In { .. } => "In",
            Self::Comparison { .. } => "Comparison",
            Self::QuantifiedComparison { .. } => "QuantifiedComparison",
            Self::Error(_) => "Error",
        }
    }
}

/// OVER clause of a function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OverSyntax {
    /// `OVER w`
    Named(String),
    /// `OVER (...)`
    Inline(WindowSyntax),
}
