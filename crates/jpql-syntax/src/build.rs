//! Node construction helpers
//!
//! Shorthands for assembling trees by hand in tests, benchmarks and tools.
//! Every node gets an empty span; use [`SyntaxNode::at`] where a test needs
//! source text in error messages.

use crate::{
    AdditiveOp, ComparisonToken, FunctionCallSyntax, GeneralSubpath, MultiplicativeOp, NumericKind,
    PathSyntax, QuantifierToken, SyntaxKind, SyntaxNode, TemporalKind,
};

fn node(kind: SyntaxKind) -> SyntaxNode {
    SyntaxNode::from(kind)
}

fn boxed(kind: SyntaxKind) -> Box<SyntaxNode> {
    Box::new(node(kind))
}

fn segments(dotted: &str) -> Vec<String> {
    dotted.split('.').map(str::to_string).collect()
}

// === Paths ===

/// Unindexed subpath from dotted text
pub fn subpath(dotted: &str) -> GeneralSubpath {
    GeneralSubpath::new(segments(dotted))
}

/// Subpath whose last segment is indexed
pub fn indexed(dotted: &str, index: SyntaxNode) -> GeneralSubpath {
    GeneralSubpath {
        index: Some(Box::new(index)),
        ..subpath(dotted)
    }
}

/// Chain subpaths, `a[1].b` is `chain(indexed("a", int("1")), subpath("b"))`
pub fn chain(mut first: GeneralSubpath, next: GeneralSubpath) -> GeneralSubpath {
    let tail = match first.next.take() {
        Some(inner) => chain(*inner, next),
        None => next,
    };
    first.next = Some(Box::new(tail));
    first
}

/// Path syntax from dotted text
pub fn path_syntax(dotted: &str) -> PathSyntax {
    PathSyntax::new(subpath(dotted))
}

/// Path expression from dotted text
pub fn path(dotted: &str) -> SyntaxNode {
    node(SyntaxKind::Path(path_syntax(dotted)))
}

/// Path expression from a subpath chain
pub fn general_path(subpath: GeneralSubpath) -> SyntaxNode {
    node(SyntaxKind::Path(PathSyntax::new(subpath)))
}

/// Path with a qualifier and an optional dereference
pub fn qualified_path(qualifier: SyntaxNode, subpath: Option<GeneralSubpath>) -> SyntaxNode {
    node(SyntaxKind::Path(PathSyntax {
        qualified: Some(Box::new(qualifier)),
        subpath,
    }))
}

pub fn simple_subpath(dotted: &str) -> SyntaxNode {
    node(SyntaxKind::SimpleSubpath(segments(dotted)))
}

pub fn ident(name: &str) -> SyntaxNode {
    node(SyntaxKind::Identifier(name.to_string()))
}

pub fn treat(dotted: &str, entity_name: &str) -> SyntaxNode {
    node(SyntaxKind::TreatPath {
        path: path_syntax(dotted),
        entity_name: entity_name.to_string(),
    })
}

pub fn key(dotted: &str) -> SyntaxNode {
    node(SyntaxKind::MapKeyPath(path_syntax(dotted)))
}

pub fn value(dotted: &str) -> SyntaxNode {
    node(SyntaxKind::ValuePath(path_syntax(dotted)))
}

pub fn entry(dotted: &str) -> SyntaxNode {
    node(SyntaxKind::MapEntrySelect(path_syntax(dotted)))
}

pub fn object(alias: &str) -> SyntaxNode {
    node(SyntaxKind::ObjectSelect(alias.to_string()))
}

pub fn outer(inner: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::OuterPath(Box::new(inner)))
}

pub fn macro_path(name: &str, arguments: Vec<SyntaxNode>) -> SyntaxNode {
    node(SyntaxKind::MacroPath {
        name: name.to_string(),
        arguments,
    })
}

pub fn constructor(class_name: &str, arguments: Vec<SyntaxNode>) -> SyntaxNode {
    node(SyntaxKind::Constructor {
        class_name: segments(class_name),
        arguments,
    })
}

// === Literals and parameters ===

pub fn null() -> SyntaxNode {
    node(SyntaxKind::Null)
}

pub fn boolean(value: bool) -> SyntaxNode {
    node(SyntaxKind::Boolean(value))
}

/// String literal from raw text including delimiters, e.g. `'it''s'`
pub fn string(raw: &str) -> SyntaxNode {
    node(SyntaxKind::StringLiteral(raw.to_string()))
}

pub fn numeric(text: &str, kind: NumericKind) -> SyntaxNode {
    node(SyntaxKind::Numeric {
        text: text.to_string(),
        kind,
        negative: false,
    })
}

pub fn int(text: &str) -> SyntaxNode {
    numeric(text, NumericKind::Integer)
}

/// Temporal literal, `body` without quotes
pub fn temporal(kind: TemporalKind, body: &str) -> SyntaxNode {
    node(SyntaxKind::TemporalLiteral {
        kind,
        text: format!("'{body}'"),
    })
}

pub fn param(name: &str) -> SyntaxNode {
    node(SyntaxKind::NamedParameter(name.to_string()))
}

pub fn positional(position: &str) -> SyntaxNode {
    node(SyntaxKind::PositionalParameter(position.to_string()))
}

/// Dotted literal that must be an enum constant or an entity
pub fn literal(dotted: &str) -> SyntaxNode {
    node(SyntaxKind::EntityTypeOrEnumLiteral(segments(dotted)))
}

pub fn type_of(operand: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::EntityType(Box::new(operand)))
}

// === Arithmetic ===

pub fn grouped(inner: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::Grouped(Box::new(inner)))
}

pub fn concat(left: SyntaxNode, right: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::Concatenation {
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn multiplicative(left: SyntaxNode, op: MultiplicativeOp, right: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::Multiplicative {
        left: Box::new(left),
        op,
        right: Box::new(right),
    })
}

pub fn additive(left: SyntaxNode, op: AdditiveOp, right: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::Additive {
        left: Box::new(left),
        op,
        right: Box::new(right),
    })
}

pub fn minus(inner: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::UnaryMinus(Box::new(inner)))
}

pub fn plus(inner: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::UnaryPlus(Box::new(inner)))
}

// === Functions ===

/// Plain function call
pub fn call(name: &str, arguments: Vec<SyntaxNode>) -> SyntaxNode {
    node(SyntaxKind::FunctionInvocation(FunctionCallSyntax::new(name, arguments)))
}

/// Function call with clauses
pub fn invoke(call: FunctionCallSyntax) -> SyntaxNode {
    node(SyntaxKind::FunctionInvocation(call))
}

/// `COUNT(arg)`, or `COUNT(*)` for `None`
pub fn count(argument: Option<SyntaxNode>) -> SyntaxNode {
    node(SyntaxKind::Count {
        distinct: false,
        argument: argument.map(Box::new),
        filter: None,
        over: None,
    })
}

// === Predicates ===

pub fn and(left: SyntaxNode, right: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::And {
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn or(left: SyntaxNode, right: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::Or {
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn not(inner: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::Negated(Box::new(inner)))
}

pub fn compare(left: SyntaxNode, op: ComparisonToken, right: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::Comparison {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn eq(left: SyntaxNode, right: SyntaxNode) -> SyntaxNode {
    compare(left, ComparisonToken::Eq, right)
}

pub fn quantified(
    left: SyntaxNode,
    op: ComparisonToken,
    quantifier: Option<QuantifierToken>,
    alias: &str,
) -> SyntaxNode {
    node(SyntaxKind::QuantifiedComparison {
        op,
        left: Box::new(left),
        quantifier,
        right: boxed(SyntaxKind::Identifier(alias.to_string())),
    })
}

pub fn is_null(operand: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::IsNull {
        not: false,
        operand: Box::new(operand),
    })
}

pub fn is_empty(operand: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::IsEmpty {
        not: false,
        operand: Box::new(operand),
    })
}

pub fn exists(alias: &str) -> SyntaxNode {
    node(SyntaxKind::Exists {
        not: false,
        operand: boxed(SyntaxKind::Identifier(alias.to_string())),
    })
}

pub fn member_of(element: SyntaxNode, collection: &str) -> SyntaxNode {
    node(SyntaxKind::MemberOf {
        not: false,
        element: Box::new(element),
        collection: path_syntax(collection),
    })
}

pub fn between(operand: SyntaxNode, low: SyntaxNode, high: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::Between {
        not: false,
        operand: Box::new(operand),
        low: Box::new(low),
        high: Box::new(high),
    })
}

pub fn like(operand: SyntaxNode, pattern: SyntaxNode, escape: Option<SyntaxNode>) -> SyntaxNode {
    node(SyntaxKind::Like {
        not: false,
        operand: Box::new(operand),
        pattern: Box::new(pattern),
        escape: escape.map(Box::new),
    })
}

/// `operand IN (items...)`
pub fn in_list(operand: SyntaxNode, items: Vec<SyntaxNode>) -> SyntaxNode {
    node(SyntaxKind::In {
        not: false,
        operand: Box::new(operand),
        items,
        parenthesized: true,
    })
}

/// `operand IN item` without parentheses
pub fn in_single(operand: SyntaxNode, item: SyntaxNode) -> SyntaxNode {
    node(SyntaxKind::In {
        not: false,
        operand: Box::new(operand),
        items: vec![item],
        parenthesized: false,
    })
}

pub fn error(text: &str) -> SyntaxNode {
    node(SyntaxKind::Error(text.to_string()))
}
