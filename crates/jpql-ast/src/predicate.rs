//! Predicate AST nodes

use crate::{BooleanOperator, BoxExpr, ComparisonOperator, Expression, PathExpression, Quantifier};
use serde::Serialize;

/// Whether a predicate holds as written or is negated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Polarity {
    #[default]
    Positive,
    Negated,
}

impl Polarity {
    /// Polarity from a `NOT` flag
    pub const fn from_not(not: bool) -> Self {
        if not { Self::Negated } else { Self::Positive }
    }

    pub const fn is_negated(self) -> bool {
        matches!(self, Self::Negated)
    }
}

/// A predicate with its polarity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub kind: PredicateKind,
    pub polarity: Polarity,
}

impl Predicate {
    /// Create a positive predicate
    pub fn new(kind: PredicateKind) -> Self {
        Self {
            kind,
            polarity: Polarity::Positive,
        }
    }

    /// Create a predicate with the given polarity
    pub fn with_polarity(kind: PredicateKind, polarity: Polarity) -> Self {
        Self { kind, polarity }
    }

    pub fn is_negated(&self) -> bool {
        self.polarity.is_negated()
    }

    /// Negate this predicate.
    ///
    /// Negating an already negated predicate does not cancel out: the
    /// predicate is wrapped in a single-child AND compound and the wrapper
    /// is negated, so `NOT (NOT p)` stays distinguishable from `p`.
    pub fn negate(self) -> Self {
        if self.is_negated() {
            Self::with_polarity(
                PredicateKind::Compound {
                    operator: BooleanOperator::And,
                    children: vec![self],
                },
                Polarity::Negated,
            )
        } else {
            Self::with_polarity(self.kind, Polarity::Negated)
        }
    }

    /// Operator of a compound predicate
    pub fn compound_operator(&self) -> Option<BooleanOperator> {
        match &self.kind {
            PredicateKind::Compound { operator, .. } => Some(*operator),
            _ => None,
        }
    }
}

/// All predicate kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PredicateKind {
    /// Binary comparison, `<>` is a negated `=`
    Comparison {
        op: ComparisonOperator,
        left: BoxExpr,
        right: BoxExpr,
        quantifier: Quantifier,
    },
    Between {
        operand: BoxExpr,
        low: BoxExpr,
        high: BoxExpr,
    },
    Like {
        left: BoxExpr,
        pattern: BoxExpr,
        case_sensitive: bool,
        /// Literal or parameter
        escape: Option<BoxExpr>,
    },
    In {
        left: BoxExpr,
        right: Vec<Expression>,
    },
    IsNull(BoxExpr),
    IsEmpty(PathExpression),
    MemberOf {
        element: BoxExpr,
        collection: PathExpression,
    },
    Exists(BoxExpr),
    /// Flattened AND / OR
    Compound {
        operator: BooleanOperator,
        children: Vec<Predicate>,
    },
    /// Boolean literal in predicate position
    Boolean(bool),
}
