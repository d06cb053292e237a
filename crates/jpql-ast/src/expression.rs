//! Expression AST nodes

use crate::{
    ArithmeticOperator, BoxExpr, EnumValue, Literal, NumericKind, NumericLiteral, OptBoxExpr,
    OrderByItem, PathElement, PathExpression, Predicate, Trimspec, WindowDefinition,
};
use serde::Serialize;

/// Name of the n-ary string concatenation function
pub const CONCAT: &str = "CONCAT";

/// All expression kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    /// Property path
    Path(PathExpression),
    /// Named or positional parameter
    Parameter(ParameterExpression),
    /// Literal value
    Literal(Literal),
    /// Function invocation, including windowed aggregates
    Function(FunctionExpression),
    /// Aggregate invocation without a window
    Aggregate(AggregateExpression),
    /// Binary arithmetic
    Arithmetic(ArithmeticExpression),
    /// Unary minus
    ArithmeticFactor(ArithmeticFactor),
    /// `TREAT(path AS Type)`
    Treat(TreatExpression),
    /// `TYPE(expr)`
    TypeFunction(TypeFunctionExpression),
    /// `KEY(path)`
    MapKey(MapKeyExpression),
    /// `VALUE(path)`
    MapValue(MapValueExpression),
    /// `ENTRY(path)`
    MapEntry(MapEntryExpression),
    /// `INDEX(path)`
    ListIndex(ListIndexExpression),
    /// `TRIM([spec] [char] FROM expr)`
    Trim(TrimExpression),
    /// `CASE operand WHEN ... END`
    SimpleCase(SimpleCaseExpression),
    /// `CASE WHEN predicate ... END`
    GeneralCase(GeneralCaseExpression),
    /// Predicate used in expression position
    Predicate(Predicate),
}

/// Parameter reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterExpression {
    /// Parameter name; positional parameters use their decimal position
    pub name: String,
    /// Value bound at build time (auto-bound enum constants)
    pub value: Option<EnumValue>,
    /// Set when the parameter is the whole right side of an IN predicate
    pub collection_valued: bool,
}

impl ParameterExpression {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            collection_valued: false,
        }
    }

    /// Create a parameter bound to an enum constant
    pub fn bound(name: impl Into<String>, value: EnumValue) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            collection_valued: false,
        }
    }

    /// Check if this is a positional parameter (`?1`)
    pub fn is_positional(&self) -> bool {
        !self.name.is_empty() && self.name.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Function invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionExpression {
    pub name: String,
    pub arguments: Vec<Expression>,
    /// WITHIN GROUP ordering of ordered-set aggregates
    pub order_by: Vec<OrderByItem>,
    pub window: Option<WindowDefinition>,
}

impl FunctionExpression {
    /// Create a plain function call without clauses
    pub fn new(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self {
            name: name.into(),
            arguments,
            order_by: Vec::new(),
            window: None,
        }
    }

    /// Check if this is a CONCAT call (case-insensitive)
    pub fn is_concat(&self) -> bool {
        self.name.eq_ignore_ascii_case(CONCAT)
    }
}

/// Aggregate invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateExpression {
    pub distinct: bool,
    pub name: String,
    pub arguments: Vec<Expression>,
    pub order_by: Vec<OrderByItem>,
    pub filter: Option<Box<Predicate>>,
}

impl AggregateExpression {
    pub fn new(distinct: bool, name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self {
            distinct,
            name: name.into(),
            arguments,
            order_by: Vec::new(),
            filter: None,
        }
    }
}

/// Binary arithmetic expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArithmeticExpression {
    pub left: BoxExpr,
    pub op: ArithmeticOperator,
    pub right: BoxExpr,
}

/// Unary sign applied to an expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArithmeticFactor {
    pub expression: BoxExpr,
    pub negated: bool,
}

/// Downcast of a path to a subtype
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatExpression {
    pub expression: BoxExpr,
    /// Target entity name
    pub type_name: String,
}

/// `TYPE(...)` discriminator access
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeFunctionExpression {
    pub expression: BoxExpr,
}

/// `KEY(path)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapKeyExpression {
    pub path: Box<PathExpression>,
}

/// `VALUE(path)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapValueExpression {
    pub path: Box<PathExpression>,
}

/// `ENTRY(path)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapEntryExpression {
    pub path: Box<PathExpression>,
}

/// `INDEX(path)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListIndexExpression {
    pub path: Box<PathExpression>,
}

/// TRIM expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimExpression {
    pub trimspec: Trimspec,
    pub character: OptBoxExpr,
    pub operand: BoxExpr,
}

/// When/then pair of a case expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhenClause {
    /// Comparand for simple case, predicate for general case
    pub condition: BoxExpr,
    pub result: BoxExpr,
}

/// Simple case expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleCaseExpression {
    pub operand: BoxExpr,
    pub when_clauses: Vec<WhenClause>,
    pub default: OptBoxExpr,
}

/// Searched case expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralCaseExpression {
    pub when_clauses: Vec<WhenClause>,
    pub default: OptBoxExpr,
}

// Helper constructors for Expression
impl Expression {
    /// Create a string literal
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// Create an integer literal from its text
    pub fn integer(text: impl Into<String>) -> Self {
        Self::Literal(Literal::Numeric(NumericLiteral::new(text, NumericKind::Integer)))
    }

    /// Create a null literal
    pub fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    /// Create a property path from dotted text such as `c.owner.name`
    pub fn dotted(text: &str) -> Self {
        let mut segments = text.split('.');
        let first = segments.next().unwrap_or_default();
        let mut path = PathExpression::new(PathElement::Property(first.to_string()));
        for segment in segments {
            path.push(PathElement::Property(segment.to_string()));
        }
        Self::Path(path)
    }

    /// Create a single-property path
    pub fn property(name: impl Into<String>) -> Self {
        Self::Path(PathExpression::new(PathElement::Property(name.into())))
    }

    /// Create a named parameter
    pub fn parameter(name: impl Into<String>) -> Self {
        Self::Parameter(ParameterExpression::new(name))
    }

    /// Create a plain function call
    pub fn function(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self::Function(FunctionExpression::new(name, arguments))
    }

    /// Check if this is a literal or parameter
    pub fn is_literal_or_parameter(&self) -> bool {
        matches!(self, Self::Literal(_) | Self::Parameter(_))
    }
}

impl From<Predicate> for Expression {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_detection_is_case_insensitive() {
        assert!(FunctionExpression::new("concat", Vec::new()).is_concat());
        assert!(FunctionExpression::new(CONCAT, Vec::new()).is_concat());
        assert!(!FunctionExpression::new("CONCAT_WS", Vec::new()).is_concat());
    }

    #[test]
    fn test_positional_parameter() {
        assert!(ParameterExpression::new("1").is_positional());
        assert!(!ParameterExpression::new("name").is_positional());
    }
}
