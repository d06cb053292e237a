//! Literal AST nodes

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A literal value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    /// NULL
    Null,
    /// TRUE / FALSE
    Boolean(bool),
    /// Unescaped string or character literal
    String(String),
    /// Numeric literal, kept as source text tagged with its kind
    Numeric(NumericLiteral),
    /// `{ts '...'}`
    Timestamp(NaiveDateTime),
    /// `{d '...'}`
    Date(NaiveDate),
    /// `{t '...'}`
    Time(NaiveTime),
    /// Enum constant resolved from a dotted identifier
    Enum(EnumLiteral),
    /// Entity type resolved from an identifier
    EntityType(EntityLiteral),
}

/// Kind of a numeric literal, derived from its suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericKind {
    Integer,
    Long,
    BigInteger,
    Float,
    Double,
    BigDecimal,
}

impl NumericKind {
    /// Check if this is an integral kind
    pub const fn is_integral(&self) -> bool {
        matches!(self, Self::Integer | Self::Long | Self::BigInteger)
    }
}

/// Numeric literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumericLiteral {
    /// Literal text including sign and suffix, e.g. `-10L`
    pub text: String,
    pub kind: NumericKind,
}

impl NumericLiteral {
    pub fn new(text: impl Into<String>, kind: NumericKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// The numeric value as a decimal, with any type suffix removed.
    ///
    /// Returns `None` for values that do not fit a [`Decimal`].
    pub fn to_decimal(&self) -> Option<Decimal> {
        let text = self.text.as_str();
        let digits = ["BI", "bi", "BD", "bd"]
            .iter()
            .find_map(|suffix| text.strip_suffix(suffix))
            .unwrap_or_else(|| {
                text.trim_end_matches(|c: char| matches!(c, 'l' | 'L' | 'f' | 'F' | 'd' | 'D'))
            });
        Decimal::from_str(digits)
            .or_else(|_| Decimal::from_scientific(digits))
            .ok()
    }
}

/// Constant of a registered enum type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EnumValue {
    /// Fully qualified name of the enum type
    pub type_name: String,
    /// Constant name
    pub constant: String,
    /// Position of the constant in its type
    pub ordinal: usize,
}

/// Enum literal with the text it was resolved from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumLiteral {
    pub value: EnumValue,
    pub original_text: String,
}

/// Entity type literal with the text it was resolved from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityLiteral {
    /// Entity name as registered
    pub entity_name: String,
    /// Fully qualified type name of the entity
    pub type_name: String,
    pub original_text: String,
}
