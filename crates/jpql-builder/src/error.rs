//! Resolution errors raised before a source span is attached

use jpql_diagnostics::{
    ErrorCode, MacroError, JPQL0001, JPQL0002, JPQL0003, JPQL0004, JPQL0007, JPQL0008, JPQL0009,
    JPQL0010, JPQL0011, JPQL0012, JPQL0014, JPQL0015, JPQL0100, JPQL0200,
};
use jpql_syntax::TemporalKind;
use std::fmt;
use thiserror::Error;

/// Optional clause of a function call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    Distinct,
    /// `WITHIN GROUP (ORDER BY ...)`
    WithinGroup,
    Filter,
    Over,
}

impl Clause {
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Distinct => "DISTINCT",
            Self::WithinGroup => "WITHIN GROUP",
            Self::Filter => "FILTER",
            Self::Over => "OVER",
        }
    }

    /// Error code reported when the clause is illegal
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Distinct => JPQL0001,
            Self::WithinGroup => JPQL0002,
            Self::Filter => JPQL0003,
            Self::Over => JPQL0004,
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Failure of a resolution step, converted into a
/// [`JpqlError`](jpql_diagnostics::JpqlError) by the builder once the
/// offending node is known
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("Invalid use of {0} for function")]
    IllegalClause(Clause),

    #[error("Invalid disallowed use of OUTER")]
    OuterNotAllowed,

    #[error("No function or macro with the name '{name}' could be found")]
    Unresolved { name: String },

    #[error("Could not apply the macro for the expression")]
    Macro(#[source] MacroError),

    #[error("Invalid literal '{text}'")]
    InvalidLiteral { text: String },

    #[error("Enum type '{type_name}' has no constant '{constant}'")]
    UnknownEnumConstant { type_name: String, constant: String },

    #[error("Function '{name}' requires a path argument")]
    PathRequired { name: String },

    #[error("Function '{name}' requires an argument")]
    MissingArgument { name: String },

    #[error("The first argument of FUNCTION must be a string literal")]
    InvalidFunctionName,

    #[error("Malformed unicode escape '{escape}' in string literal")]
    InvalidEscape { escape: String },

    #[error("Invalid {kind:?} literal '{text}'")]
    InvalidTemporal { kind: TemporalKind, text: String },

    #[error("Collations are not yet supported")]
    Collation,

    #[error("Unexpected frame bound {bound}")]
    FrameBound { bound: &'static str },
}

impl ResolveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::IllegalClause(clause) => clause.code(),
            Self::OuterNotAllowed => JPQL0011,
            Self::Unresolved { .. } => JPQL0008,
            Self::Macro(_) => JPQL0100,
            Self::InvalidLiteral { .. } => JPQL0009,
            Self::UnknownEnumConstant { .. } => JPQL0012,
            Self::PathRequired { .. } | Self::MissingArgument { .. } | Self::InvalidFunctionName => {
                JPQL0010
            }
            Self::InvalidEscape { .. } => JPQL0015,
            Self::InvalidTemporal { .. } => JPQL0014,
            Self::Collation => JPQL0007,
            Self::FrameBound { .. } => JPQL0200,
        }
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clause_codes() {
        assert_eq!(ResolveError::IllegalClause(Clause::Over).code(), JPQL0004);
        assert_eq!(
            ResolveError::IllegalClause(Clause::WithinGroup).to_string(),
            "Invalid use of WITHIN GROUP for function"
        );
    }

    #[test]
    fn test_macro_error_is_argument_code() {
        let err = ResolveError::Macro(MacroError::new("boom"));
        assert!(err.code().is_argument_error());
    }
}
