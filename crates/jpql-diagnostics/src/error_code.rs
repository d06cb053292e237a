//! JPQL.Next error codes following a structured numbering system
//!
//! Error code ranges:
//! - JPQL0001-JPQL0099: Syntax errors (illegal clauses, unresolved names, bad shapes)
//! - JPQL0100-JPQL0199: Argument errors (macro expansion failures)
//! - JPQL0200-JPQL0299: Internal errors (builder/grammar mismatch, resource limits)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a syntax error (0001-0099)
    pub const fn is_syntax_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is an argument error (0100-0199)
    pub const fn is_argument_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is an internal error (0200-0299)
    pub const fn is_internal_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JPQL{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Syntax errors (0001-0099)
    map.insert(1, ErrorInfo::new("Invalid use of DISTINCT"));
    map.insert(2, ErrorInfo::new("Invalid use of WITHIN GROUP"));
    map.insert(3, ErrorInfo::new("Invalid use of FILTER"));
    map.insert(4, ErrorInfo::new("Invalid use of OVER"));
    map.insert(5, ErrorInfo::new("Quantified predicate not allowed")
        .with_help("ANY, SOME and ALL are only allowed where subquery quantifiers are supported"));
    map.insert(6, ErrorInfo::new("Top level treat expression not allowed")
        .with_help("Consider to further dereference the expression"));
    map.insert(7, ErrorInfo::new("Collations are not supported"));
    map.insert(8, ErrorInfo::new("Unresolved function or macro")
        .with_help("Register the function kind or the macro before building"));
    map.insert(9, ErrorInfo::new("Invalid literal"));
    map.insert(10, ErrorInfo::new("Invalid expression shape"));
    map.insert(11, ErrorInfo::new("Disallowed use of OUTER"));
    map.insert(12, ErrorInfo::new("Unknown enum constant"));
    map.insert(13, ErrorInfo::new("Invalid LIKE escape character"));
    map.insert(14, ErrorInfo::new("Invalid date/time literal"));
    map.insert(15, ErrorInfo::new("Invalid string escape sequence"));
    map.insert(16, ErrorInfo::new("Parsing failed"));

    // Argument errors (0100-0199)
    map.insert(100, ErrorInfo::new("Macro application failed"));

    // Internal errors (0200-0299)
    map.insert(200, ErrorInfo::new("Internal invariant violated")
        .with_help("The syntax tree does not match the builder contract"));
    map.insert(201, ErrorInfo::new("Expression nesting too deep"));

    map
});

// Syntax errors
pub const JPQL0001: ErrorCode = ErrorCode::new(1);
pub const JPQL0002: ErrorCode = ErrorCode::new(2);
pub const JPQL0003: ErrorCode = ErrorCode::new(3);
pub const JPQL0004: ErrorCode = ErrorCode::new(4);
pub const JPQL0005: ErrorCode = ErrorCode::new(5);
pub const JPQL0006: ErrorCode = ErrorCode::new(6);
pub const JPQL0007: ErrorCode = ErrorCode::new(7);
pub const JPQL0008: ErrorCode = ErrorCode::new(8);
pub const JPQL0009: ErrorCode = ErrorCode::new(9);
pub const JPQL0010: ErrorCode = ErrorCode::new(10);
pub const JPQL0011: ErrorCode = ErrorCode::new(11);
pub const JPQL0012: ErrorCode = ErrorCode::new(12);
pub const JPQL0013: ErrorCode = ErrorCode::new(13);
pub const JPQL0014: ErrorCode = ErrorCode::new(14);
pub const JPQL0015: ErrorCode = ErrorCode::new(15);
pub const JPQL0016: ErrorCode = ErrorCode::new(16);

// Argument errors
pub const JPQL0100: ErrorCode = ErrorCode::new(100);

// Internal errors
pub const JPQL0200: ErrorCode = ErrorCode::new(200);
pub const JPQL0201: ErrorCode = ErrorCode::new(201);
