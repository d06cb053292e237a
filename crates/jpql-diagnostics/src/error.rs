//! JPQL.Next error types

use crate::{ErrorCode, SourceLocation, Span, JPQL0201};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Severity {
    /// The build cannot proceed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message with location and context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Offending source text
    pub expression: String,
    /// Source location
    pub location: Option<SourceLocation>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            expression: String::new(),
            location: None,
            help: None,
        }
    }

    /// Set the offending source text
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = expression.into();
        self
    }

    /// Set the location
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the diagnostic for terminal output
    #[cfg(feature = "colored")]
    pub fn render(&self) -> String {
        use colored::Colorize;

        let mut out = format!(
            "{}[{}]: {}",
            self.severity.to_string().red().bold(),
            self.code,
            self.message.bold()
        );
        if let Some(loc) = &self.location {
            out.push_str(&format!("\n  {} {}", "-->".blue(), loc));
        }
        if !self.expression.is_empty() {
            out.push_str(&format!("\n   {} {}", "|".blue(), self.expression));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n   {} {}", "help:".green(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// Failure raised by a macro while expanding its arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MacroError {
    pub message: String,
}

impl MacroError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Main error type of the expression builder
///
/// Every variant carries the exact source text of the node that triggered it.
#[derive(Debug, Clone, Error)]
pub enum JpqlError {
    /// Illegal construct in otherwise well-formed input
    #[error("{code}: {message}: {expression}")]
    Syntax {
        code: ErrorCode,
        message: String,
        expression: String,
        location: Option<SourceLocation>,
    },

    /// A macro expansion failed on the already built arguments
    #[error("{code}: {message}: {expression}")]
    Argument {
        code: ErrorCode,
        message: String,
        expression: String,
        location: Option<SourceLocation>,
        #[source]
        cause: MacroError,
    },

    /// The syntax tree reached a path the builder declares unreachable
    #[error("{code}: {message}: {expression}")]
    Internal {
        code: ErrorCode,
        message: String,
        expression: String,
        location: Option<SourceLocation>,
    },

    /// Expression nesting exceeded the configured depth
    #[error("{code}: expression nesting exceeds the limit of {limit}: {expression}")]
    RecursionLimit {
        code: ErrorCode,
        limit: usize,
        expression: String,
        location: Option<SourceLocation>,
    },
}

impl JpqlError {
    /// Create a syntax error without location
    pub fn syntax(code: ErrorCode, message: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::Syntax {
            code,
            message: message.into(),
            expression: expression.into(),
            location: None,
        }
    }

    /// Create a recursion limit error for the node at `span`
    pub fn recursion_limit(limit: usize, span: Span, source: &str) -> Self {
        Self::RecursionLimit {
            code: JPQL0201,
            limit,
            expression: span.text(source).to_string(),
            location: Some(SourceLocation::from_span(span, source)),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Syntax { code, .. }
            | Self::Argument { code, .. }
            | Self::Internal { code, .. }
            | Self::RecursionLimit { code, .. } => *code,
        }
    }

    /// Get the offending source text
    pub fn expression(&self) -> &str {
        match self {
            Self::Syntax { expression, .. }
            | Self::Argument { expression, .. }
            | Self::Internal { expression, .. }
            | Self::RecursionLimit { expression, .. } => expression,
        }
    }

    /// Get the location if available
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Syntax { location, .. }
            | Self::Argument { location, .. }
            | Self::Internal { location, .. }
            | Self::RecursionLimit { location, .. } => location.as_ref(),
        }
    }

    /// Check if this is a syntax error
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let message = match self {
            Self::Syntax { message, .. } | Self::Internal { message, .. } => message.clone(),
            Self::Argument { message, cause, .. } => format!("{message}: {cause}"),
            Self::RecursionLimit { limit, .. } => {
                format!("Expression nesting exceeds the limit of {limit}")
            }
        };
        let mut diag = Diagnostic::error(self.code(), message).with_expression(self.expression());
        if let Some(loc) = self.location() {
            diag = diag.with_location(loc.clone());
        }
        if let Some(help) = self.code().info().help {
            diag = diag.with_help(help);
        }
        diag
    }
}

/// Builder for creating errors with fluent API
pub struct ErrorBuilder {
    code: ErrorCode,
    message: String,
    expression: String,
    location: Option<SourceLocation>,
}

impl ErrorBuilder {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            expression: String::new(),
            location: None,
        }
    }

    /// Set the span, capturing its source text and location
    pub fn span(mut self, span: Span, source: &str) -> Self {
        self.expression = span.text(source).to_string();
        self.location = Some(SourceLocation::from_span(span, source));
        self
    }

    /// Build a syntax error
    pub fn syntax(self) -> JpqlError {
        JpqlError::Syntax {
            code: self.code,
            message: self.message,
            expression: self.expression,
            location: self.location,
        }
    }

    /// Build an argument error caused by a macro failure
    pub fn argument(self, cause: MacroError) -> JpqlError {
        JpqlError::Argument {
            code: self.code,
            message: self.message,
            expression: self.expression,
            location: self.location,
            cause,
        }
    }

    /// Build an internal invariant error
    pub fn internal(self) -> JpqlError {
        JpqlError::Internal {
            code: self.code,
            message: self.message,
            expression: self.expression,
            location: self.location,
        }
    }
}
