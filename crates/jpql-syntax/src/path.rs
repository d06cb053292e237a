//! Path syntax

use crate::SyntaxNode;
use serde::{Deserialize, Serialize};

/// `[qualifiedPath] [.generalSubpath]`
///
/// At least one of the two parts is present in trees the grammar produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSyntax {
    /// Qualifier such as `TREAT(...)`, `KEY(...)` or a macro call
    #[serde(default)]
    pub qualified: Option<Box<SyntaxNode>>,
    #[serde(default)]
    pub subpath: Option<GeneralSubpath>,
}

impl PathSyntax {
    /// Unqualified path
    pub fn new(subpath: GeneralSubpath) -> Self {
        Self {
            qualified: None,
            subpath: Some(subpath),
        }
    }
}

/// `a.b.c[index].d.e[index]...` as a chain of simple subpaths with optional
/// indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSubpath {
    /// Dot separated identifiers, never empty
    pub segments: Vec<String>,
    /// Index applied to the last segment
    #[serde(default)]
    pub index: Option<Box<SyntaxNode>>,
    #[serde(default)]
    pub next: Option<Box<GeneralSubpath>>,
}

impl GeneralSubpath {
    pub fn new(segments: Vec<String>) -> Self {
        Self {
            segments,
            index: None,
            next: None,
        }
    }

    /// Dotted text of the segments, e.g. `com.example.Cat`
    pub fn text(&self) -> String {
        self.segments.join(".")
    }
}
