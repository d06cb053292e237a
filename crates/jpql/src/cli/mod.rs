//! CLI functionality for the jpql tool
//!
//! This module contains all CLI-related functionality including:
//! - Building an AST from a JSON-encoded parse tree
//! - Listing the known functions
//! - Output formatting

#[cfg(feature = "cli")]
pub mod build;
#[cfg(feature = "cli")]
pub mod functions;
#[cfg(feature = "cli")]
pub mod output;

use anyhow::{Context, Result};
use jpql_builder::BuilderConfig;
use std::path::Path;

/// Load a builder configuration, or the default one without a path
pub fn load_config(path: Option<&Path>) -> Result<BuilderConfig> {
    match path {
        Some(path) => BuilderConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(BuilderConfig::default()),
    }
}
