//! Build command implementation

use super::output::{self, OutputFormat};
use anyhow::{Context, Result};
use jpql_builder::BuildContext;
use jpql_syntax::SyntaxNode;
use std::fs;
use std::path::PathBuf;

/// Configuration for the build command
pub struct BuildConfig {
    /// JSON-encoded parse tree
    pub tree: PathBuf,
    /// Query text the tree spans point into
    pub source: Option<PathBuf>,
    pub config: Option<PathBuf>,
    /// Build a predicate instead of an expression
    pub predicate: bool,
    pub format: OutputFormat,
    pub verbose: bool,
}

/// Build the AST of a parse tree and print it
pub fn build(config: BuildConfig) -> Result<()> {
    let tree = fs::read_to_string(&config.tree)
        .with_context(|| format!("Failed to read tree: {}", config.tree.display()))?;
    let node: SyntaxNode = serde_json::from_str(&tree)
        .with_context(|| format!("Invalid syntax tree: {}", config.tree.display()))?;
    let source = match &config.source {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read source: {}", path.display()))?,
        None => String::new(),
    };

    let builder_config = super::load_config(config.config.as_deref())?;
    let registries = builder_config.registries();
    let ctx = BuildContext::new(&registries, &source).with_options(builder_config.options);

    let (rendered, used_macros) = if config.predicate {
        let (predicate, used_macros) = crate::build_predicate(&node, ctx)?;
        (output::render(&predicate, config.format)?, used_macros)
    } else {
        let (expression, used_macros) = crate::build_expression(&node, ctx)?;
        (output::render(&expression, config.format)?, used_macros)
    };

    println!("{rendered}");
    if config.verbose && !used_macros.is_empty() {
        let names: Vec<&str> = used_macros.iter().map(String::as_str).collect();
        eprintln!("{}", output::format_note(&format!("used macros: {}", names.join(", "))));
    }
    Ok(())
}
