//! Functions command implementation

use anyhow::Result;
use colored::Colorize;
use jpql_builder::{FunctionRegistry, BUILTIN_FUNCTIONS};
use std::fmt::Write;
use std::path::PathBuf;

/// Configuration for the functions command
pub struct FunctionsConfig {
    pub config: Option<PathBuf>,
}

/// List the built-in functions and the registered function kinds
pub fn functions(config: FunctionsConfig) -> Result<()> {
    let builder_config = super::load_config(config.config.as_deref())?;
    let registries = builder_config.registries();
    print!("{}", format_functions(&registries.functions));
    Ok(())
}

/// Listing of built-ins followed by the registry in registration order
pub fn format_functions(registry: &FunctionRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Built-in functions:".bold());
    for name in BUILTIN_FUNCTIONS {
        let _ = writeln!(out, "  {name}");
    }
    let _ = writeln!(out, "{}", "Registered functions:".bold());
    for (name, kind) in registry.iter() {
        let _ = writeln!(out, "  {:<24} {}", name, kind.to_string().cyan());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpql_builder::FunctionKind;

    #[test]
    fn test_format_functions() {
        colored::control::set_override(false);
        let mut registry = FunctionRegistry::new();
        registry.register("GROUP_CONCAT", FunctionKind::Aggregate);

        let listing = format_functions(&registry);
        assert!(listing.contains("  current_date\n"));
        assert!(listing.contains("  group_concat"));
        assert!(listing.trim_end().ends_with("AGGREGATE"));
    }
}
