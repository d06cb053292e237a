//! Build options, registry configuration and the per-build context

use crate::literal::{IsoTemporalConverter, TemporalConverter};
use crate::registry::{
    EntityRegistry, EntityType, EnumRegistry, EnumType, FunctionKind, FunctionRegistry,
    MacroRegistry,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default limit on expression nesting
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Switches and thresholds of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderOptions {
    /// Minimum dotted segment count tried as an enum constant
    pub min_enum_segment_count: usize,
    /// Minimum dotted segment count tried as an entity name (one segment is
    /// always tried)
    pub min_entity_segment_count: usize,
    /// Accept `OUTER(...)` calls
    pub allow_outer: bool,
    /// Accept ANY, SOME and ALL in comparisons
    pub allow_quantified_predicates: bool,
    /// Accept a bare TREAT as a top-level path
    pub allow_object_expression: bool,
    pub max_depth: usize,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            min_enum_segment_count: 2,
            min_entity_segment_count: 2,
            allow_outer: false,
            allow_quantified_predicates: true,
            allow_object_expression: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Failure to load a [`BuilderConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Enum type entry of a [`BuilderConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumConfig {
    #[serde(flatten)]
    pub enum_type: EnumType,
    /// Render constants inline instead of as bound parameters
    #[serde(default)]
    pub literal: bool,
}

/// Serializable bundle of options and registry contents
///
/// ```json
/// {
///   "options": { "allow_outer": true },
///   "functions": { "group_concat": "AGGREGATE" },
///   "enums": [ { "name": "com.example.Color", "constants": ["RED"], "literal": true } ],
///   "entities": [ { "name": "Cat", "type_name": "com.example.Cat" } ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub options: BuilderOptions,
    /// Function kinds added on top of the standard set
    pub functions: IndexMap<String, FunctionKind>,
    pub enums: Vec<EnumConfig>,
    pub entities: Vec<EntityType>,
}

impl BuilderConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Registries filled from this configuration, without macros
    pub fn registries(&self) -> Registries {
        let mut registries = Registries::standard();
        for (name, kind) in &self.functions {
            registries.functions.register(name, *kind);
        }
        for entry in &self.enums {
            if entry.literal {
                registries.enums.register_literal(entry.enum_type.clone());
            } else {
                registries.enums.register(entry.enum_type.clone());
            }
        }
        for entity in &self.entities {
            registries.entities.register(entity.clone());
        }
        registries
    }
}

/// The registries a build resolves names against
#[derive(Debug, Default)]
pub struct Registries {
    pub functions: FunctionRegistry,
    pub enums: EnumRegistry,
    pub entities: EntityRegistry,
    pub macros: MacroRegistry,
}

impl Registries {
    /// Empty registries
    pub fn new() -> Self {
        Self::default()
    }

    /// Registries with the standard function kinds
    pub fn standard() -> Self {
        Self {
            functions: FunctionRegistry::standard(),
            ..Self::default()
        }
    }
}

static ISO_TEMPORAL: IsoTemporalConverter = IsoTemporalConverter;

/// Everything a build reads: registries, options and the query text
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub registries: &'a Registries,
    pub temporal: &'a dyn TemporalConverter,
    pub options: BuilderOptions,
    /// Query text the syntax tree spans point into
    pub source: &'a str,
}

impl<'a> BuildContext<'a> {
    pub fn new(registries: &'a Registries, source: &'a str) -> Self {
        Self {
            registries,
            temporal: &ISO_TEMPORAL,
            options: BuilderOptions::default(),
            source,
        }
    }

    pub fn with_options(mut self, options: BuilderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_temporal_converter(mut self, temporal: &'a dyn TemporalConverter) -> Self {
        self.temporal = temporal;
        self
    }
}

impl std::fmt::Debug for BuildContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext")
            .field("registries", &self.registries)
            .field("options", &self.options)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_options() {
        let options = BuilderOptions::default();
        assert_eq!(options.min_enum_segment_count, 2);
        assert_eq!(options.min_entity_segment_count, 2);
        assert!(!options.allow_outer);
        assert!(options.allow_quantified_predicates);
        assert!(options.allow_object_expression);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_config_from_json() {
        let config = BuilderConfig::from_json(
            r#"{
                "options": { "allow_outer": true, "min_entity_segment_count": 3 },
                "functions": { "GROUP_CONCAT": "ORDERED_SET_AGGREGATE" },
                "enums": [
                    { "name": "com.example.Color", "constants": ["RED", "GREEN"], "literal": true },
                    { "name": "com.example.Size", "constants": ["S"] }
                ],
                "entities": [ { "name": "Cat", "type_name": "com.example.Cat" } ]
            }"#,
        )
        .unwrap();

        assert!(config.options.allow_outer);
        assert_eq!(config.options.min_entity_segment_count, 3);
        assert_eq!(config.options.min_enum_segment_count, 2);

        let registries = config.registries();
        assert_eq!(
            registries.functions.get("group_concat"),
            Some(FunctionKind::OrderedSetAggregate)
        );
        assert_eq!(registries.functions.get("count"), Some(FunctionKind::Aggregate));

        let color = registries.enums.get("Color").unwrap();
        assert!(registries.enums.is_literal_eligible(color));
        let size = registries.enums.get("com.example.Size").unwrap();
        assert!(!registries.enums.is_literal_eligible(size));
        assert!(registries.entities.get("com.example.Cat").is_some());
    }

    #[test]
    fn test_empty_config() {
        let config = BuilderConfig::from_json("{}").unwrap();
        assert_eq!(config, BuilderConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        let err = BuilderConfig::from_json(r#"{"functions": {"f": "UNKNOWN"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
