//! Function, enum, entity and macro registries consulted during a build
//!
//! Registries are filled once and then shared read-only; every type here is
//! `Send + Sync` so a set of registries can sit behind an `Arc` and serve
//! builds on many threads.

use indexmap::IndexMap;
use jpql_ast::{EnumValue, Expression};
use jpql_diagnostics::MacroError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Kind of a registered function, deciding which clauses a call may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionKind {
    Scalar,
    Deterministic,
    Aggregate,
    OrderedSetAggregate,
    Window,
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "SCALAR",
            Self::Deterministic => "DETERMINISTIC",
            Self::Aggregate => "AGGREGATE",
            Self::OrderedSetAggregate => "ORDERED_SET_AGGREGATE",
            Self::Window => "WINDOW",
        };
        f.write_str(name)
    }
}

/// Functions handled by the builder itself, never looked up in a registry
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "current_date",
    "current_time",
    "current_timestamp",
    "outer",
    "concat",
    "substring",
    "lower",
    "upper",
    "length",
    "locate",
    "abs",
    "sqrt",
    "mod",
    "coalesce",
    "nullif",
    "trim",
    "size",
    "index",
    "key",
    "value",
    "entry",
    "type",
    "function",
];

/// Lowercased function name to kind
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    kinds: IndexMap<String, FunctionKind>,
}

impl FunctionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the standard aggregate, ordered-set and window functions
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for name in ["count", "sum", "avg", "min", "max", "every", "bool_and", "bool_or"] {
            registry.register(name, FunctionKind::Aggregate);
        }
        for name in ["percentile_cont", "percentile_disc", "mode", "listagg", "string_agg"] {
            registry.register(name, FunctionKind::OrderedSetAggregate);
        }
        for name in [
            "row_number",
            "rank",
            "dense_rank",
            "percent_rank",
            "cume_dist",
            "ntile",
            "lag",
            "lead",
            "first_value",
            "last_value",
            "nth_value",
        ] {
            registry.register(name, FunctionKind::Window);
        }
        registry
    }

    /// Register a function, replacing the kind of an existing one
    pub fn register(&mut self, name: impl AsRef<str>, kind: FunctionKind) {
        self.kinds.insert(name.as_ref().to_lowercase(), kind);
    }

    /// Look up a lowercased name
    pub fn get(&self, name: &str) -> Option<FunctionKind> {
        self.kinds.get(name).copied()
    }

    /// Registered functions in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, FunctionKind)> {
        self.kinds.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Enum type with its constants in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    /// Fully qualified dotted name, e.g. `com.example.Color`
    pub name: String,
    pub constants: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    /// Name after the last dot
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Resolve a constant by name
    pub fn value(&self, constant: &str) -> Option<EnumValue> {
        self.constants
            .iter()
            .position(|c| c == constant)
            .map(|ordinal| EnumValue {
                type_name: self.name.clone(),
                constant: constant.to_string(),
                ordinal,
            })
    }
}

/// Secondary names of registered types.
///
/// A name resolves while exactly one type claims it. Once a second type
/// claims the same name it is dropped for good, so only the primary names
/// of both types resolve.
#[derive(Debug, Clone)]
struct Aliases<T> {
    targets: HashMap<String, Arc<T>>,
    ambiguous: HashSet<String>,
}

impl<T> Default for Aliases<T> {
    fn default() -> Self {
        Self {
            targets: HashMap::new(),
            ambiguous: HashSet::new(),
        }
    }
}

impl<T> Aliases<T> {
    fn insert(&mut self, alias: String, target: Arc<T>, same: impl Fn(&T, &T) -> bool) {
        if self.ambiguous.contains(&alias) {
            return;
        }
        let conflict = self
            .targets
            .get(&alias)
            .is_some_and(|existing| !same(existing.as_ref(), target.as_ref()));
        if conflict {
            debug!("name '{alias}' is ambiguous, only qualified names resolve");
            self.targets.remove(&alias);
            self.ambiguous.insert(alias);
        } else {
            self.targets.insert(alias, target);
        }
    }

    fn get(&self, alias: &str) -> Option<&T> {
        self.targets.get(alias).map(Arc::as_ref)
    }
}

/// Enum types addressable from queries
///
/// Each type is reachable by its fully qualified name, and by its simple
/// name unless another type shares it. Types registered with
/// [`EnumRegistry::register_literal`] are rendered inline; all others
/// become bound parameters.
#[derive(Debug, Clone, Default)]
pub struct EnumRegistry {
    types: HashMap<String, Arc<EnumType>>,
    simple_names: Aliases<EnumType>,
    literal_types: HashSet<String>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type rendered as a bound parameter
    pub fn register(&mut self, enum_type: EnumType) {
        let enum_type = Arc::new(enum_type);
        let simple = enum_type.simple_name().to_string();
        if simple != enum_type.name {
            self.simple_names
                .insert(simple, Arc::clone(&enum_type), |a, b| a.name == b.name);
        }
        self.types.insert(enum_type.name.clone(), enum_type);
    }

    /// Register a type eligible for inline literals
    pub fn register_literal(&mut self, enum_type: EnumType) {
        self.literal_types.insert(enum_type.name.clone());
        self.register(enum_type);
    }

    /// Look up a type by qualified name, then by unambiguous simple name
    pub fn get(&self, name: &str) -> Option<&EnumType> {
        self.types
            .get(name)
            .map(Arc::as_ref)
            .or_else(|| self.simple_names.get(name))
    }

    /// Check if a type may be rendered inline
    pub fn is_literal_eligible(&self, enum_type: &EnumType) -> bool {
        self.literal_types.contains(&enum_type.name)
    }
}

/// Entity known to the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    /// Entity name used in queries, e.g. `Cat`
    pub name: String,
    /// Fully qualified type name, e.g. `com.example.Cat`
    pub type_name: String,
}

impl EntityType {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Entities by entity name, and by type name unless two entities share it
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: HashMap<String, Arc<EntityType>>,
    type_names: Aliases<EntityType>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entity: EntityType) {
        let entity = Arc::new(entity);
        if entity.type_name != entity.name {
            self.type_names
                .insert(entity.type_name.clone(), Arc::clone(&entity), |a, b| {
                    a.name == b.name
                });
        }
        self.entities.insert(entity.name.clone(), entity);
    }

    pub fn get(&self, name: &str) -> Option<&EntityType> {
        self.entities
            .get(name)
            .map(Arc::as_ref)
            .or_else(|| self.type_names.get(name))
    }
}

/// Expansion of a macro call into an expression
pub trait MacroFunction: Send + Sync {
    fn apply(&self, arguments: Vec<Expression>) -> Result<Expression, MacroError>;
}

impl<F> MacroFunction for F
where
    F: Fn(Vec<Expression>) -> Result<Expression, MacroError> + Send + Sync,
{
    fn apply(&self, arguments: Vec<Expression>) -> Result<Expression, MacroError> {
        self(arguments)
    }
}

/// Uppercased macro name to expansion
#[derive(Clone, Default)]
pub struct MacroRegistry {
    macros: HashMap<String, Arc<dyn MacroFunction>>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a macro, the name is uppercased
    pub fn register(&mut self, name: impl AsRef<str>, function: impl MacroFunction + 'static) {
        self.macros
            .insert(name.as_ref().to_uppercase(), Arc::new(function));
    }

    /// Look up an uppercased name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn MacroFunction>> {
        self.macros.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }
}

impl fmt::Debug for MacroRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.macros.keys().collect();
        names.sort();
        f.debug_struct("MacroRegistry").field("macros", &names).finish()
    }
}
