//! Function call and macro resolution
//!
//! A call is resolved in three steps: the built-in table, then the function
//! kind registry, then the macro registry. The kind decides which of the
//! optional clauses (DISTINCT, WITHIN GROUP, FILTER, OVER) are legal and
//! whether the call becomes an [`AggregateExpression`] or a windowed
//! [`FunctionExpression`].

use crate::context::{BuilderOptions, Registries};
use crate::error::{Clause, ResolveError, ResolveResult};
use crate::registry::FunctionKind;
use crate::window::{window_definition, WindowClause};
use indexmap::IndexSet;
use jpql_ast::{
    AggregateExpression, Expression, FunctionExpression, ListIndexExpression, Literal,
    MapEntryExpression, MapKeyExpression, MapValueExpression, OrderByItem, PathExpression,
    Predicate, TrimExpression, Trimspec, TypeFunctionExpression,
};
use log::{debug, trace};

/// Prefix of aggregates evaluated as window functions
pub const WINDOW_PREFIX: &str = "window_";

/// A call with its arguments and clauses already built
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Name as written
    pub name: String,
    pub distinct: bool,
    pub arguments: Vec<Expression>,
    pub within_group: Option<Vec<OrderByItem>>,
    pub filter: Option<Predicate>,
    pub window: Option<WindowClause>,
}

impl FunctionCall {
    /// Call without clauses
    pub fn new(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self {
            name: name.into(),
            distinct: false,
            arguments,
            within_group: None,
            filter: None,
            window: None,
        }
    }

    fn assert_not_distinct(&self) -> ResolveResult<()> {
        if self.distinct {
            return Err(ResolveError::IllegalClause(Clause::Distinct));
        }
        Ok(())
    }

    fn assert_no_within_group(&self) -> ResolveResult<()> {
        if self.within_group.is_some() {
            return Err(ResolveError::IllegalClause(Clause::WithinGroup));
        }
        Ok(())
    }

    /// Reject every optional clause, checked in source order
    fn assert_plain(&self) -> ResolveResult<()> {
        self.assert_not_distinct()?;
        self.assert_no_within_group()?;
        if self.filter.is_some() {
            return Err(ResolveError::IllegalClause(Clause::Filter));
        }
        if self.window.is_some() {
            return Err(ResolveError::IllegalClause(Clause::Over));
        }
        Ok(())
    }

    /// Arguments with the DISTINCT pseudo-argument in front when needed
    fn windowed_arguments(&mut self) -> Vec<Expression> {
        let mut arguments = std::mem::take(&mut self.arguments);
        if self.distinct {
            arguments.insert(0, Expression::string("DISTINCT"));
        }
        arguments
    }

    fn first_argument(&mut self) -> ResolveResult<Expression> {
        if self.arguments.is_empty() {
            return Err(ResolveError::MissingArgument {
                name: self.name.clone(),
            });
        }
        Ok(self.arguments.remove(0))
    }

    fn first_path(&mut self) -> ResolveResult<PathExpression> {
        match self.first_argument()? {
            Expression::Path(path) => Ok(path),
            _ => Err(ResolveError::PathRequired {
                name: self.name.clone(),
            }),
        }
    }
}

/// Resolves calls against the built-in table and the registries
#[derive(Debug, Clone, Copy)]
pub struct FunctionResolver<'a> {
    registries: &'a Registries,
    options: &'a BuilderOptions,
}

impl<'a> FunctionResolver<'a> {
    pub fn new(registries: &'a Registries, options: &'a BuilderOptions) -> Self {
        Self {
            registries,
            options,
        }
    }

    /// Resolve a call, recording expanded macros in `used_macros`
    pub fn resolve(
        &self,
        mut call: FunctionCall,
        used_macros: &mut IndexSet<String>,
    ) -> ResolveResult<Expression> {
        let lower_name = call.name.to_lowercase();
        trace!("resolving function {}", call.name);

        let kind = match lower_name.as_str() {
            "current_date" | "current_time" | "current_timestamp" => {
                call.assert_plain()?;
                return Ok(Expression::function(call.name, Vec::new()));
            }
            "outer" if !self.options.allow_outer => return Err(ResolveError::OuterNotAllowed),
            "outer" | "concat" | "substring" | "lower" | "upper" | "length" | "locate" | "abs"
            | "sqrt" | "mod" | "coalesce" | "nullif" => {
                call.assert_plain()?;
                return Ok(Expression::function(call.name, call.arguments));
            }
            "trim" => {
                call.assert_plain()?;
                let operand = call.first_argument()?;
                return Ok(Expression::Trim(TrimExpression {
                    trimspec: Trimspec::Both,
                    character: None,
                    operand: Box::new(operand),
                }));
            }
            "size" => {
                call.assert_plain()?;
                let mut path = call.first_path()?;
                path.used_in_collection_function = true;
                call.arguments.insert(0, Expression::Path(path));
                return Ok(Expression::function(call.name, call.arguments));
            }
            "index" | "key" | "value" | "entry" => {
                call.assert_plain()?;
                let mut path = call.first_path()?;
                path.collection_qualified = true;
                let path = Box::new(path);
                return Ok(match lower_name.as_str() {
                    "index" => Expression::ListIndex(ListIndexExpression { path }),
                    "key" => Expression::MapKey(MapKeyExpression { path }),
                    "value" => Expression::MapValue(MapValueExpression { path }),
                    _ => Expression::MapEntry(MapEntryExpression { path }),
                });
            }
            "type" => {
                call.assert_plain()?;
                let operand = call.first_argument()?;
                return Ok(Expression::TypeFunction(TypeFunctionExpression {
                    expression: Box::new(operand),
                }));
            }
            "function" => {
                call.assert_not_distinct()?;
                let function_name = match call.arguments.first() {
                    Some(Expression::Literal(Literal::String(name))) => name.to_lowercase(),
                    _ => return Err(ResolveError::InvalidFunctionName),
                };
                // unknown names pass through to the database as written
                self.registries
                    .functions
                    .get(&function_name)
                    .unwrap_or(FunctionKind::Deterministic)
            }
            _ => match self.registries.functions.get(&lower_name) {
                Some(kind) => kind,
                None => {
                    call.assert_plain()?;
                    return self.expand_macro(&call.name, call.arguments, used_macros);
                }
            },
        };

        trace!("function {} has kind {kind}", call.name);
        match kind {
            FunctionKind::Aggregate => {
                call.assert_no_within_group()?;
                if call.window.is_none() && call.filter.is_none() {
                    return Ok(Expression::Aggregate(AggregateExpression::new(
                        call.distinct,
                        call.name,
                        call.arguments,
                    )));
                }
                // a FILTER without OVER is evaluated over a minimal window
                let arguments = call.windowed_arguments();
                Ok(Expression::Function(FunctionExpression {
                    name: format!("{WINDOW_PREFIX}{lower_name}"),
                    arguments,
                    order_by: Vec::new(),
                    window: window_definition(call.window, call.filter, kind),
                }))
            }
            FunctionKind::OrderedSetAggregate => {
                if call.window.is_none() {
                    return Ok(Expression::Aggregate(AggregateExpression {
                        distinct: call.distinct,
                        name: call.name,
                        arguments: call.arguments,
                        order_by: call.within_group.unwrap_or_default(),
                        filter: call.filter.map(Box::new),
                    }));
                }
                let arguments = call.windowed_arguments();
                Ok(Expression::Function(FunctionExpression {
                    name: call.name,
                    arguments,
                    order_by: call.within_group.unwrap_or_default(),
                    window: window_definition(call.window, call.filter, kind),
                }))
            }
            FunctionKind::Window => {
                call.assert_no_within_group()?;
                let arguments = call.windowed_arguments();
                Ok(Expression::Function(FunctionExpression {
                    name: call.name,
                    arguments,
                    order_by: Vec::new(),
                    window: window_definition(call.window, call.filter, kind),
                }))
            }
            FunctionKind::Scalar | FunctionKind::Deterministic => {
                call.assert_plain()?;
                Ok(Expression::function(call.name, call.arguments))
            }
        }
    }

    /// Expand a macro by its uppercased name
    pub fn expand_macro(
        &self,
        name: &str,
        arguments: Vec<Expression>,
        used_macros: &mut IndexSet<String>,
    ) -> ResolveResult<Expression> {
        let macro_name = name.to_uppercase();
        let Some(function) = self.registries.macros.get(&macro_name) else {
            return Err(ResolveError::Unresolved {
                name: name.to_string(),
            });
        };
        debug!("expanding macro {macro_name} with {} arguments", arguments.len());
        used_macros.insert(macro_name);
        function.apply(arguments).map_err(ResolveError::Macro)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowBody;
    use jpql_ast::{PredicateKind, WindowDefinition};
    use jpql_diagnostics::MacroError;
    use pretty_assertions::assert_eq;

    fn registries() -> Registries {
        let mut registries = Registries::standard();
        registries.functions.register("my_udf", FunctionKind::Scalar);
        registries
            .macros
            .register("view_root", |_: Vec<Expression>| -> Result<Expression, MacroError> {
                Ok(Expression::property("root"))
            });
        registries
            .macros
            .register("broken", |_: Vec<Expression>| -> Result<Expression, MacroError> {
                Err(MacroError::new("expected one argument"))
            });
        registries
    }

    fn resolve(call: FunctionCall) -> ResolveResult<Expression> {
        let registries = registries();
        let options = BuilderOptions::default();
        let mut used = IndexSet::new();
        FunctionResolver::new(&registries, &options).resolve(call, &mut used)
    }

    fn filter() -> Predicate {
        Predicate::new(PredicateKind::Boolean(true))
    }

    #[test]
    fn test_builtin_rejects_clauses() {
        let mut call = FunctionCall::new("UPPER", vec![Expression::dotted("c.name")]);
        call.distinct = true;
        assert_eq!(
            resolve(call).unwrap_err(),
            ResolveError::IllegalClause(Clause::Distinct)
        );

        let mut call = FunctionCall::new("lower", vec![Expression::dotted("c.name")]);
        call.window = Some(WindowClause::Named("w".into()));
        assert_eq!(
            resolve(call).unwrap_err(),
            ResolveError::IllegalClause(Clause::Over)
        );
    }

    #[test]
    fn test_builtin_keeps_written_name() {
        let expr = resolve(FunctionCall::new("Upper", vec![Expression::dotted("c.name")])).unwrap();
        assert_eq!(
            expr,
            Expression::function("Upper", vec![Expression::dotted("c.name")])
        );
    }

    #[test]
    fn test_outer_disallowed_by_default() {
        let err = resolve(FunctionCall::new("OUTER", vec![Expression::dotted("c.id")])).unwrap_err();
        assert_eq!(err, ResolveError::OuterNotAllowed);
    }

    #[test]
    fn test_trim_defaults_to_both() {
        let expr = resolve(FunctionCall::new("trim", vec![Expression::dotted("c.name")])).unwrap();
        assert_eq!(
            expr,
            Expression::Trim(TrimExpression {
                trimspec: Trimspec::Both,
                character: None,
                operand: Box::new(Expression::dotted("c.name")),
            })
        );
    }

    #[test]
    fn test_size_marks_path() {
        let expr = resolve(FunctionCall::new("SIZE", vec![Expression::dotted("c.kittens")])).unwrap();
        match expr {
            Expression::Function(function) => match &function.arguments[0] {
                Expression::Path(path) => assert!(path.used_in_collection_function),
                other => panic!("Expected path, got: {:?}", other),
            },
            other => panic!("Expected function, got: {:?}", other),
        }
    }

    #[test]
    fn test_key_requires_path() {
        let err = resolve(FunctionCall::new("KEY", vec![Expression::null()])).unwrap_err();
        assert_eq!(err, ResolveError::PathRequired { name: "KEY".into() });
    }

    #[test]
    fn test_function_passthrough() {
        let arguments = vec![Expression::string("my_func"), Expression::dotted("c.age")];
        let expr = resolve(FunctionCall::new("FUNCTION", arguments.clone())).unwrap();
        assert_eq!(expr, Expression::function("FUNCTION", arguments));
    }

    #[test]
    fn test_function_requires_string_name() {
        let err = resolve(FunctionCall::new("function", vec![Expression::dotted("c.age")])).unwrap_err();
        assert_eq!(err, ResolveError::InvalidFunctionName);
    }

    #[test]
    fn test_aggregate_rejects_within_group() {
        let mut call = FunctionCall::new("sum", vec![Expression::dotted("c.age")]);
        call.within_group = Some(Vec::new());
        assert_eq!(
            resolve(call).unwrap_err(),
            ResolveError::IllegalClause(Clause::WithinGroup)
        );
    }

    #[test]
    fn test_aggregate_filter_without_window() {
        let mut call = FunctionCall::new("COUNT", vec![Expression::dotted("c.id")]);
        call.distinct = true;
        call.filter = Some(filter());

        let expr = resolve(call).unwrap();
        assert_eq!(
            expr,
            Expression::Function(FunctionExpression {
                name: "window_count".into(),
                arguments: vec![Expression::string("DISTINCT"), Expression::dotted("c.id")],
                order_by: Vec::new(),
                window: Some(WindowDefinition::minimal(None, Some(filter()))),
            })
        );
    }

    #[test]
    fn test_ordered_set_aggregate() {
        let mut call = FunctionCall::new("percentile_cont", vec![Expression::string("0.5")]);
        call.within_group = Some(vec![OrderByItem::new(Expression::dotted("c.age"))]);

        match resolve(call).unwrap() {
            Expression::Aggregate(aggregate) => {
                assert_eq!(aggregate.order_by.len(), 1);
                assert!(aggregate.filter.is_none());
            }
            other => panic!("Expected aggregate, got: {:?}", other),
        }
    }

    #[test]
    fn test_window_function_always_windowed() {
        let expr = resolve(FunctionCall::new("row_number", Vec::new())).unwrap();
        match expr {
            Expression::Function(function) => {
                assert_eq!(function.name, "row_number");
                assert_eq!(function.window, Some(WindowDefinition::default()));
            }
            other => panic!("Expected function, got: {:?}", other),
        }
    }

    #[test]
    fn test_window_function_inline() {
        let mut call = FunctionCall::new("rank", Vec::new());
        call.window = Some(WindowClause::Inline(WindowBody {
            partition_by: vec![Expression::dotted("c.owner")],
            ..WindowBody::default()
        }));
        match resolve(call).unwrap() {
            Expression::Function(function) => {
                let window = function.window.unwrap();
                assert_eq!(window.partition_by, vec![Expression::dotted("c.owner")]);
            }
            other => panic!("Expected function, got: {:?}", other),
        }
    }

    #[test]
    fn test_scalar_rejects_filter() {
        let mut call = FunctionCall::new("my_udf", Vec::new());
        call.filter = Some(filter());
        assert_eq!(
            resolve(call).unwrap_err(),
            ResolveError::IllegalClause(Clause::Filter)
        );
    }

    #[test]
    fn test_macro_expansion_records_name() {
        let registries = registries();
        let options = BuilderOptions::default();
        let mut used = IndexSet::new();
        let resolver = FunctionResolver::new(&registries, &options);

        let expr = resolver
            .resolve(FunctionCall::new("view_root", Vec::new()), &mut used)
            .unwrap();
        assert_eq!(expr, Expression::property("root"));
        assert!(used.contains("VIEW_ROOT"));
    }

    #[test]
    fn test_macro_failure() {
        let err = resolve(FunctionCall::new("broken", Vec::new())).unwrap_err();
        assert_eq!(
            err,
            ResolveError::Macro(MacroError::new("expected one argument"))
        );
    }

    #[test]
    fn test_unknown_function() {
        let err = resolve(FunctionCall::new("frobnicate", Vec::new())).unwrap_err();
        assert_eq!(
            err,
            ResolveError::Unresolved {
                name: "frobnicate".into()
            }
        );
    }
}
