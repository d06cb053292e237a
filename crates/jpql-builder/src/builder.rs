//! Parse tree to AST traversal

use crate::context::BuildContext;
use crate::disambiguate::Disambiguator;
use crate::error::ResolveError;
use crate::function::{FunctionCall, FunctionResolver};
use crate::literal::{numeric_literal, unescape_string};
use crate::window::{order_by_item, window_frame, WindowBody, WindowClause};
use indexmap::IndexSet;
use jpql_ast::{
    ArithmeticExpression, ArithmeticFactor, ArithmeticOperator, ArrayAccess, ArrayBase,
    BooleanOperator, ComparisonOperator, Expression, FramePosition, GeneralCaseExpression,
    Literal, MapEntryExpression, MapKeyExpression, MapValueExpression, OrderByItem,
    ParameterExpression, PathElement, PathExpression, Polarity, Predicate, PredicateKind,
    Quantifier, SimpleCaseExpression, TreatExpression, TrimExpression, TypeFunctionExpression,
    WhenClause, WindowFrame, CONCAT,
};
use jpql_diagnostics::{
    ErrorBuilder, ErrorCode, JpqlError, Result, SourceLocation, Span, JPQL0005, JPQL0006,
    JPQL0010, JPQL0013, JPQL0016, JPQL0200,
};
use jpql_syntax::{
    AdditiveOp, ComparisonToken, FrameBoundSyntax, FrameSyntax, FunctionCallSyntax,
    GeneralSubpath, MultiplicativeOp, OrderByItemSyntax, OverSyntax, PathSyntax, QuantifierToken,
    SyntaxKind, SyntaxNode, WhenSyntax,
};

/// Remaining stack below which a nested visit moves to a fresh segment
const STACK_RED_ZONE: usize = 256 * 1024;
const STACK_SEGMENT: usize = 4 * 1024 * 1024;

/// Builds expressions and predicates from a parse tree.
///
/// One builder serves one query: it borrows the build context for the
/// registries and the query text, and records every macro it expands in
/// the caller's used-macros set.
pub struct ExpressionBuilder<'a, 'm> {
    ctx: BuildContext<'a>,
    used_macros: &'m mut IndexSet<String>,
    depth: usize,
}

impl<'a, 'm> ExpressionBuilder<'a, 'm> {
    pub fn new(ctx: BuildContext<'a>, used_macros: &'m mut IndexSet<String>) -> Self {
        Self {
            ctx,
            used_macros,
            depth: 0,
        }
    }

    /// Build the expression for a node; predicates come back wrapped in
    /// [`Expression::Predicate`]
    pub fn build_expression(&mut self, node: &SyntaxNode) -> Result<Expression> {
        self.visit(node)
    }

    /// Build the predicate for a node.
    ///
    /// A boolean literal becomes [`PredicateKind::Boolean`]; any other
    /// non-predicate result is an internal error.
    pub fn build_predicate(&mut self, node: &SyntaxNode) -> Result<Predicate> {
        match self.visit(node)? {
            Expression::Predicate(predicate) => Ok(predicate),
            Expression::Literal(Literal::Boolean(value)) => {
                Ok(Predicate::new(PredicateKind::Boolean(value)))
            }
            _ => Err(self.internal(
                node.span,
                format!("Expected a predicate but {} produced an expression", node.kind.name()),
            )),
        }
    }

    fn visit(&mut self, node: &SyntaxNode) -> Result<Expression> {
        if self.depth >= self.ctx.options.max_depth {
            return Err(JpqlError::recursion_limit(
                self.ctx.options.max_depth,
                node.span,
                self.ctx.source,
            ));
        }
        self.depth += 1;
        // a single level can take tens of KiB of stack in unoptimized builds
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || self.visit_kind(node));
        self.depth -= 1;
        result
    }

    fn visit_all(&mut self, nodes: &[SyntaxNode]) -> Result<Vec<Expression>> {
        nodes.iter().map(|node| self.visit(node)).collect()
    }

    fn visit_kind(&mut self, node: &SyntaxNode) -> Result<Expression> {
        let span = node.span;
        match &node.kind {
            // === Expressions ===
            SyntaxKind::Grouped(inner) => self.visit(inner),
            SyntaxKind::Concatenation { left, right } => {
                let left = self.visit(left)?;
                let right = self.visit(right)?;
                Ok(concatenate(left, right))
            }
            SyntaxKind::Multiplicative { left, op, right } => {
                let left = self.visit(left)?;
                let right = self.visit(right)?;
                Ok(match op {
                    MultiplicativeOp::Multiply => {
                        arithmetic(left, ArithmeticOperator::Multiplication, right)
                    }
                    MultiplicativeOp::Divide => arithmetic(left, ArithmeticOperator::Division, right),
                    MultiplicativeOp::Modulo => Expression::function("MOD", vec![left, right]),
                })
            }
            SyntaxKind::Additive { left, op, right } => {
                let left = self.visit(left)?;
                let right = self.visit(right)?;
                let op = match op {
                    AdditiveOp::Plus => ArithmeticOperator::Addition,
                    AdditiveOp::Minus => ArithmeticOperator::Subtraction,
                };
                Ok(arithmetic(left, op, right))
            }
            SyntaxKind::UnaryMinus(inner) => Ok(Expression::ArithmeticFactor(ArithmeticFactor {
                expression: Box::new(self.visit(inner)?),
                negated: true,
            })),
            SyntaxKind::UnaryPlus(inner) => self.visit(inner),
            SyntaxKind::SimpleCase {
                operand,
                when_clauses,
                otherwise,
            } => {
                let operand = self.visit(operand)?;
                let when_clauses = self.when_clauses(when_clauses, false)?;
                let default = self.visit_optional(otherwise.as_deref())?;
                Ok(Expression::SimpleCase(SimpleCaseExpression {
                    operand: Box::new(operand),
                    when_clauses,
                    default,
                }))
            }
            SyntaxKind::GeneralCase {
                when_clauses,
                otherwise,
            } => {
                let when_clauses = self.when_clauses(when_clauses, true)?;
                let default = self.visit_optional(otherwise.as_deref())?;
                Ok(Expression::GeneralCase(GeneralCaseExpression {
                    when_clauses,
                    default,
                }))
            }

            // === Literals ===
            SyntaxKind::Null => Ok(Expression::null()),
            SyntaxKind::Boolean(value) => Ok(Expression::Literal(Literal::Boolean(*value))),
            SyntaxKind::StringLiteral(raw) => unescape_string(raw)
                .map(Expression::string)
                .map_err(|err| self.fail(span, err)),
            SyntaxKind::Numeric {
                text,
                kind,
                negative,
            } => Ok(Expression::Literal(numeric_literal(text, *kind, *negative))),
            SyntaxKind::TemporalLiteral { kind, text } => self
                .ctx
                .temporal
                .convert(*kind, text)
                .map(Expression::Literal)
                .map_err(|err| self.fail(span, err)),
            SyntaxKind::NamedParameter(name) | SyntaxKind::PositionalParameter(name) => {
                Ok(Expression::Parameter(ParameterExpression::new(name.clone())))
            }
            SyntaxKind::EntityType(operand) => {
                let expression = match &operand.kind {
                    SyntaxKind::Path(path) => self.visit_path(path, operand.span)?,
                    SyntaxKind::NamedParameter(_) | SyntaxKind::PositionalParameter(_) => {
                        self.visit(operand)?
                    }
                    other => {
                        return Err(self.internal(
                            operand.span,
                            format!("TYPE expects a path or parameter, got {}", other.name()),
                        ));
                    }
                };
                Ok(Expression::TypeFunction(TypeFunctionExpression {
                    expression: Box::new(expression),
                }))
            }
            SyntaxKind::EntityTypeOrEnumLiteral(segments) => self
                .disambiguator()
                .entity_or_enum(segments)
                .map_err(|err| self.fail(span, err)),

            // === Functions ===
            SyntaxKind::Trim {
                trimspec,
                character,
                operand,
            } => {
                let character = self.visit_optional(character.as_deref())?;
                let operand = self.visit(operand)?;
                Ok(Expression::Trim(TrimExpression {
                    trimspec: trimspec.unwrap_or_default(),
                    character,
                    operand: Box::new(operand),
                }))
            }
            SyntaxKind::TemporalFunction(name) => Ok(Expression::function(name.clone(), Vec::new())),
            SyntaxKind::Count {
                distinct,
                argument,
                filter,
                over,
            } => {
                let arguments = match argument {
                    Some(argument) => vec![self.visit(argument)?],
                    None => Vec::new(),
                };
                let call = FunctionCall {
                    name: "COUNT".to_string(),
                    distinct: *distinct,
                    arguments,
                    within_group: None,
                    filter: self.predicate_optional(filter.as_deref())?,
                    window: self.over_clause(over.as_ref(), span)?,
                };
                self.resolve_call(call, span)
            }
            SyntaxKind::FunctionInvocation(call) => self.function_invocation(call, span),

            // === Paths ===
            SyntaxKind::Path(path) => {
                let expression = self.visit_path(path, span)?;
                if !self.ctx.options.allow_object_expression && is_top_level_treat(&expression) {
                    return Err(self.syntax(
                        span,
                        JPQL0006,
                        "A top level treat expression is not allowed. Consider to further dereference the expression",
                    ));
                }
                Ok(expression)
            }
            SyntaxKind::SimpleSubpath(segments) => self.simple_subpath(segments, span),
            SyntaxKind::TreatPath { path, entity_name } => {
                let expression = match PathElement::try_from_expression(self.visit_path(path, span)?)
                {
                    Ok(element) => Expression::Path(PathExpression::new(element)),
                    Err(expression) => expression,
                };
                Ok(Expression::Treat(TreatExpression {
                    expression: Box::new(expression),
                    type_name: entity_name.clone(),
                }))
            }
            SyntaxKind::ObjectSelect(alias) => Ok(self.disambiguator().identifier(alias)),
            SyntaxKind::ValuePath(path) => {
                let path = self.collection_path(path, span, "VALUE")?;
                Ok(Expression::MapValue(MapValueExpression {
                    path: Box::new(path),
                }))
            }
            SyntaxKind::MapKeyPath(path) => {
                let mut path = self.collection_path(path, span, "KEY")?;
                path.collection_qualified = true;
                Ok(Expression::MapKey(MapKeyExpression {
                    path: Box::new(path),
                }))
            }
            SyntaxKind::MapEntrySelect(path) => {
                let path = self.collection_path(path, span, "ENTRY")?;
                Ok(Expression::MapEntry(MapEntryExpression {
                    path: Box::new(path),
                }))
            }
            SyntaxKind::Constructor {
                class_name,
                arguments,
            } => {
                let arguments = self.visit_all(arguments)?;
                Ok(Expression::function(
                    format!("NEW {}", class_name.join(".")),
                    arguments,
                ))
            }
            SyntaxKind::MacroPath { name, arguments } => {
                let arguments = self.visit_all(arguments)?;
                let ctx = self.ctx;
                FunctionResolver::new(ctx.registries, &ctx.options)
                    .expand_macro(name, arguments, self.used_macros)
                    .map_err(|err| self.fail(span, err))
            }
            SyntaxKind::OuterPath(inner) => {
                let argument = self.visit(inner)?;
                Ok(Expression::function("OUTER", vec![argument]))
            }
            SyntaxKind::Identifier(name) => Ok(self.disambiguator().identifier(name)),

            SyntaxKind::Or { .. }
            | SyntaxKind::And { .. }
            | SyntaxKind::Negated(_)
            | SyntaxKind::Exists { .. }
            | SyntaxKind::IsNull { .. }
            | SyntaxKind::IsEmpty { .. }
            | SyntaxKind::MemberOf { .. }
            | SyntaxKind::Between { .. }
            | SyntaxKind::Like { .. }
            | SyntaxKind::In { .. }
            | SyntaxKind::Comparison { .. }
            | SyntaxKind::QuantifiedComparison { .. } => self.visit_predicate(node),

            SyntaxKind::Error(text) => Err(JpqlError::Syntax {
                code: JPQL0016,
                message: "Parsing failed".to_string(),
                expression: text.clone(),
                location: Some(SourceLocation::from_span(span, self.ctx.source)),
            }),
        }
    }

    /// Predicate alternatives of [`Self::visit_kind`]
    #[inline(never)]
    fn visit_predicate(&mut self, node: &SyntaxNode) -> Result<Expression> {
        let span = node.span;
        match &node.kind {
            SyntaxKind::Or { left, right } => self.compound(BooleanOperator::Or, left, right),
            SyntaxKind::And { left, right } => self.compound(BooleanOperator::And, left, right),
            SyntaxKind::Negated(inner) => Ok(self.build_predicate(inner)?.negate().into()),
            SyntaxKind::Exists { not, operand } => {
                let operand = self.visit(operand)?;
                Ok(predicate(PredicateKind::Exists(Box::new(operand)), *not))
            }
            SyntaxKind::IsNull { not, operand } => {
                let operand = self.visit(operand)?;
                Ok(predicate(PredicateKind::IsNull(Box::new(operand)), *not))
            }
            SyntaxKind::IsEmpty { not, operand } => {
                let mut path = match self.visit(operand)? {
                    Expression::Path(path) => path,
                    _ => {
                        return Err(self.fail(
                            span,
                            ResolveError::PathRequired {
                                name: "IS EMPTY".to_string(),
                            },
                        ));
                    }
                };
                path.used_in_collection_function = true;
                Ok(predicate(PredicateKind::IsEmpty(path), *not))
            }
            SyntaxKind::MemberOf {
                not,
                element,
                collection,
            } => {
                let element = self.visit(element)?;
                let mut collection = self.collection_path(collection, span, "MEMBER OF")?;
                collection.used_in_collection_function = true;
                Ok(predicate(
                    PredicateKind::MemberOf {
                        element: Box::new(element),
                        collection,
                    },
                    *not,
                ))
            }
            SyntaxKind::Between {
                not,
                operand,
                low,
                high,
            } => {
                let operand = self.visit(operand)?;
                let low = self.visit(low)?;
                let high = self.visit(high)?;
                Ok(predicate(
                    PredicateKind::Between {
                        operand: Box::new(operand),
                        low: Box::new(low),
                        high: Box::new(high),
                    },
                    *not,
                ))
            }
            SyntaxKind::Like {
                not,
                operand,
                pattern,
                escape,
            } => {
                let escape = self.visit_optional(escape.as_deref())?;
                if escape.as_deref().is_some_and(|e| !e.is_literal_or_parameter()) {
                    return Err(self.syntax(
                        span,
                        JPQL0013,
                        "Only a character literal or parameter expression is allowed as escape character in like predicate",
                    ));
                }
                let operand = self.visit(operand)?;
                let pattern = self.visit(pattern)?;
                Ok(predicate(
                    PredicateKind::Like {
                        left: Box::new(operand),
                        pattern: Box::new(pattern),
                        case_sensitive: true,
                        escape,
                    },
                    *not,
                ))
            }
            SyntaxKind::In {
                not,
                operand,
                items,
                parenthesized,
            } => self.in_predicate(*not, operand, items, *parenthesized),
            SyntaxKind::Comparison { op, left, right } => {
                let mut left = self.visit(left)?;
                let mut right = self.visit(right)?;
                if matches!(op, ComparisonToken::Eq | ComparisonToken::Ne) {
                    let disambiguator = self.disambiguator();
                    if matches!(left, Expression::TypeFunction(_)) {
                        right = disambiguator.type_comparand(right);
                    }
                    if matches!(right, Expression::TypeFunction(_)) {
                        left = disambiguator.type_comparand(left);
                    }
                }
                Ok(comparison(*op, left, right, Quantifier::One))
            }
            SyntaxKind::QuantifiedComparison {
                op,
                left,
                quantifier,
                right,
            } => {
                if quantifier.is_some() && !self.ctx.options.allow_quantified_predicates {
                    return Err(self.syntax(
                        span,
                        JPQL0005,
                        "The use of quantifiers is not allowed in the context of the expression",
                    ));
                }
                let left = self.visit(left)?;
                let right = self.visit(right)?;
                let quantifier = match quantifier {
                    None => Quantifier::One,
                    Some(QuantifierToken::Any | QuantifierToken::Some) => Quantifier::Any,
                    Some(QuantifierToken::All) => Quantifier::All,
                };
                Ok(comparison(*op, left, right, quantifier))
            }
            other => Err(self.internal(span, format!("{} is not a predicate", other.name()))),
        }
    }

    fn visit_optional(&mut self, node: Option<&SyntaxNode>) -> Result<Option<Box<Expression>>> {
        node.map(|node| self.visit(node).map(Box::new)).transpose()
    }

    fn predicate_optional(&mut self, node: Option<&SyntaxNode>) -> Result<Option<Predicate>> {
        node.map(|node| self.build_predicate(node)).transpose()
    }

    fn when_clauses(&mut self, clauses: &[WhenSyntax], searched: bool) -> Result<Vec<WhenClause>> {
        clauses
            .iter()
            .map(|clause| -> Result<WhenClause> {
                let condition = if searched {
                    self.build_predicate(&clause.condition)?.into()
                } else {
                    self.visit(&clause.condition)?
                };
                Ok(WhenClause {
                    condition: Box::new(condition),
                    result: Box::new(self.visit(&clause.result)?),
                })
            })
            .collect()
    }

    // === Paths ===

    fn visit_path(&mut self, path: &PathSyntax, span: Span) -> Result<Expression> {
        match (&path.qualified, &path.subpath) {
            (None, Some(subpath)) => self.general_subpath(subpath, None, span),
            (Some(qualified), None) => self.visit(qualified),
            (Some(qualified), Some(subpath)) => {
                let prefix = match PathElement::try_from_expression(self.visit(qualified)?) {
                    Ok(element) => PathExpression::new(element),
                    Err(Expression::Path(path)) => path,
                    Err(_) => {
                        return Err(self.syntax(
                            qualified.span,
                            JPQL0010,
                            "A qualified path must start with a path element",
                        ));
                    }
                };
                self.general_subpath(subpath, Some(prefix), span)
            }
            (None, None) => Err(self.internal(span, "Path without qualifier and subpath")),
        }
    }

    /// Path of dotted subpaths with optional indices.
    ///
    /// Only the leading subpath of an unqualified path may resolve to an enum
    /// constant (when it has no index) or an entity array base.
    fn general_subpath(
        &mut self,
        subpath: &GeneralSubpath,
        prefix: Option<PathExpression>,
        span: Span,
    ) -> Result<Expression> {
        let literal_possible = prefix.is_none();
        let mut path = prefix;
        let mut current = Some(subpath);
        let mut leading = true;

        while let Some(subpath) = current {
            if subpath.segments.is_empty() {
                return Err(self.internal(span, "Empty subpath"));
            }
            let literal_possible = literal_possible && leading;
            if literal_possible && subpath.index.is_none() {
                let literal = self
                    .disambiguator()
                    .subpath_literal(&subpath.segments)
                    .map_err(|err| self.fail(span, err))?;
                if let Some(literal) = literal {
                    return Ok(literal);
                }
            }

            let mut elements: Vec<PathElement> = subpath
                .segments
                .iter()
                .map(|segment| PathElement::Property(segment.clone()))
                .collect();
            if let Some(index) = &subpath.index {
                let index = Box::new(self.visit(index)?);
                let entity_base = if literal_possible {
                    self.disambiguator().array_base(&subpath.segments)
                } else {
                    None
                };
                match entity_base {
                    Some(base) => {
                        elements = vec![PathElement::ArrayAccess(ArrayAccess { base, index })];
                    }
                    None => {
                        if let Some(PathElement::Property(name)) = elements.pop() {
                            elements.push(PathElement::ArrayAccess(ArrayAccess {
                                base: ArrayBase::Property(name),
                                index,
                            }));
                        }
                    }
                }
            }

            match path.as_mut() {
                Some(path) => elements.into_iter().for_each(|element| path.push(element)),
                None => path = PathExpression::from_elements(elements),
            }
            current = subpath.next.as_deref();
            leading = false;
        }

        path.map(Expression::Path)
            .ok_or_else(|| self.internal(span, "Empty subpath"))
    }

    fn simple_subpath(&mut self, segments: &[String], span: Span) -> Result<Expression> {
        let literal = self
            .disambiguator()
            .subpath_literal(segments)
            .map_err(|err| self.fail(span, err))?;
        if let Some(literal) = literal {
            return Ok(literal);
        }
        PathExpression::from_properties(segments.iter().cloned())
            .map(Expression::Path)
            .ok_or_else(|| self.internal(span, "Empty subpath"))
    }

    /// Path operand of KEY, VALUE, ENTRY and MEMBER OF
    fn collection_path(&mut self, path: &PathSyntax, span: Span, name: &str) -> Result<PathExpression> {
        match self.visit_path(path, span)? {
            Expression::Path(path) => Ok(path),
            _ => Err(self.fail(
                span,
                ResolveError::PathRequired {
                    name: name.to_string(),
                },
            )),
        }
    }

    // === Functions ===

    fn function_invocation(&mut self, call: &FunctionCallSyntax, span: Span) -> Result<Expression> {
        let arguments = self.visit_all(&call.arguments)?;
        let within_group = call
            .within_group
            .as_deref()
            .map(|items| self.order_by_items(items))
            .transpose()?;
        let filter = self.predicate_optional(call.filter.as_deref())?;
        let window = self.over_clause(call.over.as_ref(), span)?;
        let call = FunctionCall {
            name: call.name.clone(),
            distinct: call.distinct,
            arguments,
            within_group,
            filter,
            window,
        };
        self.resolve_call(call, span)
    }

    fn resolve_call(&mut self, call: FunctionCall, span: Span) -> Result<Expression> {
        let ctx = self.ctx;
        FunctionResolver::new(ctx.registries, &ctx.options)
            .resolve(call, self.used_macros)
            .map_err(|err| self.fail(span, err))
    }

    fn over_clause(&mut self, over: Option<&OverSyntax>, span: Span) -> Result<Option<WindowClause>> {
        let Some(over) = over else {
            return Ok(None);
        };
        let clause = match over {
            OverSyntax::Named(name) => WindowClause::Named(name.clone()),
            OverSyntax::Inline(window) => WindowClause::Inline(WindowBody {
                name: window.name.clone(),
                partition_by: self.visit_all(&window.partition_by)?,
                order_by: self.order_by_items(&window.order_by)?,
                frame: window
                    .frame
                    .as_ref()
                    .map(|frame| self.frame(frame, span))
                    .transpose()?,
            }),
        };
        Ok(Some(clause))
    }

    fn frame(&mut self, frame: &FrameSyntax, span: Span) -> Result<WindowFrame> {
        let start = self.frame_position(&frame.start)?;
        let end = frame
            .end
            .as_ref()
            .map(|end| self.frame_position(end))
            .transpose()?;
        window_frame(frame.mode, start, end, frame.exclusion).map_err(|err| self.fail(span, err))
    }

    fn frame_position(&mut self, bound: &FrameBoundSyntax) -> Result<FramePosition> {
        Ok(match bound {
            FrameBoundSyntax::UnboundedPreceding => FramePosition::UnboundedPreceding,
            FrameBoundSyntax::Preceding(offset) => {
                FramePosition::Preceding(Box::new(self.visit(offset)?))
            }
            FrameBoundSyntax::CurrentRow => FramePosition::CurrentRow,
            FrameBoundSyntax::Following(offset) => {
                FramePosition::Following(Box::new(self.visit(offset)?))
            }
            FrameBoundSyntax::UnboundedFollowing => FramePosition::UnboundedFollowing,
        })
    }

    fn order_by_items(&mut self, items: &[OrderByItemSyntax]) -> Result<Vec<OrderByItem>> {
        items
            .iter()
            .map(|item| -> Result<OrderByItem> {
                let expression = self.visit(&item.expression)?;
                order_by_item(
                    expression,
                    item.descending,
                    item.nulls,
                    item.collation.as_deref(),
                )
                .map_err(|err| self.fail(item.span, err))
            })
            .collect()
    }

    // === Predicates ===

    /// AND / OR, appending to a left operand that already is a positive
    /// compound of the same operator
    fn compound(
        &mut self,
        operator: BooleanOperator,
        left: &SyntaxNode,
        right: &SyntaxNode,
    ) -> Result<Expression> {
        let left = self.build_predicate(left)?;
        let right = self.build_predicate(right)?;
        let predicate = match left {
            Predicate {
                kind:
                    PredicateKind::Compound {
                        operator: left_operator,
                        mut children,
                    },
                polarity: Polarity::Positive,
            } if left_operator == operator => {
                children.push(right);
                Predicate::new(PredicateKind::Compound {
                    operator,
                    children,
                })
            }
            left => Predicate::new(PredicateKind::Compound {
                operator,
                children: vec![left, right],
            }),
        };
        Ok(predicate.into())
    }

    fn in_predicate(
        &mut self,
        not: bool,
        operand: &SyntaxNode,
        items: &[SyntaxNode],
        parenthesized: bool,
    ) -> Result<Expression> {
        let left = self.visit(operand)?;
        let mut right = self.visit_all(items)?;
        if let [item] = items {
            // a macro producing a parameter is never collection valued
            let from_call = matches!(item.kind, SyntaxKind::FunctionInvocation(_));
            if !parenthesized && !from_call {
                if let Some(Expression::Parameter(parameter)) = right.first_mut() {
                    parameter.collection_valued = true;
                }
            }
        }
        if matches!(left, Expression::TypeFunction(_)) {
            let disambiguator = self.disambiguator();
            right = right
                .into_iter()
                .map(|item| disambiguator.type_comparand(item))
                .collect();
        }
        Ok(predicate(
            PredicateKind::In {
                left: Box::new(left),
                right,
            },
            not,
        ))
    }

    // === Helpers ===

    fn disambiguator(&self) -> Disambiguator<'a> {
        Disambiguator::new(self.ctx.registries, &self.ctx.options)
    }

    fn fail(&self, span: Span, err: ResolveError) -> JpqlError {
        let builder = ErrorBuilder::new(err.code(), err.to_string()).span(span, self.ctx.source);
        match err {
            ResolveError::Macro(cause) => builder.argument(cause),
            ResolveError::FrameBound { .. } => builder.internal(),
            _ => builder.syntax(),
        }
    }

    fn syntax(&self, span: Span, code: ErrorCode, message: &str) -> JpqlError {
        ErrorBuilder::new(code, message)
            .span(span, self.ctx.source)
            .syntax()
    }

    fn internal(&self, span: Span, message: impl Into<String>) -> JpqlError {
        ErrorBuilder::new(JPQL0200, message)
            .span(span, self.ctx.source)
            .internal()
    }
}

fn concatenate(left: Expression, right: Expression) -> Expression {
    match (left, right) {
        (Expression::Function(mut function), right) if function.is_concat() => {
            function.arguments.push(right);
            Expression::Function(function)
        }
        (left, Expression::Function(mut function)) if function.is_concat() => {
            function.arguments.insert(0, left);
            Expression::Function(function)
        }
        (left, right) => Expression::function(CONCAT, vec![left, right]),
    }
}

fn arithmetic(left: Expression, op: ArithmeticOperator, right: Expression) -> Expression {
    Expression::Arithmetic(ArithmeticExpression {
        left: Box::new(left),
        op,
        right: Box::new(right),
    })
}

fn predicate(kind: PredicateKind, not: bool) -> Expression {
    Predicate::with_polarity(kind, Polarity::from_not(not)).into()
}

/// `<>` is a negated `=`
fn comparison(
    op: ComparisonToken,
    left: Expression,
    right: Expression,
    quantifier: Quantifier,
) -> Expression {
    let (op, negated) = match op {
        ComparisonToken::Eq => (ComparisonOperator::Eq, false),
        ComparisonToken::Ne => (ComparisonOperator::Eq, true),
        ComparisonToken::Lt => (ComparisonOperator::Lt, false),
        ComparisonToken::Le => (ComparisonOperator::Le, false),
        ComparisonToken::Gt => (ComparisonOperator::Gt, false),
        ComparisonToken::Ge => (ComparisonOperator::Ge, false),
    };
    predicate(
        PredicateKind::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
            quantifier,
        },
        negated,
    )
}

fn is_top_level_treat(expression: &Expression) -> bool {
    match expression {
        Expression::Path(path) => path.is_single_treat(),
        Expression::Treat(_) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_concatenate_appends_and_prepends() {
        let left = concatenate(Expression::string("a"), Expression::string("b"));
        let appended = concatenate(left, Expression::string("c"));
        let prepended = concatenate(Expression::string("z"), appended);
        assert_eq!(
            prepended,
            Expression::function(
                CONCAT,
                vec![
                    Expression::string("z"),
                    Expression::string("a"),
                    Expression::string("b"),
                    Expression::string("c"),
                ]
            )
        );
    }

    #[test]
    fn test_comparison_not_equal_is_negated_eq() {
        match comparison(
            ComparisonToken::Ne,
            Expression::null(),
            Expression::null(),
            Quantifier::One,
        ) {
            Expression::Predicate(predicate) => {
                assert!(predicate.is_negated());
                assert!(matches!(
                    predicate.kind,
                    PredicateKind::Comparison {
                        op: ComparisonOperator::Eq,
                        ..
                    }
                ));
            }
            other => panic!("Expected predicate, got: {:?}", other),
        }
    }

    #[test]
    fn test_top_level_treat_detection() {
        let treat = TreatExpression {
            expression: Box::new(Expression::dotted("c.owner")),
            type_name: "Person".into(),
        };
        assert!(is_top_level_treat(&Expression::Treat(treat.clone())));

        let mut path = PathExpression::new(PathElement::Treat(treat));
        assert!(is_top_level_treat(&Expression::Path(path.clone())));
        path.push(PathElement::Property("name".into()));
        assert!(!is_top_level_treat(&Expression::Path(path)));
    }
}
