//! Window definitions and order-by items

use crate::error::{ResolveError, ResolveResult};
use crate::registry::FunctionKind;
use jpql_ast::{
    Expression, FrameExclusion, FrameMode, FramePosition, OrderByItem, Predicate,
    WindowDefinition, WindowFrame,
};
use jpql_syntax::NullsOrder;

/// OVER clause of a call, with its expressions already built
#[derive(Debug, Clone, PartialEq)]
pub enum WindowClause {
    /// `OVER w`
    Named(String),
    /// `OVER (...)`
    Inline(WindowBody),
}

/// Inline window definition with its expressions already built
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowBody {
    /// Base window name
    pub name: Option<String>,
    pub partition_by: Vec<Expression>,
    pub order_by: Vec<OrderByItem>,
    pub frame: Option<WindowFrame>,
}

/// Window definition of a call.
///
/// Without an inline body a minimal definition holding the bare name and
/// the filter is produced when either is present or the function is a
/// window function; otherwise there is no window. A name inside the body
/// replaces the bare name.
pub fn window_definition(
    clause: Option<WindowClause>,
    filter: Option<Predicate>,
    kind: FunctionKind,
) -> Option<WindowDefinition> {
    match clause {
        Some(WindowClause::Inline(body)) => Some(WindowDefinition {
            name: body.name,
            partition_by: body.partition_by,
            order_by: body.order_by,
            filter: filter.map(Box::new),
            frame: body.frame,
        }),
        Some(WindowClause::Named(name)) => Some(WindowDefinition::minimal(Some(name), filter)),
        None if filter.is_some() || kind == FunctionKind::Window => {
            Some(WindowDefinition::minimal(None, filter))
        }
        None => None,
    }
}

/// Frame clause from its parts, rejecting bounds the grammar never
/// produces in that position
pub fn window_frame(
    mode: FrameMode,
    start: FramePosition,
    end: Option<FramePosition>,
    exclusion: Option<FrameExclusion>,
) -> ResolveResult<WindowFrame> {
    if matches!(start, FramePosition::UnboundedFollowing) {
        return Err(ResolveError::FrameBound {
            bound: "UNBOUNDED FOLLOWING as frame start",
        });
    }
    if matches!(end, Some(FramePosition::UnboundedPreceding)) {
        return Err(ResolveError::FrameBound {
            bound: "UNBOUNDED PRECEDING as frame end",
        });
    }
    Ok(WindowFrame {
        mode,
        start,
        end,
        exclusion,
    })
}

/// Order-by item; ascending unless DESC, nulls last unless NULLS FIRST.
/// An explicit collation is rejected.
pub fn order_by_item(
    expression: Expression,
    descending: bool,
    nulls: Option<NullsOrder>,
    collation: Option<&str>,
) -> ResolveResult<OrderByItem> {
    if collation.is_some() {
        return Err(ResolveError::Collation);
    }
    Ok(OrderByItem {
        expression,
        ascending: !descending,
        nulls_first: nulls == Some(NullsOrder::First),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpql_ast::PredicateKind;
    use pretty_assertions::assert_eq;

    fn filter() -> Predicate {
        Predicate::new(PredicateKind::Boolean(true))
    }

    #[test]
    fn test_no_window() {
        assert_eq!(window_definition(None, None, FunctionKind::Aggregate), None);
    }

    #[test]
    fn test_minimal_window_for_filter() {
        let window = window_definition(None, Some(filter()), FunctionKind::Aggregate).unwrap();
        assert_eq!(window, WindowDefinition::minimal(None, Some(filter())));
    }

    #[test]
    fn test_minimal_window_for_window_function() {
        let window = window_definition(None, None, FunctionKind::Window).unwrap();
        assert_eq!(window, WindowDefinition::default());
    }

    #[test]
    fn test_named_window() {
        let window = window_definition(
            Some(WindowClause::Named("w".into())),
            None,
            FunctionKind::Window,
        )
        .unwrap();
        assert_eq!(window.name.as_deref(), Some("w"));
        assert!(window.partition_by.is_empty());
    }

    #[test]
    fn test_inline_window() {
        let body = WindowBody {
            name: Some("base".into()),
            partition_by: vec![Expression::dotted("c.owner")],
            order_by: vec![OrderByItem::new(Expression::dotted("c.age"))],
            frame: Some(
                window_frame(
                    FrameMode::Rows,
                    FramePosition::UnboundedPreceding,
                    Some(FramePosition::CurrentRow),
                    Some(FrameExclusion::Ties),
                )
                .unwrap(),
            ),
        };
        let window = window_definition(
            Some(WindowClause::Inline(body)),
            Some(filter()),
            FunctionKind::Aggregate,
        )
        .unwrap();

        assert_eq!(window.name.as_deref(), Some("base"));
        assert_eq!(window.partition_by.len(), 1);
        assert_eq!(window.order_by.len(), 1);
        assert!(window.filter.is_some());
        assert_eq!(window.frame.unwrap().exclusion, Some(FrameExclusion::Ties));
    }

    #[test]
    fn test_invalid_frame_bounds() {
        assert!(window_frame(FrameMode::Range, FramePosition::UnboundedFollowing, None, None).is_err());
        assert!(window_frame(
            FrameMode::Groups,
            FramePosition::CurrentRow,
            Some(FramePosition::UnboundedPreceding),
            None
        )
        .is_err());
    }

    #[test]
    fn test_order_by_defaults() {
        let item = order_by_item(Expression::dotted("c.name"), false, None, None).unwrap();
        assert!(item.ascending);
        assert!(!item.nulls_first);

        let item = order_by_item(
            Expression::dotted("c.name"),
            true,
            Some(NullsOrder::First),
            None,
        )
        .unwrap();
        assert!(!item.ascending);
        assert!(item.nulls_first);
    }

    #[test]
    fn test_collation_rejected() {
        let err = order_by_item(Expression::dotted("c.name"), false, None, Some("de_DE")).unwrap_err();
        assert_eq!(err, ResolveError::Collation);
    }
}
