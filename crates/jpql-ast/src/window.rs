//! Window definitions and order-by items

use crate::{BoxExpr, Expression, Predicate};
use serde::{Deserialize, Serialize};

/// Window of a windowed function call
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WindowDefinition {
    /// Named window reference or base window of an inline definition
    pub name: Option<String>,
    pub partition_by: Vec<Expression>,
    pub order_by: Vec<OrderByItem>,
    pub filter: Option<Box<Predicate>>,
    pub frame: Option<WindowFrame>,
}

impl WindowDefinition {
    /// Definition holding only a name and a filter
    pub fn minimal(name: Option<String>, filter: Option<Predicate>) -> Self {
        Self {
            name,
            filter: filter.map(Box::new),
            ..Self::default()
        }
    }
}

/// Frame clause of a window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowFrame {
    pub mode: FrameMode,
    pub start: FramePosition,
    /// Unset when the frame has no `BETWEEN ... AND` end
    pub end: Option<FramePosition>,
    pub exclusion: Option<FrameExclusion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameMode {
    Rows,
    Range,
    Groups,
}

/// Frame boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FramePosition {
    UnboundedPreceding,
    /// `expr PRECEDING`
    Preceding(BoxExpr),
    CurrentRow,
    /// `expr FOLLOWING`
    Following(BoxExpr),
    UnboundedFollowing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameExclusion {
    CurrentRow,
    Group,
    Ties,
    NoOthers,
}

/// Item of an ORDER BY or WITHIN GROUP list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderByItem {
    pub expression: Expression,
    pub ascending: bool,
    pub nulls_first: bool,
}

impl OrderByItem {
    /// Ascending item with nulls last
    pub fn new(expression: Expression) -> Self {
        Self {
            expression,
            ascending: true,
            nulls_first: false,
        }
    }
}
