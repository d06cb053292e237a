//! Path expressions and their elements

use crate::{
    BoxExpr, EntityLiteral, Expression, ListIndexExpression, MapEntryExpression, MapKeyExpression,
    MapValueExpression, TreatExpression,
};
use serde::Serialize;
use smallvec::{smallvec, SmallVec};

/// Dereference chain such as `c.owner.name` or `KEY(c.map).x[1]`.
///
/// The element list is never empty: every constructor takes at least one
/// element and there is no way to remove elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathExpression {
    elements: SmallVec<[PathElement; 4]>,
    /// Set by KEY, VALUE, ENTRY and INDEX
    pub collection_qualified: bool,
    /// Set by SIZE, IS EMPTY and MEMBER OF
    pub used_in_collection_function: bool,
}

impl PathExpression {
    /// Create a path with a single element
    pub fn new(first: PathElement) -> Self {
        Self {
            elements: smallvec![first],
            collection_qualified: false,
            used_in_collection_function: false,
        }
    }

    /// Create a path of property elements from dotted segments
    pub fn from_properties<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_elements(segments.into_iter().map(|s| PathElement::Property(s.into())))
    }

    /// Create a path from an element iterator, `None` if it is empty
    pub fn from_elements(elements: impl IntoIterator<Item = PathElement>) -> Option<Self> {
        let elements: SmallVec<[PathElement; 4]> = elements.into_iter().collect();
        if elements.is_empty() {
            return None;
        }
        Some(Self {
            elements,
            collection_qualified: false,
            used_in_collection_function: false,
        })
    }

    /// Append an element
    pub fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    /// The path elements, never empty
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always false, present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Dotted text of a property-only path, e.g. `com.example.Cat`
    pub fn property_text(&self) -> Option<String> {
        let mut names = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            match element {
                PathElement::Property(name) => names.push(name.as_str()),
                _ => return None,
            }
        }
        Some(names.join("."))
    }

    /// Check if the path is a single TREAT element
    pub fn is_single_treat(&self) -> bool {
        self.elements.len() == 1 && matches!(self.elements[0], PathElement::Treat(_))
    }
}

/// One step of a path expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PathElement {
    /// Property dereference
    Property(String),
    /// Indexed access `base[index]`
    ArrayAccess(ArrayAccess),
    Treat(TreatExpression),
    MapKey(MapKeyExpression),
    MapValue(MapValueExpression),
    MapEntry(MapEntryExpression),
    ListIndex(ListIndexExpression),
}

impl PathElement {
    /// Convert an expression into a path element, handing it back if it has
    /// no element form.
    pub fn try_from_expression(expression: Expression) -> Result<Self, Expression> {
        match expression {
            Expression::Treat(treat) => Ok(Self::Treat(treat)),
            Expression::MapKey(key) => Ok(Self::MapKey(key)),
            Expression::MapValue(value) => Ok(Self::MapValue(value)),
            Expression::MapEntry(entry) => Ok(Self::MapEntry(entry)),
            Expression::ListIndex(index) => Ok(Self::ListIndex(index)),
            other => Err(other),
        }
    }
}

/// Indexed access on a property or an entity type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayAccess {
    pub base: ArrayBase,
    pub index: BoxExpr,
}

/// Base of an indexed access
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ArrayBase {
    Property(String),
    Entity(EntityLiteral),
}
