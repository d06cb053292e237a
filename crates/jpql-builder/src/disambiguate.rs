//! Resolution of dotted identifiers to enum constants, entity types or paths

use crate::context::{BuilderOptions, Registries};
use crate::error::{ResolveError, ResolveResult};
use jpql_ast::{ArrayBase, EntityLiteral, EnumLiteral, Expression, Literal, ParameterExpression};
use log::debug;

/// Looks up dotted names in the enum and entity registries
#[derive(Debug, Clone, Copy)]
pub struct Disambiguator<'a> {
    registries: &'a Registries,
    options: BuilderOptions,
}

impl<'a> Disambiguator<'a> {
    pub fn new(registries: &'a Registries, options: &BuilderOptions) -> Self {
        Self {
            registries,
            options: *options,
        }
    }

    /// Enum constant for `Type.CONSTANT` text.
    ///
    /// Constants of literal-eligible types become [`Literal::Enum`]; all
    /// others become a parameter named after the text with dots replaced by
    /// underscores, bound to the constant. `None` if the type part is not a
    /// registered enum type.
    pub fn enum_literal(&self, text: &str) -> ResolveResult<Option<Expression>> {
        let Some((type_part, constant)) = text.rsplit_once('.') else {
            return Ok(None);
        };
        let Some(enum_type) = self.registries.enums.get(type_part) else {
            return Ok(None);
        };
        let value = enum_type
            .value(constant)
            .ok_or_else(|| ResolveError::UnknownEnumConstant {
                type_name: enum_type.name.clone(),
                constant: constant.to_string(),
            })?;

        debug!("resolved '{text}' to enum constant of {}", enum_type.name);
        let expression = if self.registries.enums.is_literal_eligible(enum_type) {
            Expression::Literal(Literal::Enum(EnumLiteral {
                value,
                original_text: text.to_string(),
            }))
        } else {
            Expression::Parameter(ParameterExpression::bound(text.replace('.', "_"), value))
        };
        Ok(Some(expression))
    }

    /// Entity literal for a registered entity name
    pub fn entity_literal(&self, text: &str) -> Option<EntityLiteral> {
        let entity = self.registries.entities.get(text)?;
        debug!("resolved '{text}' to entity {}", entity.name);
        Some(EntityLiteral {
            entity_name: entity.name.clone(),
            type_name: entity.type_name.clone(),
            original_text: text.to_string(),
        })
    }

    /// Enum check of the leading subpath of a path, honouring the enum
    /// threshold
    pub fn subpath_literal(&self, segments: &[String]) -> ResolveResult<Option<Expression>> {
        if segments.len() < self.options.min_enum_segment_count {
            return Ok(None);
        }
        self.enum_literal(&segments.join("."))
    }

    /// Enum constant, else entity, for a name that must be one of the two
    pub fn entity_or_enum(&self, segments: &[String]) -> ResolveResult<Expression> {
        let text = segments.join(".");
        if let Some(expression) = self.enum_literal(&text)? {
            return Ok(expression);
        }
        self.entity_literal(&text)
            .map(|entity| Expression::Literal(Literal::EntityType(entity)))
            .ok_or(ResolveError::InvalidLiteral { text })
    }

    /// Entity literal for a bare identifier, else a one-element path
    pub fn identifier(&self, name: &str) -> Expression {
        match self.entity_literal(name) {
            Some(entity) => Expression::Literal(Literal::EntityType(entity)),
            None => Expression::property(name),
        }
    }

    /// Base of an indexed access `Cat[...]`, an entity when the entity
    /// threshold allows it and the name is registered
    pub fn array_base(&self, segments: &[String]) -> Option<ArrayBase> {
        let count = segments.len();
        if count < self.options.min_entity_segment_count && count != 1 {
            return None;
        }
        self.entity_literal(&segments.join(".")).map(ArrayBase::Entity)
    }

    /// Re-resolve the operand compared with a `TYPE(...)` expression.
    ///
    /// A property-only path naming an entity becomes an entity literal,
    /// regardless of thresholds. Anything else is returned unchanged.
    pub fn type_comparand(&self, expression: Expression) -> Expression {
        let entity = match &expression {
            Expression::Path(path) => path
                .property_text()
                .and_then(|text| self.entity_literal(&text)),
            _ => None,
        };
        match entity {
            Some(entity) => Expression::Literal(Literal::EntityType(entity)),
            None => expression,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{EntityType, EnumType};
    use pretty_assertions::assert_eq;

    fn registries() -> Registries {
        let mut registries = Registries::new();
        registries
            .enums
            .register_literal(EnumType::new("com.example.Color", ["RED", "GREEN"]));
        registries
            .enums
            .register(EnumType::new("com.example.Size", ["SMALL", "LARGE"]));
        registries
            .entities
            .register(EntityType::new("Cat", "com.example.Cat"));
        registries
    }

    fn segments(text: &str) -> Vec<String> {
        text.split('.').map(str::to_string).collect()
    }

    #[test]
    fn test_enum_literal_inline() {
        let registries = registries();
        let options = BuilderOptions::default();
        let disambiguator = Disambiguator::new(&registries, &options);

        let expr = disambiguator.enum_literal("Color.RED").unwrap().unwrap();
        match expr {
            Expression::Literal(Literal::Enum(literal)) => {
                assert_eq!(literal.value.type_name, "com.example.Color");
                assert_eq!(literal.value.constant, "RED");
                assert_eq!(literal.original_text, "Color.RED");
            }
            other => panic!("Expected enum literal, got: {:?}", other),
        }
    }

    #[test]
    fn test_enum_literal_as_parameter() {
        let registries = registries();
        let options = BuilderOptions::default();
        let disambiguator = Disambiguator::new(&registries, &options);

        let expr = disambiguator
            .enum_literal("com.example.Size.LARGE")
            .unwrap()
            .unwrap();
        match expr {
            Expression::Parameter(param) => {
                assert_eq!(param.name, "com_example_Size_LARGE");
                assert_eq!(param.value.map(|v| v.ordinal), Some(1));
                assert!(!param.collection_valued);
            }
            other => panic!("Expected parameter, got: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_constant() {
        let registries = registries();
        let options = BuilderOptions::default();
        let disambiguator = Disambiguator::new(&registries, &options);

        let err = disambiguator.enum_literal("Color.BLUE").unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownEnumConstant {
                type_name: "com.example.Color".into(),
                constant: "BLUE".into(),
            }
        );
    }

    #[test]
    fn test_subpath_threshold() {
        let registries = registries();
        let options = BuilderOptions {
            min_enum_segment_count: 4,
            ..BuilderOptions::default()
        };
        let disambiguator = Disambiguator::new(&registries, &options);

        assert!(disambiguator
            .subpath_literal(&segments("Color.RED"))
            .unwrap()
            .is_none());
        assert!(disambiguator
            .subpath_literal(&segments("com.example.Color.RED"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_entity_or_enum() {
        let registries = registries();
        let options = BuilderOptions::default();
        let disambiguator = Disambiguator::new(&registries, &options);

        assert!(matches!(
            disambiguator.entity_or_enum(&segments("com.example.Cat")),
            Ok(Expression::Literal(Literal::EntityType(_)))
        ));
        assert_eq!(
            disambiguator.entity_or_enum(&segments("Dog")).unwrap_err(),
            ResolveError::InvalidLiteral { text: "Dog".into() }
        );
    }

    #[test]
    fn test_array_base_threshold() {
        let registries = registries();
        let options = BuilderOptions {
            min_entity_segment_count: 4,
            ..BuilderOptions::default()
        };
        let disambiguator = Disambiguator::new(&registries, &options);

        assert!(disambiguator.array_base(&segments("Cat")).is_some());
        assert!(disambiguator.array_base(&segments("com.example.Cat")).is_none());
    }

    #[test]
    fn test_type_comparand_ignores_thresholds() {
        let registries = registries();
        let options = BuilderOptions {
            min_entity_segment_count: 10,
            ..BuilderOptions::default()
        };
        let disambiguator = Disambiguator::new(&registries, &options);

        let resolved = disambiguator.type_comparand(Expression::dotted("com.example.Cat"));
        assert!(matches!(resolved, Expression::Literal(Literal::EntityType(_))));

        let kept = disambiguator.type_comparand(Expression::dotted("c.kind"));
        assert_eq!(kept, Expression::dotted("c.kind"));
    }
}
