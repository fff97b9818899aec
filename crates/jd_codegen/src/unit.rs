use proc_macro2::Span;
use quote::format_ident;
use syn::Ident;

use crate::error::GenerateError;
use crate::reified::ReifiedType;
use crate::schema::{ClassSchema, DefaultValue, PropertySchema};
use crate::shape::TypeShape;

/// A non-ignored property together with its classification.
#[derive(Debug)]
pub(crate) struct UnitProperty<'a> {
    pub schema: &'a PropertySchema,
    pub shape: TypeShape,
    pub reified: Option<ReifiedType>,
    /// Local holding the observed value while decoding.
    pub slot: Ident,
    /// Local holding the value on the all-observed construction path.
    pub value: Ident,
}

/// Where a constructor argument comes from.
#[derive(Debug)]
pub(crate) enum ArgumentSource {
    /// The observed value of `properties[index]`.
    Property(usize),
    /// An ignored property, never read from JSON.
    Ignored,
    /// A constructor parameter without a property.
    Unbound,
}

/// One constructor argument, in constructor order.
#[derive(Debug)]
pub(crate) struct Argument<'a> {
    /// Field name for struct-literal construction.
    pub member: Ident,
    pub source: ArgumentSource,
    pub default: &'a DefaultValue,
}

/// Correlates a [`ClassSchema`] with everything the generators need.
///
/// Built once per record and discarded after emission. The correspondence
/// between properties and constructor positions is resolved here, so the
/// generated code never looks anything up at run time.
#[derive(Debug)]
pub struct GenerationUnit<'a> {
    schema: &'a ClassSchema,
    pub(crate) properties: Vec<UnitProperty<'a>>,
    pub(crate) arguments: Vec<Argument<'a>>,
}

impl<'a> GenerationUnit<'a> {
    /// Validates the schema and classifies every non-ignored property.
    pub fn new(schema: &'a ClassSchema) -> Result<Self, GenerateError> {
        schema.validate()?;

        let properties = schema
            .properties()
            .iter()
            .filter(|property| !property.is_ignored())
            .enumerate()
            .map(|(index, property)| {
                let shape = TypeShape::classify(property.ty()).map_err(|source| {
                    GenerateError::Shape {
                        record: schema.ident().to_string(),
                        property: property.name(),
                        span: property.span(),
                        source,
                    }
                })?;
                Ok(UnitProperty {
                    schema: property,
                    reified: ReifiedType::build(&shape),
                    shape,
                    slot: format_ident!("__field{}", index, span = Span::call_site()),
                    value: format_ident!("__value{}", index, span = Span::call_site()),
                })
            })
            .collect::<Result<Vec<_>, GenerateError>>()?;

        let arguments = schema
            .params()
            .iter()
            .map(|param| {
                let position = properties
                    .iter()
                    .position(|p| p.schema.name() == param.name());
                let declared = schema.properties().iter().find(|p| p.name() == param.name());
                let member = declared
                    .map(|p| p.ident().clone())
                    .unwrap_or_else(|| Ident::new_raw(param.name(), Span::call_site()));
                Argument {
                    member,
                    source: match (position, declared) {
                        (Some(index), _) => ArgumentSource::Property(index),
                        (None, Some(_)) => ArgumentSource::Ignored,
                        (None, None) => ArgumentSource::Unbound,
                    },
                    default: param.default_value(),
                }
            })
            .collect();

        Ok(Self {
            schema,
            properties,
            arguments,
        })
    }

    #[inline]
    pub fn schema(&self) -> &'a ClassSchema {
        self.schema
    }

    /// Number of properties present in the JSON object.
    #[inline]
    pub fn field_count(&self) -> usize {
        self.properties.len()
    }

    /// Classified shape of a non-ignored property, by declared name.
    pub fn shape(&self, name: &str) -> Option<&TypeShape> {
        self.properties
            .iter()
            .find(|p| p.schema.name() == name)
            .map(|p| &p.shape)
    }

    /// Constructor position of every non-ignored property, in declaration
    /// order.
    ///
    /// Validation binds each of them to exactly one parameter, so the result
    /// has one entry per property.
    pub fn constructor_positions(&self) -> Vec<usize> {
        let mut positions = self
            .arguments
            .iter()
            .enumerate()
            .filter_map(|(position, argument)| match argument.source {
                ArgumentSource::Property(index) => Some((index, position)),
                ArgumentSource::Ignored | ArgumentSource::Unbound => None,
            })
            .collect::<Vec<_>>();
        positions.sort_unstable_by_key(|&(index, _)| index);
        positions.into_iter().map(|(_, position)| position).collect()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::GenerationUnit;
    use crate::schema::{ClassSchema, ConstructorKind, ConstructorParam, DefaultValue, PropertySchema};
    use crate::{GenerateError, ShapeError, TypeShape};

    #[test]
    fn correspondence_table() {
        // Constructor order differs from declaration order.
        let schema = ClassSchema::new("app", "Point")
            .with_property(PropertySchema::new("x", parse_quote!(f64)))
            .with_property(PropertySchema::new("y", parse_quote!(f64)))
            .with_property(PropertySchema::new("cache", parse_quote!(u64)).ignore())
            .with_constructor(ConstructorKind::Function(parse_quote!(Point::new)))
            .with_param(ConstructorParam::new("y", DefaultValue::Required))
            .with_param(ConstructorParam::new("x", DefaultValue::Required));

        let unit = GenerationUnit::new(&schema).unwrap();
        assert_eq!(unit.field_count(), 2);
        assert_eq!(unit.constructor_positions(), [1, 0]);
        assert!(matches!(unit.shape("x"), Some(TypeShape::Scalar(..))));
        assert!(unit.shape("cache").is_none());
    }

    #[test]
    fn ignored_parameters_keep_their_position() {
        let schema = ClassSchema::new("app", "Cached")
            .with_field(PropertySchema::new("a", parse_quote!(u8)), DefaultValue::Required)
            .with_field(
                PropertySchema::new("b", parse_quote!(u8)).ignore(),
                DefaultValue::Trait,
            )
            .with_field(PropertySchema::new("c", parse_quote!(u8)), DefaultValue::Required);

        let unit = GenerationUnit::new(&schema).unwrap();
        assert_eq!(unit.field_count(), 2);
        assert_eq!(unit.constructor_positions(), [0, 2]);
    }

    #[test]
    fn shape_errors_name_the_property() {
        let schema = ClassSchema::new("app", "Broken").with_field(
            PropertySchema::new("lookup", parse_quote!(HashMap<String>)),
            DefaultValue::Required,
        );

        let Err(GenerateError::Shape {
            record,
            property,
            source,
            ..
        }) = GenerationUnit::new(&schema)
        else {
            panic!("expected a shape error");
        };
        assert_eq!(record, "Broken");
        assert_eq!(property, "lookup");
        assert!(matches!(source, ShapeError::Arity { expected: 2, found: 1, .. }));
    }
}
