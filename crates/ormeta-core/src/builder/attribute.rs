//! Attribute construction.

use super::classifier::{classify, Classification, ClassificationError};
use super::context::MetadataContext;
use super::resolver::resolve_type;
use crate::error::{Error, Result};
use crate::metamodel::{
    Attribute, ManagedTypeDraft, PluralAttributeBuilder, SingularAttribute,
    SingularAttributeBuilder,
};
use ormeta_mapping::PropertyDescriptor;
use tracing::{trace, warn};

/// Build an ordinary attribute of `owner`.
///
/// Returns `None` for properties that are deliberately left out: synthetic
/// properties, and unsupported shapes when the configuration ignores them.
pub(crate) fn build_attribute(
    ctx: &mut MetadataContext<'_>,
    owner: &ManagedTypeDraft,
    property: &PropertyDescriptor,
) -> Result<Option<Attribute>> {
    if property.synthetic && !ctx.config().include_synthetic {
        trace!(owner = %owner.java_type(), attribute = %property.name, "skipping synthetic property");
        return Ok(None);
    }

    let classification = match classify(property, ctx.hierarchy()) {
        Ok(classification) => classification,
        Err(ClassificationError::Unsupported(feature))
            if feature.is_ignorable() && ctx.config().ignores_unsupported() =>
        {
            warn!(
                owner = %owner.java_type(),
                attribute = %property.name,
                %feature,
                "ignoring unsupported attribute"
            );
            return Ok(None);
        }
        Err(e) => return Err(classification_error(owner, property, e)),
    };

    let attribute = match classification.plural {
        None => Attribute::Singular(
            build_singular(ctx, owner, property, classification)?
                .optional(property.optional)
                .build(),
        ),
        Some(shape) => {
            let element_type = resolve_type(ctx, owner.id(), classification.element)?;
            let mut builder = PluralAttributeBuilder::new(
                property.name.as_str(),
                shape.container.clone(),
                owner.id(),
                shape.collection_type,
                element_type,
            )
            .kind(classification.kind);
            if let Some(key) = shape.key {
                builder = builder.key_type(resolve_type(ctx, owner.id(), key)?);
            }
            Attribute::Plural(builder.build()?)
        }
    };

    trace!(
        owner = %owner.java_type(),
        attribute = %property.name,
        kind = %attribute.kind(),
        "built attribute"
    );
    Ok(Some(attribute))
}

/// Build the identifier attribute of `owner`.
pub(crate) fn build_id_attribute(
    ctx: &mut MetadataContext<'_>,
    owner: &ManagedTypeDraft,
    property: &PropertyDescriptor,
) -> Result<SingularAttribute> {
    Ok(build_required_singular(ctx, owner, property)?.identifier().build())
}

/// Build the version attribute of `owner`.
pub(crate) fn build_version_attribute(
    ctx: &mut MetadataContext<'_>,
    owner: &ManagedTypeDraft,
    property: &PropertyDescriptor,
) -> Result<SingularAttribute> {
    Ok(build_required_singular(ctx, owner, property)?.version().build())
}

/// Identifier and version attributes: never skipped, never plural.
fn build_required_singular(
    ctx: &mut MetadataContext<'_>,
    owner: &ManagedTypeDraft,
    property: &PropertyDescriptor,
) -> Result<SingularAttributeBuilder> {
    let classification = classify(property, ctx.hierarchy())
        .map_err(|e| classification_error(owner, property, e))?;
    if classification.is_collection() {
        return Err(Error::PluralIdentifier {
            owner: owner.java_type().clone(),
            attribute: property.name.clone(),
        });
    }
    build_singular(ctx, owner, property, classification)
}

fn build_singular(
    ctx: &mut MetadataContext<'_>,
    owner: &ManagedTypeDraft,
    property: &PropertyDescriptor,
    classification: Classification<'_>,
) -> Result<SingularAttributeBuilder> {
    let attribute_type = resolve_type(ctx, owner.id(), classification.element)?;
    Ok(SingularAttributeBuilder::new(
        property.name.as_str(),
        property.java_type().clone(),
        owner.id(),
        attribute_type,
        classification.kind,
    ))
}

fn classification_error(
    owner: &ManagedTypeDraft,
    property: &PropertyDescriptor,
    error: ClassificationError,
) -> Error {
    let owner = owner.java_type().clone();
    let attribute = property.name.clone();
    match error {
        ClassificationError::Unsupported(feature) => Error::Unsupported {
            owner,
            attribute,
            feature,
        },
        ClassificationError::MissingMapKey => Error::MissingMapKey { owner, attribute },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MetamodelConfig, UnsupportedFeaturePolicy};
    use crate::error::UnsupportedFeature;
    use crate::metamodel::{CollectionType, EntityId, ManagedTypeId, PersistenceType, PersistentAttributeKind};
    use ormeta_mapping::{ClassHierarchy, ClassName, CollectionDescriptor, ComponentDescriptor, ValueDescriptor};

    fn owner() -> ManagedTypeDraft {
        ManagedTypeDraft::new(ClassName::from("Person"), ManagedTypeId::Entity(EntityId::from_index(0)))
    }

    #[test]
    fn test_basic_and_association() {
        let config = MetamodelConfig::default();
        let hierarchy = ClassHierarchy::new();
        let mut ctx = MetadataContext::new(&config, &hierarchy);
        let owner = owner();

        let name = build_attribute(&mut ctx, &owner, &PropertyDescriptor::basic("name", "String").required())
            .unwrap()
            .unwrap();
        let name = name.as_singular().unwrap();
        assert_eq!(name.kind(), PersistentAttributeKind::Basic);
        assert!(!name.is_optional());
        assert!(!name.is_id());

        let state = build_attribute(&mut ctx, &owner, &PropertyDescriptor::to_one("state", "State"))
            .unwrap()
            .unwrap();
        assert_eq!(state.element_type().persistence_type(), PersistenceType::Entity);
        assert_eq!(state.kind(), PersistentAttributeKind::ManyToOne);
    }

    #[test]
    fn test_plural_attribute() {
        let config = MetamodelConfig::default();
        let hierarchy = ClassHierarchy::new();
        let mut ctx = MetadataContext::new(&config, &hierarchy);

        let phones = PropertyDescriptor::collection(
            "phones",
            CollectionDescriptor::element_collection(
                "HashMap",
                ValueDescriptor::component(
                    ComponentDescriptor::new("Phone").with_property(PropertyDescriptor::basic("number", "String")),
                ),
            )
            .with_key(ValueDescriptor::basic("String")),
        );
        let attribute = build_attribute(&mut ctx, &owner(), &phones).unwrap().unwrap();
        let phones = attribute.as_plural().unwrap();

        assert_eq!(phones.collection_type(), CollectionType::Map);
        assert_eq!(phones.java_type(), "HashMap");
        assert_eq!(phones.element_type().persistence_type(), PersistenceType::Embeddable);
        assert_eq!(phones.key_type().map(|k| k.java_type().as_str()), Some("String"));
    }

    #[test]
    fn test_synthetic_skipped() {
        let hierarchy = ClassHierarchy::new();
        let backref = PropertyDescriptor::basic("_orders_backref", "Long").synthetic();

        let config = MetamodelConfig::default();
        let mut ctx = MetadataContext::new(&config, &hierarchy);
        assert!(build_attribute(&mut ctx, &owner(), &backref).unwrap().is_none());

        let config = MetamodelConfig::default().include_synthetic(true);
        let mut ctx = MetadataContext::new(&config, &hierarchy);
        assert!(build_attribute(&mut ctx, &owner(), &backref).unwrap().is_some());
    }

    #[test]
    fn test_unsupported_policy() {
        let hierarchy = ClassHierarchy::new();
        let any = PropertyDescriptor::any("target", "Long");
        let iterable = PropertyDescriptor::collection(
            "items",
            CollectionDescriptor::element_collection("Iterable", ValueDescriptor::basic("String")),
        );

        let strict = MetamodelConfig::default();
        let mut ctx = MetadataContext::new(&strict, &hierarchy);
        assert!(matches!(
            build_attribute(&mut ctx, &owner(), &any),
            Err(Error::Unsupported { feature: UnsupportedFeature::Any, .. })
        ));

        let lenient = MetamodelConfig::default().unsupported(UnsupportedFeaturePolicy::Ignore);
        let mut ctx = MetadataContext::new(&lenient, &hierarchy);
        assert!(build_attribute(&mut ctx, &owner(), &any).unwrap().is_none());
        // Unrecognized containers fail even when ignoring
        assert!(matches!(
            build_attribute(&mut ctx, &owner(), &iterable),
            Err(Error::Unsupported { feature: UnsupportedFeature::ContainerType(_), .. })
        ));
    }

    #[test]
    fn test_identifier_attributes() {
        let config = MetamodelConfig::lenient();
        let hierarchy = ClassHierarchy::new();
        let mut ctx = MetadataContext::new(&config, &hierarchy);

        let id = build_id_attribute(&mut ctx, &owner(), &PropertyDescriptor::basic("id", "Long")).unwrap();
        assert!(id.is_id());
        assert!(!id.is_version());
        assert!(!id.is_optional());

        let version = build_version_attribute(&mut ctx, &owner(), &PropertyDescriptor::basic("version", "Integer")).unwrap();
        assert!(version.is_version());
        assert!(!version.is_optional());

        let plural = PropertyDescriptor::collection(
            "ids",
            CollectionDescriptor::element_collection("List", ValueDescriptor::basic("Long")),
        );
        assert!(matches!(
            build_id_attribute(&mut ctx, &owner(), &plural),
            Err(Error::PluralIdentifier { .. })
        ));

        // Never ignored, whatever the policy
        assert!(matches!(
            build_id_attribute(&mut ctx, &owner(), &PropertyDescriptor::any("id", "Long")),
            Err(Error::Unsupported { .. })
        ));
    }
}
