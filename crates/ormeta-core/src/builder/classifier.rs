//! Property classification.
//!
//! Maps the shape of a property descriptor onto the closed set of attribute
//! kinds and value categories the metamodel knows about. Classification is a
//! pure function of the descriptor and the class hierarchy; nothing is built
//! here.

use crate::error::UnsupportedFeature;
use crate::metamodel::{CollectionType, PersistentAttributeKind};
use ormeta_mapping::hierarchy::{COLLECTION, LIST, MAP, SET};
use ormeta_mapping::{
    ClassHierarchy, ClassName, CollectionDescriptor, CollectionElement, ComponentDescriptor,
    PropertyDescriptor, ValueDescriptor,
};

/// Category of a value, element or map key, with what is needed to resolve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCategory<'a> {
    Basic(&'a ClassName),
    Embeddable(&'a ComponentDescriptor),
    Entity(&'a ClassName),
}

/// Container details of a collection-valued property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluralShape<'a> {
    pub container: &'a ClassName,
    pub collection_type: CollectionType,
    pub key: Option<ValueCategory<'a>>,
}

/// Result of classifying one property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    pub kind: PersistentAttributeKind,
    /// The value, or the element for collections.
    pub element: ValueCategory<'a>,
    /// Present exactly for collections.
    pub plural: Option<PluralShape<'a>>,
}

impl Classification<'_> {
    pub fn is_collection(&self) -> bool {
        self.plural.is_some()
    }
}

/// Why a property could not be classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    Unsupported(UnsupportedFeature),
    /// A map container without a key descriptor.
    MissingMapKey,
}

impl From<UnsupportedFeature> for ClassificationError {
    fn from(feature: UnsupportedFeature) -> Self {
        ClassificationError::Unsupported(feature)
    }
}

/// Classify a property.
pub fn classify<'a>(
    property: &'a PropertyDescriptor,
    hierarchy: &ClassHierarchy,
) -> Result<Classification<'a>, ClassificationError> {
    match &property.value {
        ValueDescriptor::Any { .. } => Err(UnsupportedFeature::Any.into()),
        ValueDescriptor::Collection(collection) => classify_collection(collection, hierarchy),
        ValueDescriptor::ToOne { target, .. } => Ok(singular(
            PersistentAttributeKind::ManyToOne,
            ValueCategory::Entity(target),
        )),
        ValueDescriptor::Component(component) => Ok(singular(
            PersistentAttributeKind::Embedded,
            ValueCategory::Embeddable(component),
        )),
        ValueDescriptor::Basic { java_type } => Ok(singular(
            PersistentAttributeKind::Basic,
            ValueCategory::Basic(java_type),
        )),
    }
}

fn singular(kind: PersistentAttributeKind, element: ValueCategory<'_>) -> Classification<'_> {
    Classification {
        kind,
        element,
        plural: None,
    }
}

fn classify_collection<'a>(
    collection: &'a CollectionDescriptor,
    hierarchy: &ClassHierarchy,
) -> Result<Classification<'a>, ClassificationError> {
    // Any-typed elements and keys are rejected before anything else
    let element_is_any = matches!(
        &collection.element,
        CollectionElement::CollectionTable { value } if matches!(**value, ValueDescriptor::Any { .. })
    );
    let key_is_any = matches!(collection.key.as_deref(), Some(ValueDescriptor::Any { .. }));
    if element_is_any || key_is_any {
        return Err(UnsupportedFeature::Any.into());
    }

    if collection.container.is_array() {
        return Err(UnsupportedFeature::Array.into());
    }
    let collection_type = collection_type(&collection.container, hierarchy)?;

    let (kind, element) = match &collection.element {
        CollectionElement::ForeignKey { target } => {
            (PersistentAttributeKind::OneToMany, ValueCategory::Entity(target))
        }
        CollectionElement::CollectionTable { value } => classify_element(value)?,
    };

    let key = match (collection_type, collection.key.as_deref()) {
        (CollectionType::Map, Some(key)) => Some(classify_element(key)?.1),
        (CollectionType::Map, None) => return Err(ClassificationError::MissingMapKey),
        // Keys of non-map containers (list indexes) are not attributes
        (_, _) => None,
    };

    Ok(Classification {
        kind,
        element,
        plural: Some(PluralShape {
            container: &collection.container,
            collection_type,
            key,
        }),
    })
}

/// Classify a value stored in a collection table, as element or key.
fn classify_element(
    value: &ValueDescriptor,
) -> Result<(PersistentAttributeKind, ValueCategory<'_>), ClassificationError> {
    match value {
        ValueDescriptor::Component(component) => Ok((
            PersistentAttributeKind::ElementCollection,
            ValueCategory::Embeddable(component),
        )),
        ValueDescriptor::ToOne { target, .. } => {
            Ok((PersistentAttributeKind::ManyToMany, ValueCategory::Entity(target)))
        }
        ValueDescriptor::Basic { java_type } => Ok((
            PersistentAttributeKind::ElementCollection,
            ValueCategory::Basic(java_type),
        )),
        ValueDescriptor::Collection(_) => Err(UnsupportedFeature::NestedCollection.into()),
        ValueDescriptor::Any { .. } => Err(UnsupportedFeature::Any.into()),
    }
}

/// Collection type of a declared container, checked in the order Map, Set, List, Collection.
pub fn collection_type(
    container: &ClassName,
    hierarchy: &ClassHierarchy,
) -> Result<CollectionType, UnsupportedFeature> {
    const ORDER: [(&str, CollectionType); 4] = [
        (MAP, CollectionType::Map),
        (SET, CollectionType::Set),
        (LIST, CollectionType::List),
        (COLLECTION, CollectionType::Collection),
    ];

    ORDER
        .iter()
        .find(|(interface, _)| hierarchy.is_assignable(container.as_str(), interface))
        .map(|&(_, collection_type)| collection_type)
        .ok_or_else(|| UnsupportedFeature::ContainerType(container.clone()))
}
