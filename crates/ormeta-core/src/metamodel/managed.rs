//! Managed types: anything that owns attributes.

use super::attribute::{Attribute, CollectionType, PluralAttribute, SingularAttribute};
use super::types::{EmbeddableId, ManagedTypeId};
use crate::error::{Error, Result};
use ormeta_mapping::ClassName;
use std::ops::Deref;

/// A managed type under construction.
#[derive(Debug)]
pub(crate) struct ManagedTypeDraft {
    java_type: ClassName,
    id: ManagedTypeId,
    attributes: Vec<Attribute>,
}

impl ManagedTypeDraft {
    pub(crate) fn new(java_type: ClassName, id: ManagedTypeId) -> Self {
        Self {
            java_type,
            id,
            attributes: Vec::new(),
        }
    }

    pub(crate) fn id(&self) -> ManagedTypeId {
        self.id
    }

    pub(crate) fn java_type(&self) -> &ClassName {
        &self.java_type
    }

    /// Append a declared attribute and return its position.
    pub(crate) fn add_attribute(&mut self, attribute: Attribute) -> Result<usize> {
        if self.attributes.iter().any(|a| a.name() == attribute.name()) {
            return Err(Error::DuplicateAttribute {
                owner: self.java_type.clone(),
                attribute: attribute.name().to_string(),
            });
        }
        self.attributes.push(attribute);
        Ok(self.attributes.len() - 1)
    }

    pub(crate) fn seal(self) -> ManagedType {
        ManagedType {
            java_type: self.java_type,
            id: self.id,
            attributes: self.attributes,
        }
    }
}

/// A built managed type. Its declared attributes never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedType {
    java_type: ClassName,
    id: ManagedTypeId,
    attributes: Vec<Attribute>,
}

impl ManagedType {
    /// The mapped class.
    pub fn java_type(&self) -> &ClassName {
        &self.java_type
    }

    /// Arena id of this type.
    pub fn id(&self) -> ManagedTypeId {
        self.id
    }

    /// Declared attributes in build order: ordinary properties, then the
    /// identifier, version and id-class attributes.
    pub fn declared_attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Find a declared attribute by name.
    pub fn find_declared_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Get a declared attribute by name.
    pub fn declared_attribute(&self, name: &str) -> Result<&Attribute> {
        self.find_declared_attribute(name)
            .ok_or_else(|| self.not_found(name))
    }

    /// Declared single-valued attributes.
    pub fn declared_singular_attributes(&self) -> Vec<&SingularAttribute> {
        self.attributes.iter().filter_map(Attribute::as_singular).collect()
    }

    /// Declared collection-valued attributes.
    pub fn declared_plural_attributes(&self) -> Vec<&PluralAttribute> {
        self.attributes.iter().filter_map(Attribute::as_plural).collect()
    }

    /// Get a declared single-valued attribute, checking its Java type.
    pub fn declared_singular_attribute(&self, name: &str, java_type: &str) -> Result<&SingularAttribute> {
        let attribute = self.declared_singular(name)?;
        if attribute.java_type() != java_type {
            return Err(Error::AttributeTypeMismatch {
                owner: self.java_type.clone(),
                attribute: name.to_string(),
                expected: ClassName::from(java_type),
                actual: attribute.java_type().clone(),
            });
        }
        Ok(attribute)
    }

    /// Get a declared collection-valued attribute.
    pub fn declared_plural_attribute(&self, name: &str) -> Result<&PluralAttribute> {
        match self.declared_attribute(name)? {
            Attribute::Plural(attribute) => Ok(attribute),
            Attribute::Singular(_) => Err(Error::NotPlural {
                owner: self.java_type.clone(),
                attribute: name.to_string(),
            }),
        }
    }

    /// Get a declared `Collection` attribute with the given element type.
    pub fn declared_collection(&self, name: &str, element: &str) -> Result<&PluralAttribute> {
        self.declared_plural_of(name, CollectionType::Collection, element)
    }

    /// Get a declared `Set` attribute with the given element type.
    pub fn declared_set(&self, name: &str, element: &str) -> Result<&PluralAttribute> {
        self.declared_plural_of(name, CollectionType::Set, element)
    }

    /// Get a declared `List` attribute with the given element type.
    pub fn declared_list(&self, name: &str, element: &str) -> Result<&PluralAttribute> {
        self.declared_plural_of(name, CollectionType::List, element)
    }

    /// Get a declared `Map` attribute with the given key and element types.
    pub fn declared_map(&self, name: &str, key: &str, element: &str) -> Result<&PluralAttribute> {
        let attribute = self.declared_plural_of(name, CollectionType::Map, element)?;
        match attribute.key_type() {
            Some(key_type) if key_type.java_type() == key => Ok(attribute),
            Some(key_type) => Err(Error::AttributeTypeMismatch {
                owner: self.java_type.clone(),
                attribute: name.to_string(),
                expected: ClassName::from(key),
                actual: key_type.java_type().clone(),
            }),
            // Maps always carry a key type
            None => unreachable!("map attribute {} without key type", name),
        }
    }

    pub(crate) fn singular_at(&self, index: usize) -> &SingularAttribute {
        match &self.attributes[index] {
            Attribute::Singular(attribute) => attribute,
            Attribute::Plural(attribute) => {
                unreachable!("identifier attribute {} is plural", attribute.name())
            }
        }
    }

    pub(crate) fn declared_singular(&self, name: &str) -> Result<&SingularAttribute> {
        match self.declared_attribute(name)? {
            Attribute::Singular(attribute) => Ok(attribute),
            Attribute::Plural(_) => Err(Error::NotSingular {
                owner: self.java_type.clone(),
                attribute: name.to_string(),
            }),
        }
    }

    fn declared_plural_of(
        &self,
        name: &str,
        collection_type: CollectionType,
        element: &str,
    ) -> Result<&PluralAttribute> {
        let attribute = self.declared_plural_attribute(name)?;
        if attribute.collection_type() != collection_type {
            return Err(Error::CollectionTypeMismatch {
                owner: self.java_type.clone(),
                attribute: name.to_string(),
                expected: collection_type,
                actual: attribute.collection_type(),
            });
        }
        if attribute.element_type().java_type() != element {
            return Err(Error::AttributeTypeMismatch {
                owner: self.java_type.clone(),
                attribute: name.to_string(),
                expected: ClassName::from(element),
                actual: attribute.element_type().java_type().clone(),
            });
        }
        Ok(attribute)
    }

    pub(crate) fn not_found(&self, name: &str) -> Error {
        Error::AttributeNotFound {
            owner: self.java_type.clone(),
            attribute: name.to_string(),
        }
    }
}

/// A value type embedded in an entity or another embeddable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddableType {
    id: EmbeddableId,
    parent: ManagedTypeId,
    managed: ManagedType,
}

impl EmbeddableType {
    pub(crate) fn new(id: EmbeddableId, parent: ManagedTypeId, managed: ManagedType) -> Self {
        Self { id, parent, managed }
    }

    /// Arena id of this embeddable.
    pub fn embeddable_id(&self) -> EmbeddableId {
        self.id
    }

    /// The managed type whose attribute holds this embeddable.
    pub fn parent(&self) -> ManagedTypeId {
        self.parent
    }

    /// The attribute-owning part of this type.
    pub fn managed(&self) -> &ManagedType {
        &self.managed
    }
}

impl Deref for EmbeddableType {
    type Target = ManagedType;

    fn deref(&self) -> &ManagedType {
        &self.managed
    }
}
