//! Entity and mapped-superclass mappings.

use crate::class::ClassName;
use crate::property::PropertyDescriptor;
use serde::{Deserialize, Serialize};

/// The mapping of one entity class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMapping {
    /// Mapped class.
    pub class: ClassName,
    /// Entity name (unique within the model).
    pub entity_name: String,
    /// Identifier declared by this class. `None` when inherited from the superclass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<IdentifierMapping>,
    /// Version property, for optimistically locked entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<PropertyDescriptor>,
    /// Declared properties in declaration order, excluding the identifier.
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    /// Direct superclass: another entity or a mapped superclass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<ClassName>,
    /// Whether the class is abstract.
    #[serde(default)]
    pub is_abstract: bool,
}

/// The mapping of a mapped superclass: a non-entity class whose mapped
/// state (identifier and version included) is inherited by entity subclasses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedSuperclassMapping {
    /// Mapped class.
    pub class: ClassName,
    /// Identifier declared by this class, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<IdentifierMapping>,
    /// Version property, if declared here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<PropertyDescriptor>,
    /// Declared properties in declaration order, excluding the identifier.
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    /// Direct superclass: an entity or another mapped superclass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<ClassName>,
}

/// How an entity declares its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentifierMapping {
    /// A single identifier property, simple or embedded.
    Property {
        /// Identifier property.
        property: PropertyDescriptor,
    },
    /// A non-aggregated composite identifier described by an identifier mapper.
    IdClass {
        /// Id class, if one is declared.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class: Option<ClassName>,
        /// Mapper properties.
        properties: Vec<PropertyDescriptor>,
    },
}

impl EntityMapping {
    /// Create a new entity mapping with no identifier or properties.
    pub fn new(class: impl Into<ClassName>, entity_name: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            entity_name: entity_name.into(),
            identifier: None,
            version: None,
            properties: Vec::new(),
            superclass: None,
            is_abstract: false,
        }
    }

    /// Set a single identifier property.
    pub fn with_id(mut self, property: PropertyDescriptor) -> Self {
        self.identifier = Some(IdentifierMapping::Property { property });
        self
    }

    /// Set a non-aggregated composite identifier.
    pub fn with_id_class(
        mut self,
        class: Option<ClassName>,
        properties: impl IntoIterator<Item = PropertyDescriptor>,
    ) -> Self {
        self.identifier = Some(IdentifierMapping::IdClass {
            class,
            properties: properties.into_iter().collect(),
        });
        self
    }

    /// Set the version property.
    pub fn with_version(mut self, property: PropertyDescriptor) -> Self {
        self.version = Some(property);
        self
    }

    /// Add a property.
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Add multiple properties.
    pub fn with_properties(mut self, properties: impl IntoIterator<Item = PropertyDescriptor>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Set the superclass.
    pub fn extends(mut self, superclass: impl Into<ClassName>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Mark the class abstract.
    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Whether this class declares a single identifier property.
    pub fn has_identifier_property(&self) -> bool {
        matches!(self.identifier, Some(IdentifierMapping::Property { .. }))
    }

    /// Whether this class declares a non-aggregated composite identifier.
    pub fn has_id_class(&self) -> bool {
        matches!(self.identifier, Some(IdentifierMapping::IdClass { .. }))
    }

    /// The single identifier property, if declared.
    pub fn identifier_property(&self) -> Option<&PropertyDescriptor> {
        match &self.identifier {
            Some(IdentifierMapping::Property { property }) => Some(property),
            _ => None,
        }
    }

    /// Whether this class is versioned.
    pub fn is_versioned(&self) -> bool {
        self.version.is_some()
    }

    /// Get a declared property by name.
    pub fn get_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl MappedSuperclassMapping {
    /// Create a new mapped-superclass mapping with no identifier or properties.
    pub fn new(class: impl Into<ClassName>) -> Self {
        Self {
            class: class.into(),
            identifier: None,
            version: None,
            properties: Vec::new(),
            superclass: None,
        }
    }

    /// Set a single identifier property.
    pub fn with_id(mut self, property: PropertyDescriptor) -> Self {
        self.identifier = Some(IdentifierMapping::Property { property });
        self
    }

    /// Set a non-aggregated composite identifier.
    pub fn with_id_class(
        mut self,
        class: Option<ClassName>,
        properties: impl IntoIterator<Item = PropertyDescriptor>,
    ) -> Self {
        self.identifier = Some(IdentifierMapping::IdClass {
            class,
            properties: properties.into_iter().collect(),
        });
        self
    }

    /// Set the version property.
    pub fn with_version(mut self, property: PropertyDescriptor) -> Self {
        self.version = Some(property);
        self
    }

    /// Add a property.
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Set the superclass.
    pub fn extends(mut self, superclass: impl Into<ClassName>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// The single identifier property, if declared.
    pub fn identifier_property(&self) -> Option<&PropertyDescriptor> {
        match &self.identifier {
            Some(IdentifierMapping::Property { property }) => Some(property),
            _ => None,
        }
    }
}
