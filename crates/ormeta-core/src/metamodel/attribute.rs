//! Attributes of managed types.

use super::types::{ManagedTypeId, Type};
use crate::error::{Error, Result};
use ormeta_mapping::ClassName;
use serde::Serialize;
use std::fmt;

/// How an attribute is persisted.
///
/// One-to-one associations are reported as [`ManyToOne`](Self::ManyToOne), and
/// one-to-many associations through a join table as
/// [`ManyToMany`](Self::ManyToMany).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistentAttributeKind {
    Basic,
    Embedded,
    ManyToOne,
    OneToMany,
    ManyToMany,
    ElementCollection,
}

impl PersistentAttributeKind {
    /// Whether the attribute refers to other entities.
    pub fn is_association(self) -> bool {
        matches!(
            self,
            PersistentAttributeKind::ManyToOne
                | PersistentAttributeKind::OneToMany
                | PersistentAttributeKind::ManyToMany
        )
    }
}

impl fmt::Display for PersistentAttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PersistentAttributeKind::Basic => "basic",
            PersistentAttributeKind::Embedded => "embedded",
            PersistentAttributeKind::ManyToOne => "many-to-one",
            PersistentAttributeKind::OneToMany => "one-to-many",
            PersistentAttributeKind::ManyToMany => "many-to-many",
            PersistentAttributeKind::ElementCollection => "element-collection",
        };
        f.write_str(name)
    }
}

/// Collection type of a plural attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionType {
    Collection,
    List,
    Set,
    Map,
}

/// An attribute of a managed type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    Singular(SingularAttribute),
    Plural(PluralAttribute),
}

impl Attribute {
    /// Attribute name.
    pub fn name(&self) -> &str {
        match self {
            Attribute::Singular(a) => &a.name,
            Attribute::Plural(a) => &a.name,
        }
    }

    /// Declared Java type; the container type for plural attributes.
    pub fn java_type(&self) -> &ClassName {
        match self {
            Attribute::Singular(a) => &a.java_type,
            Attribute::Plural(a) => &a.java_type,
        }
    }

    /// The declaring managed type.
    pub fn declaring_type(&self) -> ManagedTypeId {
        match self {
            Attribute::Singular(a) => a.declaring_type,
            Attribute::Plural(a) => a.declaring_type,
        }
    }

    /// How the attribute is persisted.
    pub fn kind(&self) -> PersistentAttributeKind {
        match self {
            Attribute::Singular(a) => a.kind,
            Attribute::Plural(a) => a.kind,
        }
    }

    /// The value type; the element type for plural attributes.
    pub fn element_type(&self) -> &Type {
        match self {
            Attribute::Singular(a) => &a.attribute_type,
            Attribute::Plural(a) => &a.element_type,
        }
    }

    /// Whether the attribute is collection-valued.
    pub fn is_collection(&self) -> bool {
        matches!(self, Attribute::Plural(_))
    }

    /// Whether the attribute refers to other entities.
    pub fn is_association(&self) -> bool {
        self.kind().is_association()
    }

    pub fn as_singular(&self) -> Option<&SingularAttribute> {
        match self {
            Attribute::Singular(a) => Some(a),
            Attribute::Plural(_) => None,
        }
    }

    pub fn as_plural(&self) -> Option<&PluralAttribute> {
        match self {
            Attribute::Plural(a) => Some(a),
            Attribute::Singular(_) => None,
        }
    }
}

/// A single-valued attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingularAttribute {
    name: String,
    java_type: ClassName,
    declaring_type: ManagedTypeId,
    attribute_type: Type,
    kind: PersistentAttributeKind,
    id: bool,
    version: bool,
    optional: bool,
}

impl SingularAttribute {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn java_type(&self) -> &ClassName {
        &self.java_type
    }

    pub fn declaring_type(&self) -> ManagedTypeId {
        self.declaring_type
    }

    /// Resolved value type.
    pub fn attribute_type(&self) -> &Type {
        &self.attribute_type
    }

    pub fn kind(&self) -> PersistentAttributeKind {
        self.kind
    }

    /// Whether this is the identifier attribute.
    pub fn is_id(&self) -> bool {
        self.id
    }

    /// Whether this is the version attribute.
    pub fn is_version(&self) -> bool {
        self.version
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// A collection-valued attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralAttribute {
    name: String,
    java_type: ClassName,
    declaring_type: ManagedTypeId,
    collection_type: CollectionType,
    element_type: Type,
    key_type: Option<Type>,
    kind: PersistentAttributeKind,
}

impl PluralAttribute {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared container type.
    pub fn java_type(&self) -> &ClassName {
        &self.java_type
    }

    pub fn declaring_type(&self) -> ManagedTypeId {
        self.declaring_type
    }

    pub fn collection_type(&self) -> CollectionType {
        self.collection_type
    }

    pub fn element_type(&self) -> &Type {
        &self.element_type
    }

    /// Key type; present exactly for maps.
    pub fn key_type(&self) -> Option<&Type> {
        self.key_type.as_ref()
    }

    pub fn kind(&self) -> PersistentAttributeKind {
        self.kind
    }
}

/// Builder for [`SingularAttribute`].
#[derive(Debug)]
pub struct SingularAttributeBuilder {
    attribute: SingularAttribute,
}

impl SingularAttributeBuilder {
    /// Start a non-identifier, non-version, optional attribute.
    pub fn new(
        name: impl Into<String>,
        java_type: ClassName,
        owner: ManagedTypeId,
        attribute_type: Type,
        kind: PersistentAttributeKind,
    ) -> Self {
        Self {
            attribute: SingularAttribute {
                name: name.into(),
                java_type,
                declaring_type: owner,
                attribute_type,
                kind,
                id: false,
                version: false,
                optional: true,
            },
        }
    }

    /// Set whether the value may be absent.
    pub fn optional(mut self, optional: bool) -> Self {
        self.attribute.optional = optional;
        self
    }

    /// Mark as the identifier: required, never a version.
    pub fn identifier(mut self) -> Self {
        self.attribute.id = true;
        self.attribute.version = false;
        self.attribute.optional = false;
        self
    }

    /// Mark as the version: required.
    pub fn version(mut self) -> Self {
        self.attribute.version = true;
        self.attribute.optional = false;
        self
    }

    pub fn build(self) -> SingularAttribute {
        self.attribute
    }
}

/// Builder for [`PluralAttribute`].
#[derive(Debug)]
pub struct PluralAttributeBuilder {
    name: String,
    java_type: ClassName,
    owner: ManagedTypeId,
    collection_type: CollectionType,
    element_type: Type,
    key_type: Option<Type>,
    kind: PersistentAttributeKind,
}

impl PluralAttributeBuilder {
    pub fn new(
        name: impl Into<String>,
        java_type: ClassName,
        owner: ManagedTypeId,
        collection_type: CollectionType,
        element_type: Type,
    ) -> Self {
        Self {
            name: name.into(),
            java_type,
            owner,
            collection_type,
            element_type,
            key_type: None,
            kind: PersistentAttributeKind::ElementCollection,
        }
    }

    /// Set the map key type.
    pub fn key_type(mut self, key_type: Type) -> Self {
        self.key_type = Some(key_type);
        self
    }

    /// Set how the collection is persisted.
    pub fn kind(mut self, kind: PersistentAttributeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Finish the attribute. Maps require a key type; other collections must not have one.
    pub fn build(self) -> Result<PluralAttribute> {
        let reason = match (self.collection_type, &self.key_type) {
            (CollectionType::Map, None) => Some("map attribute without a key type"),
            (CollectionType::Map, Some(_)) | (_, None) => None,
            (_, Some(_)) => Some("key type on a non-map attribute"),
        };
        if let Some(reason) = reason {
            return Err(Error::InvalidPluralAttribute {
                attribute: self.name,
                reason,
            });
        }

        Ok(PluralAttribute {
            name: self.name,
            java_type: self.java_type,
            declaring_type: self.owner,
            collection_type: self.collection_type,
            element_type: self.element_type,
            key_type: self.key_type,
            kind: self.kind,
        })
    }
}
