//! Serializable view of a metamodel.

use super::attribute::{Attribute, CollectionType, PersistentAttributeKind};
use super::identifiable::{IdentifiableType, MappedSuperclassType};
use super::managed::{EmbeddableType, ManagedType};
use super::registry::{EntityRef, Metamodel};
use super::types::{EmbeddableId, ManagedTypeId, PersistenceType, Type};
use ormeta_mapping::ClassName;
use serde::Serialize;

/// Plain-data snapshot of a [`Metamodel`], for export.
#[derive(Debug, Clone, Serialize)]
pub struct MetamodelSnapshot {
    pub entities: Vec<EntitySnapshot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mapped_superclasses: Vec<MappedSuperclassSnapshot>,
    pub embeddables: Vec<EmbeddableSnapshot>,
}

/// Snapshot of one entity type.
#[derive(Debug, Clone, Serialize)]
pub struct EntitySnapshot {
    pub class: ClassName,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supertype: Option<ClassName>,
    pub is_abstract: bool,
    pub identifier: IdentifierSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub attributes: Vec<AttributeSnapshot>,
}

/// Snapshot of one mapped-superclass type.
#[derive(Debug, Clone, Serialize)]
pub struct MappedSuperclassSnapshot {
    pub class: ClassName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supertype: Option<ClassName>,
    /// `None` when the identifier is mapped elsewhere in the hierarchy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<IdentifierSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub attributes: Vec<AttributeSnapshot>,
}

/// How an entity's identifier is declared.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentifierSnapshot {
    Single {
        attribute: String,
    },
    IdClass {
        attributes: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        id_type: Option<ClassName>,
    },
    Inherited {
        from: ClassName,
    },
}

/// Snapshot of one embeddable type instance.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddableSnapshot {
    pub id: EmbeddableId,
    pub class: ClassName,
    pub parent: ManagedTypeId,
    pub attributes: Vec<AttributeSnapshot>,
}

/// Snapshot of one declared attribute.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeSnapshot {
    pub name: String,
    pub java_type: ClassName,
    pub kind: PersistentAttributeKind,
    pub persistence_type: PersistenceType,
    pub element_type: ClassName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeddable: Option<EmbeddableId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<CollectionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_type: Option<ClassName>,
    pub id: bool,
    pub version: bool,
    pub optional: bool,
}

impl Metamodel {
    /// Take a serializable snapshot.
    pub fn snapshot(&self) -> MetamodelSnapshot {
        MetamodelSnapshot {
            entities: self.entities().iter().map(EntitySnapshot::from_entity).collect(),
            mapped_superclasses: self
                .mapped_superclasses()
                .into_iter()
                .map(MappedSuperclassSnapshot::from_mapped_superclass)
                .collect(),
            embeddables: self
                .embeddables()
                .into_iter()
                .map(EmbeddableSnapshot::from_embeddable)
                .collect(),
        }
    }
}

impl MetamodelSnapshot {
    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl EntitySnapshot {
    fn from_entity(entity: &EntityRef<'_>) -> Self {
        let identifier = declared_identifier(entity).unwrap_or_else(|| {
            let from = entity
                .ancestry()
                .find(|t| t.declares_identifier())
                .unwrap_or(entity.identifiable());
            IdentifierSnapshot::Inherited {
                from: from.java_type().clone(),
            }
        });

        Self {
            class: entity.java_type().clone(),
            name: entity.name().to_string(),
            supertype: entity.supertype().map(|s| s.java_type().clone()),
            is_abstract: entity.is_abstract(),
            identifier,
            version: declared_version(entity),
            attributes: attributes_of(entity.managed()),
        }
    }
}

impl MappedSuperclassSnapshot {
    fn from_mapped_superclass(mapped: &MappedSuperclassType) -> Self {
        Self {
            class: mapped.java_type().clone(),
            supertype: mapped.supertype_handle().map(|h| h.class().clone()),
            identifier: declared_identifier(mapped),
            version: declared_version(mapped),
            attributes: attributes_of(mapped.managed()),
        }
    }
}

fn declared_identifier(identifiable: &IdentifiableType) -> Option<IdentifierSnapshot> {
    if let Some(id) = identifiable.declared_id_attribute() {
        return Some(IdentifierSnapshot::Single {
            attribute: id.name().to_string(),
        });
    }
    identifiable
        .declared_id_class_attributes()
        .map(|attributes| IdentifierSnapshot::IdClass {
            attributes: attributes.iter().map(|a| a.name().to_string()).collect(),
            id_type: identifiable
                .declared_id_class_type()
                .map(|t| t.java_type().clone()),
        })
}

fn declared_version(identifiable: &IdentifiableType) -> Option<String> {
    identifiable
        .declared_version_attribute()
        .map(|v| v.name().to_string())
}

impl EmbeddableSnapshot {
    fn from_embeddable(embeddable: &EmbeddableType) -> Self {
        Self {
            id: embeddable.embeddable_id(),
            class: embeddable.java_type().clone(),
            parent: embeddable.parent(),
            attributes: attributes_of(embeddable.managed()),
        }
    }
}

fn attributes_of(managed: &ManagedType) -> Vec<AttributeSnapshot> {
    managed
        .declared_attributes()
        .iter()
        .map(AttributeSnapshot::from_attribute)
        .collect()
}

impl AttributeSnapshot {
    fn from_attribute(attribute: &Attribute) -> Self {
        let element = attribute.element_type();
        let (id, version, optional) = match attribute {
            Attribute::Singular(a) => (a.is_id(), a.is_version(), a.is_optional()),
            Attribute::Plural(_) => (false, false, true),
        };
        let plural = attribute.as_plural();

        Self {
            name: attribute.name().to_string(),
            java_type: attribute.java_type().clone(),
            kind: attribute.kind(),
            persistence_type: element.persistence_type(),
            element_type: element.java_type().clone(),
            embeddable: element.as_embeddable(),
            collection: plural.map(|p| p.collection_type()),
            key_type: plural
                .and_then(|p| p.key_type())
                .map(|k: &Type| k.java_type().clone()),
            id,
            version,
            optional,
        }
    }
}
