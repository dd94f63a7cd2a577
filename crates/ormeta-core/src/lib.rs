//! ormeta core - Static domain metamodel builder.
//!
//! Turns a mapping model (entities, properties, value descriptors) into a
//! typed metamodel of entity, mapped-superclass, embeddable and attribute
//! types, with identifier and version attributes resolved across supertype
//! chains.

pub mod builder;
pub mod config;
pub mod error;
pub mod metamodel;

pub use config::{MetamodelConfig, UnsupportedFeaturePolicy};
pub use error::{Error, ErrorKind, Result, UnsupportedFeature};
pub use metamodel::{
    Attribute, AttributeSnapshot, CollectionType, EmbeddableId, EmbeddableSnapshot, EmbeddableType,
    EntityHandle, EntityId, EntityRef, EntitySnapshot, EntityType, IdentifiableType,
    IdentifierSnapshot, ManagedType, ManagedTypeId, ManagedTypeRef, MappedSuperclassHandle,
    MappedSuperclassId, MappedSuperclassSnapshot, MappedSuperclassType, Metamodel,
    MetamodelSnapshot, PersistenceType, PersistentAttributeKind, PluralAttribute,
    PluralAttributeBuilder, ResolvedType, SingularAttribute, SingularAttributeBuilder,
    SupertypeHandle, SupertypeRef, Type,
};

/// Re-export mapping-model types.
pub use ormeta_mapping as mapping;
