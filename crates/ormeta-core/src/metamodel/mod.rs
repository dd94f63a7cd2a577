//! The metamodel: entity, mapped-superclass, embeddable and attribute types.
//!
//! Everything here is immutable once built. Types under construction live in
//! crate-private drafts that are sealed exactly once.

mod attribute;
mod identifiable;
mod managed;
mod registry;
mod snapshot;
mod types;

pub use attribute::{
    Attribute, CollectionType, PersistentAttributeKind, PluralAttribute, PluralAttributeBuilder,
    SingularAttribute, SingularAttributeBuilder,
};
pub use identifiable::{EntityType, IdentifiableType, MappedSuperclassType};
pub use managed::{EmbeddableType, ManagedType};
pub use registry::{EntityRef, ManagedTypeRef, Metamodel, ResolvedType, SupertypeRef};
pub use snapshot::{
    AttributeSnapshot, EmbeddableSnapshot, EntitySnapshot, IdentifierSnapshot,
    MappedSuperclassSnapshot, MetamodelSnapshot,
};
pub use types::{
    EmbeddableId, EntityHandle, EntityId, ManagedTypeId, MappedSuperclassHandle,
    MappedSuperclassId, PersistenceType, SupertypeHandle, Type,
};

pub(crate) use identifiable::IdentifiableDraft;
pub(crate) use managed::ManagedTypeDraft;
