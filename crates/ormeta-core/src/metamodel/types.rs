//! Type handles.
//!
//! Entity, mapped-superclass and embeddable types live in arenas owned by the
//! [`Metamodel`](super::Metamodel). Everything that refers to one of them
//! (attribute types, supertypes) stores an arena id instead of a pointer, so
//! entity types can reference each other in cycles and the reference can be
//! handed out before the target has been built.

use ormeta_mapping::ClassName;
use serde::Serialize;
use std::fmt;

/// Arena index of an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(usize);

/// Arena index of an embeddable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EmbeddableId(usize);

/// Arena index of a mapped-superclass type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MappedSuperclassId(usize);

macro_rules! arena_id {
    ($id:ident) => {
        impl $id {
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index)
            }

            /// Position in the owning arena.
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

arena_id!(EntityId);
arena_id!(EmbeddableId);
arena_id!(MappedSuperclassId);

/// The managed type that declares an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ManagedTypeId {
    /// An entity type.
    Entity(EntityId),
    /// A mapped-superclass type.
    MappedSuperclass(MappedSuperclassId),
    /// An embeddable type.
    Embeddable(EmbeddableId),
}

/// A reference to an entity type, possibly not yet built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    id: EntityId,
    class: ClassName,
}

impl EntityHandle {
    pub(crate) fn new(id: EntityId, class: ClassName) -> Self {
        Self { id, class }
    }

    /// Arena id of the referenced entity type.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Class of the referenced entity type.
    pub fn class(&self) -> &ClassName {
        &self.class
    }
}

/// A reference to a mapped-superclass type, possibly not yet built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappedSuperclassHandle {
    id: MappedSuperclassId,
    class: ClassName,
}

impl MappedSuperclassHandle {
    pub(crate) fn new(id: MappedSuperclassId, class: ClassName) -> Self {
        Self { id, class }
    }

    pub fn id(&self) -> MappedSuperclassId {
        self.id
    }

    pub fn class(&self) -> &ClassName {
        &self.class
    }
}

/// The direct supertype of an entity or mapped superclass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SupertypeHandle {
    Entity(EntityHandle),
    MappedSuperclass(MappedSuperclassHandle),
}

impl SupertypeHandle {
    /// Class of the supertype.
    pub fn class(&self) -> &ClassName {
        match self {
            SupertypeHandle::Entity(handle) => handle.class(),
            SupertypeHandle::MappedSuperclass(handle) => handle.class(),
        }
    }

    /// The entity handle, when the supertype is an entity.
    pub fn as_entity(&self) -> Option<&EntityHandle> {
        match self {
            SupertypeHandle::Entity(handle) => Some(handle),
            SupertypeHandle::MappedSuperclass(_) => None,
        }
    }
}

/// Persistence category of a [`Type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceType {
    Basic,
    Embeddable,
    Entity,
}

impl fmt::Display for PersistenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceType::Basic => write!(f, "basic"),
            PersistenceType::Embeddable => write!(f, "embeddable"),
            PersistenceType::Entity => write!(f, "entity"),
        }
    }
}

/// The type of an attribute value, collection element or map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// A basic value; never registered or interned.
    Basic(ClassName),
    /// An embeddable built for this attribute.
    Embeddable { id: EmbeddableId, class: ClassName },
    /// An entity, referenced by handle.
    Entity(EntityHandle),
}

impl Type {
    /// Java type of the value.
    pub fn java_type(&self) -> &ClassName {
        match self {
            Type::Basic(class) => class,
            Type::Embeddable { class, .. } => class,
            Type::Entity(handle) => handle.class(),
        }
    }

    /// Persistence category.
    pub fn persistence_type(&self) -> PersistenceType {
        match self {
            Type::Basic(_) => PersistenceType::Basic,
            Type::Embeddable { .. } => PersistenceType::Embeddable,
            Type::Entity(_) => PersistenceType::Entity,
        }
    }

    /// The entity handle, for entity types.
    pub fn as_entity(&self) -> Option<&EntityHandle> {
        match self {
            Type::Entity(handle) => Some(handle),
            _ => None,
        }
    }

    /// The embeddable id, for embeddable types.
    pub fn as_embeddable(&self) -> Option<EmbeddableId> {
        match self {
            Type::Embeddable { id, .. } => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.persistence_type(), self.java_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_accessors() {
        let basic = Type::Basic(ClassName::from("String"));
        assert_eq!(basic.java_type(), "String");
        assert_eq!(basic.persistence_type(), PersistenceType::Basic);
        assert!(basic.as_entity().is_none());
        assert_eq!(basic.to_string(), "basic(String)");

        let entity = Type::Entity(EntityHandle::new(EntityId::from_index(3), ClassName::from("State")));
        assert_eq!(entity.java_type(), "State");
        assert_eq!(entity.as_entity().map(|h| h.id().index()), Some(3));
        assert_eq!(entity.to_string(), "entity(State)");

        let embeddable = Type::Embeddable {
            id: EmbeddableId::from_index(0),
            class: ClassName::from("Address"),
        };
        assert_eq!(embeddable.persistence_type(), PersistenceType::Embeddable);
        assert_eq!(embeddable.as_embeddable(), Some(EmbeddableId::from_index(0)));
    }

    #[test]
    fn test_supertype_handle() {
        let entity = SupertypeHandle::Entity(EntityHandle::new(EntityId::from_index(0), ClassName::from("Person")));
        assert_eq!(entity.class(), "Person");
        assert!(entity.as_entity().is_some());

        let mapped = SupertypeHandle::MappedSuperclass(MappedSuperclassHandle::new(
            MappedSuperclassId::from_index(2),
            ClassName::from("BaseEntity"),
        ));
        assert_eq!(mapped.class(), "BaseEntity");
        assert!(mapped.as_entity().is_none());
    }

    #[test]
    fn test_arena_index_is_not_truncated() {
        let index = u32::MAX as usize + 7;
        assert_eq!(EntityId::from_index(index).index(), index);
    }
}
