//! The finished metamodel.

use super::attribute::{Attribute, SingularAttribute};
use super::identifiable::{EntityType, IdentifiableType, MappedSuperclassType};
use super::managed::{EmbeddableType, ManagedType};
use super::types::{EmbeddableId, EntityId, MappedSuperclassId, SupertypeHandle, Type};
use crate::config::MetamodelConfig;
use crate::error::{Error, Result};
use ormeta_mapping::{ClassName, MappingModel};
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;

/// Immutable registry of the entity, mapped-superclass and embeddable types
/// of one mapping model.
///
/// Built once by [`Metamodel::build`]; afterwards it is plain data and can be
/// shared across threads for concurrent reads.
#[derive(Debug, Clone)]
pub struct Metamodel {
    entities: Vec<EntityType>,
    mapped_superclasses: Vec<MappedSuperclassType>,
    embeddables: Vec<EmbeddableType>,
    entities_by_class: HashMap<ClassName, EntityId>,
    entities_by_name: HashMap<String, EntityId>,
    mapped_superclasses_by_class: HashMap<ClassName, MappedSuperclassId>,
    embeddables_by_class: HashMap<ClassName, EmbeddableId>,
}

impl Metamodel {
    /// Build the metamodel of a mapping model.
    pub fn build(model: &MappingModel, config: &MetamodelConfig) -> Result<Self> {
        crate::builder::build(model, config)
    }

    pub(crate) fn from_parts(
        entities: Vec<EntityType>,
        mapped_superclasses: Vec<MappedSuperclassType>,
        embeddables: Vec<EmbeddableType>,
        embeddables_by_class: HashMap<ClassName, EmbeddableId>,
    ) -> Self {
        let entities_by_class = entities
            .iter()
            .map(|e| (e.java_type().clone(), e.entity_id()))
            .collect();
        let entities_by_name = entities
            .iter()
            .map(|e| (e.name().to_string(), e.entity_id()))
            .collect();
        let mapped_superclasses_by_class = mapped_superclasses
            .iter()
            .map(|m| (m.java_type().clone(), m.mapped_superclass_id()))
            .collect();

        Self {
            entities,
            mapped_superclasses,
            embeddables,
            entities_by_class,
            entities_by_name,
            mapped_superclasses_by_class,
            embeddables_by_class,
        }
    }

    /// Get an entity type by class.
    pub fn entity(&self, class: &str) -> Result<EntityRef<'_>> {
        self.entities_by_class
            .get(class)
            .map(|&id| self.entity_at(id))
            .ok_or_else(|| Error::NotAnEntity(ClassName::from(class)))
    }

    /// Get an entity type by entity name.
    pub fn entity_by_name(&self, name: &str) -> Result<EntityRef<'_>> {
        self.entities_by_name
            .get(name)
            .map(|&id| self.entity_at(id))
            .ok_or_else(|| Error::UnknownEntityName(name.to_string()))
    }

    /// Get a mapped-superclass type by class.
    pub fn mapped_superclass(&self, class: &str) -> Result<&MappedSuperclassType> {
        self.mapped_superclasses_by_class
            .get(class)
            .map(|&id| self.mapped_superclass_at(id))
            .ok_or_else(|| Error::NotAMappedSuperclass(ClassName::from(class)))
    }

    /// Get an embeddable type by class.
    ///
    /// When the same class is embedded in several places, the first one built
    /// is returned.
    pub fn embeddable(&self, class: &str) -> Result<&EmbeddableType> {
        self.embeddables_by_class
            .get(class)
            .map(|&id| self.embeddable_at(id))
            .ok_or_else(|| Error::NotAnEmbeddable(ClassName::from(class)))
    }

    /// Get an entity, mapped-superclass or embeddable type by class.
    pub fn managed_type(&self, class: &str) -> Result<ManagedTypeRef<'_>> {
        if let Ok(entity) = self.entity(class) {
            return Ok(ManagedTypeRef::Entity(entity));
        }
        if let Ok(mapped_superclass) = self.mapped_superclass(class) {
            return Ok(ManagedTypeRef::MappedSuperclass(mapped_superclass));
        }
        if let Ok(embeddable) = self.embeddable(class) {
            return Ok(ManagedTypeRef::Embeddable(embeddable));
        }
        Err(Error::NotAManagedType(ClassName::from(class)))
    }

    /// Dereference an entity id.
    ///
    /// # Panics
    ///
    /// Panics if the id was issued by a different metamodel.
    pub fn entity_at(&self, id: EntityId) -> EntityRef<'_> {
        EntityRef {
            metamodel: self,
            entity: &self.entities[id.index()],
        }
    }

    /// Dereference a mapped-superclass id.
    ///
    /// # Panics
    ///
    /// Panics if the id was issued by a different metamodel.
    pub fn mapped_superclass_at(&self, id: MappedSuperclassId) -> &MappedSuperclassType {
        &self.mapped_superclasses[id.index()]
    }

    /// Dereference an embeddable id.
    ///
    /// # Panics
    ///
    /// Panics if the id was issued by a different metamodel.
    pub fn embeddable_at(&self, id: EmbeddableId) -> &EmbeddableType {
        &self.embeddables[id.index()]
    }

    /// Dereference a supertype handle.
    pub fn supertype_at(&self, handle: &SupertypeHandle) -> SupertypeRef<'_> {
        match handle {
            SupertypeHandle::Entity(handle) => SupertypeRef::Entity(self.entity_at(handle.id())),
            SupertypeHandle::MappedSuperclass(handle) => {
                SupertypeRef::MappedSuperclass(self.mapped_superclass_at(handle.id()))
            }
        }
    }

    /// Resolve an attribute type to the managed type it refers to.
    pub fn resolve<'m>(&'m self, ty: &'m Type) -> ResolvedType<'m> {
        match ty {
            Type::Basic(class) => ResolvedType::Basic(class),
            Type::Embeddable { id, .. } => ResolvedType::Embeddable(self.embeddable_at(*id)),
            Type::Entity(handle) => ResolvedType::Entity(self.entity_at(handle.id())),
        }
    }

    /// All entity types, in the order they were first referenced.
    pub fn entities(&self) -> Vec<EntityRef<'_>> {
        self.entities.iter().map(|e| self.entity_at(e.entity_id())).collect()
    }

    /// All mapped-superclass types, in mapping order.
    pub fn mapped_superclasses(&self) -> Vec<&MappedSuperclassType> {
        self.mapped_superclasses.iter().collect()
    }

    /// All embeddable types, including every instance of a class embedded more than once.
    pub fn embeddables(&self) -> Vec<&EmbeddableType> {
        self.embeddables.iter().collect()
    }

    /// All entity types, then all mapped-superclass types, then all embeddable types.
    pub fn managed_types(&self) -> Vec<ManagedTypeRef<'_>> {
        self.entities()
            .into_iter()
            .map(ManagedTypeRef::Entity)
            .chain(self.mapped_superclasses.iter().map(ManagedTypeRef::MappedSuperclass))
            .chain(self.embeddables.iter().map(ManagedTypeRef::Embeddable))
            .collect()
    }

    /// Number of entity types.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of mapped-superclass types.
    pub fn mapped_superclass_count(&self) -> usize {
        self.mapped_superclasses.len()
    }

    /// Number of embeddable types.
    pub fn embeddable_count(&self) -> usize {
        self.embeddables.len()
    }
}

/// An entity type together with the metamodel it belongs to.
///
/// Follows supertype handles, so the identifier and version accessors see
/// what is inherited as well as what is declared.
#[derive(Clone, Copy)]
pub struct EntityRef<'m> {
    metamodel: &'m Metamodel,
    entity: &'m EntityType,
}

impl<'m> EntityRef<'m> {
    /// The underlying entity type.
    pub fn entity_type(&self) -> &'m EntityType {
        self.entity
    }

    /// The direct supertype: an entity or a mapped superclass.
    pub fn supertype(&self) -> Option<SupertypeRef<'m>> {
        self.entity
            .supertype_handle()
            .map(|handle| self.metamodel.supertype_at(handle))
    }

    /// This type followed by its supertypes, nearest first.
    pub fn ancestry(&self) -> impl Iterator<Item = &'m IdentifiableType> {
        let metamodel = self.metamodel;
        std::iter::successors(Some(self.entity.identifiable()), move |current| {
            current
                .supertype_handle()
                .map(|handle| metamodel.supertype_at(handle).identifiable())
        })
    }

    /// The nearest type in the hierarchy that declares an identifier.
    fn identifier_owner(&self) -> Option<&'m IdentifiableType> {
        self.ancestry().find(|t| t.declares_identifier())
    }

    /// The single identifier attribute, declared or inherited, checking its Java type.
    pub fn id(&self, java_type: &str) -> Result<&'m SingularAttribute> {
        match self.identifier_owner() {
            Some(owner) => match owner.declared_id_attribute() {
                Some(id) => owner.checked(id, java_type),
                None => Err(Error::IdClassIdentifier(self.entity.java_type().clone())),
            },
            None => Err(Error::IdentifierNotDeclared(self.entity.java_type().clone())),
        }
    }

    /// The single identifier attribute, declared or inherited.
    pub fn id_attribute(&self) -> Option<&'m SingularAttribute> {
        self.identifier_owner()
            .and_then(|owner| owner.declared_id_attribute())
    }

    /// The id-class attributes, declared or inherited.
    pub fn id_class_attributes(&self) -> Result<Vec<&'m SingularAttribute>> {
        match self.identifier_owner() {
            Some(owner) => owner
                .declared_id_class_attributes()
                .ok_or_else(|| Error::SingleIdentifier(self.entity.java_type().clone())),
            None => Err(Error::IdentifierNotDeclared(self.entity.java_type().clone())),
        }
    }

    /// Whether the hierarchy uses a single identifier attribute.
    pub fn has_single_id_attribute(&self) -> bool {
        self.id_attribute().is_some()
    }

    /// Type of the identifier: the attribute type for a single identifier, the
    /// id class for a composite identifier that names one.
    pub fn id_type(&self) -> Option<&'m Type> {
        let owner = self.identifier_owner()?;
        match owner.declared_id_attribute() {
            Some(id) => Some(id.attribute_type()),
            None => owner.declared_id_class_type(),
        }
    }

    /// The version attribute, declared or inherited, checking its Java type.
    pub fn version(&self, java_type: &str) -> Result<&'m SingularAttribute> {
        let (owner, version) = self
            .ancestry()
            .find_map(|t| t.declared_version_attribute().map(|v| (t, v)))
            .ok_or_else(|| Error::NotVersioned(self.entity.java_type().clone()))?;
        owner.checked(version, java_type)
    }

    /// Whether the hierarchy declares a version attribute.
    pub fn is_versioned(&self) -> bool {
        self.ancestry()
            .any(|t| t.declared_version_attribute().is_some())
    }

    /// Get an attribute by name, declared here or inherited.
    pub fn attribute(&self, name: &str) -> Result<&'m Attribute> {
        self.ancestry()
            .find_map(|t| t.managed().find_declared_attribute(name))
            .ok_or_else(|| self.entity.not_found(name))
    }

    /// Get a single-valued attribute by name, declared here or inherited,
    /// checking its Java type.
    pub fn singular_attribute(&self, name: &str, java_type: &str) -> Result<&'m SingularAttribute> {
        match self.attribute(name)? {
            Attribute::Singular(attribute) => self.entity.checked(attribute, java_type),
            Attribute::Plural(_) => Err(Error::NotSingular {
                owner: self.entity.java_type().clone(),
                attribute: name.to_string(),
            }),
        }
    }

    /// All attributes, inherited ones first.
    pub fn attributes(&self) -> Vec<&'m Attribute> {
        let mut chain: Vec<_> = self.ancestry().collect();
        chain.reverse();
        chain
            .into_iter()
            .flat_map(|t| t.managed().declared_attributes())
            .collect()
    }
}

impl<'m> Deref for EntityRef<'m> {
    type Target = EntityType;

    fn deref(&self) -> &EntityType {
        self.entity
    }
}

impl PartialEq for EntityRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.entity, other.entity)
    }
}

impl Eq for EntityRef<'_> {}

impl fmt::Debug for EntityRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRef")
            .field("class", self.entity.java_type())
            .field("id", &self.entity.entity_id())
            .finish()
    }
}

/// The direct supertype of an identifiable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupertypeRef<'m> {
    Entity(EntityRef<'m>),
    MappedSuperclass(&'m MappedSuperclassType),
}

impl<'m> SupertypeRef<'m> {
    /// The identifier, version and attributes of the supertype.
    pub fn identifiable(&self) -> &'m IdentifiableType {
        match self {
            SupertypeRef::Entity(entity) => entity.entity_type().identifiable(),
            SupertypeRef::MappedSuperclass(mapped) => mapped.identifiable(),
        }
    }

    pub fn java_type(&self) -> &'m ClassName {
        self.identifiable().java_type()
    }

    pub fn as_entity(&self) -> Option<EntityRef<'m>> {
        match self {
            SupertypeRef::Entity(entity) => Some(*entity),
            SupertypeRef::MappedSuperclass(_) => None,
        }
    }

    pub fn as_mapped_superclass(&self) -> Option<&'m MappedSuperclassType> {
        match self {
            SupertypeRef::MappedSuperclass(mapped) => Some(mapped),
            SupertypeRef::Entity(_) => None,
        }
    }
}

/// An entity, mapped-superclass or embeddable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagedTypeRef<'m> {
    Entity(EntityRef<'m>),
    MappedSuperclass(&'m MappedSuperclassType),
    Embeddable(&'m EmbeddableType),
}

impl<'m> ManagedTypeRef<'m> {
    /// The attribute-owning part of the type.
    pub fn managed(&self) -> &'m ManagedType {
        match self {
            ManagedTypeRef::Entity(entity) => entity.entity_type().managed(),
            ManagedTypeRef::MappedSuperclass(mapped) => mapped.managed(),
            ManagedTypeRef::Embeddable(embeddable) => embeddable.managed(),
        }
    }

    pub fn as_entity(&self) -> Option<EntityRef<'m>> {
        match self {
            ManagedTypeRef::Entity(entity) => Some(*entity),
            _ => None,
        }
    }

    pub fn as_embeddable(&self) -> Option<&'m EmbeddableType> {
        match self {
            ManagedTypeRef::Embeddable(embeddable) => Some(embeddable),
            _ => None,
        }
    }

    pub fn as_mapped_superclass(&self) -> Option<&'m MappedSuperclassType> {
        match self {
            ManagedTypeRef::MappedSuperclass(mapped) => Some(mapped),
            _ => None,
        }
    }
}

/// A [`Type`] with its handle dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedType<'m> {
    Basic(&'m ClassName),
    Embeddable(&'m EmbeddableType),
    Entity(EntityRef<'m>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ormeta_mapping::{EntityMapping, MappedSuperclassMapping, PropertyDescriptor};

    fn model() -> MappingModel {
        MappingModel::new()
            .with_entity(
                EntityMapping::new("com.acme.Person", "Person")
                    .with_id(PropertyDescriptor::basic("id", "Long"))
                    .with_version(PropertyDescriptor::basic("version", "Integer"))
                    .with_property(PropertyDescriptor::basic("name", "String")),
            )
            .with_entity(
                EntityMapping::new("com.acme.Employee", "Employee")
                    .extends("com.acme.Person")
                    .with_property(PropertyDescriptor::to_one("manager", "com.acme.Employee")),
            )
    }

    #[test]
    fn test_lookups() {
        let metamodel = Metamodel::build(&model(), &MetamodelConfig::default()).unwrap();

        assert_eq!(metamodel.entity_count(), 2);
        assert_eq!(metamodel.entity("com.acme.Person").unwrap().name(), "Person");
        assert_eq!(
            metamodel.entity_by_name("Employee").unwrap().java_type(),
            "com.acme.Employee"
        );
        assert!(matches!(metamodel.entity("Person"), Err(Error::NotAnEntity(_))));
        assert!(matches!(
            metamodel.entity_by_name("Nobody"),
            Err(Error::UnknownEntityName(_))
        ));
        assert!(matches!(
            metamodel.embeddable("com.acme.Person"),
            Err(Error::NotAnEmbeddable(_))
        ));
        assert!(metamodel.managed_type("com.acme.Person").unwrap().as_entity().is_some());
        assert!(matches!(
            metamodel.managed_type("String"),
            Err(Error::NotAManagedType(_))
        ));
    }

    #[test]
    fn test_inherited_accessors() {
        let metamodel = Metamodel::build(&model(), &MetamodelConfig::default()).unwrap();
        let person = metamodel.entity("com.acme.Person").unwrap();
        let employee = metamodel.entity("com.acme.Employee").unwrap();

        assert_eq!(employee.supertype().and_then(|s| s.as_entity()), Some(person));
        assert_eq!(employee.ancestry().count(), 2);
        assert!(std::ptr::eq(employee.id("Long").unwrap(), person.id("Long").unwrap()));
        assert!(employee.is_versioned());
        assert!(employee.has_single_id_attribute());
        assert_eq!(employee.id_type().map(|t| t.java_type().as_str()), Some("Long"));

        let names: Vec<_> = employee.attributes().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["name", "id", "version", "manager"]);
        assert!(employee.singular_attribute("name", "String").is_ok());
        assert!(matches!(
            employee.attribute("salary"),
            Err(Error::AttributeNotFound { .. })
        ));
        assert!(matches!(
            employee.id_class_attributes(),
            Err(Error::SingleIdentifier(_))
        ));
    }

    #[test]
    fn test_resolve_self_reference() {
        let metamodel = Metamodel::build(&model(), &MetamodelConfig::default()).unwrap();
        let employee = metamodel.entity("com.acme.Employee").unwrap();

        let manager = employee.declared_singular_attribute("manager", "com.acme.Employee").unwrap();
        match metamodel.resolve(manager.attribute_type()) {
            ResolvedType::Entity(target) => assert_eq!(target, employee),
            other => panic!("expected entity, got {:?}", other),
        }
    }

    #[test]
    fn test_mapped_superclass_lookups() {
        let model = model().with_mapped_superclass(
            MappedSuperclassMapping::new("com.acme.Auditable")
                .with_property(PropertyDescriptor::basic("createdAt", "Instant")),
        );
        let metamodel = Metamodel::build(&model, &MetamodelConfig::default()).unwrap();

        assert_eq!(metamodel.mapped_superclass_count(), 1);
        let auditable = metamodel.mapped_superclass("com.acme.Auditable").unwrap();
        assert!(auditable.declared_attribute("createdAt").is_ok());
        assert!(matches!(
            metamodel.mapped_superclass("com.acme.Person"),
            Err(Error::NotAMappedSuperclass(_))
        ));
        assert!(matches!(metamodel.entity("com.acme.Auditable"), Err(Error::NotAnEntity(_))));
        assert_eq!(
            metamodel.managed_type("com.acme.Auditable").unwrap().as_mapped_superclass(),
            Some(auditable)
        );
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Metamodel>();
    }
}
