//! Identifiable types: entities and mapped superclasses.

use super::attribute::{Attribute, SingularAttribute};
use super::managed::{ManagedType, ManagedTypeDraft};
use super::types::{EntityId, ManagedTypeId, MappedSuperclassId, SupertypeHandle, Type};
use crate::error::{Error, Result};
use ormeta_mapping::ClassName;
use std::ops::Deref;

/// How an identifiable type declares its identifier.
///
/// Attributes are referenced by their position in the declared attribute
/// list, so the identifier is the same object whether reached through the
/// identifier accessors or through [`ManagedType::declared_attributes`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum Identifier {
    /// Nothing declared here; a supertype or subtype provides it.
    Inherited,
    /// A single identifier attribute, simple or embedded.
    Single(usize),
    /// Non-aggregated composite identifier.
    IdClass {
        attributes: Vec<usize>,
        id_type: Option<Type>,
    },
}

/// An entity or mapped-superclass type under construction.
#[derive(Debug)]
pub(crate) struct IdentifiableDraft {
    managed: ManagedTypeDraft,
    identifier: Identifier,
    version: Option<usize>,
    supertype: Option<SupertypeHandle>,
}

impl IdentifiableDraft {
    pub(crate) fn new(java_type: ClassName, id: ManagedTypeId) -> Self {
        Self {
            managed: ManagedTypeDraft::new(java_type, id),
            identifier: Identifier::Inherited,
            version: None,
            supertype: None,
        }
    }

    pub(crate) fn managed(&self) -> &ManagedTypeDraft {
        &self.managed
    }

    pub(crate) fn add_attribute(&mut self, attribute: Attribute) -> Result<usize> {
        self.managed.add_attribute(attribute)
    }

    pub(crate) fn apply_id_attribute(&mut self, attribute: SingularAttribute) -> Result<()> {
        self.ensure_no_identifier()?;
        let index = self.managed.add_attribute(Attribute::Singular(attribute))?;
        self.identifier = Identifier::Single(index);
        Ok(())
    }

    pub(crate) fn apply_id_class_attributes(
        &mut self,
        attributes: Vec<SingularAttribute>,
        id_type: Option<Type>,
    ) -> Result<()> {
        self.ensure_no_identifier()?;
        let attributes = attributes
            .into_iter()
            .map(|a| self.managed.add_attribute(Attribute::Singular(a)))
            .collect::<Result<Vec<_>>>()?;
        self.identifier = Identifier::IdClass { attributes, id_type };
        Ok(())
    }

    pub(crate) fn apply_version_attribute(&mut self, attribute: SingularAttribute) -> Result<()> {
        let index = self.managed.add_attribute(Attribute::Singular(attribute))?;
        self.version = Some(index);
        Ok(())
    }

    pub(crate) fn set_supertype(&mut self, supertype: SupertypeHandle) {
        debug_assert!(self.supertype.is_none(), "supertype assigned twice");
        self.supertype = Some(supertype);
    }

    pub(crate) fn seal_entity(self, name: String, is_abstract: bool) -> EntityType {
        let id = match self.managed.id() {
            ManagedTypeId::Entity(id) => id,
            other => unreachable!("entity draft with {:?}", other),
        };
        EntityType {
            id,
            name,
            identifiable: self.seal(),
            is_abstract,
        }
    }

    pub(crate) fn seal_mapped_superclass(self) -> MappedSuperclassType {
        let id = match self.managed.id() {
            ManagedTypeId::MappedSuperclass(id) => id,
            other => unreachable!("mapped superclass draft with {:?}", other),
        };
        MappedSuperclassType {
            id,
            identifiable: self.seal(),
        }
    }

    fn seal(self) -> IdentifiableType {
        IdentifiableType {
            managed: self.managed.seal(),
            identifier: self.identifier,
            version: self.version,
            supertype: self.supertype,
        }
    }

    fn ensure_no_identifier(&self) -> Result<()> {
        match self.identifier {
            Identifier::Inherited => Ok(()),
            _ => Err(Error::ConflictingIdentifier(self.managed.java_type().clone())),
        }
    }
}

/// The identifier, version and supertype of an entity or mapped superclass.
///
/// The declared accessors only see what this class maps itself. Inherited
/// identifier and version attributes are reached through
/// [`EntityRef`](super::EntityRef), which can follow the supertype handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifiableType {
    managed: ManagedType,
    identifier: Identifier,
    version: Option<usize>,
    supertype: Option<SupertypeHandle>,
}

impl IdentifiableType {
    /// The attribute-owning part of this type.
    pub fn managed(&self) -> &ManagedType {
        &self.managed
    }

    /// Handle of the direct supertype.
    pub fn supertype_handle(&self) -> Option<&SupertypeHandle> {
        self.supertype.as_ref()
    }

    /// Whether this class declares its own identifier.
    pub fn declares_identifier(&self) -> bool {
        !matches!(self.identifier, Identifier::Inherited)
    }

    /// The declared single identifier attribute, if any.
    pub fn declared_id_attribute(&self) -> Option<&SingularAttribute> {
        match self.identifier {
            Identifier::Single(index) => Some(self.managed.singular_at(index)),
            _ => None,
        }
    }

    /// The declared single identifier attribute, checking its Java type.
    pub fn declared_id(&self, java_type: &str) -> Result<&SingularAttribute> {
        match self.identifier {
            Identifier::Single(index) => self.checked(self.managed.singular_at(index), java_type),
            Identifier::IdClass { .. } => Err(Error::IdClassIdentifier(self.java_type().clone())),
            Identifier::Inherited => Err(Error::IdentifierNotDeclared(self.java_type().clone())),
        }
    }

    /// The declared id-class attributes, if this class declares a composite identifier.
    pub fn declared_id_class_attributes(&self) -> Option<Vec<&SingularAttribute>> {
        match &self.identifier {
            Identifier::IdClass { attributes, .. } => Some(
                attributes
                    .iter()
                    .map(|&index| self.managed.singular_at(index))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// The embeddable built for the declared id class, if one is named.
    pub fn declared_id_class_type(&self) -> Option<&Type> {
        match &self.identifier {
            Identifier::IdClass { id_type, .. } => id_type.as_ref(),
            _ => None,
        }
    }

    /// The declared version attribute, if any.
    pub fn declared_version_attribute(&self) -> Option<&SingularAttribute> {
        self.version.map(|index| self.managed.singular_at(index))
    }

    /// The declared version attribute, checking its Java type.
    pub fn declared_version(&self, java_type: &str) -> Result<&SingularAttribute> {
        match self.declared_version_attribute() {
            Some(version) => self.checked(version, java_type),
            None => Err(Error::VersionNotDeclared(self.java_type().clone())),
        }
    }

    pub(crate) fn checked<'a>(
        &self,
        attribute: &'a SingularAttribute,
        java_type: &str,
    ) -> Result<&'a SingularAttribute> {
        if attribute.java_type() != java_type {
            return Err(Error::AttributeTypeMismatch {
                owner: self.java_type().clone(),
                attribute: attribute.name().to_string(),
                expected: ClassName::from(java_type),
                actual: attribute.java_type().clone(),
            });
        }
        Ok(attribute)
    }
}

impl Deref for IdentifiableType {
    type Target = ManagedType;

    fn deref(&self) -> &ManagedType {
        &self.managed
    }
}

/// A built entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityType {
    id: EntityId,
    name: String,
    identifiable: IdentifiableType,
    is_abstract: bool,
}

impl EntityType {
    /// Arena id of this entity.
    pub fn entity_id(&self) -> EntityId {
        self.id
    }

    /// Entity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifiable(&self) -> &IdentifiableType {
        &self.identifiable
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }
}

impl Deref for EntityType {
    type Target = IdentifiableType;

    fn deref(&self) -> &IdentifiableType {
        &self.identifiable
    }
}

/// A built mapped-superclass type.
///
/// Never an entity itself: it cannot be the target of an association, but
/// its attributes, identifier and version are inherited by entity subclasses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedSuperclassType {
    id: MappedSuperclassId,
    identifiable: IdentifiableType,
}

impl MappedSuperclassType {
    /// Arena id of this mapped superclass.
    pub fn mapped_superclass_id(&self) -> MappedSuperclassId {
        self.id
    }

    pub fn identifiable(&self) -> &IdentifiableType {
        &self.identifiable
    }
}

impl Deref for MappedSuperclassType {
    type Target = IdentifiableType;

    fn deref(&self) -> &IdentifiableType {
        &self.identifiable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metamodel::attribute::{PersistentAttributeKind, SingularAttributeBuilder};

    fn id() -> ManagedTypeId {
        ManagedTypeId::Entity(EntityId::from_index(0))
    }

    fn basic(name: &str, java_type: &str) -> SingularAttributeBuilder {
        SingularAttributeBuilder::new(
            name,
            ClassName::from(java_type),
            id(),
            Type::Basic(ClassName::from(java_type)),
            PersistentAttributeKind::Basic,
        )
    }

    #[test]
    fn test_single_identifier() {
        let mut draft = IdentifiableDraft::new(ClassName::from("Person"), id());
        draft.apply_id_attribute(basic("id", "Long").identifier().build()).unwrap();
        draft.apply_version_attribute(basic("version", "Integer").version().build()).unwrap();
        let person = draft.seal_entity("Person".into(), false);

        assert!(person.declares_identifier());
        let id = person.declared_id("Long").unwrap();
        assert!(id.is_id());
        assert!(std::ptr::eq(id, person.declared_attribute("id").unwrap().as_singular().unwrap()));
        assert!(matches!(
            person.declared_id("Integer"),
            Err(Error::AttributeTypeMismatch { .. })
        ));
        assert!(person.declared_id_class_attributes().is_none());

        assert!(person.declared_version("Integer").unwrap().is_version());
    }

    #[test]
    fn test_id_class_identifier() {
        let mut draft = IdentifiableDraft::new(ClassName::from("LineItem"), id());
        draft
            .apply_id_class_attributes(
                vec![basic("orderId", "Long").build(), basic("line", "Integer").build()],
                None,
            )
            .unwrap();
        let item = draft.seal_entity("LineItem".into(), false);

        assert_eq!(item.declared_id_class_attributes().unwrap().len(), 2);
        assert!(matches!(item.declared_id("Long"), Err(Error::IdClassIdentifier(_))));
        assert!(item.declared_id_attribute().is_none());
        assert!(matches!(
            item.declared_version("Integer"),
            Err(Error::VersionNotDeclared(_))
        ));
    }

    #[test]
    fn test_conflicting_identifier() {
        let mut draft = IdentifiableDraft::new(ClassName::from("Person"), id());
        draft.apply_id_attribute(basic("id", "Long").identifier().build()).unwrap();

        let result = draft.apply_id_class_attributes(vec![basic("key", "String").build()], None);
        assert!(matches!(result, Err(Error::ConflictingIdentifier(_))));
    }

    #[test]
    fn test_inherited_identifier() {
        let draft = IdentifiableDraft::new(ClassName::from("Employee"), id());
        let employee = draft.seal_entity("Employee".into(), false);

        assert!(!employee.declares_identifier());
        assert!(matches!(
            employee.declared_id("Long"),
            Err(Error::IdentifierNotDeclared(_))
        ));
    }

    #[test]
    fn test_mapped_superclass() {
        let owner = ManagedTypeId::MappedSuperclass(MappedSuperclassId::from_index(0));
        let mut draft = IdentifiableDraft::new(ClassName::from("BaseEntity"), owner);
        let id = SingularAttributeBuilder::new(
            "id",
            ClassName::from("Long"),
            owner,
            Type::Basic(ClassName::from("Long")),
            PersistentAttributeKind::Basic,
        );
        draft.apply_id_attribute(id.identifier().build()).unwrap();
        let base = draft.seal_mapped_superclass();

        assert_eq!(base.mapped_superclass_id().index(), 0);
        assert_eq!(base.java_type(), "BaseEntity");
        assert_eq!(base.declared_id("Long").unwrap().declaring_type(), owner);
        assert!(base.supertype_handle().is_none());
    }
}
