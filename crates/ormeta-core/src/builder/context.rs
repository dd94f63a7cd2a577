//! Per-build state.

use crate::config::MetamodelConfig;
use crate::error::{Error, Result};
use crate::metamodel::{
    EmbeddableId, EmbeddableType, EntityHandle, EntityId, EntityType, IdentifiableType,
    MappedSuperclassHandle, MappedSuperclassId, MappedSuperclassType, Metamodel, SupertypeHandle,
};
use ormeta_mapping::{ClassHierarchy, ClassName};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// One arena slot per entity class, created by the first reference to it.
#[derive(Debug)]
struct EntitySlot {
    class: ClassName,
    built: Option<EntityType>,
}

/// One arena slot per declared mapped-superclass class.
#[derive(Debug)]
struct MappedSuperclassSlot {
    class: ClassName,
    built: Option<MappedSuperclassType>,
}

/// State of one metamodel build.
///
/// Entity references are handed out as handles before their targets are
/// built; [`post_process`](Self::post_process) checks that every handle was
/// bound and turns the context into the finished [`Metamodel`].
#[derive(Debug)]
pub(crate) struct MetadataContext<'a> {
    config: &'a MetamodelConfig,
    hierarchy: &'a ClassHierarchy,
    handles: HashMap<ClassName, EntityHandle>,
    entities: Vec<EntitySlot>,
    entity_names: HashSet<String>,
    mapped_superclass_handles: HashMap<ClassName, MappedSuperclassHandle>,
    mapped_superclasses: Vec<MappedSuperclassSlot>,
    embeddables: Vec<Option<EmbeddableType>>,
    embeddables_by_class: HashMap<ClassName, EmbeddableId>,
}

impl<'a> MetadataContext<'a> {
    pub(crate) fn new(config: &'a MetamodelConfig, hierarchy: &'a ClassHierarchy) -> Self {
        Self {
            config,
            hierarchy,
            handles: HashMap::new(),
            entities: Vec::new(),
            entity_names: HashSet::new(),
            mapped_superclass_handles: HashMap::new(),
            mapped_superclasses: Vec::new(),
            embeddables: Vec::new(),
            embeddables_by_class: HashMap::new(),
        }
    }

    /// Declare the classes mapped as mapped superclasses, one slot each in
    /// declaration order. Repeated classes share a slot.
    pub(crate) fn with_mapped_superclasses<'c>(
        mut self,
        classes: impl IntoIterator<Item = &'c ClassName>,
    ) -> Self {
        for class in classes {
            if self.mapped_superclass_handles.contains_key(class) {
                continue;
            }
            let id = MappedSuperclassId::from_index(self.mapped_superclasses.len());
            self.mapped_superclasses.push(MappedSuperclassSlot {
                class: class.clone(),
                built: None,
            });
            self.mapped_superclass_handles
                .insert(class.clone(), MappedSuperclassHandle::new(id, class.clone()));
        }
        self
    }

    pub(crate) fn config(&self) -> &'a MetamodelConfig {
        self.config
    }

    pub(crate) fn hierarchy(&self) -> &'a ClassHierarchy {
        self.hierarchy
    }

    /// Get the handle of an entity class, creating it on first use.
    pub(crate) fn handle(&mut self, class: &ClassName) -> EntityHandle {
        if let Some(handle) = self.handles.get(class) {
            return handle.clone();
        }

        let handle = EntityHandle::new(EntityId::from_index(self.entities.len()), class.clone());
        trace!(class = %class, id = handle.id().index(), "created entity handle");
        self.entities.push(EntitySlot {
            class: class.clone(),
            built: None,
        });
        self.handles.insert(class.clone(), handle.clone());
        handle
    }

    /// Get the handle of a declared mapped superclass.
    pub(crate) fn mapped_superclass_handle(&self, class: &ClassName) -> Option<MappedSuperclassHandle> {
        self.mapped_superclass_handles.get(class).cloned()
    }

    /// Get the handle of a supertype: a declared mapped superclass, or an entity.
    pub(crate) fn supertype_handle(&mut self, class: &ClassName) -> SupertypeHandle {
        match self.mapped_superclass_handle(class) {
            Some(handle) => SupertypeHandle::MappedSuperclass(handle),
            None => SupertypeHandle::Entity(self.handle(class)),
        }
    }

    /// Whether the entity behind a handle has been built.
    pub(crate) fn is_built(&self, id: EntityId) -> bool {
        self.entities[id.index()].built.is_some()
    }

    /// Whether the mapped superclass behind a handle has been built.
    pub(crate) fn is_mapped_superclass_built(&self, id: MappedSuperclassId) -> bool {
        self.mapped_superclasses[id.index()].built.is_some()
    }

    /// Store a built entity in its slot.
    pub(crate) fn register_entity(&mut self, entity: EntityType) -> Result<()> {
        let slot = &self.entities[entity.entity_id().index()];
        if slot.built.is_some() {
            return Err(Error::DuplicateEntity(slot.class.clone()));
        }
        if !self.entity_names.insert(entity.name().to_string()) {
            return Err(Error::DuplicateEntityName(entity.name().to_string()));
        }

        let index = entity.entity_id().index();
        self.entities[index].built = Some(entity);
        Ok(())
    }

    /// Store a built mapped superclass in its slot.
    pub(crate) fn register_mapped_superclass(&mut self, mapped: MappedSuperclassType) -> Result<()> {
        let slot = &mut self.mapped_superclasses[mapped.mapped_superclass_id().index()];
        if slot.built.is_some() {
            return Err(Error::DuplicateEntity(slot.class.clone()));
        }
        slot.built = Some(mapped);
        Ok(())
    }

    /// Reserve the arena slot of an embeddable about to be built.
    pub(crate) fn reserve_embeddable(&mut self) -> EmbeddableId {
        self.embeddables.push(None);
        EmbeddableId::from_index(self.embeddables.len() - 1)
    }

    /// Store a built embeddable. The first embeddable of each class is the one
    /// found by class lookups.
    pub(crate) fn register_embeddable(&mut self, embeddable: EmbeddableType) {
        let id = embeddable.embeddable_id();
        self.embeddables_by_class
            .entry(embeddable.java_type().clone())
            .or_insert(id);
        self.embeddables[id.index()] = Some(embeddable);
    }

    /// Bind all handles and produce the finished metamodel.
    pub(crate) fn post_process(self) -> Result<Metamodel> {
        let entities = self
            .entities
            .into_iter()
            .map(|slot| slot.built.ok_or(Error::UnresolvedEntity(slot.class)))
            .collect::<Result<Vec<_>>>()?;

        let mapped_superclasses = self
            .mapped_superclasses
            .into_iter()
            .map(|slot| slot.built.ok_or(Error::UnresolvedEntity(slot.class)))
            .collect::<Result<Vec<_>>>()?;

        check_hierarchy(&entities, &mapped_superclasses)?;

        let embeddables = self
            .embeddables
            .into_iter()
            .enumerate()
            .map(|(index, slot)| match slot {
                Some(embeddable) => embeddable,
                // Slots are filled before the build can continue or fail
                None => unreachable!("embeddable slot {} was never filled", index),
            })
            .collect();

        Ok(Metamodel::from_parts(
            entities,
            mapped_superclasses,
            embeddables,
            self.embeddables_by_class,
        ))
    }
}

/// Supertype chains must end, and every entity must declare or inherit an
/// identifier. A mapped superclass may leave its identifier to a subclass.
fn check_hierarchy(
    entities: &[EntityType],
    mapped_superclasses: &[MappedSuperclassType],
) -> Result<()> {
    for entity in entities {
        if !walk_supertypes(entity.identifiable(), entities, mapped_superclasses)? {
            return Err(Error::MissingIdentifier(entity.java_type().clone()));
        }
    }
    for mapped in mapped_superclasses {
        walk_supertypes(mapped.identifiable(), entities, mapped_superclasses)?;
    }
    Ok(())
}

/// Follow the supertype chain of `start`; returns whether any type on it
/// declares an identifier.
fn walk_supertypes(
    start: &IdentifiableType,
    entities: &[EntityType],
    mapped_superclasses: &[MappedSuperclassType],
) -> Result<bool> {
    let limit = entities.len() + mapped_superclasses.len();
    let mut current = start;
    let mut has_identifier = current.declares_identifier();
    let mut steps = 0;
    while let Some(handle) = current.supertype_handle() {
        steps += 1;
        if steps > limit {
            return Err(Error::CyclicInheritance(start.java_type().clone()));
        }
        current = match handle {
            SupertypeHandle::Entity(h) => entities[h.id().index()].identifiable(),
            SupertypeHandle::MappedSuperclass(h) => mapped_superclasses[h.id().index()].identifiable(),
        };
        has_identifier |= current.declares_identifier();
    }
    Ok(has_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metamodel::{IdentifiableDraft, ManagedTypeId};

    fn draft(ctx: &mut MetadataContext<'_>, class: &str, supertype: Option<&str>) -> IdentifiableDraft {
        let class = ClassName::from(class);
        let id = match ctx.mapped_superclass_handle(&class) {
            Some(handle) => ManagedTypeId::MappedSuperclass(handle.id()),
            None => ManagedTypeId::Entity(ctx.handle(&class).id()),
        };
        let mut draft = IdentifiableDraft::new(class, id);
        if let Some(supertype) = supertype {
            let supertype = ctx.supertype_handle(&ClassName::from(supertype));
            draft.set_supertype(supertype);
        }
        draft
    }

    fn build(ctx: &mut MetadataContext<'_>, class: &str, supertype: Option<&str>) -> Result<()> {
        let draft = draft(ctx, class, supertype);
        ctx.register_entity(draft.seal_entity(class.to_string(), false))
    }

    fn build_mapped(ctx: &mut MetadataContext<'_>, class: &str, supertype: Option<&str>) -> Result<()> {
        let draft = draft(ctx, class, supertype);
        ctx.register_mapped_superclass(draft.seal_mapped_superclass())
    }

    #[test]
    fn test_handles_are_memoized() {
        let config = MetamodelConfig::default();
        let hierarchy = ClassHierarchy::new();
        let mut ctx = MetadataContext::new(&config, &hierarchy);

        let first = ctx.handle(&ClassName::from("Order"));
        let second = ctx.handle(&ClassName::from("Order"));
        let other = ctx.handle(&ClassName::from("Customer"));

        assert_eq!(first, second);
        assert_ne!(first.id(), other.id());
        assert!(!ctx.is_built(first.id()));
    }

    #[test]
    fn test_unresolved_handle() {
        let config = MetamodelConfig::default();
        let hierarchy = ClassHierarchy::new();
        let mut ctx = MetadataContext::new(&config, &hierarchy);
        ctx.handle(&ClassName::from("Ghost"));

        let result = ctx.post_process();
        assert!(matches!(result, Err(Error::UnresolvedEntity(class)) if class == "Ghost"));
    }

    #[test]
    fn test_duplicate_entity() {
        let config = MetamodelConfig::default();
        let hierarchy = ClassHierarchy::new();
        let mut ctx = MetadataContext::new(&config, &hierarchy);

        let handle = ctx.handle(&ClassName::from("Order"));
        let id = ManagedTypeId::Entity(handle.id());
        let first = IdentifiableDraft::new(handle.class().clone(), id).seal_entity("Order".into(), false);
        let second = IdentifiableDraft::new(handle.class().clone(), id).seal_entity("Order2".into(), false);
        let renamed = IdentifiableDraft::new(handle.class().clone(), id).seal_entity("Order".into(), false);

        ctx.register_entity(first).unwrap();
        assert!(matches!(ctx.register_entity(second), Err(Error::DuplicateEntity(_))));
        // The class clash is reported even when the entity name clashes too
        assert!(matches!(ctx.register_entity(renamed), Err(Error::DuplicateEntity(_))));

        // A rejected duplicate leaves its entity name free
        let other = ctx.handle(&ClassName::from("Order2"));
        let third = IdentifiableDraft::new(other.class().clone(), ManagedTypeId::Entity(other.id()))
            .seal_entity("Order2".into(), false);
        ctx.register_entity(third).unwrap();
    }

    #[test]
    fn test_duplicate_entity_name() {
        let config = MetamodelConfig::default();
        let hierarchy = ClassHierarchy::new();
        let mut ctx = MetadataContext::new(&config, &hierarchy);

        let order = ctx.handle(&ClassName::from("Order"));
        let legacy = ctx.handle(&ClassName::from("LegacyOrder"));
        let first = IdentifiableDraft::new(order.class().clone(), ManagedTypeId::Entity(order.id()))
            .seal_entity("Order".into(), false);
        let second = IdentifiableDraft::new(legacy.class().clone(), ManagedTypeId::Entity(legacy.id()))
            .seal_entity("Order".into(), false);

        ctx.register_entity(first).unwrap();
        assert!(matches!(
            ctx.register_entity(second),
            Err(Error::DuplicateEntityName(name)) if name == "Order"
        ));
    }

    #[test]
    fn test_mapped_superclass_handles() {
        let config = MetamodelConfig::default();
        let hierarchy = ClassHierarchy::new();
        let classes = [ClassName::from("BaseEntity"), ClassName::from("Auditable"), ClassName::from("BaseEntity")];
        let mut ctx = MetadataContext::new(&config, &hierarchy).with_mapped_superclasses(&classes);

        let base = ctx.supertype_handle(&ClassName::from("BaseEntity"));
        let person = ctx.supertype_handle(&ClassName::from("Person"));
        assert!(matches!(&base, SupertypeHandle::MappedSuperclass(h) if h.id().index() == 0));
        assert!(matches!(person, SupertypeHandle::Entity(_)));
        assert_eq!(
            ctx.mapped_superclass_handle(&ClassName::from("Auditable")).map(|h| h.id().index()),
            Some(1)
        );
        assert!(ctx.mapped_superclass_handle(&ClassName::from("Person")).is_none());
    }

    #[test]
    fn test_mapped_superclass_without_identifier() {
        let config = MetamodelConfig::default();
        let hierarchy = ClassHierarchy::new();
        let classes = [ClassName::from("BaseEntity")];
        let mut ctx = MetadataContext::new(&config, &hierarchy).with_mapped_superclasses(&classes);

        build(&mut ctx, "Invoice", Some("BaseEntity")).unwrap();
        build_mapped(&mut ctx, "BaseEntity", None).unwrap();

        // Neither declares an identifier
        assert!(matches!(
            ctx.post_process(),
            Err(Error::MissingIdentifier(class)) if class == "Invoice"
        ));
    }

    #[test]
    fn test_unbuilt_mapped_superclass() {
        let config = MetamodelConfig::default();
        let hierarchy = ClassHierarchy::new();
        let classes = [ClassName::from("BaseEntity")];
        let ctx = MetadataContext::new(&config, &hierarchy).with_mapped_superclasses(&classes);

        assert!(matches!(ctx.post_process(), Err(Error::UnresolvedEntity(class)) if class == "BaseEntity"));
    }

    #[test]
    fn test_cyclic_mapped_superclasses() {
        let config = MetamodelConfig::default();
        let hierarchy = ClassHierarchy::new();
        let classes = [ClassName::from("A"), ClassName::from("B")];
        let mut ctx = MetadataContext::new(&config, &hierarchy).with_mapped_superclasses(&classes);

        build_mapped(&mut ctx, "A", Some("B")).unwrap();
        build_mapped(&mut ctx, "B", Some("A")).unwrap();

        assert!(matches!(ctx.post_process(), Err(Error::CyclicInheritance(_))));
    }

    #[test]
    fn test_cyclic_inheritance() {
        let config = MetamodelConfig::default();
        let hierarchy = ClassHierarchy::new();
        let mut ctx = MetadataContext::new(&config, &hierarchy);

        build(&mut ctx, "A", Some("B")).unwrap();
        build(&mut ctx, "B", Some("A")).unwrap();

        assert!(matches!(ctx.post_process(), Err(Error::CyclicInheritance(_))));
    }

    #[test]
    fn test_missing_identifier() {
        let config = MetamodelConfig::default();
        let hierarchy = ClassHierarchy::new();
        let mut ctx = MetadataContext::new(&config, &hierarchy);

        build(&mut ctx, "Base", None).unwrap();
        build(&mut ctx, "Derived", Some("Base")).unwrap();

        assert!(matches!(
            ctx.post_process(),
            Err(Error::MissingIdentifier(class)) if class == "Base"
        ));
    }
}
