//! Entity and mapped-superclass type construction.

use super::attribute::{build_attribute, build_id_attribute, build_version_attribute};
use super::context::MetadataContext;
use super::resolver::build_embeddable;
use crate::error::{Error, Result};
use crate::metamodel::{IdentifiableDraft, ManagedTypeId};
use ormeta_mapping::{
    ClassName, ComponentDescriptor, EntityMapping, IdentifierMapping, MappedSuperclassMapping,
    PropertyDescriptor,
};
use tracing::{debug, instrument};

/// What an entity or mapped superclass maps itself.
struct Members<'a> {
    identifier: Option<&'a IdentifierMapping>,
    version: Option<&'a PropertyDescriptor>,
    properties: &'a [PropertyDescriptor],
    superclass: Option<&'a ClassName>,
}

/// Build the entity type of one mapped class and store it in its slot.
///
/// Entity-valued references, including the supertype, only take handles, so
/// the classes they name may be built before or after this one.
#[instrument(skip_all, fields(entity = %mapping.class))]
pub(crate) fn build_entity(ctx: &mut MetadataContext<'_>, mapping: &EntityMapping) -> Result<()> {
    if ctx.mapped_superclass_handle(&mapping.class).is_some() {
        return Err(Error::DuplicateEntity(mapping.class.clone()));
    }
    let handle = ctx.handle(&mapping.class);
    if ctx.is_built(handle.id()) {
        return Err(Error::DuplicateEntity(mapping.class.clone()));
    }

    let mut draft = IdentifiableDraft::new(mapping.class.clone(), ManagedTypeId::Entity(handle.id()));
    build_members(
        ctx,
        &mut draft,
        Members {
            identifier: mapping.identifier.as_ref(),
            version: mapping.version.as_ref(),
            properties: &mapping.properties,
            superclass: mapping.superclass.as_ref(),
        },
    )?;

    let entity = draft.seal_entity(mapping.entity_name.clone(), mapping.is_abstract);
    debug!(
        name = entity.name(),
        attributes = entity.declared_attributes().len(),
        "built entity type"
    );
    ctx.register_entity(entity)
}

/// Build the type of one mapped superclass and store it in its slot.
#[instrument(skip_all, fields(mapped_superclass = %mapping.class))]
pub(crate) fn build_mapped_superclass(
    ctx: &mut MetadataContext<'_>,
    mapping: &MappedSuperclassMapping,
) -> Result<()> {
    let handle = ctx
        .mapped_superclass_handle(&mapping.class)
        .ok_or_else(|| Error::UnresolvedEntity(mapping.class.clone()))?;
    if ctx.is_mapped_superclass_built(handle.id()) {
        return Err(Error::DuplicateEntity(mapping.class.clone()));
    }

    let mut draft = IdentifiableDraft::new(
        mapping.class.clone(),
        ManagedTypeId::MappedSuperclass(handle.id()),
    );
    build_members(
        ctx,
        &mut draft,
        Members {
            identifier: mapping.identifier.as_ref(),
            version: mapping.version.as_ref(),
            properties: &mapping.properties,
            superclass: mapping.superclass.as_ref(),
        },
    )?;

    let mapped = draft.seal_mapped_superclass();
    debug!(
        attributes = mapped.declared_attributes().len(),
        "built mapped superclass type"
    );
    ctx.register_mapped_superclass(mapped)
}

/// Declared properties first, then the identifier and version, then the supertype.
fn build_members(
    ctx: &mut MetadataContext<'_>,
    draft: &mut IdentifiableDraft,
    members: Members<'_>,
) -> Result<()> {
    let id_name = match members.identifier {
        Some(IdentifierMapping::Property { property }) => Some(property.name.as_str()),
        _ => None,
    };
    let version_name = members.version.map(|p| p.name.as_str());
    for property in members.properties {
        let name = Some(property.name.as_str());
        if name == id_name || name == version_name {
            continue;
        }
        if let Some(attribute) = build_attribute(ctx, draft.managed(), property)? {
            draft.add_attribute(attribute)?;
        }
    }

    match members.identifier {
        Some(IdentifierMapping::Property { property }) => {
            let id = build_id_attribute(ctx, draft.managed(), property)?;
            draft.apply_id_attribute(id)?;
        }
        Some(IdentifierMapping::IdClass { class, properties }) => {
            let attributes = properties
                .iter()
                .map(|property| build_id_attribute(ctx, draft.managed(), property))
                .collect::<Result<Vec<_>>>()?;

            let id_type = match class {
                Some(class) => {
                    let component = ComponentDescriptor::new(class.clone())
                        .with_properties(properties.iter().cloned());
                    Some(build_embeddable(ctx, draft.managed().id(), &component)?)
                }
                None => None,
            };
            draft.apply_id_class_attributes(attributes, id_type)?;
        }
        None => {}
    }

    if let Some(version) = members.version {
        let version = build_version_attribute(ctx, draft.managed(), version)?;
        draft.apply_version_attribute(version)?;
    }

    if let Some(superclass) = members.superclass {
        let supertype = ctx.supertype_handle(superclass);
        draft.set_supertype(supertype);
    }
    Ok(())
}
