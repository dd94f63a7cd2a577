//! Classified values to metamodel types.

use super::attribute::build_attribute;
use super::classifier::ValueCategory;
use super::context::MetadataContext;
use crate::error::Result;
use crate::metamodel::{EmbeddableType, ManagedTypeDraft, ManagedTypeId, Type};
use ormeta_mapping::ComponentDescriptor;
use tracing::debug;

/// Resolve the type of a value declared by `owner`.
///
/// Entities resolve to a handle without being built. Embeddables are built
/// here, completely, before this returns.
pub(crate) fn resolve_type(
    ctx: &mut MetadataContext<'_>,
    owner: ManagedTypeId,
    category: ValueCategory<'_>,
) -> Result<Type> {
    match category {
        ValueCategory::Basic(class) => Ok(Type::Basic(class.clone())),
        ValueCategory::Entity(class) => Ok(Type::Entity(ctx.handle(class))),
        ValueCategory::Embeddable(component) => build_embeddable(ctx, owner, component),
    }
}

/// Build one embeddable instance for the attribute that references it.
pub(crate) fn build_embeddable(
    ctx: &mut MetadataContext<'_>,
    parent: ManagedTypeId,
    component: &ComponentDescriptor,
) -> Result<Type> {
    let id = ctx.reserve_embeddable();
    let mut draft = ManagedTypeDraft::new(component.class.clone(), ManagedTypeId::Embeddable(id));

    for property in &component.properties {
        if let Some(attribute) = build_attribute(ctx, &draft, property)? {
            draft.add_attribute(attribute)?;
        }
    }

    debug!(
        embeddable = %component.class,
        id = id.index(),
        attributes = component.properties.len(),
        "built embeddable"
    );
    ctx.register_embeddable(EmbeddableType::new(id, parent, draft.seal()));

    Ok(Type::Embeddable {
        id,
        class: component.class.clone(),
    })
}
