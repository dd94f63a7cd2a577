//! Metamodel construction.
//!
//! Every mapped class is built in model order, entities first, then mapped
//! superclasses. Entity-valued references (attribute targets and supertypes)
//! are taken as handles from the
//! [`MetadataContext`](context::MetadataContext) and bound once all classes
//! are built, so mutually referencing entities need no ordering.

pub mod classifier;

mod attribute;
mod context;
mod entity;
mod resolver;

use crate::config::MetamodelConfig;
use crate::error::Result;
use crate::metamodel::Metamodel;
use context::MetadataContext;
use ormeta_mapping::MappingModel;
use tracing::{debug, info};

/// Build the metamodel of a mapping model.
pub fn build(model: &MappingModel, config: &MetamodelConfig) -> Result<Metamodel> {
    let mut ctx = MetadataContext::new(config, &model.hierarchy)
        .with_mapped_superclasses(model.mapped_superclasses.iter().map(|m| &m.class));

    for mapping in &model.entities {
        entity::build_entity(&mut ctx, mapping)?;
    }
    for mapping in &model.mapped_superclasses {
        if !model.is_extended(mapping.class.as_str()) {
            debug!(class = %mapping.class, "mapped superclass has no subclass");
        }
        entity::build_mapped_superclass(&mut ctx, mapping)?;
    }

    let metamodel = ctx.post_process()?;
    info!(
        entities = metamodel.entity_count(),
        mapped_superclasses = metamodel.mapped_superclass_count(),
        embeddables = metamodel.embeddable_count(),
        "built metamodel"
    );
    Ok(metamodel)
}
