//! ormeta mapping-model descriptors.
//!
//! This crate describes the already-parsed object/relational mapping model
//! that the metamodel builder in `ormeta-core` consumes. It carries only the
//! shape of each mapped class and property; relational details (tables,
//! columns, SQL types) live elsewhere.
//!
//! # Modules
//!
//! - [`class`] - Class names used to identify mapped and value types
//! - [`hierarchy`] - Class assignability, including the standard collection interfaces
//! - [`property`] - Property and value descriptors
//! - [`entity`] - Entity, mapped-superclass and identifier mappings
//! - [`model`] - The mapping model and its JSON representation
//! - [`error`] - Mapping document errors
//!
//! # Example
//!
//! ```
//! use ormeta_mapping::{EntityMapping, MappingModel, PropertyDescriptor};
//!
//! let model = MappingModel::new()
//!     .with_entity(
//!         EntityMapping::new("Customer", "Customer")
//!             .with_id(PropertyDescriptor::basic("id", "Long"))
//!             .with_property(PropertyDescriptor::to_one("passport", "Passport")),
//!     )
//!     .with_entity(
//!         EntityMapping::new("Passport", "Passport")
//!             .with_id(PropertyDescriptor::basic("id", "Long"))
//!             .with_property(PropertyDescriptor::to_one("owner", "Customer")),
//!     );
//!
//! assert_eq!(model.entities.len(), 2);
//! ```

pub mod class;
pub mod entity;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod property;

pub use class::ClassName;
pub use entity::{EntityMapping, IdentifierMapping, MappedSuperclassMapping};
pub use error::Error;
pub use hierarchy::ClassHierarchy;
pub use model::MappingModel;
pub use property::{
    CollectionDescriptor, CollectionElement, ComponentDescriptor, PropertyDescriptor,
    ValueDescriptor,
};
