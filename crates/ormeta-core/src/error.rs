//! Core error types.

use ormeta_mapping::ClassName;
use std::fmt;
use thiserror::Error;

use crate::metamodel::CollectionType;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Mapping shapes the metamodel does not represent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedFeature {
    /// Any-typed (runtime-polymorphic) associations, or collections of them.
    Any,
    /// Array-valued collections.
    Array,
    /// A collection used directly as the element or key of another collection.
    NestedCollection,
    /// A container that is not assignable to any standard collection interface.
    ContainerType(ClassName),
}

impl UnsupportedFeature {
    /// Whether the feature may be skipped under
    /// [`UnsupportedFeaturePolicy::Ignore`](crate::UnsupportedFeaturePolicy::Ignore).
    pub fn is_ignorable(&self) -> bool {
        matches!(self, UnsupportedFeature::Any | UnsupportedFeature::Array)
    }
}

impl fmt::Display for UnsupportedFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedFeature::Any => write!(f, "any-typed association"),
            UnsupportedFeature::Array => write!(f, "array-valued collection"),
            UnsupportedFeature::NestedCollection => write!(f, "nested collection"),
            UnsupportedFeature::ContainerType(container) => {
                write!(f, "unrecognized container type `{}`", container)
            }
        }
    }
}

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The mapping uses a shape the metamodel cannot represent. Aborts the build.
    Unsupported,
    /// The mapping model is inconsistent. Aborts the build.
    Mapping,
    /// A lookup on the finished metamodel was used incorrectly.
    Contract,
}

/// Metamodel errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Unsupported mapping shape.
    #[error("unsupported mapping of {owner}.{attribute}: {feature}")]
    Unsupported {
        owner: ClassName,
        attribute: String,
        feature: UnsupportedFeature,
    },

    /// Mapping document could not be loaded.
    #[error("mapping document error: {0}")]
    Document(#[from] ormeta_mapping::Error),

    /// The same class is mapped twice.
    #[error("class {0} is mapped more than once")]
    DuplicateEntity(ClassName),

    /// Two classes share an entity name.
    #[error("entity name {0} is used by more than one class")]
    DuplicateEntityName(String),

    /// Two attributes of one type share a name.
    #[error("attribute {owner}.{attribute} is declared more than once")]
    DuplicateAttribute { owner: ClassName, attribute: String },

    /// A reference targets a class that is not a mapped entity.
    #[error("class {0} is referenced as an entity but is not mapped")]
    UnresolvedEntity(ClassName),

    /// Both a single identifier and id-class attributes were applied.
    #[error("entity {0} declares both a single identifier and id-class attributes")]
    ConflictingIdentifier(ClassName),

    /// An entity neither declares nor inherits an identifier.
    #[error("entity {0} has no identifier and no supertype to inherit one from")]
    MissingIdentifier(ClassName),

    /// An identifier or version property is collection-valued.
    #[error("identifier or version attribute {owner}.{attribute} must not be plural")]
    PluralIdentifier { owner: ClassName, attribute: String },

    /// A map container without a key descriptor.
    #[error("map attribute {owner}.{attribute} has no key")]
    MissingMapKey { owner: ClassName, attribute: String },

    /// A plural attribute was assembled inconsistently.
    #[error("invalid plural attribute {attribute}: {reason}")]
    InvalidPluralAttribute {
        attribute: String,
        reason: &'static str,
    },

    /// A supertype chain loops back on itself.
    #[error("class {0} is its own supertype")]
    CyclicInheritance(ClassName),

    /// Class is not an entity of this metamodel.
    #[error("not an entity: {0}")]
    NotAnEntity(ClassName),

    /// No entity carries this name.
    #[error("unknown entity name: {0}")]
    UnknownEntityName(String),

    /// Class is not an embeddable of this metamodel.
    #[error("not an embeddable: {0}")]
    NotAnEmbeddable(ClassName),

    /// Class is not a mapped superclass of this metamodel.
    #[error("not a mapped superclass: {0}")]
    NotAMappedSuperclass(ClassName),

    /// Class is not a managed type of this metamodel.
    #[error("not a managed type: {0}")]
    NotAManagedType(ClassName),

    /// No attribute with this name.
    #[error("unable to locate attribute {attribute} on {owner}")]
    AttributeNotFound { owner: ClassName, attribute: String },

    /// The attribute exists with a different type.
    #[error("attribute {owner}.{attribute} is of type {actual}, not {expected}")]
    AttributeTypeMismatch {
        owner: ClassName,
        attribute: String,
        expected: ClassName,
        actual: ClassName,
    },

    /// A singular accessor was used on a plural attribute.
    #[error("attribute {owner}.{attribute} is plural")]
    NotSingular { owner: ClassName, attribute: String },

    /// A plural accessor was used on a singular attribute.
    #[error("attribute {owner}.{attribute} is singular")]
    NotPlural { owner: ClassName, attribute: String },

    /// A plural accessor of the wrong collection type.
    #[error("attribute {owner}.{attribute} is a {actual:?}, not a {expected:?}")]
    CollectionTypeMismatch {
        owner: ClassName,
        attribute: String,
        expected: CollectionType,
        actual: CollectionType,
    },

    /// The single-id accessor was used on an id-class entity.
    #[error("entity {0} has id-class attributes, not a single identifier attribute")]
    IdClassIdentifier(ClassName),

    /// The id-class accessor was used on a single-id entity.
    #[error("entity {0} has a single identifier attribute, not id-class attributes")]
    SingleIdentifier(ClassName),

    /// The type does not declare an identifier itself.
    #[error("entity {0} does not declare an identifier")]
    IdentifierNotDeclared(ClassName),

    /// The entity hierarchy has no version attribute.
    #[error("entity {0} is not versioned")]
    NotVersioned(ClassName),

    /// The type does not declare a version attribute itself.
    #[error("entity {0} does not declare a version attribute")]
    VersionNotDeclared(ClassName),
}

impl Error {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Unsupported { .. } => ErrorKind::Unsupported,
            Error::Document(_)
            | Error::DuplicateEntity(_)
            | Error::DuplicateEntityName(_)
            | Error::DuplicateAttribute { .. }
            | Error::UnresolvedEntity(_)
            | Error::ConflictingIdentifier(_)
            | Error::MissingIdentifier(_)
            | Error::PluralIdentifier { .. }
            | Error::MissingMapKey { .. }
            | Error::InvalidPluralAttribute { .. }
            | Error::CyclicInheritance(_) => ErrorKind::Mapping,
            Error::NotAnEntity(_)
            | Error::UnknownEntityName(_)
            | Error::NotAnEmbeddable(_)
            | Error::NotAMappedSuperclass(_)
            | Error::NotAManagedType(_)
            | Error::AttributeNotFound { .. }
            | Error::AttributeTypeMismatch { .. }
            | Error::NotSingular { .. }
            | Error::NotPlural { .. }
            | Error::CollectionTypeMismatch { .. }
            | Error::IdClassIdentifier(_)
            | Error::SingleIdentifier(_)
            | Error::IdentifierNotDeclared(_)
            | Error::NotVersioned(_)
            | Error::VersionNotDeclared(_) => ErrorKind::Contract,
        }
    }
}
