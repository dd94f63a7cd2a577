//! The mapping model.

use crate::class::ClassName;
use crate::entity::{EntityMapping, MappedSuperclassMapping};
use crate::error::Error;
use crate::hierarchy::ClassHierarchy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// All entity mappings of one persistence unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingModel {
    /// Entity mappings in registration order.
    #[serde(default)]
    pub entities: Vec<EntityMapping>,
    /// Mapped-superclass mappings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mapped_superclasses: Vec<MappedSuperclassMapping>,
    /// Declared supertypes of non-standard classes (custom containers).
    #[serde(default, skip_serializing_if = "ClassHierarchy::is_empty")]
    pub hierarchy: ClassHierarchy,
}

impl MappingModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity mapping.
    pub fn with_entity(mut self, entity: EntityMapping) -> Self {
        self.entities.push(entity);
        self
    }

    /// Add a mapped-superclass mapping.
    pub fn with_mapped_superclass(mut self, mapped_superclass: MappedSuperclassMapping) -> Self {
        self.mapped_superclasses.push(mapped_superclass);
        self
    }

    /// Replace the class hierarchy.
    pub fn with_hierarchy(mut self, hierarchy: ClassHierarchy) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    /// Get an entity mapping by class.
    pub fn get_entity(&self, class: &str) -> Option<&EntityMapping> {
        self.entities.iter().find(|e| e.class == class)
    }

    /// Get a mapped-superclass mapping by class.
    pub fn get_mapped_superclass(&self, class: &str) -> Option<&MappedSuperclassMapping> {
        self.mapped_superclasses.iter().find(|m| m.class == class)
    }

    /// Whether some entity or mapped superclass names `class` as its superclass.
    pub fn is_extended(&self, class: &str) -> bool {
        self.entities
            .iter()
            .filter_map(|e| e.superclass.as_ref())
            .chain(self.mapped_superclasses.iter().filter_map(|m| m.superclass.as_ref()))
            .any(|superclass| superclass == class)
    }

    /// List all mapped entity classes.
    pub fn classes(&self) -> Vec<&ClassName> {
        self.entities.iter().map(|e| &e.class).collect()
    }

    /// Parse a model from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Render the model as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Load a model from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{CollectionDescriptor, ComponentDescriptor, PropertyDescriptor};

    fn sample_model() -> MappingModel {
        let address = ComponentDescriptor::new("Address")
            .with_property(PropertyDescriptor::basic("street", "String"))
            .with_property(PropertyDescriptor::to_one("state", "State"));

        let person = EntityMapping::new("Person", "Person")
            .with_id(PropertyDescriptor::basic("id", "Long"))
            .with_property(PropertyDescriptor::embedded("address", address))
            .with_property(PropertyDescriptor::collection(
                "nicknames",
                CollectionDescriptor::element_collection("TagBag", crate::ValueDescriptor::basic("String")),
            ));

        let state = EntityMapping::new("State", "State")
            .with_id(PropertyDescriptor::basic("code", "String"));

        MappingModel::new()
            .with_entity(person)
            .with_entity(state)
            .with_hierarchy(ClassHierarchy::new().with_supertype("TagBag", "HashSet"))
    }

    #[test]
    fn test_model_lookup() {
        let model = sample_model();

        assert!(model.get_entity("Person").is_some());
        assert!(model.get_entity("Address").is_none());
        assert_eq!(model.classes().len(), 2);
    }

    #[test]
    fn test_mapped_superclass_lookup() {
        let model = sample_model()
            .with_mapped_superclass(
                MappedSuperclassMapping::new("BaseEntity").with_id(PropertyDescriptor::basic("id", "Long")),
            )
            .with_mapped_superclass(MappedSuperclassMapping::new("Auditable"))
            .with_entity(EntityMapping::new("Invoice", "Invoice").extends("BaseEntity"));

        assert!(model.get_mapped_superclass("BaseEntity").is_some());
        assert!(model.get_entity("BaseEntity").is_none());
        assert!(model.is_extended("BaseEntity"));
        assert!(!model.is_extended("Auditable"));

        let decoded = MappingModel::from_json(&model.to_json().unwrap()).unwrap();
        assert_eq!(decoded.mapped_superclasses.len(), 2);
    }

    #[test]
    fn test_json_roundtrip() {
        let model = sample_model();
        let json = model.to_json().unwrap();
        let decoded = MappingModel::from_json(&json).unwrap();

        assert_eq!(model, decoded);
        assert!(decoded.hierarchy.is_assignable("TagBag", "Set"));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.json");
        std::fs::write(&path, sample_model().to_json().unwrap()).unwrap();

        let loaded = MappingModel::from_path(&path).unwrap();
        assert_eq!(loaded.entities.len(), 2);

        let missing = MappingModel::from_path(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }

    #[test]
    fn test_invalid_json() {
        let result = MappingModel::from_json("{ \"entities\": 3 }");
        assert!(matches!(result, Err(Error::Deserialization(_))));
    }
}
