//! Property and value descriptors.

use crate::class::ClassName;
use serde::{Deserialize, Serialize};

/// One declared property of a mapped class or component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name (unique within its owner).
    pub name: String,
    /// Persistence shape of the property value.
    pub value: ValueDescriptor,
    /// Whether the value may be absent.
    #[serde(default = "default_optional")]
    pub optional: bool,
    /// Whether the property was fabricated by the mapping layer
    /// (backrefs, index columns) rather than declared on the class.
    #[serde(default)]
    pub synthetic: bool,
}

fn default_optional() -> bool {
    true
}

/// The persistence shape of a property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueDescriptor {
    /// A single value of a basic type.
    Basic {
        /// Java type of the value.
        java_type: ClassName,
    },
    /// A composite value of an embeddable class.
    Component(ComponentDescriptor),
    /// A to-one association with another entity.
    ToOne {
        /// Target entity class.
        target: ClassName,
        /// Whether the foreign key is unique (one-to-one).
        #[serde(default)]
        unique: bool,
    },
    /// A polymorphic association whose target is chosen at runtime.
    Any {
        /// Java type of the identifier column.
        id_type: ClassName,
    },
    /// A collection of values or associations.
    Collection(CollectionDescriptor),
}

/// A composite (embeddable) value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Embeddable class.
    pub class: ClassName,
    /// Sub-properties in declaration order.
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

/// A collection-valued property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDescriptor {
    /// Declared container interface, e.g. `Set` or `List`.
    pub container: ClassName,
    /// How the elements are stored.
    pub element: CollectionElement,
    /// Map key, for map containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Box<ValueDescriptor>>,
}

/// Element storage of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "storage", rename_all = "snake_case")]
pub enum CollectionElement {
    /// One-to-many through a foreign key on the target table (no join table).
    ForeignKey {
        /// Target entity class.
        target: ClassName,
    },
    /// Elements stored in a collection or join table.
    CollectionTable {
        /// Element value.
        value: Box<ValueDescriptor>,
    },
}

impl PropertyDescriptor {
    /// Create a property with an explicit value descriptor.
    pub fn new(name: impl Into<String>, value: ValueDescriptor) -> Self {
        Self {
            name: name.into(),
            value,
            optional: true,
            synthetic: false,
        }
    }

    /// Create a basic property.
    pub fn basic(name: impl Into<String>, java_type: impl Into<ClassName>) -> Self {
        Self::new(name, ValueDescriptor::basic(java_type))
    }

    /// Create a to-one association.
    pub fn to_one(name: impl Into<String>, target: impl Into<ClassName>) -> Self {
        Self::new(name, ValueDescriptor::to_one(target))
    }

    /// Create a one-to-one association (unique to-one).
    pub fn one_to_one(name: impl Into<String>, target: impl Into<ClassName>) -> Self {
        Self::new(
            name,
            ValueDescriptor::ToOne {
                target: target.into(),
                unique: true,
            },
        )
    }

    /// Create an embedded property.
    pub fn embedded(name: impl Into<String>, component: ComponentDescriptor) -> Self {
        Self::new(name, ValueDescriptor::Component(component))
    }

    /// Create a polymorphic (any-typed) association.
    pub fn any(name: impl Into<String>, id_type: impl Into<ClassName>) -> Self {
        Self::new(
            name,
            ValueDescriptor::Any {
                id_type: id_type.into(),
            },
        )
    }

    /// Create a collection-valued property.
    pub fn collection(name: impl Into<String>, collection: CollectionDescriptor) -> Self {
        Self::new(name, ValueDescriptor::Collection(collection))
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.optional = false;
        self
    }

    /// Mark as synthetic.
    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    /// The declared Java type of the property.
    ///
    /// For collections this is the container, for associations the target
    /// entity, for components the embeddable class.
    pub fn java_type(&self) -> &ClassName {
        self.value.java_type()
    }

    /// Whether the property is collection-valued.
    pub fn is_collection(&self) -> bool {
        matches!(self.value, ValueDescriptor::Collection(_))
    }
}

impl ValueDescriptor {
    /// Create a basic value.
    pub fn basic(java_type: impl Into<ClassName>) -> Self {
        ValueDescriptor::Basic {
            java_type: java_type.into(),
        }
    }

    /// Create a (non-unique) to-one association value.
    pub fn to_one(target: impl Into<ClassName>) -> Self {
        ValueDescriptor::ToOne {
            target: target.into(),
            unique: false,
        }
    }

    /// Create a component value.
    pub fn component(component: ComponentDescriptor) -> Self {
        ValueDescriptor::Component(component)
    }

    /// The Java type of the value.
    pub fn java_type(&self) -> &ClassName {
        match self {
            ValueDescriptor::Basic { java_type } => java_type,
            ValueDescriptor::Component(component) => &component.class,
            ValueDescriptor::ToOne { target, .. } => target,
            ValueDescriptor::Any { id_type } => id_type,
            ValueDescriptor::Collection(collection) => &collection.container,
        }
    }

    /// Whether this value is an association (to-one, any, or a collection of entities).
    pub fn is_association(&self) -> bool {
        match self {
            ValueDescriptor::ToOne { .. } | ValueDescriptor::Any { .. } => true,
            ValueDescriptor::Collection(collection) => collection.is_association(),
            ValueDescriptor::Basic { .. } | ValueDescriptor::Component(_) => false,
        }
    }

    /// Whether this value is composite.
    pub fn is_composite(&self) -> bool {
        matches!(self, ValueDescriptor::Component(_))
    }
}

impl ComponentDescriptor {
    /// Create an empty component descriptor.
    pub fn new(class: impl Into<ClassName>) -> Self {
        Self {
            class: class.into(),
            properties: Vec::new(),
        }
    }

    /// Add a sub-property.
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Add multiple sub-properties.
    pub fn with_properties(mut self, properties: impl IntoIterator<Item = PropertyDescriptor>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Get a sub-property by name.
    pub fn get_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl CollectionDescriptor {
    /// A collection of values stored in a collection table.
    pub fn element_collection(container: impl Into<ClassName>, element: ValueDescriptor) -> Self {
        Self {
            container: container.into(),
            element: CollectionElement::CollectionTable {
                value: Box::new(element),
            },
            key: None,
        }
    }

    /// A one-to-many association through a foreign key.
    pub fn one_to_many(container: impl Into<ClassName>, target: impl Into<ClassName>) -> Self {
        Self {
            container: container.into(),
            element: CollectionElement::ForeignKey {
                target: target.into(),
            },
            key: None,
        }
    }

    /// An association through a join table.
    pub fn many_to_many(container: impl Into<ClassName>, target: impl Into<ClassName>) -> Self {
        Self::element_collection(container, ValueDescriptor::to_one(target))
    }

    /// Set the map key.
    pub fn with_key(mut self, key: ValueDescriptor) -> Self {
        self.key = Some(Box::new(key));
        self
    }

    /// Whether the elements are entities.
    pub fn is_association(&self) -> bool {
        match &self.element {
            CollectionElement::ForeignKey { .. } => true,
            CollectionElement::CollectionTable { value } => value.is_association(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_builders() {
        let id = PropertyDescriptor::basic("id", "Long").required();
        assert_eq!(id.java_type(), "Long");
        assert!(!id.optional);
        assert!(!id.synthetic);

        let owner = PropertyDescriptor::one_to_one("owner", "Customer");
        assert!(owner.value.is_association());
        assert_eq!(owner.java_type(), "Customer");

        let backref = PropertyDescriptor::basic("_orders_backref", "Long").synthetic();
        assert!(backref.synthetic);
    }

    #[test]
    fn test_collection_shapes() {
        let tags = CollectionDescriptor::element_collection("Set", ValueDescriptor::basic("String"));
        assert!(!tags.is_association());

        let orders = CollectionDescriptor::one_to_many("List", "Order");
        assert!(orders.is_association());

        let groups = CollectionDescriptor::many_to_many("Set", "Group");
        assert!(groups.is_association());

        let prefs = CollectionDescriptor::element_collection("Map", ValueDescriptor::basic("String"))
            .with_key(ValueDescriptor::basic("String"));
        let property = PropertyDescriptor::collection("prefs", prefs);
        assert!(property.is_collection());
        assert_eq!(property.java_type(), "Map");
    }

    #[test]
    fn test_component_lookup() {
        let address = ComponentDescriptor::new("Address")
            .with_property(PropertyDescriptor::basic("street", "String"))
            .with_property(PropertyDescriptor::to_one("state", "State"));

        assert!(address.get_property("street").is_some());
        assert!(address.get_property("zip").is_none());
        assert!(ValueDescriptor::component(address).is_composite());
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "name": "tags",
            "value": {
                "kind": "collection",
                "container": "Set",
                "element": {
                    "storage": "collection_table",
                    "value": { "kind": "basic", "java_type": "String" }
                }
            }
        }"#;
        let property: PropertyDescriptor = serde_json::from_str(json).unwrap();

        assert!(property.optional);
        assert_eq!(
            property,
            PropertyDescriptor::collection(
                "tags",
                CollectionDescriptor::element_collection("Set", ValueDescriptor::basic("String")),
            )
        );
    }
}
