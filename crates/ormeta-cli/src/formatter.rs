//! Output formatters for metamodels.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use ormeta_core::{
    Attribute, EntityRef, IdentifiableType, Metamodel, MetamodelSnapshot, PluralAttribute,
    SupertypeRef,
};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format a whole metamodel.
    fn format_metamodel(&self, metamodel: &Metamodel) -> String;

    /// Format one entity type, including inherited attributes.
    fn format_entity(&self, metamodel: &Metamodel, entity: EntityRef<'_>) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_metamodel(&self, metamodel: &Metamodel) -> String {
        let mut table = Table::new();
        table.set_header(vec![
            "Entity",
            "Class",
            "Supertype",
            "Identifier",
            "Version",
            "Attributes",
        ]);

        for entity in metamodel.entities() {
            table.add_row(vec![
                Cell::new(entity.name()),
                Cell::new(entity.java_type()),
                Cell::new(
                    entity
                        .supertype()
                        .map(describe_supertype)
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(describe_identifier(&entity)),
                Cell::new(
                    entity
                        .declared_version_attribute()
                        .map(|v| v.name().to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(entity.declared_attributes().len()),
            ]);
        }

        let mut output = table.to_string();

        if metamodel.mapped_superclass_count() > 0 {
            let mut mapped = Table::new();
            mapped.set_header(vec!["Mapped superclass", "Supertype", "Identifier", "Attributes"]);
            for mapped_superclass in metamodel.mapped_superclasses() {
                mapped.add_row(vec![
                    Cell::new(mapped_superclass.java_type()),
                    Cell::new(
                        mapped_superclass
                            .supertype_handle()
                            .map(|h| h.class().to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    Cell::new(describe_identifier(mapped_superclass)),
                    Cell::new(mapped_superclass.declared_attributes().len()),
                ]);
            }
            output = format!("{}\n\n{}", output, mapped);
        }

        if metamodel.embeddable_count() == 0 {
            return output;
        }

        let mut embeddables = Table::new();
        embeddables.set_header(vec!["Embeddable", "Id", "Attributes"]);
        for embeddable in metamodel.embeddables() {
            embeddables.add_row(vec![
                Cell::new(embeddable.java_type()),
                Cell::new(embeddable.embeddable_id().index()),
                Cell::new(embeddable.declared_attributes().len()),
            ]);
        }

        format!("{}\n\n{}", output, embeddables)
    }

    fn format_entity(&self, _metamodel: &Metamodel, entity: EntityRef<'_>) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Attribute", "Kind", "Type", "Collection", "Flags"]);

        for attribute in entity.attributes() {
            table.add_row(vec![
                Cell::new(attribute.name()),
                Cell::new(attribute.kind()),
                Cell::new(attribute.element_type()),
                Cell::new(
                    attribute
                        .as_plural()
                        .map(describe_collection)
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(describe_flags(attribute)),
            ]);
        }

        format!("{} ({})\n{}", entity.name(), entity.java_type(), table)
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_metamodel(&self, metamodel: &Metamodel) -> String {
        metamodel
            .snapshot()
            .to_json()
            .unwrap_or_else(|_| "{}".to_string())
    }

    fn format_entity(&self, metamodel: &Metamodel, entity: EntityRef<'_>) -> String {
        let MetamodelSnapshot { entities, .. } = metamodel.snapshot();
        entities
            .into_iter()
            .find(|e| e.class == *entity.java_type())
            .and_then(|e| serde_json::to_string_pretty(&e).ok())
            .unwrap_or_else(|| "{}".to_string())
    }
}

fn describe_supertype(supertype: SupertypeRef<'_>) -> String {
    match supertype.as_entity() {
        Some(entity) => entity.name().to_string(),
        None => format!("{} (mapped)", supertype.java_type()),
    }
}

fn describe_identifier(identifiable: &IdentifiableType) -> String {
    if let Some(id) = identifiable.declared_id_attribute() {
        return id.name().to_string();
    }
    if let Some(attributes) = identifiable.declared_id_class_attributes() {
        let names: Vec<_> = attributes.iter().map(|a| a.name()).collect();
        return format!("({})", names.join(", "));
    }
    "inherited".to_string()
}

fn describe_collection(attribute: &PluralAttribute) -> String {
    match attribute.key_type() {
        Some(key) => format!("{:?}<{}>", attribute.collection_type(), key.java_type()),
        None => format!("{:?}", attribute.collection_type()),
    }
}

fn describe_flags(attribute: &Attribute) -> String {
    let Some(singular) = attribute.as_singular() else {
        return String::new();
    };
    let mut flags = Vec::new();
    if singular.is_id() {
        flags.push("id");
    }
    if singular.is_version() {
        flags.push("version");
    }
    if !singular.is_optional() {
        flags.push("required");
    }
    flags.join(", ")
}
