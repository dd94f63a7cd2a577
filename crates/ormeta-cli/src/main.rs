//! ormeta command-line tool
//!
//! Builds the metamodel of a JSON mapping document and prints it.

mod formatter;

use clap::Parser;
use formatter::{create_formatter, OutputFormat};
use ormeta_core::{EntityRef, Metamodel, MetamodelConfig, UnsupportedFeaturePolicy};
use ormeta_mapping::MappingModel;
use std::path::PathBuf;
use tracing::info;

/// ormeta metamodel inspector
#[derive(Parser, Debug)]
#[command(name = "ormeta")]
#[command(version, about = "Build and inspect the metamodel of a mapping document")]
pub struct Args {
    /// Mapping document (JSON)
    pub mapping: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Only show one entity, by entity name or class
    #[arg(short, long)]
    pub entity: Option<String>,

    /// Skip any-typed and array attributes instead of failing
    #[arg(long)]
    pub ignore_unsupported: bool,

    /// Include synthetic properties (backrefs, index columns)
    #[arg(long)]
    pub include_synthetic: bool,
}

impl Args {
    fn config(&self) -> MetamodelConfig {
        let policy = if self.ignore_unsupported {
            UnsupportedFeaturePolicy::Ignore
        } else {
            UnsupportedFeaturePolicy::Fail
        };
        MetamodelConfig::new()
            .unsupported(policy)
            .include_synthetic(self.include_synthetic)
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ormeta_cli=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let model = MappingModel::from_path(&args.mapping)?;
    info!(
        path = %args.mapping.display(),
        entities = model.entities.len(),
        "loaded mapping document"
    );

    let metamodel = Metamodel::build(&model, &args.config())?;
    let formatter = create_formatter(args.format);

    let output = match &args.entity {
        Some(name) => formatter.format_entity(&metamodel, find_entity(&metamodel, name)?),
        None => formatter.format_metamodel(&metamodel),
    };
    println!("{}", output);
    Ok(())
}

/// Look an entity up by entity name, then by class.
fn find_entity<'m>(metamodel: &'m Metamodel, name: &str) -> ormeta_core::Result<EntityRef<'m>> {
    metamodel
        .entity_by_name(name)
        .or_else(|_| metamodel.entity(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ormeta_mapping::{EntityMapping, PropertyDescriptor};

    #[test]
    fn test_args_config() {
        let args = Args::parse_from(["ormeta", "mapping.json", "--ignore-unsupported", "--format", "json"]);
        assert_eq!(args.format, OutputFormat::Json);

        let config = args.config();
        assert_eq!(config.unsupported, UnsupportedFeaturePolicy::Ignore);
        assert!(!config.include_synthetic);
    }

    #[test]
    fn test_run_with_mapping_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.json");
        let model = MappingModel::new().with_entity(
            EntityMapping::new("com.acme.Note", "Note").with_id(PropertyDescriptor::basic("id", "Long")),
        );
        std::fs::write(&path, model.to_json().unwrap()).unwrap();

        let path = path.to_str().unwrap();
        let args = Args::parse_from(["ormeta", path, "--entity", "Note"]);
        assert!(run(args).is_ok());

        let args = Args::parse_from(["ormeta", path, "--entity", "Missing"]);
        assert!(run(args).is_err());
    }

    #[test]
    fn test_find_entity_by_name_or_class() {
        let model = MappingModel::new().with_entity(
            EntityMapping::new("com.acme.Note", "Note").with_id(PropertyDescriptor::basic("id", "Long")),
        );
        let metamodel = Metamodel::build(&model, &MetamodelConfig::default()).unwrap();

        assert!(find_entity(&metamodel, "Note").is_ok());
        assert!(find_entity(&metamodel, "com.acme.Note").is_ok());
        assert!(matches!(
            find_entity(&metamodel, "Memo"),
            Err(ormeta_core::Error::NotAnEntity(_))
        ));
    }
}
