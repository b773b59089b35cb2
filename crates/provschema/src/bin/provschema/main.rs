mod cli;

use provschema::definition::SchemaDocument;
use provschema::diag::Diagnostics;
use provschema::hcl_documents::HclDocuments;
use provschema::path::Path;
use provschema::types::Type;
use provschema::validator::Validator;
use provschema::walk::{walk_path, PathTarget};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("PROVSCHEMA_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Validate(validate_cli) => validate(validate_cli),
        cli::Command::Type(type_cli) => types(type_cli),
        cli::Command::Resolve(resolve_cli) => resolve(resolve_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

#[derive(serde::Serialize)]
struct SchemaReport {
    schema: String,
    diagnostics: Diagnostics,
}

pub fn validate(cli: cli::ValidateCommand) -> anyhow::Result<()> {
    let (_documents, schemas) = load_schemas(&cli.input)?;

    let mut reports = Vec::new();
    let mut errors = 0;
    let mut warnings = 0;

    for (key, schema) in schemas.schemas() {
        let mut diagnostics = schema.validate();
        diagnostics.append(schema.validate_implementation());
        diagnostics.append(schema.validate_definitions());

        errors += diagnostics.errors().count();
        warnings += diagnostics.warnings().count();
        tracing::debug!(schema = %key, count = diagnostics.len(), "schema validated");

        reports.push(SchemaReport {
            schema: key.to_string(),
            diagnostics,
        });
    }

    output(&cli.output, &reports)?;

    let failed = errors > 0 || (cli.deny_warnings && warnings > 0);
    anyhow::ensure!(
        !failed,
        "Validation failed: {errors} error(s), {warnings} warning(s) in {} schema(s)",
        reports.len()
    );
    Ok(())
}

#[derive(serde::Serialize)]
struct TypeReport {
    schema: String,
    #[serde(rename = "type")]
    ty: Type,
}

pub fn types(cli: cli::TypeCommand) -> anyhow::Result<()> {
    let (_documents, schemas) = load_schemas(&cli.input)?;

    let reports: Vec<TypeReport> = match &cli.schema {
        Some(reference) => {
            let (key, schema) = schemas.find(reference)?;
            vec![TypeReport {
                schema: key.to_string(),
                ty: schema.type_of(),
            }]
        }
        None => schemas
            .schemas()
            .map(|(key, schema)| TypeReport {
                schema: key.to_string(),
                ty: schema.type_of(),
            })
            .collect(),
    };

    output(&cli.output, &reports)
}

#[derive(serde::Serialize)]
struct Resolution {
    schema: String,
    path: Path,
    target: &'static str,
    #[serde(rename = "type")]
    ty: Type,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<AttributeSummary>,
}

#[derive(serde::Serialize)]
struct AttributeSummary {
    required: bool,
    optional: bool,
    computed: bool,
    sensitive: bool,
    write_only: bool,
    description: String,
    deprecation_message: String,
    validators: Vec<String>,
}

pub fn resolve(cli: cli::ResolveCommand) -> anyhow::Result<()> {
    let (_documents, schemas) = load_schemas(&cli.input)?;
    let (key, schema) = schemas.find(&cli.schema)?;
    let path: Path = cli.path.parse()?;

    let target = walk_path(PathTarget::Schema(schema), &path)?;
    let attribute = schema
        .lookup_attribute(&path)
        .ok()
        .map(|attribute| AttributeSummary {
            required: attribute.is_required(),
            optional: attribute.is_optional(),
            computed: attribute.is_computed(),
            sensitive: attribute.is_sensitive(),
            write_only: attribute.is_write_only(),
            description: attribute.description().to_string(),
            deprecation_message: attribute.deprecation_message().to_string(),
            validators: attribute
                .validators()
                .iter()
                .map(|validator| validator.description())
                .collect(),
        });

    let resolution = Resolution {
        schema: key.to_string(),
        path,
        target: target.kind_name(),
        ty: target.type_of(),
        attribute,
    };

    output(&cli.output, &resolution)
}

fn load(input: &cli::InputArgs) -> anyhow::Result<HclDocuments> {
    if !input.workdir && input.files.is_empty() && input.directories.is_empty() {
        let stdin = std::io::read_to_string(std::io::stdin())?;
        let body = hcl_edit::parser::parse_body(&stdin)?;
        return Ok(body.into());
    }

    let mut documents = HclDocuments::default();

    if input.workdir {
        documents.load_directory(&std::env::current_dir()?)?;
    }

    for file_path in &input.files {
        documents.load_file(file_path)?;
    }

    for dir_path in &input.directories {
        documents.load_directory(dir_path)?;
    }

    anyhow::ensure!(documents.source_count() > 0, "No files loaded");

    Ok(documents)
}

fn load_schemas(input: &cli::InputArgs) -> anyhow::Result<(HclDocuments, SchemaDocument)> {
    let documents = load(input)?;

    let schemas = match SchemaDocument::new(&documents) {
        Ok(schemas) => schemas,
        Err(errors) => {
            for issue in errors.issues() {
                match issue.root_block() {
                    Some(index) => eprintln!("{}: {issue}", documents.describe_block(index)),
                    None => eprintln!("{issue}"),
                }
            }
            return Err(errors.into());
        }
    };

    tracing::info!(count = schemas.len(), "schemas loaded");
    Ok((documents, schemas))
}

fn output<T: serde::Serialize + ?Sized>(output: &cli::OutputArgs, value: &T) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), value)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), value)?,
    };

    Ok(())
}

/// (provschema-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    use cli::DevSubCommand::*;

    let documents = load(&cli.input)?;

    match cli.command {
        Documents => println!("{documents:#?}"),
        Schemas => {
            let schemas = SchemaDocument::new(&documents)?;
            println!("{schemas:#?}")
        }
    }

    Ok(())
}
