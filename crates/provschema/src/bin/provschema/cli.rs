//! provschema cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if started in <directory>
    ///
    /// Repeated options are applied in order, relative to each other,
    /// the same way `git -C` behaves.
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check schema names, implementation and attribute definitions
    ///
    /// Without -w, -f or -d the schema documents are read from stdin
    Validate(ValidateCommand),

    /// Print the type description of schemas
    Type(TypeCommand),

    /// Resolve a path inside a schema
    ///
    /// Paths are written like HCL traversals: disk[0].labels["env"]
    Resolve(ResolveCommand),

    /// Dump internal structures
    Dev(DevCommand),
}

#[derive(Parser, Debug)]
pub struct ValidateCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    /// Fail on warnings too
    #[clap(long = "deny-warnings")]
    pub deny_warnings: bool,
}

#[derive(Parser, Debug)]
pub struct TypeCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    /// Only this schema, as <domain>.<name> or <name>
    pub schema: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ResolveCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    /// Schema to resolve in, as <domain>.<name> or <name>
    pub schema: String,

    /// Path to resolve, empty for the schema itself
    #[clap(default_value = "")]
    pub path: String,
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Load *.schema.hcl files from work directory
    #[clap(short = 'w', long = "input-workdir")]
    pub workdir: bool,

    /// Schema document to load, can be repeated
    #[clap(short = 'f', long = "input-file")]
    pub files: Vec<PathBuf>,

    /// Load *.schema.hcl files from given directory
    #[clap(short = 'd', long = "input-dir")]
    pub directories: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

#[derive(Parser, Debug)]
pub struct DevCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[command(subcommand)]
    pub command: DevSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum DevSubCommand {
    /// Loaded documents and their root structures
    Documents,
    /// Schemas read from the documents
    Schemas,
}
