//! collection of schema definition documents ([Body] and path to source file)
//!
//! [HclDocuments] keeps the root structures of every loaded document in load order and remembers
//! which file each came from. Root blocks and root attributes get a numeric index that stays
//! stable once assigned; definition issues refer to structures by that index.
use hcl_edit::structure::{Attribute, Block, Body, Structure};
use std::path::{Path, PathBuf};

/// File name suffix of schema definition documents
pub const SCHEMA_FILE_SUFFIX: &str = ".schema.hcl";

#[derive(Default, Debug)]
pub struct HclDocuments {
    sources: Vec<Source>,
    root_attributes: Vec<(usize, Attribute)>,
    root_blocks: Vec<(usize, Block)>,
}

impl HclDocuments {
    /// Inserts and indexes a document
    pub fn insert(&mut self, document: Body, path: impl Into<Option<PathBuf>>) {
        let source_index = self.sources.len();
        self.sources.push(path.into());

        for structure in document {
            match structure {
                Structure::Block(block) => self.root_blocks.push((source_index, block)),
                Structure::Attribute(attribute) => {
                    self.root_attributes.push((source_index, attribute))
                }
            }
        }
    }

    pub fn get_attribute(&self, index: usize) -> Option<SourceAttribute> {
        let (source_index, attribute) = self.root_attributes.get(index)?;
        Some((index, &self.sources[*source_index], attribute))
    }

    pub fn attributes(&self) -> impl Iterator<Item = SourceAttribute> {
        self.root_attributes
            .iter()
            .enumerate()
            .map(|(index, (source_index, attribute))| {
                (index, &self.sources[*source_index], attribute)
            })
    }

    pub fn get_block(&self, index: usize) -> Option<SourceBlock> {
        let (source_index, block) = self.root_blocks.get(index)?;
        Some((index, &self.sources[*source_index], block))
    }

    pub fn blocks(&self) -> impl Iterator<Item = SourceBlock> {
        self.root_blocks
            .iter()
            .enumerate()
            .map(|(index, (source_index, block))| (index, &self.sources[*source_index], block))
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Human readable location of a root block, e.g. `network.schema.hcl: schema "resource" "vpc"`
    pub fn describe_block(&self, index: usize) -> String {
        let Some((_, source, block)) = self.get_block(index) else {
            return format!("root block #{index}");
        };

        let mut description = block.ident.value().as_str().to_string();
        for label in &block.labels {
            description.push_str(&format!(" {:?}", label.as_str()));
        }

        match source {
            Some(path) => format!("{}: {description}", path.display()),
            None => description,
        }
    }
}

impl HclDocuments {
    pub fn load_file(&mut self, file_path: &Path) -> Result<(), LoadError> {
        let file_path = file_path.canonicalize()?;
        tracing::info!(path=%file_path.display(), "loading file");

        let file_contents = std::fs::read_to_string(&file_path)?;
        let body = hcl_edit::parser::parse_body(&file_contents).map_err(|source| {
            LoadError::HclParseFailed {
                path: file_path.clone(),
                source,
            }
        })?;

        self.insert(body, Some(file_path));
        Ok(())
    }

    /// Loads every `*.schema.hcl` file in `dir_path`, ordered by file name
    pub fn load_directory(&mut self, dir_path: &Path) -> Result<(), LoadError> {
        let mut file_paths = Vec::new();

        for dir_entry in std::fs::read_dir(dir_path)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }

            let is_schema_file = dir_entry
                .file_name()
                .to_string_lossy()
                .ends_with(SCHEMA_FILE_SUFFIX);
            if is_schema_file {
                file_paths.push(dir_entry.path());
            }
        }

        if file_paths.is_empty() {
            return Err(LoadError::NoFilesFound(dir_path.to_path_buf()));
        }

        file_paths.sort();
        for file_path in &file_paths {
            self.load_file(file_path)?;
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("No *.schema.hcl files found in {}", .0.display())]
    NoFilesFound(PathBuf),
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Unable to parse hcl file {}", .path.display())]
    HclParseFailed {
        path: PathBuf,
        source: hcl_edit::parser::Error,
    },
}

impl From<Body> for HclDocuments {
    fn from(value: Body) -> Self {
        let mut documents = HclDocuments::default();
        documents.insert(value, None);
        documents
    }
}

/// Builds [HclDocuments] from inline sources, mostly for tests
///
/// One anonymous document
/// ```
/// # use provschema::hcl_documents;
/// hcl_documents!(r#"schema "resource" "instance" {}"#);
/// ```
///
/// Several documents, each with the file name it pretends to come from
/// ```
/// # use provschema::hcl_documents;
/// hcl_documents! {
///   "provider.schema.hcl" => r#"schema "provider" "cloud" {}"#,
///   "instance.schema.hcl" => r#"schema "resource" "instance" {}"#
/// };
/// ```
///
/// # Panic
/// Panics when a source is not valid HCL
///
/// ```should_panic
/// # use provschema::hcl_documents;
/// hcl_documents!("not = valid = hcl");
/// ```
#[macro_export]
macro_rules! hcl_documents {
    // anonymous
    { $expr:expr } => {
        $crate::hcl_documents::HclDocuments::from(hcl_edit::parser::parse_body($expr).expect("body must parse"))
    };
    // named
    { $($source:expr => $expr:expr),+ } => {{
        let mut documents = $crate::hcl_documents::HclDocuments::default();
        $(
            documents.insert(hcl_edit::parser::parse_body($expr).expect("body must parse"), Some($source.into()));
        )+

        documents
    }};
}

pub type Source = Option<PathBuf>;
pub type SourceAttribute<'a> = (usize, &'a Source, &'a Attribute);
pub type SourceBlock<'a> = (usize, &'a Source, &'a Block);
