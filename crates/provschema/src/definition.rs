//! Schemas declared in HCL documents
//!
//! ```hcl
//! schema "resource" "compute_instance" {
//!   version     = 1
//!   description = "A virtual machine"
//!
//!   attribute "name" {
//!     type       = string
//!     required   = true
//!     validators = ["length between 1 and 63"]
//!   }
//!
//!   attribute "disk" {
//!     nesting  = list
//!     optional = true
//!
//!     attribute "size"   { type = int64 required = true }
//!     attribute "labels" { type = map(string) optional = true }
//!   }
//!
//!   block "network_interface" {
//!     nesting = set
//!
//!     attribute "subnet" { type = string required = true }
//!     block "access_config" {
//!       nesting = single
//!       attribute "nat_ip" { type = string computed = true }
//!     }
//!   }
//! }
//! ```
//!
//! Types are written as `bool`, `string`, `int32`, `int64`, `float32`, `float64`, `number`,
//! `dynamic`, `list(T)`, `set(T)`, `map(T)` and `object({ name = T })`. A bare `list`, `set`, `map`
//! or `object` declares an attribute without type information; the schema loads and
//! [Schema::validate_implementation] reports it.
//!
//! Reading never stops at the first problem, all issues are collected into [DefinitionErrors].
use crate::attribute::{Attribute, AttributeKind, NestedAttributeObject};
use crate::block::{Block, BlockNesting, NestedBlockObject};
use crate::domain::{SchemaDomain, UnknownDomain};
use crate::hcl_documents::HclDocuments;
use crate::path::Path;
use crate::schema::Schema;
use crate::types::Type;
use crate::util::ExpressionExt;
use crate::validator::{NamedValidator, ValidatorHandle};
use crate::value::object_key_to_string;
use hcl::Expression;
use indexmap::IndexMap;
use std::sync::Arc;

/// All schemas declared across a set of documents
#[derive(Debug, Default)]
pub struct SchemaDocument {
    schemas: IndexMap<SchemaKey, Schema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_new::new)]
pub struct SchemaKey {
    pub domain: SchemaDomain,
    pub name: String,
}

impl std::fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.domain, self.name)
    }
}

impl SchemaDocument {
    pub fn new(hcl_documents: &HclDocuments) -> Result<Self, DefinitionErrors> {
        let mut e = DefinitionErrors::new();
        let mut schemas = IndexMap::new();
        let mut origins: std::collections::HashMap<SchemaKey, usize> = Default::default();

        for (index, _source, _attribute) in hcl_documents.attributes() {
            e.log(Issue::RootAttribute(index));
        }

        for (index, _source, block) in hcl_documents.blocks() {
            if block.ident.value().as_str() != "schema" {
                e.log(Issue::UnknownBlockType(index));
                continue;
            }

            let [domain, name] = block.labels.as_slice() else {
                e.log(Issue::SchemaBlockLabels(index));
                continue;
            };

            let domain: SchemaDomain = match domain.as_str().parse() {
                Ok(domain) => domain,
                Err(error) => {
                    e.log(Issue::UnknownDomain {
                        block: index,
                        error,
                    });
                    continue;
                }
            };

            let key = SchemaKey::new(domain, name.as_str().to_string());
            if let Some(existing) = origins.get(&key) {
                e.log(Issue::SchemaCollision {
                    existing: *existing,
                    new: index,
                });
                continue;
            }

            tracing::debug!(schema = %key, "reading schema");
            let mut reader = Reader::new(index, &mut e);
            let schema = reader.schema(domain, &block.body);

            origins.insert(key.clone(), index);
            schemas.insert(key, schema);
        }

        if !e.issues.is_empty() {
            return Err(e);
        }

        Ok(Self { schemas })
    }

    pub fn schemas(&self) -> impl Iterator<Item = (&SchemaKey, &Schema)> {
        self.schemas.iter()
    }

    pub fn get(&self, domain: SchemaDomain, name: &str) -> Option<&Schema> {
        self.schemas.get(&SchemaKey::new(domain, name.to_string()))
    }

    /// Finds a schema by `<domain>.<name>` or, when unambiguous, by `<name>` alone
    pub fn find(&self, reference: &str) -> Result<(&SchemaKey, &Schema), SchemaLookupError> {
        if let Some((domain, name)) = reference.split_once('.') {
            let key = SchemaKey::new(domain.parse()?, name.to_string());
            return self
                .schemas
                .get_key_value(&key)
                .ok_or_else(|| SchemaLookupError::NotFound(reference.to_string()));
        }

        let mut candidates = self.schemas.iter().filter(|(key, _)| key.name == reference);
        match (candidates.next(), candidates.next()) {
            (Some(found), None) => Ok(found),
            (None, _) => Err(SchemaLookupError::NotFound(reference.to_string())),
            (Some(first), Some(second)) => {
                let candidates = [first, second]
                    .into_iter()
                    .chain(candidates)
                    .map(|(key, _)| key.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(SchemaLookupError::Ambiguous {
                    reference: reference.to_string(),
                    candidates,
                })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SchemaLookupError {
    #[error("No schema named {0:?}")]
    NotFound(String),
    #[error("Schema name {reference:?} is ambiguous, use one of: {candidates}")]
    Ambiguous {
        reference: String,
        candidates: String,
    },
    #[error(transparent)]
    UnknownDomain(#[from] UnknownDomain),
}

#[derive(derive_new::new, Debug)]
pub struct DefinitionErrors {
    #[new(default)]
    issues: Vec<Issue>,
}

impl DefinitionErrors {
    pub fn log(&mut self, issue: Issue) {
        tracing::trace!(?issue, "issue found");
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

impl std::error::Error for DefinitionErrors {}

impl std::fmt::Display for DefinitionErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} issue(s) in schema definitions", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n- {issue}")?;
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Issue {
    #[error("root attribute #{0} is not allowed, declare schemas with `schema \"<domain>\" \"<name>\" {{}}`")]
    RootAttribute(usize),
    #[error("root block #{0} is not a `schema` block")]
    UnknownBlockType(usize),
    #[error("schema block #{0} needs exactly two labels: domain and name")]
    SchemaBlockLabels(usize),
    #[error("schema block #{block}: {error}")]
    UnknownDomain { block: usize, error: UnknownDomain },
    #[error("schema block #{new} declares the same schema as block #{existing}")]
    SchemaCollision { existing: usize, new: usize },
    #[error("schema block #{block}{}: {problem}", location(.path))]
    Definition {
        block: usize,
        path: Path,
        problem: Problem,
    },
}

impl Issue {
    /// Index of the root block the issue was found in
    pub fn root_block(&self) -> Option<usize> {
        match self {
            Issue::RootAttribute(_) => None,
            Issue::UnknownBlockType(block)
            | Issue::SchemaBlockLabels(block)
            | Issue::UnknownDomain { block, .. }
            | Issue::SchemaCollision { new: block, .. }
            | Issue::Definition { block, .. } => Some(*block),
        }
    }
}

fn location(path: &Path) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at `{path}`")
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Problem {
    #[error("unknown argument `{0}`")]
    UnknownArgument(String),
    #[error("unknown block `{0}`")]
    UnknownBlock(String),
    #[error("`{0}` blocks take exactly one label")]
    LabelCount(&'static str),
    #[error("`{0}` is declared more than once")]
    Duplicate(String),
    #[error("one of `type` or `nesting` is required")]
    MissingType,
    #[error("`type` and `nesting` cannot be combined")]
    TypeWithNesting,
    #[error("child attributes require `nesting`")]
    ChildrenWithoutNesting,
    #[error("`nesting` is required")]
    MissingNesting,
    #[error("invalid nesting `{0}`, expected one of {1}")]
    InvalidNesting(String, &'static str),
    #[error("invalid type `{expression}`: {reason}")]
    InvalidType {
        expression: String,
        reason: &'static str,
    },
    #[error("`{0}` must be a boolean")]
    ExpectedBool(String),
    #[error("`{0}` must be a string")]
    ExpectedString(String),
    #[error("`{0}` must be an integer")]
    ExpectedInteger(String),
    #[error("`{0}` must be a list of strings")]
    ExpectedStringList(String),
}

/// Reads the body of one `schema` block, logging problems for it
struct Reader<'e> {
    block: usize,
    errors: &'e mut DefinitionErrors,
}

/// Settings shared by schemas, attributes and blocks
#[derive(Default)]
struct Common {
    description: Option<String>,
    markdown_description: Option<String>,
    deprecation_message: Option<String>,
    validators: Vec<ValidatorHandle>,
    custom_type: Option<Type>,
}

/// Child attributes and blocks of a body
#[derive(Default)]
struct Children {
    attributes: IndexMap<String, Attribute>,
    blocks: IndexMap<String, Block>,
}

impl<'e> Reader<'e> {
    fn new(block: usize, errors: &'e mut DefinitionErrors) -> Self {
        Self { block, errors }
    }

    fn problem(&mut self, path: &Path, problem: Problem) {
        self.errors.log(Issue::Definition {
            block: self.block,
            path: path.clone(),
            problem,
        });
    }

    fn schema(&mut self, domain: SchemaDomain, body: &hcl_edit::structure::Body) -> Schema {
        let path = Path::empty();
        let mut schema = Schema::for_domain(domain);
        let mut common = Common::default();

        for attribute in body.attributes() {
            let key = attribute.key.value().as_str();
            let expr = Expression::from(attribute.value.clone());

            match key {
                "version" => match expr {
                    Expression::Number(number) if number.as_i64().is_some() => {
                        schema = schema.with_version(number.as_i64().unwrap_or_default())
                    }
                    _ => self.problem(&path, Problem::ExpectedInteger(key.to_string())),
                },
                "validators" | "custom_type" => {
                    self.problem(&path, Problem::UnknownArgument(key.to_string()))
                }
                _ => self.common(&path, key, &expr, &mut common),
            }
        }

        let children = self.children(&path, body, true);
        for (name, attribute) in children.attributes {
            schema = schema.with_attribute(name, attribute);
        }
        for (name, block) in children.blocks {
            schema = schema.with_block(name, block);
        }

        if let Some(description) = common.description {
            schema = schema.with_description(description);
        }
        if let Some(description) = common.markdown_description {
            schema = schema.with_markdown_description(description);
        }
        if let Some(message) = common.deprecation_message {
            schema = schema.with_deprecation_message(message);
        }
        schema
    }

    /// Reads an argument every node understands, reports anything else as unknown
    fn common(&mut self, path: &Path, key: &str, expr: &Expression, common: &mut Common) {
        match key {
            "description" => common.description = self.string(path, key, expr),
            "markdown_description" => common.markdown_description = self.string(path, key, expr),
            "deprecation_message" => common.deprecation_message = self.string(path, key, expr),
            "validators" => match expr {
                Expression::Array(items) => {
                    for item in items {
                        match item {
                            Expression::String(description) => common
                                .validators
                                .push(Arc::new(NamedValidator::new(description.clone()))),
                            _ => {
                                self.problem(path, Problem::ExpectedStringList(key.to_string()));
                                break;
                            }
                        }
                    }
                }
                _ => self.problem(path, Problem::ExpectedStringList(key.to_string())),
            },
            "custom_type" => match parse_type(expr) {
                Ok(ty) => common.custom_type = Some(ty),
                Err(problem) => self.problem(path, problem),
            },
            other => self.problem(path, Problem::UnknownArgument(other.to_string())),
        }
    }

    fn string(&mut self, path: &Path, key: &str, expr: &Expression) -> Option<String> {
        match expr {
            Expression::String(value) => Some(value.clone()),
            _ => {
                self.problem(path, Problem::ExpectedString(key.to_string()));
                None
            }
        }
    }

    fn flag(&mut self, path: &Path, key: &str, expr: &Expression) -> bool {
        match expr {
            Expression::Bool(value) => *value,
            _ => {
                self.problem(path, Problem::ExpectedBool(key.to_string()));
                false
            }
        }
    }

    fn children(
        &mut self,
        path: &Path,
        body: &hcl_edit::structure::Body,
        allow_blocks: bool,
    ) -> Children {
        let mut children = Children::default();

        for block in body.blocks() {
            let ident = block.ident.value().as_str();
            let kind = match ident {
                "attribute" => "attribute",
                "block" if allow_blocks => "block",
                other => {
                    self.problem(path, Problem::UnknownBlock(other.to_string()));
                    continue;
                }
            };

            let [label] = block.labels.as_slice() else {
                self.problem(path, Problem::LabelCount(kind));
                continue;
            };

            let name = label.as_str().to_string();
            if children.attributes.contains_key(&name) || children.blocks.contains_key(&name) {
                self.problem(path, Problem::Duplicate(name));
                continue;
            }

            let child_path = path.at_name(&name);
            if kind == "attribute" {
                if let Some(attribute) = self.attribute(&child_path, &block.body) {
                    children.attributes.insert(name, attribute);
                }
            } else if let Some(block) = self.block(&child_path, &block.body) {
                children.blocks.insert(name, block);
            }
        }

        children
    }

    fn attribute(&mut self, path: &Path, body: &hcl_edit::structure::Body) -> Option<Attribute> {
        let mut common = Common::default();
        let mut type_expr = None;
        let mut nesting = None;
        let mut flags = [false; 5];

        for attribute in body.attributes() {
            let key = attribute.key.value().as_str();
            let expr = Expression::from(attribute.value.clone());

            match key {
                "type" => type_expr = Some(expr),
                "nesting" => nesting = Some(expr),
                "required" => flags[0] = self.flag(path, key, &expr),
                "optional" => flags[1] = self.flag(path, key, &expr),
                "computed" => flags[2] = self.flag(path, key, &expr),
                "sensitive" => flags[3] = self.flag(path, key, &expr),
                "write_only" => flags[4] = self.flag(path, key, &expr),
                _ => self.common(path, key, &expr, &mut common),
            }
        }

        let children = self.children(path, body, false);

        let kind = match (type_expr, nesting) {
            (Some(_), Some(_)) => {
                self.problem(path, Problem::TypeWithNesting);
                return None;
            }
            (None, None) => {
                self.problem(path, Problem::MissingType);
                return None;
            }
            (Some(expr), None) => {
                if !children.attributes.is_empty() {
                    self.problem(path, Problem::ChildrenWithoutNesting);
                }
                match attribute_kind(&expr) {
                    Ok(kind) => kind,
                    Err(problem) => {
                        self.problem(path, problem);
                        return None;
                    }
                }
            }
            (None, Some(nesting)) => {
                let object = NestedAttributeObject::from_iter(children.attributes);
                match nesting.as_keyword() {
                    Some("single") => AttributeKind::SingleNested(object),
                    Some("list") => AttributeKind::ListNested(object),
                    Some("set") => AttributeKind::SetNested(object),
                    Some("map") => AttributeKind::MapNested(object),
                    _ => {
                        self.problem(
                            path,
                            Problem::InvalidNesting(nesting.to_string(), "single, list, set, map"),
                        );
                        return None;
                    }
                }
            }
        };

        let mut attribute = Attribute::new(kind);
        let [required, optional, computed, sensitive, write_only] = flags;
        if required {
            attribute = attribute.required();
        }
        if optional {
            attribute = attribute.optional();
        }
        if computed {
            attribute = attribute.computed();
        }
        if sensitive {
            attribute = attribute.sensitive();
        }
        if write_only {
            attribute = attribute.write_only();
        }
        if let Some(custom_type) = common.custom_type {
            attribute = attribute.with_custom_type(custom_type);
        }
        if let Some(description) = common.description {
            attribute = attribute.with_description(description);
        }
        if let Some(description) = common.markdown_description {
            attribute = attribute.with_markdown_description(description);
        }
        if let Some(message) = common.deprecation_message {
            attribute = attribute.with_deprecation_message(message);
        }
        for validator in common.validators {
            attribute = attribute.with_validator(validator);
        }

        Some(attribute)
    }

    fn block(&mut self, path: &Path, body: &hcl_edit::structure::Body) -> Option<Block> {
        let mut common = Common::default();
        let mut nesting = None;

        for attribute in body.attributes() {
            let key = attribute.key.value().as_str();
            let expr = Expression::from(attribute.value.clone());

            match key {
                "nesting" => nesting = Some(expr),
                _ => self.common(path, key, &expr, &mut common),
            }
        }

        let children = self.children(path, body, true);
        let mut object = NestedBlockObject::new();
        for (name, attribute) in children.attributes {
            object = object.with_attribute(name, attribute);
        }
        for (name, block) in children.blocks {
            object = object.with_block(name, block);
        }

        let Some(nesting) = nesting else {
            self.problem(path, Problem::MissingNesting);
            return None;
        };

        let nesting = match nesting.as_keyword() {
            Some("single") => BlockNesting::Single,
            Some("list") => BlockNesting::List,
            Some("set") => BlockNesting::Set,
            _ => {
                self.problem(
                    path,
                    Problem::InvalidNesting(nesting.to_string(), "single, list, set"),
                );
                return None;
            }
        };

        let mut block = Block::new(nesting, object);
        if let Some(custom_type) = common.custom_type {
            block = block.with_custom_type(custom_type);
        }
        if let Some(description) = common.description {
            block = block.with_description(description);
        }
        if let Some(description) = common.markdown_description {
            block = block.with_markdown_description(description);
        }
        if let Some(message) = common.deprecation_message {
            block = block.with_deprecation_message(message);
        }
        for validator in common.validators {
            block = block.with_validator(validator);
        }

        Some(block)
    }
}

/// Attribute kind for a `type` argument; bare collection keywords leave the type open
fn attribute_kind(expr: &Expression) -> Result<AttributeKind, Problem> {
    match expr.as_keyword() {
        Some("list") => return Ok(AttributeKind::List { element_type: None }),
        Some("set") => return Ok(AttributeKind::Set { element_type: None }),
        Some("map") => return Ok(AttributeKind::Map { element_type: None }),
        Some("object") => {
            return Ok(AttributeKind::Object {
                attribute_types: None,
            })
        }
        _ => {}
    }

    let kind = match parse_type(expr)? {
        Type::Bool => AttributeKind::Bool,
        Type::String => AttributeKind::String,
        Type::Int32 => AttributeKind::Int32,
        Type::Int64 => AttributeKind::Int64,
        Type::Float32 => AttributeKind::Float32,
        Type::Float64 => AttributeKind::Float64,
        Type::Number => AttributeKind::Number,
        Type::Dynamic => AttributeKind::Dynamic,
        Type::List(element) => AttributeKind::List {
            element_type: Some(*element),
        },
        Type::Set(element) => AttributeKind::Set {
            element_type: Some(*element),
        },
        Type::Map(element) => AttributeKind::Map {
            element_type: Some(*element),
        },
        Type::Object(members) => AttributeKind::Object {
            attribute_types: Some(members),
        },
    };

    Ok(kind)
}

/// Parses a type expression such as `map(list(string))`
pub fn parse_type(expr: &Expression) -> Result<Type, Problem> {
    let invalid = |reason| Problem::InvalidType {
        expression: expr.to_string(),
        reason,
    };

    match expr {
        Expression::FuncCall(call) => match (call.name.to_string().as_str(), call.args.as_slice()) {
            ("list", [element]) => Ok(Type::list(parse_type(element)?)),
            ("set", [element]) => Ok(Type::set(parse_type(element)?)),
            ("map", [element]) => Ok(Type::map(parse_type(element)?)),
            ("object", [Expression::Object(members)]) => members
                .iter()
                .map(|(key, value)| -> Result<(String, Type), Problem> {
                    Ok((object_key_to_string(key.clone()), parse_type(value)?))
                })
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(Type::Object),
            ("list" | "set" | "map", _) => Err(invalid("expected exactly one element type")),
            ("object", _) => Err(invalid("expected an object of member types")),
            _ => Err(invalid("unknown type constructor")),
        },
        Expression::Parenthesis(inner) => parse_type(inner),
        _ => match expr.as_keyword() {
            Some("bool") => Ok(Type::Bool),
            Some("string") => Ok(Type::String),
            Some("int32") => Ok(Type::Int32),
            Some("int64") => Ok(Type::Int64),
            Some("float32") => Ok(Type::Float32),
            Some("float64") => Ok(Type::Float64),
            Some("number") => Ok(Type::Number),
            Some("dynamic") => Ok(Type::Dynamic),
            Some("list" | "set" | "map" | "object") => Err(invalid("missing element type")),
            _ => Err(invalid("unknown type")),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::attribute::AttributeCategory;
    use crate::hcl_documents;
    use crate::validator::Validator;
    use pretty_assertions::assert_eq;

    fn definition_errors_for(doc: HclDocuments) -> DefinitionErrors {
        SchemaDocument::new(&doc).expect_err("must error")
    }

    fn type_of(source: &str) -> Result<Type, Problem> {
        let expr: hcl_edit::expr::Expression = source.parse().expect("valid expression");
        parse_type(&expr.into())
    }

    #[test]
    fn type_expressions() {
        assert_eq!(type_of("string"), Ok(Type::String));
        assert_eq!(type_of("\"bool\""), Ok(Type::Bool));
        assert_eq!(type_of("list(number)"), Ok(Type::list(Type::Number)));
        assert_eq!(
            type_of("map(object({ a = bool, b = set(int64) }))"),
            Ok(Type::map(Type::object([
                ("a", Type::Bool),
                ("b", Type::set(Type::Int64))
            ])))
        );
        assert!(matches!(
            type_of("list(list)"),
            Err(Problem::InvalidType {
                reason: "missing element type",
                ..
            })
        ));
        assert!(matches!(
            type_of("tuple(string)"),
            Err(Problem::InvalidType {
                reason: "unknown type constructor",
                ..
            })
        ));
        assert!(type_of("list(string, bool)").is_err());
        assert!(type_of("42").is_err());
    }

    #[test]
    fn reads_schema() {
        let document = SchemaDocument::new(&hcl_documents! {r#"
        schema "resource" "instance" {
          version     = 2
          description = "a machine"

          attribute "name" {
            type       = string
            required   = true
            validators = ["non empty"]
          }

          attribute "tags" {
            type     = map
            optional = true
          }

          attribute "disk" {
            nesting  = list
            optional = true
            attribute "size" {
              type     = int64
              required = true
            }
          }

          block "rule" {
            nesting = set
            attribute "port" {
              type     = int32
              required = true
            }
            block "source" {
              nesting = single
            }
          }
        }
        "#})
        .expect("valid definition");

        let schema = document
            .get(SchemaDomain::Resource, "instance")
            .expect("schema");
        assert_eq!(schema.version(), 2);
        assert_eq!(schema.description(), "a machine");

        let name = schema.attribute("name").expect("name");
        assert!(name.is_required());
        assert_eq!(name.validators()[0].description(), "non empty");

        let tags = schema.attribute("tags").expect("tags");
        assert_eq!(tags.element_type(), None);
        assert_eq!(tags.category(), AttributeCategory::Collection);

        assert_eq!(
            schema.attribute("disk").map(Attribute::category),
            Some(AttributeCategory::NestedList)
        );
        assert_eq!(
            schema.block("rule").map(Block::nesting),
            Some(BlockNesting::Set)
        );
        assert_eq!(
            schema.type_description().expect("serializable"),
            r#"["object",{"disk":["list",["object",{"size":"number"}]],"name":"string","rule":["set",["object",{"port":"number","source":["object",{}]}]],"tags":["map","dynamic"]}]"#
        );
    }

    #[test]
    fn root_structure_errors() {
        let errors = definition_errors_for(hcl_documents! {r#"
        version = 1
        resource "instance" {}
        schema "resource" {}
        schema "gadget" "instance" {}
        schema "resource" "instance" {}
        schema "resource" "instance" {}
        "#});

        assert_eq!(
            errors.issues(),
            &[
                Issue::RootAttribute(0),
                Issue::UnknownBlockType(0),
                Issue::SchemaBlockLabels(1),
                Issue::UnknownDomain {
                    block: 2,
                    error: UnknownDomain("gadget".to_string())
                },
                Issue::SchemaCollision {
                    existing: 3,
                    new: 4
                },
            ]
        );
    }

    #[test]
    fn definition_errors_accumulate() {
        let errors = definition_errors_for(hcl_documents! {r#"
        schema "resource" "instance" {
          colour = "blue"

          attribute "a" {}
          attribute "b" {
            type    = string
            nesting = single
          }
          attribute "c" {
            type     = string
            required = "yes"
          }
          attribute "c" {
            type = string
          }
          block "d" {}
          block "e" {
            nesting = map
          }
          attribute "f" {
            nesting = list
            attribute "g" {
              type = list(string, bool)
            }
          }
        }
        "#});

        let rendered: Vec<String> = errors.issues().iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "schema block #0: unknown argument `colour`",
                "schema block #0 at `a`: one of `type` or `nesting` is required",
                "schema block #0 at `b`: `type` and `nesting` cannot be combined",
                "schema block #0 at `c`: `required` must be a boolean",
                "schema block #0: `c` is declared more than once",
                "schema block #0 at `d`: `nesting` is required",
                "schema block #0 at `e`: invalid nesting `map`, expected one of single, list, set",
                "schema block #0 at `f.g`: invalid type `list(string, bool)`: expected exactly one element type",
            ]
        );
    }

    #[test]
    fn find_by_reference() {
        let document = SchemaDocument::new(&hcl_documents! {r#"
        schema "resource" "image" {}
        schema "data_source" "image" {}
        schema "provider" "cloud" {}
        "#})
        .expect("valid definition");

        assert_eq!(document.len(), 3);
        assert_eq!(
            document.find("cloud").map(|(key, _)| key.to_string()),
            Ok("provider.cloud".to_string())
        );
        assert_eq!(
            document
                .find("data_source.image")
                .map(|(key, _)| key.to_string()),
            Ok("data_source.image".to_string())
        );
        assert_eq!(
            document.find("image").map(|(key, _)| key.to_string()),
            Err(SchemaLookupError::Ambiguous {
                reference: "image".to_string(),
                candidates: "resource.image, data_source.image".to_string()
            })
        );
        assert_eq!(
            document.find("missing").map(|(key, _)| key.to_string()),
            Err(SchemaLookupError::NotFound("missing".to_string()))
        );
    }
}
