//! schema root
//!
//! A [Schema] owns the top level attributes and blocks of one provider, resource, data source, ...
//! Its [SchemaDomain] is pushed down into every node added to it so that flag accessors anywhere
//! in the tree answer for the right domain.
use crate::attribute::Attribute;
use crate::block::Block;
use crate::diag::{Diagnostic, Diagnostics};
use crate::domain::SchemaDomain;
use crate::implementation::{
    is_valid_name, Issue, ValidateImplementationRequest, ValidateImplementationResponse,
};
use crate::path::{Path, PathError, PathStep, WalkError};
use crate::types::Type;
use crate::visit::{Node, NodeKind, Visit, VisitNodes};
use crate::walk::{walk_path, PathTarget};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct Schema {
    domain: SchemaDomain,
    attributes: IndexMap<String, Attribute>,
    blocks: IndexMap<String, Block>,
    description: String,
    markdown_description: String,
    deprecation_message: String,
    version: i64,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_domain(domain: SchemaDomain) -> Self {
        Self {
            domain,
            ..Default::default()
        }
    }

    pub fn with_domain(mut self, domain: SchemaDomain) -> Self {
        self.domain = domain;
        for attribute in self.attributes.values_mut() {
            attribute.set_domain(domain);
        }
        for block in self.blocks.values_mut() {
            block.set_domain(domain);
        }
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes
            .insert(name.into(), attribute.in_domain(self.domain));
        self
    }

    pub fn with_block(mut self, name: impl Into<String>, block: Block) -> Self {
        self.blocks.insert(name.into(), block.in_domain(self.domain));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_markdown_description(mut self, description: impl Into<String>) -> Self {
        self.markdown_description = description.into();
        self
    }

    pub fn with_deprecation_message(mut self, message: impl Into<String>) -> Self {
        self.deprecation_message = message.into();
        self
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    pub fn domain(&self) -> SchemaDomain {
        self.domain
    }

    pub fn attributes(&self) -> &IndexMap<String, Attribute> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn blocks(&self) -> &IndexMap<String, Block> {
        &self.blocks
    }

    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.get(name)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn markdown_description(&self) -> &str {
        &self.markdown_description
    }

    pub fn deprecation_message(&self) -> &str {
        &self.deprecation_message
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    /// Object type over all attributes and blocks
    pub fn type_of(&self) -> Type {
        let attributes = self
            .attributes
            .iter()
            .map(|(name, attribute)| (name.clone(), attribute.get_type()));
        let blocks = self
            .blocks
            .iter()
            .map(|(name, block)| (name.clone(), block.get_type()));

        Type::Object(attributes.chain(blocks).collect())
    }

    /// Deterministic JSON description of [Schema::type_of]
    pub fn type_description(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.type_of())
    }

    pub fn apply_path_step(&self, step: &PathStep) -> Result<PathTarget<'_>, PathError> {
        let PathStep::AttributeName(name) = step else {
            return Err(PathError::CannotStepAtRoot { step: step.kind() });
        };

        self.attributes
            .get(name)
            .map(PathTarget::Attribute)
            .or_else(|| self.blocks.get(name).map(PathTarget::Block))
            .ok_or_else(|| PathError::NotFound { name: name.clone() })
    }

    /// Finds the attribute `path` points at
    ///
    /// Fails when the path cannot be walked or leads to something that is not an attribute: the
    /// schema itself, a block, a nested object or a position inside an attribute's value.
    pub fn attribute_at_path(&self, path: &Path) -> Result<&Attribute, Diagnostic> {
        self.lookup_attribute(path)
            .map_err(|err| invalid_schema_path(path, "framework attribute", &err))
    }

    pub fn lookup_attribute(&self, path: &Path) -> Result<&Attribute, AttributeLookupError> {
        match walk_path(PathTarget::Schema(self), path)? {
            PathTarget::Attribute(attribute) => Ok(attribute),
            PathTarget::Schema(_) => Err(AttributeLookupError::Schema),
            PathTarget::Block(_) => Err(AttributeLookupError::Block),
            PathTarget::NestedAttributeObject(_) | PathTarget::NestedBlockObject(_) => {
                Err(AttributeLookupError::NestedObject)
            }
            PathTarget::Type(_) => Err(AttributeLookupError::InsideAtomicAttribute),
        }
    }

    /// Type of whatever `path` points at, including blocks, nested objects and the schema itself
    pub fn type_at_path(&self, path: &Path) -> Result<Type, Diagnostic> {
        walk_path(PathTarget::Schema(self), path)
            .map(|target| target.type_of())
            .map_err(|err| invalid_schema_path(path, "framework type", &err))
    }

    /// Checks every attribute and block name at every depth
    #[tracing::instrument(level = "debug", skip_all, fields(domain = %self.domain))]
    pub fn validate(&self) -> Diagnostics {
        let mut validator = NameValidator::new();
        self.visit_nodes(&Path::empty(), &mut validator);
        tracing::debug!(count = validator.diagnostics.len(), "names validated");
        validator.diagnostics
    }

    /// Checks the schema for structural problems the provider must fix
    ///
    /// Every problem is reported, not just the first.
    #[tracing::instrument(level = "debug", skip_all, fields(domain = %self.domain))]
    pub fn validate_implementation(&self) -> Diagnostics {
        let mut response = ValidateImplementationResponse::default();

        for name in self.attributes.keys().chain(self.blocks.keys()) {
            if let Some(diagnostic) = self.domain.check_reserved_name(name, &Path::root(name)) {
                response.diagnostics.push(diagnostic);
            }
        }

        for (name, attribute) in &self.attributes {
            let request = ValidateImplementationRequest::new(name.clone(), Path::root(name));
            attribute.validate_implementation(&request, &mut response);
        }

        for (name, block) in &self.blocks {
            let request = ValidateImplementationRequest::new(name.clone(), Path::root(name));
            block.validate_implementation(&request, &mut response);
        }

        tracing::debug!(count = response.diagnostics.len(), "implementation validated");
        response.diagnostics
    }

    /// Checks that attributes declare how they are set and warns about deprecations
    #[tracing::instrument(level = "debug", skip_all, fields(domain = %self.domain))]
    pub fn validate_definitions(&self) -> Diagnostics {
        let mut validator = DefinitionValidator::new();

        if !self.deprecation_message.is_empty() {
            validator.diagnostics.push(Diagnostic::warning(
                Path::empty(),
                "Deprecated Schema",
                self.deprecation_message.clone(),
            ));
        }

        self.visit_nodes(&Path::empty(), &mut validator);
        tracing::debug!(count = validator.diagnostics.len(), "definitions validated");
        validator.diagnostics
    }
}

/// Reasons [Schema::lookup_attribute] can fail
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AttributeLookupError {
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error("got unexpected type Schema")]
    Schema,
    #[error("path leads to block, not an attribute")]
    Block,
    #[error("path leads to a nested object, not an attribute")]
    NestedObject,
    #[error("path leads to element or attribute of an attribute that has no schema associated with it")]
    InsideAtomicAttribute,
}

fn invalid_schema_path(path: &Path, lookup: &str, err: &dyn std::fmt::Display) -> Diagnostic {
    Diagnostic::error(
        path.clone(),
        "Invalid Schema Path",
        format!(
            "When attempting to get the {lookup} associated with a schema path, \
             an unexpected error was returned. This is always an issue with the provider. \
             Please report this to the provider developers.\n\n\
             Path: {path}\n\
             Original Error: {err}"
        ),
    )
}

#[derive(derive_new::new)]
struct NameValidator {
    #[new(default)]
    diagnostics: Diagnostics,
}

impl<'a> Visit<Node<'a>> for NameValidator {
    fn visit(&mut self, node: &Node<'a>) {
        if !is_valid_name(node.name) {
            let issue = Issue::InvalidName {
                name: node.name.to_string(),
            };
            self.diagnostics.push(issue.diagnostic(&node.path));
        }
    }
}

const DEFINITION_ADVICE: &str =
    "This is always a problem with the provider and should be reported to the provider developer.";

#[derive(derive_new::new)]
struct DefinitionValidator {
    #[new(default)]
    diagnostics: Diagnostics,
}

impl DefinitionValidator {
    fn invalid(&mut self, path: &Path, problem: &str) {
        self.diagnostics.push(Diagnostic::error(
            path.clone(),
            "Invalid Attribute Definition",
            format!("{problem} {DEFINITION_ADVICE}"),
        ));
    }
}

impl<'a> Visit<Node<'a>> for DefinitionValidator {
    fn visit(&mut self, node: &Node<'a>) {
        let deprecation_message = match node.kind {
            NodeKind::Attribute(attribute) => {
                let required = attribute.is_required();
                let optional = attribute.is_optional();
                let computed = attribute.is_computed();

                if !required && !optional && !computed {
                    self.invalid(
                        &node.path,
                        "Attribute missing Required, Optional, or Computed definition.",
                    );
                }
                if required && optional {
                    self.invalid(&node.path, "Attribute cannot be both Required and Optional.");
                }
                if required && computed {
                    self.invalid(&node.path, "Attribute cannot be both Required and Computed.");
                }

                attribute.deprecation_message()
            }
            NodeKind::Block(block) => block.deprecation_message(),
        };

        if !deprecation_message.is_empty() {
            let summary = match node.kind {
                NodeKind::Attribute(_) => "Deprecated Attribute",
                NodeKind::Block(_) => "Deprecated Block",
            };
            self.diagnostics.push(Diagnostic::warning(
                node.path.clone(),
                summary,
                deprecation_message,
            ));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::attribute::{AttributeKind, NestedAttributeObject};
    use crate::block::NestedBlockObject;
    use crate::diag::Severity;
    use crate::path::StepKind;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    fn instance() -> Schema {
        Schema::new()
            .with_attribute("name", Attribute::string().required())
            .with_attribute(
                "tags",
                Attribute::map(Type::String)
                    .optional()
                    .with_deprecation_message("use labels"),
            )
            .with_attribute(
                "disk",
                Attribute::list_nested(
                    NestedAttributeObject::new()
                        .with_attribute("size", Attribute::int64().required())
                        .with_attribute("kind", Attribute::string().optional().computed()),
                )
                .optional(),
            )
            .with_block(
                "rule",
                Block::set(
                    NestedBlockObject::new()
                        .with_attribute("port", Attribute::int64().required())
                        .with_block(
                            "source",
                            Block::single(
                                NestedBlockObject::new()
                                    .with_attribute("cidr", Attribute::string().optional()),
                            ),
                        ),
                ),
            )
    }

    #[test]
    fn is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }

    #[test]
    fn type_of_covers_attributes_and_blocks() {
        let schema = Schema::new()
            .with_attribute("name", Attribute::string())
            .with_attribute("ports", Attribute::list(Type::Int64))
            .with_block(
                "rule",
                Block::list(NestedBlockObject::new().with_attribute("port", Attribute::int32())),
            );

        assert_eq!(
            schema.type_of(),
            Type::object([
                ("name", Type::String),
                ("ports", Type::list(Type::Int64)),
                ("rule", Type::list(Type::object([("port", Type::Int32)]))),
            ])
        );
    }

    #[test]
    fn root_steps() {
        let schema = instance();

        assert!(matches!(
            schema.apply_path_step(&PathStep::AttributeName("rule".to_string())),
            Ok(PathTarget::Block(_))
        ));
        assert_eq!(
            schema
                .apply_path_step(&PathStep::AttributeName("missing".to_string()))
                .unwrap_err(),
            PathError::NotFound {
                name: "missing".to_string()
            }
        );
        assert_eq!(
            schema
                .apply_path_step(&PathStep::ElementKeyInt(0))
                .unwrap_err(),
            PathError::CannotStepAtRoot {
                step: StepKind::ElementKeyInt
            }
        );
    }

    #[test]
    fn attribute_at_path() {
        let schema = Schema::new().with_attribute("testattr", Attribute::string().required());

        let attribute = schema
            .attribute_at_path(&Path::root("testattr"))
            .expect("attribute");
        assert!(attribute.equal(&Attribute::string().required()));

        let diagnostic = schema.attribute_at_path(&Path::empty()).unwrap_err();
        assert_eq!(diagnostic.summary, "Invalid Schema Path");
        assert_eq!(diagnostic.severity, Severity::Error);
        assert!(diagnostic
            .detail
            .contains("Original Error: got unexpected type Schema"));
    }

    #[test]
    fn attribute_at_path_names_remaining_steps() {
        let diagnostic = instance()
            .attribute_at_path(&Path::root("non_existent"))
            .unwrap_err();

        assert_eq!(
            diagnostic.detail,
            "When attempting to get the framework attribute associated with a schema path, \
             an unexpected error was returned. This is always an issue with the provider. \
             Please report this to the provider developers.\n\n\
             Path: non_existent\n\
             Original Error: AttributeName(\"non_existent\") still remains in the path: \
             could not find attribute or block \"non_existent\" in schema"
        );
    }

    #[test]
    fn attribute_at_path_rejects_non_attributes() {
        let schema = instance();
        let cases = [
            (Path::root("rule"), AttributeLookupError::Block),
            (
                Path::root("rule").at_set_value(Value::from(80i64)),
                AttributeLookupError::NestedObject,
            ),
            (
                Path::root("disk").at_list_index(0),
                AttributeLookupError::NestedObject,
            ),
            (
                Path::root("tags").at_map_key("env"),
                AttributeLookupError::InsideAtomicAttribute,
            ),
        ];

        for (path, expected) in cases {
            assert_eq!(schema.lookup_attribute(&path).unwrap_err(), expected, "{path}");
        }

        let attribute = schema
            .attribute_at_path(
                &Path::root("rule")
                    .at_set_value(Value::from(80i64))
                    .at_name("source")
                    .at_name("cidr"),
            )
            .expect("nested block attribute");
        assert_eq!(attribute.name(), "StringAttribute");

        let attribute = schema
            .attribute_at_path(&Path::root("disk").at_list_index(3).at_name("size"))
            .expect("nested attribute");
        assert_eq!(attribute.name(), "Int64Attribute");
    }

    #[test]
    fn object_attribute_unknown_member() {
        let schema = Schema::new().with_attribute(
            "test",
            Attribute::object([("testattr", Type::String)]).optional(),
        );

        let diagnostic = schema
            .attribute_at_path(&Path::root("test").at_name("other"))
            .unwrap_err();
        assert!(diagnostic.detail.contains("undefined attribute name other"));
    }

    #[test]
    fn type_at_path() {
        let schema = instance();

        assert_eq!(schema.type_at_path(&Path::empty()), Ok(schema.type_of()));
        assert_eq!(
            schema.type_at_path(&Path::root("tags").at_map_key("env")),
            Ok(Type::String)
        );
        assert_eq!(
            schema.type_at_path(&Path::root("rule").at_set_value(Value::from(1i64))),
            Ok(Type::object([
                ("port", Type::Int64),
                ("source", Type::object([("cidr", Type::String)])),
            ]))
        );

        let diagnostic = schema
            .type_at_path(&Path::root("rule").at_list_index(0))
            .unwrap_err();
        assert!(diagnostic
            .detail
            .starts_with("When attempting to get the framework type associated with a schema path"));
    }

    #[test]
    fn two_invalid_names() {
        let schema = Schema::new()
            .with_attribute("^", Attribute::string().required())
            .with_attribute(
                "nested",
                Attribute::single_nested(
                    NestedAttributeObject::new().with_attribute("!", Attribute::string().required()),
                )
                .optional(),
            )
            .with_attribute("valid_name_1", Attribute::bool().optional());

        let diagnostics = schema.validate();
        let paths: Vec<String> = diagnostics
            .iter()
            .map(|diagnostic| diagnostic.path.to_string())
            .collect();

        assert_eq!(paths, vec!["^", "nested.!"]);
        assert!(diagnostics
            .iter()
            .all(|diagnostic| diagnostic.summary == "Invalid Attribute/Block Name"));
    }

    #[test]
    fn block_names_are_validated() {
        let schema = Schema::new().with_block(
            "list_nested_block",
            Block::list(
                NestedBlockObject::new()
                    .with_block("Bad-Name", Block::single(NestedBlockObject::new())),
            ),
        );

        let diagnostics = schema.validate();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.as_slice()[0].path.to_string(),
            "list_nested_block.Bad-Name"
        );
    }

    #[test]
    fn missing_collection_type_info_is_reported_once() {
        let schema = Schema::new().with_attribute(
            "test",
            Attribute::new(AttributeKind::List { element_type: None }).optional(),
        );
        let diagnostics = schema.validate_implementation();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.as_slice()[0].summary, "Invalid Attribute Implementation");

        let schema = Schema::new().with_attribute("test", Attribute::list(Type::String).optional());
        assert!(schema.validate_implementation().is_empty());
    }

    #[test]
    fn reserved_root_names() {
        let schema = Schema::new()
            .with_attribute("count", Attribute::int64().optional())
            .with_block("lifecycle", Block::single(NestedBlockObject::new()))
            .with_attribute(
                "nested",
                Attribute::single_nested(
                    NestedAttributeObject::new().with_attribute("count", Attribute::int64()),
                ),
            );

        let paths: Vec<String> = schema
            .validate_implementation()
            .iter()
            .map(|diagnostic| diagnostic.path.to_string())
            .collect();
        assert_eq!(paths, vec!["count", "lifecycle"]);

        let provider = Schema::for_domain(SchemaDomain::Provider)
            .with_attribute("count", Attribute::int64().optional())
            .with_attribute("alias", Attribute::string().optional());
        let paths: Vec<String> = provider
            .validate_implementation()
            .iter()
            .map(|diagnostic| diagnostic.path.to_string())
            .collect();
        assert_eq!(paths, vec!["alias"]);
    }

    #[test]
    fn implementation_problems_accumulate() {
        let schema = Schema::new()
            .with_attribute("count", Attribute::new(AttributeKind::Map { element_type: None }))
            .with_attribute(
                "object",
                Attribute::new(AttributeKind::Object {
                    attribute_types: None,
                }),
            )
            .with_block(
                "rule",
                Block::list(NestedBlockObject::new().with_attribute("any", Attribute::dynamic())),
            );

        let summaries: Vec<String> = schema
            .validate_implementation()
            .iter()
            .map(|diagnostic| diagnostic.summary.clone())
            .collect();
        assert_eq!(
            summaries,
            vec![
                "Reserved Root Attribute/Block Name",
                "Invalid Attribute Implementation",
                "Invalid Attribute Implementation",
                "Invalid Schema Implementation",
            ]
        );
    }

    #[test]
    fn domain_is_pushed_into_nodes() {
        let schema = instance().with_domain(SchemaDomain::Provider);
        let kind = schema
            .attribute_at_path(&Path::root("disk").at_list_index(0).at_name("kind"))
            .expect("nested attribute");
        assert_eq!(kind.domain(), SchemaDomain::Provider);
        assert!(!kind.is_computed());

        let schema = Schema::for_domain(SchemaDomain::DataSource)
            .with_attribute("secret", Attribute::string().write_only().optional());
        let secret = schema.attribute("secret").expect("attribute");
        assert!(!secret.is_write_only());
    }

    #[test]
    fn definitions() {
        let schema = Schema::new()
            .with_deprecation_message("use v2")
            .with_attribute("nothing", Attribute::string())
            .with_attribute("both", Attribute::string().required().optional())
            .with_attribute("fine", Attribute::string().optional().computed())
            .with_block(
                "rule",
                Block::single(
                    NestedBlockObject::new()
                        .with_attribute("port", Attribute::int64().required().computed()),
                )
                .with_deprecation_message("use rules"),
            );

        let diagnostics = schema.validate_definitions();
        let found: Vec<(Severity, String, String)> = diagnostics
            .iter()
            .map(|diagnostic| {
                (
                    diagnostic.severity,
                    diagnostic.summary.clone(),
                    diagnostic.path.to_string(),
                )
            })
            .collect();

        assert_eq!(
            found,
            vec![
                (Severity::Warning, "Deprecated Schema".to_string(), "".to_string()),
                (
                    Severity::Error,
                    "Invalid Attribute Definition".to_string(),
                    "nothing".to_string()
                ),
                (
                    Severity::Error,
                    "Invalid Attribute Definition".to_string(),
                    "both".to_string()
                ),
                (
                    Severity::Warning,
                    "Deprecated Block".to_string(),
                    "rule".to_string()
                ),
                (
                    Severity::Error,
                    "Invalid Attribute Definition".to_string(),
                    "rule.port".to_string()
                ),
            ]
        );
    }

    #[test]
    fn computed_only_counts_where_supported() {
        let provider = Schema::for_domain(SchemaDomain::Provider)
            .with_attribute("endpoint", Attribute::string().computed());

        let diagnostics = provider.validate_definitions();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.as_slice()[0]
            .detail
            .starts_with("Attribute missing Required, Optional, or Computed definition."));
    }

    #[test]
    fn type_description() {
        let schema = instance();
        assert_eq!(
            schema.type_description().expect("serializable"),
            r#"["object",{"disk":["list",["object",{"kind":"string","size":"number"}]],"name":"string","rule":["set",["object",{"port":"number","source":["object",{"cidr":"string"}]}]],"tags":["map","string"]}]"#
        );
    }
}
