//! block nodes
//!
//! Blocks group attributes (and further blocks) under a [NestedBlockObject]. Unlike nested
//! attributes they are never maps and carry no value flags of their own.
use crate::attribute::Attribute;
use crate::domain::SchemaDomain;
use crate::implementation::{Issue, ValidateImplementationRequest, ValidateImplementationResponse};
use crate::path::{Path, PathError, PathStep};
use crate::types::Type;
use crate::validator::{same_validators, ValidatorHandle};
use crate::walk::PathTarget;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockNesting {
    Single,
    List,
    Set,
}

#[derive(Debug, Clone)]
pub struct Block {
    nesting: BlockNesting,
    object: NestedBlockObject,
    custom_type: Option<Type>,
    description: String,
    markdown_description: String,
    deprecation_message: String,
    validators: Vec<ValidatorHandle>,
}

impl Block {
    pub fn new(nesting: BlockNesting, object: NestedBlockObject) -> Self {
        Self {
            nesting,
            object,
            custom_type: None,
            description: String::new(),
            markdown_description: String::new(),
            deprecation_message: String::new(),
            validators: Vec::new(),
        }
    }

    pub fn single(object: NestedBlockObject) -> Self {
        Self::new(BlockNesting::Single, object)
    }

    pub fn list(object: NestedBlockObject) -> Self {
        Self::new(BlockNesting::List, object)
    }

    pub fn set(object: NestedBlockObject) -> Self {
        Self::new(BlockNesting::Set, object)
    }

    pub fn with_custom_type(mut self, custom_type: Type) -> Self {
        self.custom_type = Some(custom_type);
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

    pub fn with_validator(mut self, validator: ValidatorHandle) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn in_domain(mut self, domain: SchemaDomain) -> Self {
        self.set_domain(domain);
        self
    }

    pub(crate) fn set_domain(&mut self, domain: SchemaDomain) {
        self.object.set_domain(domain);
    }

    pub fn nesting(&self) -> BlockNesting {
        self.nesting
    }

    pub fn nested_object(&self) -> &NestedBlockObject {
        &self.object
    }

    /// Name of the block kind, e.g. `SetNestedBlock`
    pub fn name(&self) -> &'static str {
        match self.nesting {
            BlockNesting::Single => "SingleNestedBlock",
            BlockNesting::List => "ListNestedBlock",
            BlockNesting::Set => "SetNestedBlock",
        }
    }

    pub fn custom_type(&self) -> Option<&Type> {
        self.custom_type.as_ref()
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

    pub fn validators(&self) -> &[ValidatorHandle] {
        &self.validators
    }

    pub fn get_type(&self) -> Type {
        if let Some(custom_type) = &self.custom_type {
            return custom_type.clone();
        }

        match self.nesting {
            BlockNesting::Single => self.object.type_of(),
            BlockNesting::List => Type::list(self.object.type_of()),
            BlockNesting::Set => Type::set(self.object.type_of()),
        }
    }

    pub fn apply_path_step(&self, step: &PathStep) -> Result<PathTarget<'_>, PathError> {
        match (self.nesting, step) {
            (BlockNesting::Single, PathStep::AttributeName(name)) => {
                self.object.child(name).ok_or_else(|| PathError::NoSuchChild {
                    name: name.clone(),
                    child: "attribute or block",
                    target: self.name(),
                })
            }
            (BlockNesting::List, PathStep::ElementKeyInt(_))
            | (BlockNesting::Set, PathStep::ElementKeyValue(_)) => {
                Ok(PathTarget::NestedBlockObject(&self.object))
            }
            _ => Err(PathError::cannot_step_into(step, self.name())),
        }
    }

    pub fn equal(&self, other: &Block) -> bool {
        self.nesting == other.nesting
            && self.object.equal(&other.object)
            && self.custom_type == other.custom_type
            && self.description == other.description
            && self.markdown_description == other.markdown_description
            && self.deprecation_message == other.deprecation_message
            && same_validators(&self.validators, &other.validators)
    }

    #[tracing::instrument(level = "trace", skip_all, fields(path = %request.path, kind = self.name()))]
    pub fn validate_implementation(
        &self,
        request: &ValidateImplementationRequest,
        response: &mut ValidateImplementationResponse,
    ) {
        if self.nesting != BlockNesting::Single && self.object.contains_dynamic() {
            response.report(Issue::DynamicInNestedBlock, &request.path);
        }

        self.object.validate_implementation(&request.path, response);
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

/// The attributes and blocks shared by every element of a block
#[derive(Debug, Clone, Default)]
pub struct NestedBlockObject {
    attributes: IndexMap<String, Attribute>,
    blocks: IndexMap<String, Block>,
    custom_type: Option<Type>,
    validators: Vec<ValidatorHandle>,
}

impl NestedBlockObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn with_block(mut self, name: impl Into<String>, block: Block) -> Self {
        self.blocks.insert(name.into(), block);
        self
    }

    pub fn with_custom_type(mut self, custom_type: Type) -> Self {
        self.custom_type = Some(custom_type);
        self
    }

    pub fn with_validator(mut self, validator: ValidatorHandle) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn attributes(&self) -> &IndexMap<String, Attribute> {
        &self.attributes
    }

    pub fn blocks(&self) -> &IndexMap<String, Block> {
        &self.blocks
    }

    pub fn custom_type(&self) -> Option<&Type> {
        self.custom_type.as_ref()
    }

    pub fn validators(&self) -> &[ValidatorHandle] {
        &self.validators
    }

    /// Attribute or block named `name`, attributes first
    pub fn child(&self, name: &str) -> Option<PathTarget<'_>> {
        self.attributes
            .get(name)
            .map(PathTarget::Attribute)
            .or_else(|| self.blocks.get(name).map(PathTarget::Block))
    }

    pub(crate) fn set_domain(&mut self, domain: SchemaDomain) {
        for attribute in self.attributes.values_mut() {
            attribute.set_domain(domain);
        }
        for block in self.blocks.values_mut() {
            block.set_domain(domain);
        }
    }

    pub fn type_of(&self) -> Type {
        if let Some(custom_type) = &self.custom_type {
            return custom_type.clone();
        }

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

    pub fn apply_path_step(&self, step: &PathStep) -> Result<PathTarget<'_>, PathError> {
        let PathStep::AttributeName(name) = step else {
            return Err(PathError::cannot_step_into(step, "NestedBlockObject"));
        };

        self.child(name).ok_or_else(|| PathError::NoSuchChild {
            name: name.clone(),
            child: "attribute or block",
            target: "NestedBlockObject",
        })
    }

    pub fn equal(&self, other: &NestedBlockObject) -> bool {
        fn same<T>(a: &IndexMap<String, T>, b: &IndexMap<String, T>, eq: fn(&T, &T) -> bool) -> bool {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(name, value)| b.get(name).is_some_and(|other| eq(value, other)))
        }

        self.custom_type == other.custom_type
            && same(&self.attributes, &other.attributes, Attribute::equal)
            && same(&self.blocks, &other.blocks, Block::equal)
            && same_validators(&self.validators, &other.validators)
    }

    pub fn contains_dynamic(&self) -> bool {
        match &self.custom_type {
            Some(custom_type) => custom_type.contains_dynamic(),
            None => {
                self.attributes.values().any(Attribute::contains_dynamic)
                    || self.blocks.values().any(|block| match block.custom_type() {
                        Some(custom_type) => custom_type.contains_dynamic(),
                        None => block.nested_object().contains_dynamic(),
                    })
            }
        }
    }

    pub(crate) fn validate_implementation(
        &self,
        path: &Path,
        response: &mut ValidateImplementationResponse,
    ) {
        for (name, attribute) in &self.attributes {
            let request = ValidateImplementationRequest::new(name.clone(), path.at_name(name));
            attribute.validate_implementation(&request, response);
        }

        for (name, block) in &self.blocks {
            let request = ValidateImplementationRequest::new(name.clone(), path.at_name(name));
            block.validate_implementation(&request, response);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::attribute::AttributeKind;
    use crate::path::StepKind;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    fn object() -> NestedBlockObject {
        NestedBlockObject::new()
            .with_attribute("protocol", Attribute::string().required())
            .with_block(
                "source",
                Block::single(NestedBlockObject::new().with_attribute("cidr", Attribute::string())),
            )
    }

    fn validate(block: &Block) -> ValidateImplementationResponse {
        let mut response = ValidateImplementationResponse::default();
        let request = ValidateImplementationRequest::new("test".to_string(), Path::root("test"));
        block.validate_implementation(&request, &mut response);
        response
    }

    #[test]
    fn set_block_steps() {
        let block = Block::set(object());

        assert!(matches!(
            block.apply_path_step(&PathStep::ElementKeyValue(Value::from("tcp"))),
            Ok(PathTarget::NestedBlockObject(_))
        ));

        let err = block
            .apply_path_step(&PathStep::ElementKeyInt(0))
            .unwrap_err();
        assert_eq!(
            err,
            PathError::CannotStepInto {
                step: StepKind::ElementKeyInt,
                target: "SetNestedBlock"
            }
        );
        assert_eq!(
            err.to_string(),
            "cannot apply step ElementKeyInt to SetNestedBlock"
        );
    }

    #[test]
    fn list_block_steps() {
        let block = Block::list(object());
        assert!(matches!(
            block.apply_path_step(&PathStep::ElementKeyInt(7)),
            Ok(PathTarget::NestedBlockObject(_))
        ));
        assert!(block
            .apply_path_step(&PathStep::ElementKeyString("x".to_string()))
            .is_err());
    }

    #[test]
    fn single_block_finds_attributes_then_blocks() {
        let block = Block::single(object());

        assert!(matches!(
            block.apply_path_step(&PathStep::AttributeName("protocol".to_string())),
            Ok(PathTarget::Attribute(_))
        ));
        assert!(matches!(
            block.apply_path_step(&PathStep::AttributeName("source".to_string())),
            Ok(PathTarget::Block(_))
        ));
        assert_eq!(
            block
                .apply_path_step(&PathStep::AttributeName("other".to_string()))
                .unwrap_err()
                .to_string(),
            r#"no attribute or block "other" on SingleNestedBlock"#
        );
    }

    #[test]
    fn nested_block_object_steps() {
        let object = object();
        assert!(matches!(
            object.apply_path_step(&PathStep::AttributeName("source".to_string())),
            Ok(PathTarget::Block(_))
        ));
        assert_eq!(
            object
                .apply_path_step(&PathStep::ElementKeyInt(0))
                .unwrap_err()
                .to_string(),
            "cannot apply step ElementKeyInt to NestedBlockObject"
        );
    }

    #[test]
    fn get_type() {
        assert_eq!(
            Block::list(object()).get_type(),
            Type::list(Type::object([
                ("protocol", Type::String),
                ("source", Type::object([("cidr", Type::String)])),
            ]))
        );
    }

    #[test]
    fn equality() {
        assert!(Block::list(object()).equal(&Block::list(object())));
        assert!(!Block::list(object()).equal(&Block::set(object())));
        assert!(!Block::list(object()).equal(&Block::list(NestedBlockObject::new())));
        assert!(!Block::single(object())
            .with_description("a")
            .equal(&Block::single(object())));
    }

    #[test]
    fn dynamic_inside_list_and_set_blocks() {
        let dynamic = || {
            NestedBlockObject::new().with_block(
                "inner",
                Block::single(NestedBlockObject::new().with_attribute("value", Attribute::dynamic())),
            )
        };

        for block in [Block::list(dynamic()), Block::set(dynamic())] {
            let response = validate(&block);
            assert_eq!(response.diagnostics.len(), 1, "{}", block.name());
            assert!(response.diagnostics.as_slice()[0]
                .detail
                .contains("is a block that contains a collection type with a nested dynamic type"));
        }

        assert!(validate(&Block::single(dynamic())).diagnostics.is_empty());
    }

    #[test]
    fn nested_paths_are_dotted() {
        let block = Block::list(NestedBlockObject::new().with_block(
            "list_nested_nested_block",
            Block::list(NestedBlockObject::new().with_attribute(
                "test",
                Attribute::new(AttributeKind::Map { element_type: None }),
            )),
        ));

        let mut response = ValidateImplementationResponse::default();
        let request = ValidateImplementationRequest::new(
            "list_nested_block".to_string(),
            Path::root("list_nested_block"),
        );
        block.validate_implementation(&request, &mut response);

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics.as_slice()[0].path.to_string(),
            "list_nested_block.list_nested_nested_block.test"
        );
    }
}
