//! attribute nodes
//!
//! An [Attribute] is a named position in a schema that holds a value. Its [AttributeKind] decides
//! what value: a leaf, a collection or object of plain [Type]s, or a [NestedAttributeObject] of
//! further attributes in one of four nesting modes.
//!
//! Attributes are built with chained calls and become immutable once added to a schema:
//!
//! ```
//! use provschema::attribute::{Attribute, NestedAttributeObject};
//! use provschema::types::Type;
//!
//! let disks = Attribute::list_nested(
//!     NestedAttributeObject::new()
//!         .with_attribute("size", Attribute::int64().required())
//!         .with_attribute("labels", Attribute::map(Type::String).optional()),
//! )
//! .optional()
//! .with_description("disks attached to the instance");
//!
//! assert_eq!(disks.name(), "ListNestedAttribute");
//! ```
use crate::domain::SchemaDomain;
use crate::implementation::{Issue, ValidateImplementationRequest, ValidateImplementationResponse};
use crate::path::{Path, PathError, PathStep};
use crate::types::Type;
use crate::validator::{same_validators, ValidatorHandle};
use crate::walk::PathTarget;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeCategory {
    Primitive,
    Collection,
    Object,
    NestedSingle,
    NestedList,
    NestedSet,
    NestedMap,
}

#[derive(Debug, Clone)]
pub enum AttributeKind {
    Bool,
    String,
    Int32,
    Int64,
    Float32,
    Float64,
    Number,
    Dynamic,
    List {
        element_type: Option<Type>,
    },
    Set {
        element_type: Option<Type>,
    },
    Map {
        element_type: Option<Type>,
    },
    Object {
        attribute_types: Option<IndexMap<String, Type>>,
    },
    SingleNested(NestedAttributeObject),
    ListNested(NestedAttributeObject),
    SetNested(NestedAttributeObject),
    MapNested(NestedAttributeObject),
}

impl AttributeKind {
    pub fn category(&self) -> AttributeCategory {
        match self {
            AttributeKind::List { .. } | AttributeKind::Set { .. } | AttributeKind::Map { .. } => {
                AttributeCategory::Collection
            }
            AttributeKind::Object { .. } => AttributeCategory::Object,
            AttributeKind::SingleNested(_) => AttributeCategory::NestedSingle,
            AttributeKind::ListNested(_) => AttributeCategory::NestedList,
            AttributeKind::SetNested(_) => AttributeCategory::NestedSet,
            AttributeKind::MapNested(_) => AttributeCategory::NestedMap,
            _ => AttributeCategory::Primitive,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AttributeKind::Bool => "BoolAttribute",
            AttributeKind::String => "StringAttribute",
            AttributeKind::Int32 => "Int32Attribute",
            AttributeKind::Int64 => "Int64Attribute",
            AttributeKind::Float32 => "Float32Attribute",
            AttributeKind::Float64 => "Float64Attribute",
            AttributeKind::Number => "NumberAttribute",
            AttributeKind::Dynamic => "DynamicAttribute",
            AttributeKind::List { .. } => "ListAttribute",
            AttributeKind::Set { .. } => "SetAttribute",
            AttributeKind::Map { .. } => "MapAttribute",
            AttributeKind::Object { .. } => "ObjectAttribute",
            AttributeKind::SingleNested(_) => "SingleNestedAttribute",
            AttributeKind::ListNested(_) => "ListNestedAttribute",
            AttributeKind::SetNested(_) => "SetNestedAttribute",
            AttributeKind::MapNested(_) => "MapNestedAttribute",
        }
    }

    pub fn nested_object(&self) -> Option<&NestedAttributeObject> {
        match self {
            AttributeKind::SingleNested(object)
            | AttributeKind::ListNested(object)
            | AttributeKind::SetNested(object)
            | AttributeKind::MapNested(object) => Some(object),
            _ => None,
        }
    }

    fn nested_object_mut(&mut self) -> Option<&mut NestedAttributeObject> {
        match self {
            AttributeKind::SingleNested(object)
            | AttributeKind::ListNested(object)
            | AttributeKind::SetNested(object)
            | AttributeKind::MapNested(object) => Some(object),
            _ => None,
        }
    }

    fn equal(&self, other: &AttributeKind) -> bool {
        match (self, other) {
            (AttributeKind::List { element_type: a }, AttributeKind::List { element_type: b })
            | (AttributeKind::Set { element_type: a }, AttributeKind::Set { element_type: b })
            | (AttributeKind::Map { element_type: a }, AttributeKind::Map { element_type: b }) => {
                a == b
            }
            (
                AttributeKind::Object { attribute_types: a },
                AttributeKind::Object { attribute_types: b },
            ) => a == b,
            (AttributeKind::SingleNested(a), AttributeKind::SingleNested(b))
            | (AttributeKind::ListNested(a), AttributeKind::ListNested(b))
            | (AttributeKind::SetNested(a), AttributeKind::SetNested(b))
            | (AttributeKind::MapNested(a), AttributeKind::MapNested(b)) => a.equal(b),
            (a, b) => {
                a.category() == AttributeCategory::Primitive
                    && std::mem::discriminant(a) == std::mem::discriminant(b)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Attribute {
    kind: AttributeKind,
    domain: SchemaDomain,
    custom_type: Option<Type>,
    required: bool,
    optional: bool,
    computed: bool,
    sensitive: bool,
    write_only: bool,
    description: String,
    markdown_description: String,
    deprecation_message: String,
    validators: Vec<ValidatorHandle>,
}

impl Attribute {
    pub fn new(kind: AttributeKind) -> Self {
        Self {
            kind,
            domain: SchemaDomain::default(),
            custom_type: None,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            write_only: false,
            description: String::new(),
            markdown_description: String::new(),
            deprecation_message: String::new(),
            validators: Vec::new(),
        }
    }

    pub fn bool() -> Self {
        Self::new(AttributeKind::Bool)
    }

    pub fn string() -> Self {
        Self::new(AttributeKind::String)
    }

    pub fn int32() -> Self {
        Self::new(AttributeKind::Int32)
    }

    pub fn int64() -> Self {
        Self::new(AttributeKind::Int64)
    }

    pub fn float32() -> Self {
        Self::new(AttributeKind::Float32)
    }

    pub fn float64() -> Self {
        Self::new(AttributeKind::Float64)
    }

    pub fn number() -> Self {
        Self::new(AttributeKind::Number)
    }

    pub fn dynamic() -> Self {
        Self::new(AttributeKind::Dynamic)
    }

    pub fn list(element_type: Type) -> Self {
        Self::new(AttributeKind::List {
            element_type: Some(element_type),
        })
    }

    pub fn set(element_type: Type) -> Self {
        Self::new(AttributeKind::Set {
            element_type: Some(element_type),
        })
    }

    pub fn map(element_type: Type) -> Self {
        Self::new(AttributeKind::Map {
            element_type: Some(element_type),
        })
    }

    pub fn object<K: Into<String>>(attribute_types: impl IntoIterator<Item = (K, Type)>) -> Self {
        Self::new(AttributeKind::Object {
            attribute_types: Some(
                attribute_types
                    .into_iter()
                    .map(|(name, ty)| (name.into(), ty))
                    .collect(),
            ),
        })
    }

    pub fn single_nested(object: NestedAttributeObject) -> Self {
        Self::new(AttributeKind::SingleNested(object))
    }

    pub fn list_nested(object: NestedAttributeObject) -> Self {
        Self::new(AttributeKind::ListNested(object))
    }

    pub fn set_nested(object: NestedAttributeObject) -> Self {
        Self::new(AttributeKind::SetNested(object))
    }

    pub fn map_nested(object: NestedAttributeObject) -> Self {
        Self::new(AttributeKind::MapNested(object))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
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

    /// Moves the attribute and all of its descendants into `domain`
    pub fn in_domain(mut self, domain: SchemaDomain) -> Self {
        self.set_domain(domain);
        self
    }

    pub(crate) fn set_domain(&mut self, domain: SchemaDomain) {
        self.domain = domain;
        if let Some(object) = self.kind.nested_object_mut() {
            object.set_domain(domain);
        }
    }

    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    pub fn category(&self) -> AttributeCategory {
        self.kind.category()
    }

    /// Name of the attribute kind, e.g. `ListNestedAttribute`
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn domain(&self) -> SchemaDomain {
        self.domain
    }

    pub fn custom_type(&self) -> Option<&Type> {
        self.custom_type.as_ref()
    }

    /// Declared element type of a collection attribute
    pub fn element_type(&self) -> Option<&Type> {
        match &self.kind {
            AttributeKind::List { element_type }
            | AttributeKind::Set { element_type }
            | AttributeKind::Map { element_type } => element_type.as_ref(),
            _ => None,
        }
    }

    /// Declared member types of an object attribute
    pub fn attribute_types(&self) -> Option<&IndexMap<String, Type>> {
        match &self.kind {
            AttributeKind::Object { attribute_types } => attribute_types.as_ref(),
            _ => None,
        }
    }

    pub fn nested_object(&self) -> Option<&NestedAttributeObject> {
        self.kind.nested_object()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_computed(&self) -> bool {
        self.computed && self.domain.supports_computed()
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive && self.domain.supports_sensitive()
    }

    pub fn is_write_only(&self) -> bool {
        self.write_only && self.domain.supports_write_only()
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

    /// Value type of the attribute
    ///
    /// A collection without element type has dynamic elements and an object without member types
    /// has no members. Both are implementation issues reported by [Attribute::validate_implementation].
    pub fn get_type(&self) -> Type {
        if let Some(custom_type) = &self.custom_type {
            return custom_type.clone();
        }

        let element = |element_type: &Option<Type>| element_type.clone().unwrap_or(Type::Dynamic);

        match &self.kind {
            AttributeKind::Bool => Type::Bool,
            AttributeKind::String => Type::String,
            AttributeKind::Int32 => Type::Int32,
            AttributeKind::Int64 => Type::Int64,
            AttributeKind::Float32 => Type::Float32,
            AttributeKind::Float64 => Type::Float64,
            AttributeKind::Number => Type::Number,
            AttributeKind::Dynamic => Type::Dynamic,
            AttributeKind::List { element_type } => Type::list(element(element_type)),
            AttributeKind::Set { element_type } => Type::set(element(element_type)),
            AttributeKind::Map { element_type } => Type::map(element(element_type)),
            AttributeKind::Object { attribute_types } => {
                Type::Object(attribute_types.clone().unwrap_or_default())
            }
            AttributeKind::SingleNested(object) => object.type_of(),
            AttributeKind::ListNested(object) => Type::list(object.type_of()),
            AttributeKind::SetNested(object) => Type::set(object.type_of()),
            AttributeKind::MapNested(object) => Type::map(object.type_of()),
        }
    }

    /// Whether the declared value holds a dynamic value anywhere
    ///
    /// Missing type information does not count as dynamic.
    pub fn contains_dynamic(&self) -> bool {
        if let Some(custom_type) = &self.custom_type {
            return custom_type.contains_dynamic();
        }

        match &self.kind {
            AttributeKind::Dynamic => true,
            AttributeKind::List { element_type }
            | AttributeKind::Set { element_type }
            | AttributeKind::Map { element_type } => {
                element_type.as_ref().is_some_and(Type::contains_dynamic)
            }
            AttributeKind::Object { attribute_types } => attribute_types
                .as_ref()
                .is_some_and(|types| types.values().any(Type::contains_dynamic)),
            AttributeKind::SingleNested(object)
            | AttributeKind::ListNested(object)
            | AttributeKind::SetNested(object)
            | AttributeKind::MapNested(object) => object.contains_dynamic(),
            _ => false,
        }
    }

    pub fn apply_path_step(&self, step: &PathStep) -> Result<PathTarget<'_>, PathError> {
        match (&self.kind, step) {
            (AttributeKind::SingleNested(object), PathStep::AttributeName(name)) => object
                .attribute(name)
                .map(PathTarget::Attribute)
                .ok_or_else(|| PathError::NoSuchChild {
                    name: name.clone(),
                    child: "attribute",
                    target: self.name(),
                }),
            (AttributeKind::ListNested(object), PathStep::ElementKeyInt(_))
            | (AttributeKind::SetNested(object), PathStep::ElementKeyValue(_))
            | (AttributeKind::MapNested(object), PathStep::ElementKeyString(_)) => {
                Ok(PathTarget::NestedAttributeObject(object))
            }
            (
                AttributeKind::SingleNested(_)
                | AttributeKind::ListNested(_)
                | AttributeKind::SetNested(_)
                | AttributeKind::MapNested(_),
                _,
            ) => Err(PathError::cannot_step_into(step, self.name())),
            _ => self
                .get_type()
                .apply_path_step(step)
                .map(|ty| PathTarget::Type(ty.clone())),
        }
    }

    /// Field-wise equality; attributes of different kinds or domains are never equal
    pub fn equal(&self, other: &Attribute) -> bool {
        self.domain == other.domain
            && self.kind.equal(&other.kind)
            && self.custom_type == other.custom_type
            && self.required == other.required
            && self.optional == other.optional
            && self.computed == other.computed
            && self.sensitive == other.sensitive
            && self.write_only == other.write_only
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
        let path = &request.path;

        match &self.kind {
            AttributeKind::List { element_type }
            | AttributeKind::Set { element_type }
            | AttributeKind::Map { element_type } => {
                if self.custom_type.is_none() && element_type.is_none() {
                    response.report(Issue::MissingCollectionTypeInfo, path);
                } else if self.get_type().contains_collection_with_dynamic() {
                    response.report(Issue::DynamicInCollection, path);
                }
            }
            AttributeKind::Object { attribute_types } => {
                if self.custom_type.is_none() && attribute_types.is_none() {
                    response.report(Issue::MissingObjectTypeInfo, path);
                } else if self.get_type().contains_collection_with_dynamic() {
                    response.report(Issue::DynamicInCollection, path);
                }
            }
            AttributeKind::SingleNested(object)
            | AttributeKind::ListNested(object)
            | AttributeKind::SetNested(object)
            | AttributeKind::MapNested(object) => {
                if self.category() != AttributeCategory::NestedSingle && object.contains_dynamic() {
                    response.report(Issue::DynamicInNestedAttribute, path);
                }

                if self.is_write_only() && !object.all_write_only() {
                    response.report(Issue::WriteOnlyParentWithNonWriteOnlyChild, path);
                }

                if self.is_computed() && object.any_write_only() {
                    response.report(Issue::ComputedParentWithWriteOnlyChild, path);
                }

                object.validate_implementation(path, response);
            }
            _ => {}
        }
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

/// The attributes shared by every element of a nested attribute
#[derive(Debug, Clone, Default)]
pub struct NestedAttributeObject {
    attributes: IndexMap<String, Attribute>,
    custom_type: Option<Type>,
    validators: Vec<ValidatorHandle>,
}

impl NestedAttributeObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
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

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn custom_type(&self) -> Option<&Type> {
        self.custom_type.as_ref()
    }

    pub fn validators(&self) -> &[ValidatorHandle] {
        &self.validators
    }

    pub(crate) fn set_domain(&mut self, domain: SchemaDomain) {
        for attribute in self.attributes.values_mut() {
            attribute.set_domain(domain);
        }
    }

    /// Object type over all child attributes
    pub fn type_of(&self) -> Type {
        if let Some(custom_type) = &self.custom_type {
            return custom_type.clone();
        }

        Type::Object(
            self.attributes
                .iter()
                .map(|(name, attribute)| (name.clone(), attribute.get_type()))
                .collect(),
        )
    }

    pub fn apply_path_step(&self, step: &PathStep) -> Result<PathTarget<'_>, PathError> {
        let PathStep::AttributeName(name) = step else {
            return Err(PathError::cannot_step_into(step, "NestedAttributeObject"));
        };

        self.attribute(name)
            .map(PathTarget::Attribute)
            .ok_or_else(|| PathError::NoSuchChild {
                name: name.clone(),
                child: "attribute",
                target: "NestedAttributeObject",
            })
    }

    pub fn equal(&self, other: &NestedAttributeObject) -> bool {
        self.custom_type == other.custom_type
            && self.attributes.len() == other.attributes.len()
            && self.attributes.iter().all(|(name, attribute)| {
                other
                    .attributes
                    .get(name)
                    .is_some_and(|other| attribute.equal(other))
            })
            && same_validators(&self.validators, &other.validators)
    }

    pub fn contains_dynamic(&self) -> bool {
        match &self.custom_type {
            Some(custom_type) => custom_type.contains_dynamic(),
            None => self.attributes.values().any(Attribute::contains_dynamic),
        }
    }

    /// Whether every descendant attribute is write only
    pub fn all_write_only(&self) -> bool {
        self.attributes.values().all(|attribute| {
            attribute.is_write_only()
                && attribute
                    .nested_object()
                    .map_or(true, NestedAttributeObject::all_write_only)
        })
    }

    /// Whether any descendant attribute is write only
    pub fn any_write_only(&self) -> bool {
        self.attributes.values().any(|attribute| {
            attribute.is_write_only()
                || attribute
                    .nested_object()
                    .is_some_and(NestedAttributeObject::any_write_only)
        })
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
    }
}

impl<K: Into<String>> FromIterator<(K, Attribute)> for NestedAttributeObject {
    fn from_iter<T: IntoIterator<Item = (K, Attribute)>>(iter: T) -> Self {
        Self {
            attributes: iter
                .into_iter()
                .map(|(name, attribute)| (name.into(), attribute))
                .collect(),
            ..Default::default()
        }
    }
}
