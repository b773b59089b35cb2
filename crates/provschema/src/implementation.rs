//! implementation checks
//!
//! Structural problems in a schema definition are bugs in the provider, not in the practitioner's
//! configuration. They are detected once, when the schema is finalized, and reported as
//! [Diagnostic]s that point at the offending definition.
use crate::diag::{Diagnostic, Diagnostics};
use crate::path::Path;
use once_cell::sync::Lazy;
use regex::Regex;

static VALID_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-z0-9_]+$").expect("name pattern must compile"));

const PREAMBLE: &str = "When validating the schema, an implementation issue was found. \
    This is always an issue with the provider and should be reported to the provider developers.";

/// Whether `name` can be used for an attribute or block
pub fn is_valid_name(name: &str) -> bool {
    VALID_NAME.is_match(name)
}

#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct ValidateImplementationRequest {
    /// Name of the attribute or block under validation
    pub name: String,
    /// Location of the attribute or block in its schema
    pub path: Path,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidateImplementationResponse {
    pub diagnostics: Diagnostics,
}

impl ValidateImplementationResponse {
    pub(crate) fn report(&mut self, issue: Issue, path: &Path) {
        self.diagnostics.push(issue.diagnostic(path));
    }
}

/// Every structural problem the implementation checks know about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// A list, set or map attribute without element type or custom type
    MissingCollectionTypeInfo,
    /// An object attribute without attribute types or custom type
    MissingObjectTypeInfo,
    /// A collection attribute whose static type has a dynamic element
    DynamicInCollection,
    /// A list, set or map nested attribute whose nested object holds a dynamic value
    DynamicInNestedAttribute,
    /// A list or set nested block whose nested object holds a dynamic value
    DynamicInNestedBlock,
    WriteOnlyParentWithNonWriteOnlyChild,
    ComputedParentWithWriteOnlyChild,
    InvalidName { name: String },
}

impl Issue {
    pub fn diagnostic(&self, path: &Path) -> Diagnostic {
        match self {
            Issue::MissingCollectionTypeInfo => Diagnostic::error(
                path.clone(),
                "Invalid Attribute Implementation",
                format!(
                    "{PREAMBLE}\n\n\
                     \"{path}\" is missing the CustomType or ElementType field on a collection Attribute. \
                     One of these fields is required to prevent other unexpected errors or panics."
                ),
            ),
            Issue::MissingObjectTypeInfo => Diagnostic::error(
                path.clone(),
                "Invalid Attribute Implementation",
                format!(
                    "{PREAMBLE}\n\n\
                     \"{path}\" is missing the AttributeTypes or CustomType field on an object Attribute. \
                     One of these fields is required to prevent other unexpected errors or panics."
                ),
            ),
            Issue::DynamicInCollection => Diagnostic::error(
                path.clone(),
                "Invalid Schema Implementation",
                format!(
                    "{PREAMBLE}\n\n\
                     \"{path}\" is a collection type that contains a dynamic type. \
                     Dynamic types inside of collections are not currently supported."
                ),
            ),
            Issue::DynamicInNestedAttribute => Diagnostic::error(
                path.clone(),
                "Invalid Schema Implementation",
                format!(
                    "{PREAMBLE}\n\n\
                     \"{path}\" is an attribute that contains a collection type with a nested dynamic type.\n\n\
                     Dynamic types inside of collections are not currently supported. \
                     If underlying dynamic values are required, replace the \"{path}\" attribute definition with DynamicAttribute instead."
                ),
            ),
            Issue::DynamicInNestedBlock => Diagnostic::error(
                path.clone(),
                "Invalid Schema Implementation",
                format!(
                    "{PREAMBLE}\n\n\
                     \"{path}\" is a block that contains a collection type with a nested dynamic type.\n\n\
                     Dynamic types inside of collections are not currently supported. \
                     If underlying dynamic values are required, replace the \"{path}\" block definition with a DynamicAttribute."
                ),
            ),
            Issue::WriteOnlyParentWithNonWriteOnlyChild => Diagnostic::error(
                path.clone(),
                "Invalid Schema Implementation",
                format!(
                    "{PREAMBLE}\n\n\
                     \"{path}\" is a WriteOnly nested attribute that contains a non-WriteOnly child attribute.\n\n\
                     Every child attribute of a WriteOnly nested attribute must also have WriteOnly set to true."
                ),
            ),
            Issue::ComputedParentWithWriteOnlyChild => Diagnostic::error(
                path.clone(),
                "Invalid Schema Implementation",
                format!(
                    "{PREAMBLE}\n\n\
                     \"{path}\" is a Computed nested attribute that contains a WriteOnly child attribute.\n\n\
                     Every child attribute of a Computed nested attribute must have WriteOnly set to false."
                ),
            ),
            Issue::InvalidName { name } => Diagnostic::error(
                path.clone(),
                "Invalid Attribute/Block Name",
                format!(
                    "{PREAMBLE}\n\n\
                     {name:?} at schema path \"{path}\" is an invalid attribute/block name. \
                     Names must only contain lowercase alphanumeric characters (a-z, 0-9) and underscores (_)."
                ),
            ),
        }
    }
}
