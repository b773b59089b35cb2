//! path resolution
//!
//! Every node of a schema can take a single [PathStep] and return the node it leads to. Walking a
//! [Path] repeats that from the schema root until the path is consumed or a step fails.
use crate::attribute::{Attribute, NestedAttributeObject};
use crate::block::{Block, NestedBlockObject};
use crate::path::{Path, PathError, PathStep, WalkError};
use crate::schema::Schema;
use crate::types::Type;

/// Anything a path can lead to
#[derive(Debug, Clone)]
pub enum PathTarget<'a> {
    Schema(&'a Schema),
    Attribute(&'a Attribute),
    Block(&'a Block),
    NestedAttributeObject(&'a NestedAttributeObject),
    NestedBlockObject(&'a NestedBlockObject),
    /// A position inside an attribute value that has no schema node of its own
    Type(Type),
}

impl<'a> PathTarget<'a> {
    pub fn apply_path_step(&self, step: &PathStep) -> Result<PathTarget<'a>, PathError> {
        match self {
            PathTarget::Schema(schema) => schema.apply_path_step(step),
            PathTarget::Attribute(attribute) => attribute.apply_path_step(step),
            PathTarget::Block(block) => block.apply_path_step(step),
            PathTarget::NestedAttributeObject(object) => object.apply_path_step(step),
            PathTarget::NestedBlockObject(object) => object.apply_path_step(step),
            PathTarget::Type(ty) => ty
                .apply_path_step(step)
                .map(|ty| PathTarget::Type(ty.clone())),
        }
    }

    pub fn type_of(&self) -> Type {
        match self {
            PathTarget::Schema(schema) => schema.type_of(),
            PathTarget::Attribute(attribute) => attribute.get_type(),
            PathTarget::Block(block) => block.get_type(),
            PathTarget::NestedAttributeObject(object) => object.type_of(),
            PathTarget::NestedBlockObject(object) => object.type_of(),
            PathTarget::Type(ty) => ty.clone(),
        }
    }

    /// Short description used in messages and CLI output
    pub fn kind_name(&self) -> &'static str {
        match self {
            PathTarget::Schema(_) => "Schema",
            PathTarget::Attribute(attribute) => attribute.name(),
            PathTarget::Block(block) => block.name(),
            PathTarget::NestedAttributeObject(_) => "NestedAttributeObject",
            PathTarget::NestedBlockObject(_) => "NestedBlockObject",
            PathTarget::Type(ty) => ty.name(),
        }
    }
}

/// Applies every step of `path` starting at `start`
#[tracing::instrument(level = "trace", skip_all, fields(%path))]
pub fn walk_path<'a>(start: PathTarget<'a>, path: &Path) -> Result<PathTarget<'a>, WalkError> {
    let mut current = start;

    for (index, step) in path.steps().iter().enumerate() {
        current = current.apply_path_step(step).map_err(|source| {
            let remaining = Path::from(path.steps()[index..].to_vec());
            tracing::debug!(%remaining, %source, "path step failed");
            WalkError { remaining, source }
        })?;
        tracing::trace!(?step, target = current.kind_name(), "path step applied");
    }

    Ok(current)
}
