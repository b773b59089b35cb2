use super::Visit;
use crate::attribute::{Attribute, NestedAttributeObject};
use crate::block::{Block, NestedBlockObject};
use crate::path::Path;
use crate::schema::Schema;

/// An attribute or block together with where it was found
#[derive(Debug)]
pub struct Node<'a> {
    pub name: &'a str,
    pub path: Path,
    pub kind: NodeKind<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum NodeKind<'a> {
    Attribute(&'a Attribute),
    Block(&'a Block),
}

/// Recursively visit all attributes and blocks, parents before their children
pub trait VisitNodes {
    fn visit_nodes<'a>(&'a self, parent: &Path, visitor: &mut dyn Visit<Node<'a>>);
}

impl VisitNodes for Schema {
    fn visit_nodes<'a>(&'a self, parent: &Path, visitor: &mut dyn Visit<Node<'a>>) {
        for (name, attribute) in self.attributes() {
            visit_attribute(name, attribute, parent, visitor);
        }
        for (name, block) in self.blocks() {
            visit_block(name, block, parent, visitor);
        }
    }
}

impl VisitNodes for NestedAttributeObject {
    fn visit_nodes<'a>(&'a self, parent: &Path, visitor: &mut dyn Visit<Node<'a>>) {
        for (name, attribute) in self.attributes() {
            visit_attribute(name, attribute, parent, visitor);
        }
    }
}

impl VisitNodes for NestedBlockObject {
    fn visit_nodes<'a>(&'a self, parent: &Path, visitor: &mut dyn Visit<Node<'a>>) {
        for (name, attribute) in self.attributes() {
            visit_attribute(name, attribute, parent, visitor);
        }
        for (name, block) in self.blocks() {
            visit_block(name, block, parent, visitor);
        }
    }
}

fn visit_attribute<'a>(
    name: &'a str,
    attribute: &'a Attribute,
    parent: &Path,
    visitor: &mut dyn Visit<Node<'a>>,
) {
    let path = parent.at_name(name);
    visitor.visit(&Node {
        name,
        path: path.clone(),
        kind: NodeKind::Attribute(attribute),
    });

    if let Some(object) = attribute.nested_object() {
        object.visit_nodes(&path, visitor);
    }
}

fn visit_block<'a>(
    name: &'a str,
    block: &'a Block,
    parent: &Path,
    visitor: &mut dyn Visit<Node<'a>>,
) {
    let path = parent.at_name(name);
    visitor.visit(&Node {
        name,
        path: path.clone(),
        kind: NodeKind::Block(block),
    });

    block.nested_object().visit_nodes(&path, visitor);
}
