//! # provschema - provider schema declarations
//!
//! Typed configuration schemas for provider plugins: declare attributes, blocks and nested
//! objects, derive the value type of the whole schema, resolve structural paths into it and check
//! the declaration for mistakes before it is handed to the orchestration engine.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `provschema` works internally.
//!
//! ### Terms
//!
//! - a [schema::Schema] is the root, it holds named attributes and blocks
//! - an [attribute::Attribute] holds a value: a leaf, a collection, an object or a nested object
//!   of further attributes
//! - a [block::Block] groups attributes and other blocks, one or many times
//! - a [types::Type] is the shape of a value; every attribute and block has one and the schema's
//!   type is an object over all of them
//! - a [path::Path] is a list of steps from the root to some position: attribute names, list
//!   indices, map keys and set element values
//!
//! ### Declaring
//!
//! Schemas are built with chained calls. Adding a node to a schema moves it (and everything below
//! it) into the schema's [domain::SchemaDomain], which decides which flags have an effect and
//! which root names are reserved.
//!
//! ```
//! use provschema::attribute::{Attribute, NestedAttributeObject};
//! use provschema::block::{Block, NestedBlockObject};
//! use provschema::path::Path;
//! use provschema::schema::Schema;
//! use provschema::types::Type;
//!
//! let schema = Schema::new()
//!     .with_attribute("name", Attribute::string().required())
//!     .with_attribute(
//!         "disk",
//!         Attribute::list_nested(
//!             NestedAttributeObject::new().with_attribute("size", Attribute::int64().required()),
//!         )
//!         .optional(),
//!     )
//!     .with_block(
//!         "rule",
//!         Block::set(NestedBlockObject::new().with_attribute("port", Attribute::int64().required())),
//!     );
//!
//! let size = schema
//!     .attribute_at_path(&Path::root("disk").at_list_index(0).at_name("size"))
//!     .expect("declared attribute");
//! assert_eq!(size.get_type(), Type::Int64);
//! assert!(schema.validate().is_empty());
//! assert!(schema.validate_implementation().is_empty());
//! ```
//!
//! ### Resolving paths
//!
//! see [walk::walk_path]
//!
//! Every node takes a single [path::PathStep] and returns a [walk::PathTarget]: another node, or a
//! plain [types::Type] once the path leaves the schema tree and enters an attribute's value. Each
//! node accepts only the step matching how its children are addressed, anything else fails with a
//! [path::PathError]. A failed walk reports the steps it could not consume.
//!
//! [schema::Schema::attribute_at_path] insists on ending at an attribute,
//! [schema::Schema::type_at_path] accepts any destination.
//!
//! ### Validating
//!
//! Validation collects [diag::Diagnostics] instead of failing:
//!
//! - [schema::Schema::validate]: every name at every depth matches `^[a-z0-9_]+$`
//! - [schema::Schema::validate_implementation]: reserved root names, missing type information,
//!   dynamic values inside collections, write-only nesting rules
//! - [schema::Schema::validate_definitions]: every attribute is required, optional or computed;
//!   deprecations
//!
//! ### Schema documents
//!
//! see [definition::SchemaDocument::new]
//!
//! Schemas can also be declared in `*.schema.hcl` files. [hcl_documents::HclDocuments] loads and
//! indexes the root structures of all files, [definition::SchemaDocument] reads every
//! `schema "<domain>" "<name>" {}` block into a [schema::Schema].
//!
pub mod attribute;
pub mod block;
pub mod definition;
pub mod diag;
pub mod domain;
pub mod hcl_documents;
pub mod implementation;
pub mod path;
pub mod schema;
pub mod types;
mod util;
pub mod validator;
pub mod value;
mod visit;
pub mod walk;
