//! value types
//!
//! [Type] describes the shape of a value that conforms to a schema. Leaf types have no children and
//! reject every path step. Collection types accept exactly the step that matches how their elements
//! are addressed; object types accept attribute names of declared members.
//!
//! Equality is structural. Object members compare as a map, their declaration order only matters for
//! iteration (and thus for the order diagnostics are reported in).
//!
//! The serialized form is the type description handed to the transport layer. It is deterministic:
//! object members are written in sorted order and every numeric leaf is a `"number"`.
use crate::path::{PathError, PathStep};
use indexmap::IndexMap;
use serde::ser::{SerializeSeq, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Bool,
    String,
    Int32,
    Int64,
    Float32,
    Float64,
    Number,
    Dynamic,
    List(Box<Type>),
    Set(Box<Type>),
    Map(Box<Type>),
    Object(IndexMap<String, Type>),
}

impl Type {
    pub fn list(element: Type) -> Self {
        Type::List(Box::new(element))
    }

    pub fn set(element: Type) -> Self {
        Type::Set(Box::new(element))
    }

    pub fn map(element: Type) -> Self {
        Type::Map(Box::new(element))
    }

    pub fn object<K: Into<String>>(members: impl IntoIterator<Item = (K, Type)>) -> Self {
        Type::Object(
            members
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        )
    }

    /// Type name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Type::Bool => "BoolType",
            Type::String => "StringType",
            Type::Int32 => "Int32Type",
            Type::Int64 => "Int64Type",
            Type::Float32 => "Float32Type",
            Type::Float64 => "Float64Type",
            Type::Number => "NumberType",
            Type::Dynamic => "DynamicType",
            Type::List(_) => "ListType",
            Type::Set(_) => "SetType",
            Type::Map(_) => "MapType",
            Type::Object(_) => "ObjectType",
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(
            self,
            Type::List(_) | Type::Set(_) | Type::Map(_) | Type::Object(_)
        )
    }

    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::List(element) | Type::Set(element) | Type::Map(element) => Some(element.as_ref()),
            _ => None,
        }
    }

    pub fn apply_path_step(&self, step: &PathStep) -> Result<&Type, PathError> {
        match (self, step) {
            (Type::List(element), PathStep::ElementKeyInt(_)) => Ok(element.as_ref()),
            (Type::Set(element), PathStep::ElementKeyValue(_)) => Ok(element.as_ref()),
            (Type::Map(element), PathStep::ElementKeyString(_)) => Ok(element.as_ref()),
            (Type::Object(members), PathStep::AttributeName(name)) => {
                members.get(name).ok_or_else(|| PathError::UndefinedMember {
                    name: name.clone(),
                })
            }
            _ => Err(PathError::cannot_step_into(step, self.name())),
        }
    }

    /// Whether this type is or transitively contains [Type::Dynamic]
    pub fn contains_dynamic(&self) -> bool {
        match self {
            Type::Dynamic => true,
            Type::List(element) | Type::Set(element) | Type::Map(element) => {
                element.contains_dynamic()
            }
            Type::Object(members) => members.values().any(Type::contains_dynamic),
            _ => false,
        }
    }

    /// Whether a list, set or map anywhere inside this type has a dynamic element
    ///
    /// A dynamic value directly inside an object is fine, a dynamic value inside a collection is not.
    pub fn contains_collection_with_dynamic(&self) -> bool {
        match self {
            Type::List(element) | Type::Set(element) | Type::Map(element) => {
                element.contains_dynamic()
            }
            Type::Object(members) => members
                .values()
                .any(Type::contains_collection_with_dynamic),
            _ => false,
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::List(element) | Type::Set(element) | Type::Map(element) => {
                write!(f, "{}[{element}]", self.name())
            }
            Type::Object(members) => {
                write!(f, "{}[", self.name())?;
                for (index, (name, ty)) in members.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name:?}:{ty}")?;
                }
                f.write_str("]")
            }
            leaf => f.write_str(leaf.name()),
        }
    }
}

impl serde::Serialize for Type {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Type::Bool => serializer.serialize_str("bool"),
            Type::String => serializer.serialize_str("string"),
            Type::Int32 | Type::Int64 | Type::Float32 | Type::Float64 | Type::Number => {
                serializer.serialize_str("number")
            }
            Type::Dynamic => serializer.serialize_str("dynamic"),
            Type::List(element) => serialize_pair(serializer, "list", element.as_ref()),
            Type::Set(element) => serialize_pair(serializer, "set", element.as_ref()),
            Type::Map(element) => serialize_pair(serializer, "map", element.as_ref()),
            Type::Object(members) => {
                let sorted: std::collections::BTreeMap<&str, &Type> = members
                    .iter()
                    .map(|(name, ty)| (name.as_str(), ty))
                    .collect();
                serialize_pair(serializer, "object", &sorted)
            }
        }
    }
}

fn serialize_pair<S, T>(serializer: S, kind: &str, inner: &T) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: serde::Serialize + ?Sized,
{
    let mut seq = serializer.serialize_seq(Some(2))?;
    seq.serialize_element(kind)?;
    seq.serialize_element(inner)?;
    seq.end()
}
