//! value fingerprints
//!
//! Set elements have no position or key, so a path into a set names the element by its value.
//! [Value] is that fingerprint: scalars, tuples of fingerprints and objects with string keys. Keys
//! keep the order they were written in.
//!
//! There is no `null` and no unknown value. A fingerprint always identifies a concrete element.

/// All possible fingerprint shapes
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Tuple(Vec<Value>),
    Object(indexmap::IndexMap<String, Value>),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("null is not a valid element value")]
    Null,
    #[error("number {0} is out of range")]
    OutOfRange(String),
    #[error("expression cannot be used as an element value: {0}")]
    Unresolved(String),
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Tuple(value.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<hcl::Number> for Value {
    type Error = ValueError;

    fn try_from(value: hcl::Number) -> Result<Self, Self::Error> {
        if let Some(int) = value.as_i64() {
            return Ok(Value::Int(int));
        }

        value
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| ValueError::OutOfRange(value.to_string()))
    }
}

impl TryFrom<hcl::Expression> for Value {
    type Error = ValueError;

    fn try_from(value: hcl::Expression) -> Result<Self, Self::Error> {
        use hcl::Expression;

        match value {
            Expression::Bool(bool) => Ok(bool.into()),
            Expression::Number(num) => num.try_into(),
            Expression::String(s) => Ok(s.into()),
            Expression::Array(array) => Ok(Value::Tuple(
                array
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            )),
            Expression::Object(object) => Ok(Value::Object(
                object
                    .into_iter()
                    .map(|(k, v)| -> Result<(String, Value), ValueError> {
                        Ok((object_key_to_string(k), Value::try_from(v)?))
                    })
                    .collect::<Result<_, _>>()?,
            )),
            Expression::Parenthesis(inner) => Value::try_from(*inner),
            Expression::Null => Err(ValueError::Null),
            other => Err(ValueError::Unresolved(other.to_string())),
        }
    }
}

pub(crate) fn object_key_to_string(key: hcl::ObjectKey) -> String {
    match key {
        hcl::ObjectKey::Identifier(ident) => ident.to_string(),
        hcl::ObjectKey::Expression(hcl::Expression::String(s)) => s,
        other => other.to_string(),
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::String(value) => write!(f, "{value:?}"),
            Value::Tuple(values) => {
                f.write_str("[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            Value::Object(values) => {
                f.write_str("{")?;
                for (index, (key, value)) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}
