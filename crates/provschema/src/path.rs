//! structural paths
//!
//! A [Path] is an ordered list of [PathStep]s leading from a schema root to a nested position.
//! Each collection kind has exactly one natural step:
//! - objects, schemas and nested objects are entered by attribute name
//! - lists by integer index
//! - maps by string key
//! - sets by element value ([Value] fingerprint)
//!
//! Paths render the way practitioners write them: `disk[0].labels["env"]`, `rule[Value("tcp")]`.
use crate::util::TraversalExt;
use crate::value::Value;

/// One hop in a structural path
#[derive(Debug, Clone, PartialEq)]
pub enum PathStep {
    AttributeName(String),
    ElementKeyInt(i64),
    ElementKeyString(String),
    ElementKeyValue(Value),
}

impl PathStep {
    pub fn kind(&self) -> StepKind {
        match self {
            PathStep::AttributeName(_) => StepKind::AttributeName,
            PathStep::ElementKeyInt(_) => StepKind::ElementKeyInt,
            PathStep::ElementKeyString(_) => StepKind::ElementKeyString,
            PathStep::ElementKeyValue(_) => StepKind::ElementKeyValue,
        }
    }
}

/// Discriminant of a [PathStep], used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    AttributeName,
    ElementKeyInt,
    ElementKeyString,
    ElementKeyValue,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::AttributeName => f.write_str("AttributeName"),
            StepKind::ElementKeyInt => f.write_str("ElementKeyInt"),
            StepKind::ElementKeyString => f.write_str("ElementKeyString"),
            StepKind::ElementKeyValue => f.write_str("ElementKeyValue"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn root(name: impl Into<String>) -> Self {
        Self::empty().at_name(name)
    }

    pub fn at_name(&self, name: impl Into<String>) -> Self {
        self.with_step(PathStep::AttributeName(name.into()))
    }

    pub fn at_list_index(&self, index: i64) -> Self {
        self.with_step(PathStep::ElementKeyInt(index))
    }

    pub fn at_map_key(&self, key: impl Into<String>) -> Self {
        self.with_step(PathStep::ElementKeyString(key.into()))
    }

    pub fn at_set_value(&self, value: impl Into<Value>) -> Self {
        self.with_step(PathStep::ElementKeyValue(value.into()))
    }

    pub fn with_step(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_step(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    /// Renders the steps in their debug form, e.g. `AttributeName("disk") ElementKeyInt(0)`
    pub fn describe_steps(&self) -> String {
        self.steps
            .iter()
            .map(|step| format!("{step:?}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<Vec<PathStep>> for Path {
    fn from(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }
}

impl FromIterator<PathStep> for Path {
    fn from_iter<T: IntoIterator<Item = PathStep>>(iter: T) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::AttributeName(name) if index == 0 => f.write_str(name)?,
                PathStep::AttributeName(name) => write!(f, ".{name}")?,
                PathStep::ElementKeyInt(key) => write!(f, "[{key}]")?,
                PathStep::ElementKeyString(key) => write!(f, "[{key:?}]")?,
                PathStep::ElementKeyValue(value) => write!(f, "[Value({value})]")?,
            }
        }
        Ok(())
    }
}

impl serde::Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Parses a path written as an HCL traversal, e.g. `disk[0].labels["env"]`
///
/// Index expressions that are neither integers nor strings are taken as set element values:
/// `rule[{ protocol = "tcp" }]`.
impl std::str::FromStr for Path {
    type Err = ParsePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Path::empty());
        }

        let expr: hcl_edit::expr::Expression = s.parse()?;
        match hcl::Expression::from(expr) {
            hcl::Expression::Variable(var) => Ok(Path::root(var.as_str())),
            hcl::Expression::Traversal(traversal) => traversal.to_path(),
            other => Err(ParsePathError::MissingRoot(other.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ParsePathError {
    #[error("Unable to parse path expression")]
    Syntax(#[from] hcl_edit::parser::Error),
    #[error("Path must start with an attribute name, found `{0}`")]
    MissingRoot(String),
    #[error("Unsupported path operator `{0}`")]
    UnsupportedOperator(String),
    #[error("Unsupported element key")]
    UnsupportedKey(#[from] crate::value::ValueError),
}

/// Failure to apply a single [PathStep]
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("cannot apply step {step} to {target}")]
    CannotStepInto { step: StepKind, target: &'static str },
    #[error("undefined attribute name {name} in ObjectType")]
    UndefinedMember { name: String },
    #[error("no {child} {name:?} on {target}")]
    NoSuchChild {
        name: String,
        child: &'static str,
        target: &'static str,
    },
    #[error("could not find attribute or block {name:?} in schema")]
    NotFound { name: String },
    #[error("cannot apply step {step} to schema")]
    CannotStepAtRoot { step: StepKind },
}

impl PathError {
    pub(crate) fn cannot_step_into(step: &PathStep, target: &'static str) -> Self {
        PathError::CannotStepInto {
            step: step.kind(),
            target,
        }
    }
}

/// Failure to walk a whole [Path], carrying the steps that could not be consumed
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{} still remains in the path: {}", .remaining.describe_steps(), .source)]
pub struct WalkError {
    pub remaining: Path,
    pub source: PathError,
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display() {
        let path = Path::root("disk")
            .at_list_index(0)
            .at_name("labels")
            .at_map_key("env")
            .at_set_value("tcp");

        assert_eq!(path.to_string(), r#"disk[0].labels["env"][Value("tcp")]"#);
        assert_eq!(Path::empty().at_list_index(0).to_string(), "[0]");
        assert_eq!(Path::empty().to_string(), "");
    }

    #[test]
    fn parse() {
        let path: Path = r#"disk[0].labels["env"]"#.parse().expect("valid path");
        assert_eq!(
            path,
            Path::root("disk")
                .at_list_index(0)
                .at_name("labels")
                .at_map_key("env")
        );

        let path: Path = "name".parse().expect("valid path");
        assert_eq!(path, Path::root("name"));

        let path: Path = "".parse().expect("valid path");
        assert!(path.is_empty());
    }

    #[test]
    fn parse_set_value() {
        let path: Path = "rule[true]".parse().expect("valid path");
        assert_eq!(path, Path::root("rule").at_set_value(true));
    }

    #[test]
    fn parse_rejects_splat() {
        let result = "disk[*].size".parse::<Path>();
        assert!(matches!(
            result,
            Err(ParsePathError::UnsupportedOperator(_))
        ));
    }

    #[test]
    fn walk_error_names_remaining_steps() {
        let error = WalkError {
            remaining: Path::root("non_existent"),
            source: PathError::NotFound {
                name: "non_existent".to_string(),
            },
        };

        assert_eq!(
            error.to_string(),
            r#"AttributeName("non_existent") still remains in the path: could not find attribute or block "non_existent" in schema"#
        );
    }
}
