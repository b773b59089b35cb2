use crate::path::{ParsePathError, Path, PathStep};
use crate::value::Value;
use hcl::{Expression, Traversal, TraversalOperator};

pub(crate) trait TraversalExt {
    fn to_path(&self) -> Result<Path, ParsePathError>;
}

impl TraversalExt for Traversal {
    #[tracing::instrument(level = "trace", skip_all)]
    fn to_path(&self) -> Result<Path, ParsePathError> {
        let root = match &self.expr {
            Expression::Variable(var) => var.as_str().to_string(),
            Expression::Traversal(inner) => {
                // `<foo.bar>.baz` is walked as if it was `foo.bar.baz`
                let mut path = inner.to_path()?;
                for operator in &self.operators {
                    path = path.with_step(operator_to_step(operator)?);
                }
                return Ok(path);
            }
            other => return Err(ParsePathError::MissingRoot(other.to_string())),
        };

        let mut path = Path::root(root);
        for operator in &self.operators {
            path = path.with_step(operator_to_step(operator)?);
        }

        tracing::trace!(%path, "traversal converted");
        Ok(path)
    }
}

fn operator_to_step(operator: &TraversalOperator) -> Result<PathStep, ParsePathError> {
    match operator {
        TraversalOperator::GetAttr(ident) => Ok(PathStep::AttributeName(ident.to_string())),
        TraversalOperator::LegacyIndex(index) => i64::try_from(*index)
            .map(PathStep::ElementKeyInt)
            .map_err(|_| ParsePathError::UnsupportedOperator(format!(".{index}"))),
        TraversalOperator::Index(Expression::Number(num)) => match num.as_i64() {
            Some(index) => Ok(PathStep::ElementKeyInt(index)),
            None => Ok(PathStep::ElementKeyValue(Value::try_from(num.clone())?)),
        },
        TraversalOperator::Index(Expression::String(key)) => {
            Ok(PathStep::ElementKeyString(key.clone()))
        }
        TraversalOperator::Index(expr) => Ok(PathStep::ElementKeyValue(Value::try_from(
            expr.clone(),
        )?)),
        TraversalOperator::AttrSplat | TraversalOperator::FullSplat => Err(
            ParsePathError::UnsupportedOperator(format!("{operator:?}")),
        ),
    }
}

/// Helpers to read schema definition arguments
pub(crate) trait ExpressionExt {
    /// A bare identifier (`string`) or a quoted string (`"string"`)
    fn as_keyword(&self) -> Option<&str>;
}

impl ExpressionExt for Expression {
    fn as_keyword(&self) -> Option<&str> {
        match self {
            Expression::Variable(var) => Some(var.as_str()),
            Expression::String(s) => Some(s.as_str()),
            Expression::Parenthesis(inner) => inner.as_keyword(),
            _ => None,
        }
    }
}
