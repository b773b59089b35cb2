//! opaque validator handles
//!
//! Schemas carry validators for the host to run against configuration values. This crate stores
//! and returns them, it never invokes them.
use std::sync::Arc;

pub trait Validator: std::fmt::Debug + Send + Sync {
    /// Plain text description of what the validator enforces
    fn description(&self) -> String;

    fn markdown_description(&self) -> String {
        self.description()
    }
}

pub type ValidatorHandle = Arc<dyn Validator>;

/// Handles are equal when they point at the same validator instance
pub(crate) fn same_validators(a: &[ValidatorHandle], b: &[ValidatorHandle]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(a, b)| std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)))
}

/// A validator that only knows its own description
///
/// Schema documents reference validators by description; the host maps them to real logic.
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct NamedValidator {
    description: String,
}

impl Validator for NamedValidator {
    fn description(&self) -> String {
        self.description.clone()
    }
}
