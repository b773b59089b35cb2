//! schema domains
//!
//! The same attribute definitions are used for different kinds of schemas. Each kind restricts what
//! its attributes can express and which root names the host already uses for its own syntax.
//!
//! | domain               | computed | sensitive | write only | reserved root names              |
//! |----------------------|----------|-----------|------------|----------------------------------|
//! | `provider`           |          | yes       |            | `alias`, `version`               |
//! | `provider_meta`      |          |           |            |                                  |
//! | `resource`           | yes      | yes       | yes        | `count`, `depends_on`, ...       |
//! | `data_source`        | yes      | yes       |            | same as `resource`               |
//! | `ephemeral_resource` | yes      | yes       |            | same as `resource`               |
//! | `list_resource`      |          |           |            | same as `resource`               |
use crate::diag::Diagnostic;
use crate::path::Path;

const RESERVED_PROVIDER_NAMES: &[&str] = &["alias", "version"];

const RESERVED_RESOURCE_NAMES: &[&str] = &[
    "connection",
    "count",
    "depends_on",
    "for_each",
    "lifecycle",
    "provider",
    "provisioner",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchemaDomain {
    Provider,
    ProviderMeta,
    #[default]
    Resource,
    DataSource,
    EphemeralResource,
    ListResource,
}

impl SchemaDomain {
    pub fn supports_computed(&self) -> bool {
        matches!(
            self,
            SchemaDomain::Resource | SchemaDomain::DataSource | SchemaDomain::EphemeralResource
        )
    }

    pub fn supports_sensitive(&self) -> bool {
        matches!(
            self,
            SchemaDomain::Provider
                | SchemaDomain::Resource
                | SchemaDomain::DataSource
                | SchemaDomain::EphemeralResource
        )
    }

    pub fn supports_write_only(&self) -> bool {
        matches!(self, SchemaDomain::Resource)
    }

    pub fn reserved_root_names(&self) -> &'static [&'static str] {
        match self {
            SchemaDomain::Provider => RESERVED_PROVIDER_NAMES,
            SchemaDomain::ProviderMeta => &[],
            SchemaDomain::Resource
            | SchemaDomain::DataSource
            | SchemaDomain::EphemeralResource
            | SchemaDomain::ListResource => RESERVED_RESOURCE_NAMES,
        }
    }

    /// Reports `name` when it is a reserved root name in this domain
    ///
    /// Only root names are reserved; nested attributes may use any valid name.
    pub fn check_reserved_name(&self, name: &str, path: &Path) -> Option<Diagnostic> {
        if path.len() != 1 || !self.reserved_root_names().contains(&name) {
            return None;
        }

        let schema_kind = match self {
            SchemaDomain::Provider | SchemaDomain::ProviderMeta => "provider",
            _ => "resource or data source",
        };

        Some(Diagnostic::error(
            path.clone(),
            "Reserved Root Attribute/Block Name",
            format!(
                "When validating the {schema_kind} schema, an implementation issue was found. \
                 This is always an issue with the provider and should be reported to the provider developers.\n\n\
                 {name:?} is a reserved root attribute/block name. \
                 This is to prevent practitioners from needing special configuration syntax."
            ),
        ))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaDomain::Provider => "provider",
            SchemaDomain::ProviderMeta => "provider_meta",
            SchemaDomain::Resource => "resource",
            SchemaDomain::DataSource => "data_source",
            SchemaDomain::EphemeralResource => "ephemeral_resource",
            SchemaDomain::ListResource => "list_resource",
        }
    }
}

impl std::fmt::Display for SchemaDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("Unknown schema domain {0:?}")]
pub struct UnknownDomain(pub String);

impl std::str::FromStr for SchemaDomain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provider" => Ok(SchemaDomain::Provider),
            "provider_meta" => Ok(SchemaDomain::ProviderMeta),
            "resource" => Ok(SchemaDomain::Resource),
            "data_source" => Ok(SchemaDomain::DataSource),
            "ephemeral_resource" => Ok(SchemaDomain::EphemeralResource),
            "list_resource" => Ok(SchemaDomain::ListResource),
            other => Err(UnknownDomain(other.to_string())),
        }
    }
}
