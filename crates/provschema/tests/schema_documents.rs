//! Schema document tests
//!
//! Reads schemas from HCL documents and snapshots what validation and path resolution report.

use provschema::definition::SchemaDocument;
use provschema::diag::Diagnostics;
use provschema::domain::SchemaDomain;
use provschema::hcl_documents;
use provschema::path::Path;
use provschema::walk::{walk_path, PathTarget};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("PROVSCHEMA_LOG"))
        .with_test_writer()
        .try_init();
}

fn render(diagnostics: &Diagnostics) -> String {
    diagnostics
        .iter()
        .map(|diagnostic| {
            format!(
                "{}: {} ({})",
                diagnostic.severity, diagnostic.summary, diagnostic.path
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn document() -> SchemaDocument {
    SchemaDocument::new(&hcl_documents! {
        "instance.schema.hcl" => r#"
        schema "resource" "instance" {
          deprecation_message = "use instance_v2"

          attribute "count" {
            type     = number
            optional = true
          }

          attribute "Name" {
            type     = string
            required = true
          }

          attribute "tags" {
            type     = list
            optional = true
          }

          attribute "labels" {
            type     = list(dynamic)
            optional = true
          }

          attribute "secret" {
            nesting    = single
            optional   = true
            write_only = true

            attribute "value" {
              type     = string
              optional = true
            }
          }

          attribute "zone" {
            type = string
          }

          block "rule" {
            nesting             = list
            deprecation_message = "use rules"

            attribute "port" {
              type     = int64
              required = true
              computed = true
            }
          }
        }
        "#,
        "image.schema.hcl" => r#"
        schema "data_source" "image" {
          attribute "id" {
            type     = string
            computed = true
          }

          attribute "filter" {
            type     = map(string)
            optional = true
          }

          block "owner" {
            nesting = single

            attribute "account" {
              type     = int64
              optional = true
            }
          }
        }
        "#
    })
    .expect("valid schema document")
}

#[test]
fn validation_passes() {
    init_tracing();
    let document = document();
    let schema = document
        .get(SchemaDomain::Resource, "instance")
        .expect("instance schema");

    insta::assert_snapshot!(render(&schema.validate()), @"Error: Invalid Attribute/Block Name (Name)");

    insta::assert_snapshot!(render(&schema.validate_implementation()), @r###"
    Error: Reserved Root Attribute/Block Name (count)
    Error: Invalid Attribute Implementation (tags)
    Error: Invalid Schema Implementation (labels)
    Error: Invalid Schema Implementation (secret)
    "###);

    insta::assert_snapshot!(render(&schema.validate_definitions()), @r###"
    Warning: Deprecated Schema ()
    Error: Invalid Attribute Definition (zone)
    Warning: Deprecated Block (rule)
    Error: Invalid Attribute Definition (rule.port)
    "###);
}

#[test]
fn clean_schema() {
    init_tracing();
    let document = document();
    let (key, schema) = document.find("image").expect("unambiguous name");

    assert_eq!(key.to_string(), "data_source.image");
    assert!(schema.validate().is_empty());
    assert!(schema.validate_implementation().is_empty());
    assert!(schema.validate_definitions().is_empty());

    insta::assert_snapshot!(
        schema.type_description().expect("serializable"),
        @r###"["object",{"filter":["map","string"],"id":"string","owner":["object",{"account":"number"}]}]"###
    );
}

#[test]
fn resolve_paths() {
    init_tracing();
    let document = document();
    let (_, schema) = document.find("resource.instance").expect("schema");

    let resolve = |path: &str| -> String {
        let path: Path = path.parse().expect("valid path");
        match walk_path(PathTarget::Schema(schema), &path) {
            Ok(target) => format!("`{path}` -> {}", target.kind_name()),
            Err(err) => format!("`{path}` -> {err}"),
        }
    };

    let rendered = [
        "",
        "rule",
        "rule[0]",
        "rule[0].port",
        "secret.value",
        "labels[3]",
        "rule[\"a\"].port",
        "missing.x",
    ]
    .map(resolve)
    .join("\n");

    insta::assert_snapshot!(rendered, @r###"
    `` -> Schema
    `rule` -> ListNestedBlock
    `rule[0]` -> NestedBlockObject
    `rule[0].port` -> Int64Attribute
    `secret.value` -> StringAttribute
    `labels[3]` -> DynamicType
    `rule["a"].port` -> ElementKeyString("a") AttributeName("port") still remains in the path: cannot apply step ElementKeyString to ListNestedBlock
    `missing.x` -> AttributeName("missing") AttributeName("x") still remains in the path: could not find attribute or block "missing" in schema
    "###);
}

#[test]
fn attribute_lookup_diagnostics() {
    init_tracing();
    let document = document();
    let (_, schema) = document.find("instance").expect("schema");

    let port = schema
        .attribute_at_path(&"rule[0].port".parse().expect("valid path"))
        .expect("attribute");
    assert!(port.is_required());

    let diagnostic = schema
        .attribute_at_path(&"rule".parse().expect("valid path"))
        .expect_err("block is not an attribute");
    insta::assert_snapshot!(diagnostic.to_string(), @r###"
    Error: Invalid Schema Path (at rule)

    When attempting to get the framework attribute associated with a schema path, an unexpected error was returned. This is always an issue with the provider. Please report this to the provider developers.

    Path: rule
    Original Error: path leads to block, not an attribute
    "###);
}

#[test]
fn definition_errors() {
    init_tracing();
    let documents = hcl_documents! {
        "broken.schema.hcl" => r#"
        schema "resource" "broken" {
          attribute "a" {
            type = tuple(string)
          }
        }
        schema "gadget" "thing" {}
        "#
    };

    let errors = SchemaDocument::new(&documents).expect_err("invalid document");
    insta::assert_snapshot!(errors.to_string(), @r###"
    2 issue(s) in schema definitions
    - schema block #0 at `a`: invalid type `tuple(string)`: unknown type constructor
    - schema block #1: Unknown schema domain "gadget"
    "###);

    let locations: Vec<String> = errors
        .issues()
        .iter()
        .filter_map(|issue| issue.root_block())
        .map(|block| documents.describe_block(block))
        .collect();
    assert_eq!(
        locations,
        vec![
            r#"broken.schema.hcl: schema "resource" "broken""#,
            r#"broken.schema.hcl: schema "gadget" "thing""#,
        ]
    );
}
