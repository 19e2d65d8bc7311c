//! Whole-model generation over several origins.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use refract_core::{EmitterConfig, GeneratedFiles, Generator, GeneratorConfig, MatchPolicy, Model};

const MODEL: &str = r#"{
  "billing": {
    "origin": "billing",
    "sources": [
      {
        "origin": "billing",
        "shape": {
          "kind": "Enumeration",
          "name": "Status",
          "values": [{ "key": "OPEN", "value": "open" }, { "key": "PAID", "value": "paid" }]
        }
      },
      {
        "origin": "billing",
        "shape": {
          "kind": "Interface",
          "name": "Invoice",
          "comment": "A bill sent to a customer.",
          "fields": [
            { "name": "id", "type": { "name": "string", "origin": "billing", "kind": "String" }, "isRequired": true },
            { "name": "status", "type": { "name": "Status", "origin": "billing", "kind": "Enumeration" } },
            { "name": "owner", "type": { "name": "User", "origin": "users", "kind": "Entity" }, "isRequired": true },
            {
              "name": "lines",
              "type": {
                "name": "Page",
                "origin": "shared",
                "kind": "Entity",
                "generics": { "T": { "name": "Line", "origin": "billing", "kind": "Entity" } }
              }
            }
          ]
        }
      },
      {
        "origin": "billing",
        "shape": {
          "kind": "Interface",
          "name": "Line",
          "fields": [{ "name": "amount", "type": { "name": "number", "origin": "billing", "kind": "Number" } }]
        }
      },
      {
        "origin": "billing",
        "shape": {
          "kind": "Interface",
          "name": "Refund",
          "fields": [{ "name": "reason", "type": { "name": "string", "origin": "billing", "kind": "String" } }]
        }
      }
    ],
    "controllers": [
      {
        "name": "InvoiceController",
        "origin": "billing",
        "methods": [
          {
            "name": "get",
            "path": "/invoices/{id}",
            "request": "get",
            "params": { "name": "Params", "origin": "billing", "kind": "Entity" },
            "response": [
              { "name": "Invoice", "origin": "billing", "kind": "Entity" },
              { "name": "Refund", "origin": "billing", "kind": "Entity" }
            ]
          },
          {
            "name": "delete",
            "path": "/invoices/{id}",
            "request": "delete",
            "params": { "name": "Params", "origin": "billing", "kind": "Entity" }
          }
        ],
        "interplay": [
          {
            "origin": "billing",
            "shape": {
              "kind": "Interface",
              "name": "Params",
              "fields": [{ "name": "id", "type": { "name": "string", "origin": "billing", "kind": "String" }, "isRequired": true }]
            }
          }
        ]
      }
    ]
  },
  "users": {
    "origin": "users",
    "sources": [
      {
        "origin": "users",
        "shape": {
          "kind": "Interface",
          "name": "User",
          "isDuplicate": true,
          "fields": [{ "name": "name", "type": { "name": "string", "origin": "users", "kind": "String" } }]
        }
      }
    ]
  },
  "shared": {
    "origin": "shared",
    "sources": [
      {
        "origin": "shared",
        "shape": {
          "kind": "Interface",
          "name": "Page",
          "variables": ["T"],
          "fields": [
            {
              "name": "items",
              "type": {
                "name": "Array",
                "origin": "shared",
                "kind": "List",
                "generics": [{ "name": "T", "origin": "shared", "kind": "TypeParameter" }]
              }
            }
          ]
        }
      }
    ]
  }
}"#;

fn config() -> GeneratorConfig {
    GeneratorConfig::new("/out")
        .with_emitter(EmitterConfig::TypescriptDefinition {
            emission: "typescript".into(),
        })
        .with_emitter(EmitterConfig::GraphqlDefinition {
            emission: "graphql".into(),
            nullable: true,
            postfix: String::new(),
        })
        .with_emitter(EmitterConfig::GraphqlAggregator {
            emission: "aggregator".into(),
        })
        .with_emitter(EmitterConfig::ApiBinding {
            emission: "api".into(),
            api_path: "/src/api.ts".into(),
        })
}

fn generate(config: GeneratorConfig) -> GeneratedFiles {
    let model = Model::from_json(MODEL).unwrap();
    Generator::new(config).unwrap().generate(&model).unwrap()
}

fn file(files: &GeneratedFiles, path: &str) -> String {
    files.get(Path::new(path)).unwrap().join("\n")
}

#[test]
fn test_file_layout() {
    let files = generate(config());
    let paths: Vec<String> = files.paths().map(|p| p.display().to_string()).collect();

    for expected in [
        "/out/typescript/Billing.ts",
        "/out/typescript/Users.ts",
        "/out/typescript/Shared.ts",
        "/out/graphql/Billing.ts",
        "/out/aggregator/Billing.ts",
        "/out/aggregator/Query.ts",
        "/out/aggregator/Mutation.ts",
        "/out/api/Billing.ts",
        "/out/support/Runtime.ts",
    ] {
        assert!(paths.iter().any(|p| p == expected), "missing {expected} in {paths:?}");
    }
}

#[test]
fn test_every_import_resolves_to_a_generated_file() {
    let files = generate(config());

    for (path, lines) in files.iter() {
        let dir = path.parent().unwrap();
        for line in lines.iter().filter(|l| l.starts_with("import ")) {
            let Some(target) = line.split('\'').nth(1) else {
                continue;
            };
            if !target.starts_with('.') {
                continue;
            }
            if target.ends_with("src/api") {
                continue;
            }
            let resolved = normalize(&dir.join(format!("{target}.ts")));
            assert!(
                files.contains(Path::new(&resolved)),
                "{} imports {target}, which was not generated",
                path.display()
            );
        }
    }
}

fn normalize(path: &Path) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.to_str().unwrap().split('/') {
        match part {
            "." | "" => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    format!("/{}", parts.join("/"))
}

#[test]
fn test_declarations() {
    let files = generate(config());
    let billing = file(&files, "/out/typescript/Billing.ts");

    assert!(billing.contains("import * as UsersTypescript from './Users';"));
    assert!(billing.contains("import * as SharedTypescript from './Shared';"));
    assert!(billing.contains("/**\n * A bill sent to a customer.\n */\nexport interface Invoice {"));
    assert!(billing.contains("owner: UsersTypescript.User;"));
    assert!(billing.contains("lines?: SharedTypescript.Page<Line>;"));
    assert!(billing.contains("export type Status = \"open\" | \"paid\";"));

    let invoice = billing.find("export interface Invoice").unwrap();
    let status = billing.find("export enum StatusEnum").unwrap();
    assert!(invoice < status);
}

#[test]
fn test_schema_names_are_unique() {
    let files = generate(config());
    let graphql = file(&files, "/out/graphql/Billing.ts");
    let users = file(&files, "/out/graphql/Users.ts");
    let shared = file(&files, "/out/graphql/Shared.ts");

    assert!(graphql.contains("name: 'Status',"));
    assert!(graphql.contains("'lines': {type: SharedGraphql.Page(isInput, Line(isInput))"));
    assert!(users.contains("? `UserUsersInput`"));
    assert!(shared.contains("? `Page_${T}Input`"));
}

#[test]
fn test_aggregator_and_bindings() {
    let files = generate(config());
    let aggregator = file(&files, "/out/aggregator/Billing.ts");

    assert!(aggregator.contains("export namespace InvoiceControllerInterplay {"));
    assert!(aggregator.contains("params: {type: new graphql.GraphQLNonNull(InvoiceControllerInterplay.Params(true))},"));
    assert!(aggregator.contains("name: 'getInvoiceControllerResponse',"));
    assert!(aggregator.contains("BillingApi.InvoiceController.del(args,"));

    let query = file(&files, "/out/aggregator/Query.ts");
    assert!(query.contains("InvoiceController: {type: BillingAggregator.InvoiceController, resolve: () => ({})},"));

    let api = file(&files, "/out/api/Billing.ts");
    assert!(api.contains("import {api} from '../../src/api';"));
    assert!(api.contains(".path((p: Params) => `/invoices/${p.id}`)"));
    assert!(api.contains(".request<BillingTypescript.Invoice | BillingTypescript.Refund, void, void>('get')"));
}

#[test]
fn test_union_policy_reaches_generated_code() {
    let mut config = config();
    config.union_match = MatchPolicy::All;
    let files = generate(config);

    assert!(file(&files, "/out/aggregator/Billing.ts").contains("resolveType(v, c, i, types, 'all'),"));
    assert!(file(&files, "/out/support/Runtime.ts").contains("policy: MatchPolicy = 'all',"));
}

#[test]
fn test_external_support_modules() {
    let mut config = config();
    config.support.raw_type_path = Some("/src/graphql/raw.ts".into());
    config.support.resolve_type_path = Some("/src/graphql/resolveType.ts".into());
    let files = generate(config);

    assert!(!files.contains(Path::new("/out/support/Runtime.ts")));
    let graphql = file(&files, "/out/graphql/Billing.ts");
    assert!(graphql.contains("import {Raw} from '../../src/graphql/raw';"));
}
