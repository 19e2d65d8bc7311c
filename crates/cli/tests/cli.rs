//! End-to-end runs of the `refract` binary entry point.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use refract_cli::generate::{GenerateArgs, generate};
use refract_cli::run_cli;
use tempfile::TempDir;

const MODEL: &str = r#"{
  "billing": {
    "origin": "billing",
    "sources": [
      {
        "origin": "billing",
        "shape": {
          "kind": "Interface",
          "name": "Invoice",
          "fields": [
            { "name": "id", "type": { "name": "string", "origin": "billing", "kind": "String" }, "isRequired": true },
            { "name": "owner", "type": { "name": "User", "origin": "users", "kind": "Entity" } }
          ]
        }
      }
    ],
    "controllers": [
      {
        "name": "InvoiceController",
        "origin": "billing",
        "methods": [
          {
            "name": "list",
            "path": "/invoices",
            "request": "get",
            "response": [{ "name": "Invoice", "origin": "billing", "kind": "Entity" }]
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
          "fields": [{ "name": "name", "type": { "name": "string", "origin": "users", "kind": "String" } }]
        }
      }
    ]
  }
}"#;

const CONFIG: &str = r#"
out_dir = "out"

[[emitters]]
kind = "typescript-definition"
emission = "typescript"

[[emitters]]
kind = "graphql-definition"
emission = "graphql"

[[emitters]]
kind = "graphql-aggregator"
emission = "aggregator"

[[emitters]]
kind = "api-binding"
emission = "api"
api_path = "src/api.ts"

[lint]
add_ts_ignore = true
"#;

fn project() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("refract.toml"), CONFIG).unwrap();
    fs::write(dir.path().join("model.json"), MODEL).unwrap();
    dir
}

fn args(dir: &Path) -> GenerateArgs {
    GenerateArgs {
        config: dir.join("refract.toml"),
        model: dir.join("model.json"),
        out: None,
        dry_run: false,
    }
}

#[test]
fn test_generate_writes_files_under_config_dir() {
    let dir = project();
    let files = generate(&args(dir.path())).unwrap();

    let out = dir.path().join("out");
    for relative in [
        "typescript/Billing.ts",
        "typescript/Users.ts",
        "graphql/Billing.ts",
        "aggregator/Query.ts",
        "api/Billing.ts",
        "support/Runtime.ts",
    ] {
        assert!(out.join(relative).is_file(), "missing {relative}");
    }
    assert_eq!(files.len(), fs::read_dir(&out).unwrap().flat_map(|d| fs::read_dir(d.unwrap().path()).unwrap()).count());

    let billing = fs::read_to_string(out.join("typescript/Billing.ts")).unwrap();
    assert!(billing.starts_with("/* tslint:disable */\n"));
    assert!(billing.contains("owner?: UsersTypescript.User;"));
    assert!(billing.ends_with('\n'));

    let api = fs::read_to_string(out.join("api/Billing.ts")).unwrap();
    assert!(api.contains("import {api} from '../../src/api';"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = project();
    let mut args = args(dir.path());
    args.dry_run = true;

    let files = generate(&args).unwrap();
    assert!(!files.is_empty());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_out_overrides_config() {
    let dir = project();
    let target = dir.path().join("elsewhere");
    let mut args = args(dir.path());
    args.out = Some(target.clone());

    generate(&args).unwrap();
    assert!(target.join("typescript/Billing.ts").is_file());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_missing_model_reports_path() {
    let dir = project();
    let mut args = args(dir.path());
    args.model = dir.path().join("absent.json");

    let err = generate(&args).unwrap_err();
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn test_run_cli_exit_codes() {
    let dir = project();
    let config = dir.path().join("refract.toml").display().to_string();
    let model = dir.path().join("model.json").display().to_string();

    let ok = run_cli(
        ["refract", "generate", "--config", &config, "--model", &model, "--dry-run"].map(String::from),
    );
    assert_eq!(ok, 0);

    let broken = run_cli(
        ["refract", "generate", "--config", &model, "--model", &model].map(String::from),
    );
    assert_eq!(broken, 1);

    let usage = run_cli(["refract", "generate"].map(String::from));
    assert_eq!(usage, 2);
}
