//! CLI Session Integration Tests
//!
//! Tests the flow: arguments -> Cli -> Session (schema + config) -> report

use clap::Parser;
use scales_cli::{render, Cli, OutputFormat, Session, Target};
use std::fs;
use tempfile::TempDir;

const SCHEMA: &str = r#"{
    "types": [
        {"kind": "class", "name": "Customer", "fields": [
            {"name": "id", "type": "Int64"},
            {"name": "name", "type": "String"},
            {"name": "balance", "type": "Decimal"},
            {"name": "active", "type": "Boolean"}
        ]},
        {"kind": "class", "name": "PremiumCustomer", "base": "Customer", "fields": [
            {"name": "tier", "type": "Tier"}
        ]},
        {"kind": "enum", "name": "Tier", "underlying": "Byte"}
    ]
}"#;

fn session(dir: &TempDir, extra: &[&str]) -> (Cli, Session) {
    let schema = dir.path().join("model.json");
    fs::write(&schema, SCHEMA).unwrap();
    let config = dir.path().join("platform.json");
    fs::write(&config, r#"{"pointer_width": 8}"#).unwrap();

    let mut args = vec![
        "object-scales".to_string(),
        "--schema".to_string(),
        schema.display().to_string(),
        "--config".to_string(),
        config.display().to_string(),
    ];
    args.extend(extra.iter().map(|arg| arg.to_string()));

    let cli = Cli::try_parse_from(args).unwrap();
    let session = Session::from_cli(&cli).unwrap();
    (cli, session)
}

/// Test: every declared type, in declaration order
#[test]
fn test_session_measures_all_types() {
    let dir = TempDir::new().unwrap();
    let (cli, mut session) = session(&dir, &["--all"]);

    let report = session.measure(&cli.target().unwrap()).unwrap();
    let names: Vec<_> = report.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Customer", "PremiumCustomer", "Tier"]);

    // 8 + 8 + 16 + 1 = 33, padded to 40, plus header
    assert_eq!(report[0].breakdown.total, 56);
    // one more byte still fits in the padding
    assert_eq!(report[1].breakdown.total, 56);
    assert_eq!(report[2].breakdown.total, 1);
}

/// Test: command line pointer width overrides the config file
#[test]
fn test_session_override() {
    let dir = TempDir::new().unwrap();
    let (cli, mut session) = session(&dir, &["-p", "4", "--type", "Customer"]);

    assert_eq!(session.config().pointer_size(), 4);
    let report = session.measure(&cli.target().unwrap()).unwrap();
    // 8 + 4 + 16 + 1 = 29, padded to 32, plus header
    assert_eq!(report[0].breakdown.total, 40);
}

/// Test: arrays of declared types resolve through the session registry
#[test]
fn test_session_array_of_declared_type() {
    let dir = TempDir::new().unwrap();
    let (cli, mut session) = session(&dir, &["--type", "Tier[]", "--length", "100"]);

    let report = session.measure(&cli.target().unwrap()).unwrap();
    // Enum elements pad to the pointer width: 100 * 8 + 4 = 804 -> 808
    assert_eq!(report[0].breakdown.total, 824);
    assert!(session.registry().lookup("Tier[]").is_some());
}

/// Test: plain and JSON reports
#[test]
fn test_session_rendering() {
    let dir = TempDir::new().unwrap();
    let (cli, mut session) = session(&dir, &["--all"]);
    let report = session.measure(&cli.target().unwrap()).unwrap();

    assert_eq!(
        render(&report, OutputFormat::Plain).unwrap(),
        "Customer: 56\nPremiumCustomer: 56\nTier: 1"
    );

    let json: serde_json::Value =
        serde_json::from_str(&render(&report, OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(json[2]["category"], "Enumeration");
    assert_eq!(json[2]["header"], 0);
}

/// Test: a string target needs no schema
#[test]
fn test_session_string_target() {
    let cli = Cli::try_parse_from(["object-scales", "-p", "8", "--string", "hello"]).unwrap();
    let mut session = Session::from_cli(&cli).unwrap();

    let report = session.measure(&Target::Text("hello".into())).unwrap();
    assert_eq!(report[0].breakdown.total, 32);
}
