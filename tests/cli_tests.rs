// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bookkeeper::commands::{self, exporter, importer};
use bookkeeper::config::{Config, RuleSpec};
use bookkeeper::{cli, statement};
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::{NamedTempFile, tempdir};

fn statement_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Date;Description;Amount\n\
         2025-01-03;Stationery;-115.00\n\
         2025-01-04;Client payment;500.00\n\
         bad;Broken;1"
    )
    .unwrap();
    file.flush().unwrap();
    file
}

fn config_with_rules() -> Config {
    Config {
        rules: vec![RuleSpec {
            pattern: "(?i)stationery".to_string(),
            account_name: "Stationery".to_string(),
            account_number: "6100".to_string(),
            vat_type: "Standard".to_string(),
            vat_percentage: Decimal::new(15, 0),
            reason: Some("Office supplies".to_string()),
        }],
        ..Config::default()
    }
}

#[test]
fn import_writes_canonical_csv_from_padded_path() {
    let file = statement_file();
    let dir = tempdir().unwrap();
    let out = dir.path().join("clean.csv");
    let out_str = out.to_string_lossy().to_string();
    let padded = format!("  {}  ", file.path().to_str().unwrap());

    let matches = cli::build_cli().get_matches_from([
        "bookkeeper", "import", "--path", &padded, "--out", &out_str, "--json",
    ]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(&Config::default(), import_m).unwrap();
    } else {
        panic!("no import subcommand");
    }

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        written,
        "date;description;amount\n2025-01-03;Stationery;-115.00\n2025-01-04;Client payment;500.00\n"
    );
    let reread = statement::read_statement(&out, Default::default()).unwrap();
    assert_eq!(reread.transactions.len(), 2);
}

#[test]
fn import_reports_schema_errors() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "when;what\n2025-01-01;x").unwrap();
    file.flush().unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let matches = cli::build_cli().get_matches_from(["bookkeeper", "import", "--path", &path]);
    if let Some(("import", import_m)) = matches.subcommand() {
        let err = importer::handle(&Config::default(), import_m).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("Missing required column(s): date, description"));
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn import_rejects_unknown_delimiter() {
    let file = statement_file();
    let path = file.path().to_str().unwrap().to_string();
    let matches = cli::build_cli().get_matches_from([
        "bookkeeper", "import", "--path", &path, "--delimiter", "|",
    ]);
    if let Some(("import", import_m)) = matches.subcommand() {
        let err = importer::handle(&Config::default(), import_m).unwrap_err();
        assert!(err.to_string().contains("delimiter must be ',' or ';'"));
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn export_offline_csv_with_rules() {
    let file = statement_file();
    let path = file.path().to_str().unwrap().to_string();
    let dir = tempdir().unwrap();
    let out = dir.path().join("books");
    let out_str = out.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "bookkeeper", "export", "--path", &path, "--out", &out_str, "--offline", "--jobs", "2",
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&config_with_rules(), export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let tb = std::fs::read_to_string(out.join("trial_balance.csv")).unwrap();
    assert_eq!(
        tb,
        "account_number,account_name,debit,credit,balance\n\
         1000,Bank,500.00,115.00,385.00\n\
         2010,VAT Control,17.25,0.00,17.25\n\
         6100,Stationery,97.75,0.00,97.75\n\
         9999,Unknown,0.00,500.00,-500.00\n\
         ,Total,615.00,615.00,0.00\n"
    );

    let ledger = std::fs::read_to_string(out.join("general_ledger.csv")).unwrap();
    assert_eq!(ledger.lines().count(), 1 + 5);
    assert!(ledger.contains("2025-01-03,VAT on: Stationery,VAT Control,2010,17.25,0.00"));

    let classified = std::fs::read_to_string(out.join("classified.csv")).unwrap();
    assert!(classified.contains("Stationery,6100,Standard,15,17.25,Office supplies"));
    assert!(classified.contains(
        "Unknown,9999,None,0,0.00,Classification unavailable: classifier is offline"
    ));
}

#[test]
fn export_json_writes_three_documents() {
    let file = statement_file();
    let path = file.path().to_str().unwrap().to_string();
    let dir = tempdir().unwrap();
    let out_str = dir.path().to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "bookkeeper", "export", "--path", &path, "--out", &out_str, "--offline", "--format", "JSON",
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&Config::default(), export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let read = |name: &str| -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(name)).unwrap()).unwrap()
    };
    let tb = read("trial_balance.json");
    assert_eq!(tb["total_debit"], tb["total_credit"]);
    let ledger = read("general_ledger.json");
    assert_eq!(ledger.as_array().unwrap().len(), 4);
    assert!(dir.path().join("classified.json").exists());
}

#[test]
fn export_rejects_unknown_format() {
    let file = statement_file();
    let path = file.path().to_str().unwrap().to_string();
    let dir = tempdir().unwrap();
    let out = dir.path().join("never");
    let out_str = out.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "bookkeeper", "export", "--path", &path, "--out", &out_str, "--format", "xml", "--offline",
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        let err = exporter::handle(&Config::default(), export_m).unwrap_err();
        assert!(err.to_string().contains("Unknown format: xml"));
    } else {
        panic!("no export subcommand");
    }
    assert!(!out.exists());
}

#[test]
fn config_init_creates_file_at_new_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let path_str = path.to_string_lossy().to_string();

    let matches =
        cli::build_cli().get_matches_from(["bookkeeper", "config", "--config", &path_str, "init"]);
    commands::run(&matches).unwrap();
    assert!(path.exists());

    // a second init leaves the file alone and loads it
    let matches =
        cli::build_cli().get_matches_from(["bookkeeper", "--config", &path_str, "config", "init"]);
    commands::run(&matches).unwrap();

    let cfg = bookkeeper::config::load_config(Some(&path)).unwrap();
    assert_eq!(cfg.classifier.model, "gpt-4o");
    assert_eq!(cfg.display.currency_symbol, "R");
    assert!(cfg.rules.is_empty());

    let missing = dir.path().join("absent.toml");
    assert!(bookkeeper::config::load_config(Some(&missing)).is_err());
}

#[test]
fn other_commands_require_an_explicit_config_to_exist() {
    let file = statement_file();
    let path = file.path().to_str().unwrap().to_string();
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.toml").to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "bookkeeper", "import", "--path", &path, "--config", &missing,
    ]);
    let err = commands::run(&matches).unwrap_err();
    assert!(err.to_string().contains("not found"));
}
