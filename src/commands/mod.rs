// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod books;
pub mod config;
pub mod exporter;
pub mod importer;

use crate::classifier::{Classifier, Offline, OpenAiClassifier, RuleClassifier};
use crate::config::{Config, api_key_from_env, load_config, parse_delimiter};
use crate::pipeline::{BookOptions, Books};
use crate::statement::{ImportOptions, StatementImport, read_statement};
use anyhow::{Context, Result};
use std::path::Path;

/// Load the config and dispatch to the subcommand handler.
pub fn run(matches: &clap::ArgMatches) -> Result<()> {
    let leaf = matches.subcommand().map(|(_, sub)| sub).unwrap_or(matches);
    let cfg_path = leaf
        .get_one::<String>("config_file")
        .or_else(|| matches.get_one::<String>("config_file"))
        .map(|s| s.trim().to_string());
    let cfg_path = cfg_path.as_deref().map(Path::new);

    match matches.subcommand() {
        // `config init` creates the file, so a missing path is not an error here.
        Some(("config", sub)) => {
            let cfg = match cfg_path {
                Some(p) if !p.exists() => Config::default(),
                _ => load_config(cfg_path)?,
            };
            config::handle(&cfg, sub)
        }
        Some((name, sub)) => {
            let cfg = load_config(cfg_path)?;
            match name {
                "import" => importer::handle(&cfg, sub),
                "books" => books::handle(&cfg, sub),
                "export" => exporter::handle(&cfg, sub),
                other => anyhow::bail!("Unknown command: {}", other),
            }
        }
        None => {
            crate::cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
    }
}

pub(crate) fn import_options(cfg: &Config, sub: &clap::ArgMatches) -> Result<ImportOptions> {
    let delimiter = match sub.get_one::<String>("delimiter") {
        Some(d) => Some(parse_delimiter(d)?),
        None => cfg.import.delimiter_byte()?,
    };
    Ok(ImportOptions { delimiter })
}

pub(crate) fn load_statement(cfg: &Config, sub: &clap::ArgMatches) -> Result<StatementImport> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let opts = import_options(cfg, sub)?;
    let imported =
        read_statement(path, opts).with_context(|| format!("Import statement {}", path))?;
    if !imported.skipped.is_empty() {
        eprintln!(
            "Skipped {} unreadable row(s) in {}:",
            imported.skipped.len(),
            path
        );
        for e in &imported.skipped {
            eprintln!("  {}", e);
        }
    }
    Ok(imported)
}

/// Rules first, then the model; offline (or without an API key) every
/// unmatched transaction gets the default classification.
pub fn build_classifier(cfg: &Config, offline: bool) -> Result<Box<dyn Classifier>> {
    let base: Box<dyn Classifier> = if offline {
        Box::new(Offline)
    } else if let Some(key) = api_key_from_env() {
        Box::new(OpenAiClassifier::new(key, cfg.classifier.clone())?)
    } else {
        tracing::warn!(
            "{} is not set; classifying offline",
            crate::config::API_KEY_ENV
        );
        Box::new(Offline)
    };
    if cfg.rules.is_empty() {
        return Ok(base);
    }
    Ok(Box::new(RuleClassifier::new(&cfg.rules, base)?))
}

pub(crate) fn build_books(cfg: &Config, sub: &clap::ArgMatches) -> Result<Books> {
    let imported = load_statement(cfg, sub)?;
    let classifier = build_classifier(cfg, sub.get_flag("offline"))?;
    let opts = BookOptions {
        jobs: sub
            .get_one::<usize>("jobs")
            .copied()
            .unwrap_or(cfg.classifier.jobs)
            .max(1),
        basis: cfg.vat.basis,
    };
    let books = Books::build(&imported.transactions, classifier.as_ref(), opts)?;
    Ok(books)
}
