// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::build_books;
use crate::config::Config;
use crate::pipeline::Books;
use anyhow::{Context, Result, anyhow};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            other => Err(anyhow!("Unknown format: {} (use csv|json)", other)),
        }
    }

    fn ext(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
        }
    }
}

pub fn handle(cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = Format::parse(sub.get_one::<String>("format").unwrap())?;
    let out = sub.get_one::<String>("out").unwrap().trim();
    let books = build_books(cfg, sub)?;
    write_books(&books, Path::new(out), fmt)?;
    println!("Exported books to {}", out);
    Ok(())
}

/// Write `classified`, `general_ledger` and `trial_balance` files into `dir`.
pub fn write_books(books: &Books, dir: &Path, fmt: Format) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Create {}", dir.display()))?;
    let path = |name: &str| dir.join(format!("{}.{}", name, fmt.ext()));
    match fmt {
        Format::Csv => {
            write_classified_csv(books, &path("classified"))?;
            write_ledger_csv(books, &path("general_ledger"))?;
            write_trial_balance_csv(books, &path("trial_balance"))?;
        }
        Format::Json => {
            let write = |name: &str, v: serde_json::Value| -> Result<()> {
                let p = path(name);
                std::fs::write(&p, serde_json::to_string_pretty(&v)?)
                    .with_context(|| format!("Write {}", p.display()))
            };
            write("classified", serde_json::to_value(&books.classified)?)?;
            write("general_ledger", serde_json::to_value(&books.ledger)?)?;
            write(
                "trial_balance",
                serde_json::json!({
                    "rows": books.trial_balance.rows,
                    "total_debit": books.total_debit(),
                    "total_credit": books.total_credit(),
                }),
            )?;
        }
    }
    Ok(())
}

fn write_classified_csv(books: &Books, p: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(p).with_context(|| format!("Create {}", p.display()))?;
    wtr.write_record([
        "date",
        "description",
        "value",
        "account_name",
        "account_number",
        "vat_type",
        "vat_percent",
        "vat_amount",
        "reason",
    ])?;
    for c in &books.classified {
        wtr.write_record([
            c.transaction.date.to_string(),
            c.transaction.description.clone(),
            c.transaction.value.to_string(),
            c.classification.account_name.clone(),
            c.classification.account_number.clone(),
            c.classification.vat_type.to_string(),
            c.classification.vat_percent.to_string(),
            format!("{:.2}", c.vat_amount),
            c.classification.reason.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_ledger_csv(books: &Books, p: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(p).with_context(|| format!("Create {}", p.display()))?;
    wtr.write_record([
        "date",
        "description",
        "account_name",
        "account_number",
        "debit",
        "credit",
    ])?;
    for r in &books.ledger {
        wtr.write_record([
            r.date.to_string(),
            r.description.clone(),
            r.account_name.clone(),
            r.account_number.clone(),
            format!("{:.2}", r.debit),
            format!("{:.2}", r.credit),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_trial_balance_csv(books: &Books, p: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(p).with_context(|| format!("Create {}", p.display()))?;
    wtr.write_record(["account_number", "account_name", "debit", "credit", "balance"])?;
    for r in &books.trial_balance.rows {
        wtr.write_record([
            r.account_number.clone(),
            r.account_name.clone(),
            format!("{:.2}", r.total_debit),
            format!("{:.2}", r.total_credit),
            format!("{:.2}", r.balance),
        ])?;
    }
    wtr.write_record([
        String::new(),
        "Total".to_string(),
        format!("{:.2}", books.total_debit()),
        format!("{:.2}", books.total_credit()),
        format!("{:.2}", books.total_debit() - books.total_credit()),
    ])?;
    wtr.flush()?;
    Ok(())
}
