// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::load_statement;
use crate::config::Config;
use crate::statement::write_canonical;
use crate::utils::{align_right, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use std::fs::File;

pub fn handle(cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let imported = load_statement(cfg, sub)?;

    if let Some(out) = sub.get_one::<String>("out").map(|s| s.trim()) {
        let file = File::create(out).with_context(|| format!("Create {}", out))?;
        write_canonical(&imported.transactions, file)?;
        eprintln!(
            "Wrote {} transaction(s) to {}",
            imported.transactions.len(),
            out
        );
    }

    if maybe_print_json(
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        &imported.transactions,
    )? {
        return Ok(());
    }
    let rows = imported
        .transactions
        .iter()
        .map(|t| {
            vec![
                t.date.to_string(),
                t.description.clone(),
                format!("{:.2}", t.value),
            ]
        })
        .collect();
    let mut table = pretty_table(&["Date", "Description", "Value"], rows);
    align_right(&mut table, &[2]);
    println!("{}", table);
    Ok(())
}
