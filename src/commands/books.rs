// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::build_books;
use crate::config::Config;
use crate::pipeline::Books;
use crate::utils::{align_right, fmt_amount, fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use comfy_table::Table;
use serde_json::json;

pub fn handle(cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let books = build_books(cfg, sub)?;
    let summary = json!({
        "classified": books.classified,
        "general_ledger": books.ledger,
        "trial_balance": books.trial_balance.rows,
        "total_debit": books.total_debit(),
        "total_credit": books.total_credit(),
    });
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }

    println!("AI-Classified Transactions");
    println!("{}", classified_table(&books));
    println!("General Ledger");
    println!("{}", ledger_table(&books));
    println!("Trial Balance");
    println!("{}", trial_balance_table(&books));
    let symbol = &cfg.display.currency_symbol;
    println!("Total Debits: {}", fmt_money(&books.total_debit(), symbol));
    println!("Total Credits: {}", fmt_money(&books.total_credit(), symbol));
    let unclassified = books.unclassified();
    if unclassified > 0 {
        eprintln!(
            "{} transaction(s) could not be classified and were posted to the default account",
            unclassified
        );
    }
    Ok(())
}

pub fn classified_table(books: &Books) -> Table {
    let rows = books
        .classified
        .iter()
        .map(|c| {
            vec![
                c.transaction.date.to_string(),
                c.transaction.description.clone(),
                format!("{:.2}", c.transaction.value),
                c.classification.account_name.clone(),
                c.classification.account_number.clone(),
                c.classification.vat_type.to_string(),
                c.classification.vat_percent.normalize().to_string(),
                format!("{:.2}", c.vat_amount),
                c.classification.reason.clone(),
            ]
        })
        .collect();
    let mut t = pretty_table(
        &[
            "Date", "Description", "Value", "Account", "No.", "VAT Type", "VAT %", "VAT", "Reason",
        ],
        rows,
    );
    align_right(&mut t, &[2, 6, 7]);
    t
}

pub fn ledger_table(books: &Books) -> Table {
    let rows = books
        .ledger
        .iter()
        .map(|r| {
            vec![
                r.date.to_string(),
                r.description.clone(),
                r.account_name.clone(),
                r.account_number.clone(),
                fmt_amount(&r.debit),
                fmt_amount(&r.credit),
            ]
        })
        .collect();
    let mut t = pretty_table(
        &["Date", "Description", "Account", "No.", "Debit", "Credit"],
        rows,
    );
    align_right(&mut t, &[4, 5]);
    t
}

pub fn trial_balance_table(books: &Books) -> Table {
    let rows = books
        .trial_balance
        .rows
        .iter()
        .map(|r| {
            vec![
                r.account_number.clone(),
                r.account_name.clone(),
                format!("{:.2}", r.total_debit),
                format!("{:.2}", r.total_credit),
                format!("{:.2}", r.balance),
            ]
        })
        .collect();
    let mut t = pretty_table(&["No.", "Account", "Debit", "Credit", "Balance"], rows);
    align_right(&mut t, &[2, 3, 4]);
    t
}
