// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use rust_decimal::Decimal;
use std::time::Duration;

const UA: &str = concat!(
    "bookkeeper/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/bookkeeper)"
);

pub fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn fmt_money(d: &Decimal, symbol: &str) -> String {
    format!("{}{:.2}", symbol, d.round_dp(2))
}

/// Blank for zero so debit/credit columns read like a ledger.
pub fn fmt_amount(d: &Decimal) -> String {
    if d.is_zero() {
        String::new()
    } else {
        format!("{:.2}", d)
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Right-align the given columns (amount columns).
pub fn align_right(t: &mut Table, columns: &[usize]) {
    for &i in columns {
        if let Some(col) = t.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_formats_with_symbol_and_cents() {
        assert_eq!(fmt_money(&Decimal::new(11500, 2), "R"), "R115.00");
        assert_eq!(fmt_money(&Decimal::new(5, 1), "$"), "$0.50");
    }

    #[test]
    fn zero_amount_is_blank() {
        assert_eq!(fmt_amount(&Decimal::ZERO), "");
        assert_eq!(fmt_amount(&Decimal::new(1725, 2)), "17.25");
    }
}
