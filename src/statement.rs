// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Bank statement normalization.
//!
//! Statements arrive as comma- or semicolon-delimited text with a header row.
//! Two shapes are understood: a single signed `amount` column, or separate
//! `debit`/`credit` columns combined as `debit - credit`. Rows that cannot be
//! read are skipped and reported, never fatal.

use crate::error::{BookError, Result, RowParseError};
use crate::models::Transaction;
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y%m%d",
];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Field delimiter; sniffed from the header line when unset.
    pub delimiter: Option<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct StatementImport {
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<RowParseError>,
}

#[derive(Debug, Clone, Copy)]
enum AmountColumns {
    Signed(usize),
    DebitCredit {
        debit: Option<usize>,
        credit: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    date: usize,
    description: usize,
    amount: AmountColumns,
}

impl Layout {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        let date = find(&["date"]);
        let description = find(&["description"]);
        let signed = find(&["amount", "value"]);
        let debit = find(&["debit"]);
        let credit = find(&["credit"]);

        let mut missing = Vec::new();
        if date.is_none() {
            missing.push("date".to_string());
        }
        if description.is_none() {
            missing.push("description".to_string());
        }
        let amount = match (signed, debit, credit) {
            (Some(i), _, _) => Some(AmountColumns::Signed(i)),
            (None, None, None) => None,
            (None, debit, credit) => Some(AmountColumns::DebitCredit { debit, credit }),
        };
        if amount.is_none() {
            missing.push("amount (or debit/credit)".to_string());
        }
        match (date, description, amount) {
            (Some(date), Some(description), Some(amount)) => Ok(Layout {
                date,
                description,
                amount,
            }),
            _ => Err(BookError::Schema { missing }),
        }
    }
}

/// Pick `;` or `,` by whichever occurs more often in the header line.
pub fn sniff_delimiter(input: &str) -> u8 {
    let header = input.lines().next().unwrap_or("");
    let semis = header.matches(';').count();
    let commas = header.matches(',').count();
    if semis > commas { b';' } else { b',' }
}

pub fn read_statement(path: impl AsRef<Path>, opts: ImportOptions) -> Result<StatementImport> {
    let input = std::fs::read_to_string(path.as_ref())?;
    parse_statement(&input, opts)
}

pub fn parse_statement(input: &str, opts: ImportOptions) -> Result<StatementImport> {
    let input = input.trim_start_matches('\u{feff}');
    let delimiter = opts.delimiter.unwrap_or_else(|| sniff_delimiter(input));
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input.as_bytes());

    let layout = Layout::from_headers(rdr.headers()?)?;
    let decimal_comma = delimiter == b';';

    let mut out = StatementImport::default();
    for result in rdr.records() {
        let rec = match result {
            Ok(rec) => rec,
            Err(err) => {
                let line = err.position().map(|p| p.line()).unwrap_or(0);
                tracing::debug!(line, %err, "skipping unreadable statement row");
                out.skipped.push(RowParseError {
                    line,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        let line = rec.position().map(|p| p.line()).unwrap_or(0);
        if rec.iter().all(|f| f.is_empty()) {
            continue;
        }
        match parse_row(&rec, &layout, decimal_comma) {
            Ok(tx) => out.transactions.push(tx),
            Err(reason) => {
                tracing::debug!(line, %reason, "skipping statement row");
                out.skipped.push(RowParseError { line, reason });
            }
        }
    }
    tracing::info!(
        imported = out.transactions.len(),
        skipped = out.skipped.len(),
        "statement normalized"
    );
    Ok(out)
}

fn parse_row(
    rec: &StringRecord,
    layout: &Layout,
    decimal_comma: bool,
) -> std::result::Result<Transaction, String> {
    let date_raw = rec.get(layout.date).unwrap_or("");
    let date = parse_date(date_raw).ok_or_else(|| format!("invalid date '{}'", date_raw))?;
    let description = rec
        .get(layout.description)
        .ok_or_else(|| "description missing".to_string())?
        .to_string();

    let value = match layout.amount {
        AmountColumns::Signed(i) => {
            let raw = rec.get(i).unwrap_or("");
            parse_amount(raw, decimal_comma).ok_or_else(|| format!("invalid amount '{}'", raw))?
        }
        AmountColumns::DebitCredit { debit, credit } => {
            let side = |idx: Option<usize>| -> std::result::Result<Option<Decimal>, String> {
                let raw = idx.and_then(|i| rec.get(i)).unwrap_or("");
                if raw.is_empty() {
                    return Ok(None);
                }
                parse_amount(raw, decimal_comma)
                    .map(Some)
                    .ok_or_else(|| format!("invalid amount '{}'", raw))
            };
            // a blank side counts as zero
            side(debit)?.unwrap_or(Decimal::ZERO) - side(credit)?.unwrap_or(Decimal::ZERO)
        }
    };

    Ok(Transaction {
        date,
        description,
        value,
    })
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| chrono::DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Lenient amount parsing: `+`/`-` signs, space or apostrophe digit grouping,
/// scientific notation. Commas are digit grouping unless `decimal_comma` is
/// set and a single comma follows the last `.`.
pub fn parse_amount(raw: &str, decimal_comma: bool) -> Option<Decimal> {
    let mut s: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'')
        .collect();
    if s.is_empty() {
        return None;
    }
    let comma_is_decimal = decimal_comma
        && s.matches(',').count() == 1
        && s.rfind(',') > s.rfind('.');
    if comma_is_decimal {
        s = s.replace('.', "").replace(',', ".");
    } else {
        s = s.replace(',', "");
    }
    let s = s.strip_prefix('+').unwrap_or(s.as_str());
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Write transactions in canonical `date;description;amount` form. Reading
/// the output back with [`parse_statement`] yields the same transactions.
pub fn write_canonical<W: Write>(transactions: &[Transaction], w: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(b';').from_writer(w);
    wtr.write_record(["date", "description", "amount"])?;
    for tx in transactions {
        wtr.write_record([
            tx.date.format("%Y-%m-%d").to_string(),
            tx.description.clone(),
            tx.value.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_prefers_semicolon_when_dominant() {
        assert_eq!(sniff_delimiter("Date;Description;Amount\n"), b';');
        assert_eq!(sniff_delimiter("date,description,amount\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn dates_in_common_bank_formats() {
        let want = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        for s in [
            "2025-03-07",
            "2025/03/07",
            "07/03/2025",
            "07.03.2025",
            "20250307",
            "2025-03-07 10:15:00",
        ] {
            assert_eq!(parse_date(s), Some(want), "{s}");
        }
        assert_eq!(parse_date("2025-13-01"), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn amounts_accept_grouping_and_decimal_comma() {
        assert_eq!(parse_amount("+1 250.50", false), Some(Decimal::new(125050, 2)));
        assert_eq!(parse_amount("-1'000", false), Some(Decimal::new(-1000, 0)));
        assert_eq!(parse_amount("-42,10", true), Some(Decimal::new(-4210, 2)));
        assert_eq!(parse_amount("1.250,50", true), Some(Decimal::new(125050, 2)));
        assert_eq!(parse_amount("1,250.50", false), Some(Decimal::new(125050, 2)));
        assert_eq!(parse_amount("1.5e2", false), Some(Decimal::new(150, 0)));
        assert_eq!(parse_amount("abc", false), None);
        assert_eq!(parse_amount("", false), None);
    }
}
