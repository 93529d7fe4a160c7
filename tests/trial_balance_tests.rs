// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bookkeeper::error::BookError;
use bookkeeper::ledger::general_ledger;
use bookkeeper::models::{
    ClassificationResult, ClassifiedTransaction, LedgerRow, Transaction, VatType,
};
use bookkeeper::trial_balance::TrialBalance;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn stationery(description: &str, value: &str) -> ClassifiedTransaction {
    ClassifiedTransaction::new(
        Transaction {
            date: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            description: description.to_string(),
            value: dec(value),
        },
        ClassificationResult {
            account_name: "Stationery".to_string(),
            account_number: "6100".to_string(),
            vat_type: VatType::None,
            vat_percent: Decimal::ZERO,
            reason: "office supplies".to_string(),
            missing: Vec::new(),
        },
    )
}

fn row(number: &str, name: &str, debit: &str, credit: &str) -> LedgerRow {
    LedgerRow {
        date: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
        description: "x".to_string(),
        account_name: name.to_string(),
        account_number: number.to_string(),
        debit: dec(debit),
        credit: dec(credit),
    }
}

#[test]
fn same_account_aggregates_into_one_row() {
    let ledger = general_ledger(&[
        stationery("Pens", "-40.00"),
        stationery("Paper", "-60.00"),
    ]);
    let tb = TrialBalance::from_ledger(&ledger);
    let rows: Vec<_> = tb
        .rows
        .iter()
        .filter(|r| r.account_number == "6100")
        .collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].account_name, "Stationery");
    assert_eq!(rows[0].total_debit, dec("100.00"));
    assert_eq!(rows[0].total_credit, Decimal::ZERO);
    assert_eq!(rows[0].balance, dec("100.00"));

    let bank = tb.find("1000").unwrap();
    assert_eq!(bank.total_credit, dec("100.00"));
    assert_eq!(bank.balance, dec("-100.00"));
    assert!(tb.is_balanced());
}

#[test]
fn rows_sorted_by_account_number() {
    let tb = TrialBalance::from_ledger(&[
        row("9999", "Unknown", "0", "5"),
        row("1000", "Bank", "5", "0"),
        row("2010", "VAT Control", "1", "0"),
        row("1000", "Bank", "0", "1"),
    ]);
    let numbers: Vec<&str> = tb.rows.iter().map(|r| r.account_number.as_str()).collect();
    assert_eq!(numbers, vec!["1000", "2010", "9999"]);
    assert_eq!(tb.total_debit(), dec("6"));
    assert_eq!(tb.total_credit(), dec("6"));
    tb.ensure_balanced().unwrap();
}

#[test]
fn same_number_different_name_stays_separate() {
    let tb = TrialBalance::from_ledger(&[
        row("6100", "Stationery", "10", "0"),
        row("6100", "Office Supplies", "5", "0"),
        row("1000", "Bank", "0", "15"),
    ]);
    assert_eq!(tb.rows.len(), 3);
}

#[test]
fn unbalanced_ledger_is_an_invariant_violation() {
    let tb = TrialBalance::from_ledger(&[
        row("6100", "Stationery", "130.00", "0"),
        row("1000", "Bank", "0", "115.00"),
    ]);
    assert!(!tb.is_balanced());
    match tb.ensure_balanced() {
        Err(BookError::AggregationInconsistency { debits, credits }) => {
            assert_eq!(debits, dec("130.00"));
            assert_eq!(credits, dec("115.00"));
        }
        other => panic!("expected inconsistency, got {other:?}"),
    }
}

#[test]
fn empty_ledger_is_trivially_balanced() {
    let tb = TrialBalance::from_ledger(&[]);
    assert!(tb.rows.is_empty());
    assert_eq!(tb.total_debit(), Decimal::ZERO);
    tb.ensure_balanced().unwrap();
}
