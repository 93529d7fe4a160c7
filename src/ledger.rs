// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Double-entry expansion of classified bank transactions.
//!
//! A negative value is money leaving the bank (an expense or payment), a
//! positive value money coming in. Each transaction posts to its classified
//! account, to VAT Control when VAT applies, and to Bank; the rows always
//! balance.

use crate::models::{ClassifiedTransaction, LedgerRow};
use rust_decimal::Decimal;

pub const VAT_CONTROL: (&str, &str) = ("VAT Control", "2010");
pub const BANK: (&str, &str) = ("Bank", "1000");

/// Debit/credit pair for one side of a posting.
fn sides(money_out: bool, amount: Decimal) -> (Decimal, Decimal) {
    if money_out {
        (amount, Decimal::ZERO)
    } else {
        (Decimal::ZERO, amount)
    }
}

fn row(
    tx: &ClassifiedTransaction,
    description: String,
    account: (&str, &str),
    (debit, credit): (Decimal, Decimal),
) -> LedgerRow {
    LedgerRow {
        date: tx.transaction.date,
        description,
        account_name: account.0.to_string(),
        account_number: account.1.to_string(),
        debit,
        credit,
    }
}

/// Expand one transaction into its 2 or 3 ledger rows: main account, VAT
/// Control (only when there is VAT), Bank.
pub fn expand(tx: &ClassifiedTransaction) -> Vec<LedgerRow> {
    let value = tx.transaction.value;
    let desc = &tx.transaction.description;
    let vat = tx.vat_amount;
    let money_out = value < Decimal::ZERO;

    // VAT comes out of the magnitude; the sign follows the value.
    let net = if money_out { value + vat } else { value - vat };

    let mut rows = Vec::with_capacity(3);
    rows.push(row(
        tx,
        desc.clone(),
        (
            tx.classification.account_name.as_str(),
            tx.classification.account_number.as_str(),
        ),
        sides(money_out, net.abs()),
    ));
    if vat > Decimal::ZERO {
        rows.push(row(
            tx,
            format!("VAT on: {}", desc),
            VAT_CONTROL,
            sides(money_out, vat),
        ));
    }
    // Bank mirrors the value on the opposite side.
    rows.push(row(
        tx,
        format!("Bank Entry: {}", desc),
        BANK,
        sides(!money_out, value.abs()),
    ));
    rows
}

/// The general ledger for a batch, in transaction order.
pub fn general_ledger(classified: &[ClassifiedTransaction]) -> Vec<LedgerRow> {
    classified.iter().flat_map(expand).collect()
}
