// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{BookError, Result};
use crate::models::{LedgerRow, TrialBalanceRow};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-account totals of a general ledger, ordered by account number then name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
}

impl TrialBalance {
    pub fn from_ledger(ledger: &[LedgerRow]) -> Self {
        let mut groups: BTreeMap<(&str, &str), (Decimal, Decimal)> = BTreeMap::new();
        for r in ledger {
            let e = groups
                .entry((r.account_number.as_str(), r.account_name.as_str()))
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            e.0 += r.debit;
            e.1 += r.credit;
        }
        let rows = groups
            .into_iter()
            .map(|((number, name), (debit, credit))| TrialBalanceRow {
                account_number: number.to_string(),
                account_name: name.to_string(),
                total_debit: debit,
                total_credit: credit,
                balance: debit - credit,
            })
            .collect();
        Self { rows }
    }

    pub fn total_debit(&self) -> Decimal {
        self.rows.iter().map(|r| r.total_debit).sum()
    }

    pub fn total_credit(&self) -> Decimal {
        self.rows.iter().map(|r| r.total_credit).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.total_debit() == self.total_credit()
    }

    /// Debits must equal credits; anything else means the ledger expansion is wrong.
    pub fn ensure_balanced(&self) -> Result<()> {
        if self.is_balanced() {
            return Ok(());
        }
        Err(BookError::AggregationInconsistency {
            debits: self.total_debit(),
            credits: self.total_credit(),
        })
    }

    pub fn find(&self, account_number: &str) -> Option<&TrialBalanceRow> {
        self.rows.iter().find(|r| r.account_number == account_number)
    }
}
