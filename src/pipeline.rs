// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classification::parse_classification;
use crate::classifier::Classifier;
use crate::error::{ClassificationUnavailable, Result};
use crate::ledger::general_ledger;
use crate::models::{
    ClassificationResult, ClassifiedTransaction, LedgerRow, Transaction, VatBasis,
};
use crate::trial_balance::TrialBalance;
use rust_decimal::Decimal;
use serde::Serialize;

const NO_DESCRIPTION: &str = "No description to classify";

fn classify_one(tx: &Transaction, classifier: &dyn Classifier) -> ClassificationResult {
    if !tx.has_description() {
        return ClassificationResult::fallback(NO_DESCRIPTION);
    }
    let outcome = classifier.classify(tx.description.trim());
    if let Err(err) = &outcome {
        match err {
            ClassificationUnavailable::Offline => {
                tracing::debug!(description = %tx.description, "classifier offline")
            }
            _ => tracing::warn!(description = %tx.description, %err, "classification unavailable"),
        }
    }
    parse_classification(outcome)
}

/// Classify every transaction, running up to `jobs` classifier calls at once.
/// Output order matches input order whatever order the calls finish in.
pub fn classify_transactions(
    transactions: &[Transaction],
    classifier: &dyn Classifier,
    jobs: usize,
    basis: VatBasis,
) -> Vec<ClassifiedTransaction> {
    let results: Vec<ClassificationResult> = if jobs <= 1 || transactions.len() <= 1 {
        transactions
            .iter()
            .map(|tx| classify_one(tx, classifier))
            .collect()
    } else {
        let chunk = transactions.len().div_ceil(jobs);
        std::thread::scope(|s| {
            let handles: Vec<_> = transactions
                .chunks(chunk)
                .map(|part| {
                    s.spawn(move || {
                        part.iter()
                            .map(|tx| classify_one(tx, classifier))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| match h.join() {
                    Ok(part) => part,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    };

    transactions
        .iter()
        .cloned()
        .zip(results)
        .map(|(tx, c)| ClassifiedTransaction::with_basis(tx, c, basis))
        .collect()
}

/// The three output tables of one run.
#[derive(Debug, Clone, Serialize)]
pub struct Books {
    pub classified: Vec<ClassifiedTransaction>,
    pub ledger: Vec<LedgerRow>,
    pub trial_balance: TrialBalance,
}

#[derive(Debug, Clone, Copy)]
pub struct BookOptions {
    pub jobs: usize,
    pub basis: VatBasis,
}

impl Default for BookOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            basis: VatBasis::default(),
        }
    }
}

impl Books {
    /// Classify, expand and aggregate. Fails only if the trial balance does
    /// not balance.
    pub fn build(
        transactions: &[Transaction],
        classifier: &dyn Classifier,
        opts: BookOptions,
    ) -> Result<Self> {
        let classified = classify_transactions(transactions, classifier, opts.jobs, opts.basis);
        Self::from_classified(classified)
    }

    pub fn from_classified(classified: Vec<ClassifiedTransaction>) -> Result<Self> {
        let ledger = general_ledger(&classified);
        let trial_balance = TrialBalance::from_ledger(&ledger);
        trial_balance.ensure_balanced()?;
        tracing::info!(
            transactions = classified.len(),
            ledger_rows = ledger.len(),
            accounts = trial_balance.rows.len(),
            "books built"
        );
        Ok(Self {
            classified,
            ledger,
            trial_balance,
        })
    }

    pub fn total_debit(&self) -> Decimal {
        self.trial_balance.total_debit()
    }

    pub fn total_credit(&self) -> Decimal {
        self.trial_balance.total_credit()
    }

    pub fn unclassified(&self) -> usize {
        self.classified
            .iter()
            .filter(|c| c.classification.is_fallback())
            .count()
    }
}
