// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ACCOUNT_NAME: &str = "Unknown";
pub const DEFAULT_ACCOUNT_NUMBER: &str = "9999";
pub const DEFAULT_REASON: &str = "Could not extract fields";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub value: Decimal, // negative = money out of the bank account
}

impl Transaction {
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VatType {
    Standard,
    Zero,
    Exempt,
    #[default]
    None,
}

impl VatType {
    /// Lenient reading of a model-reported VAT type. Unrecognised text is `None`.
    pub fn parse(raw: &str) -> Self {
        let norm: String = raw
            .trim()
            .trim_end_matches(['.', ','])
            .to_lowercase()
            .replace(['-', '_'], " ");
        match norm.as_str() {
            "standard" | "standard rated" | "standard rate" => VatType::Standard,
            "zero" | "zero rated" | "zero rate" => VatType::Zero,
            "exempt" | "exempted" => VatType::Exempt,
            _ => VatType::None,
        }
    }
}

impl fmt::Display for VatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VatType::Standard => "Standard",
            VatType::Zero => "Zero",
            VatType::Exempt => "Exempt",
            VatType::None => "None",
        };
        f.write_str(s)
    }
}

/// The five semantic fields a classifier is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    AccountName,
    AccountNumber,
    VatType,
    VatPercentage,
    Reason,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::AccountName,
        Field::AccountNumber,
        Field::VatType,
        Field::VatPercentage,
        Field::Reason,
    ];

    /// Label used in the free-text answer format.
    pub fn label(self) -> &'static str {
        match self {
            Field::AccountName => "General Ledger Account Name",
            Field::AccountNumber => "Account Number",
            Field::VatType => "VAT Type",
            Field::VatPercentage => "VAT Percentage",
            Field::Reason => "One-line reason",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub account_name: String,
    pub account_number: String,
    pub vat_type: VatType,
    pub vat_percent: Decimal,
    pub reason: String,
    /// Fields that fell back to their default value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<Field>,
}

impl ClassificationResult {
    /// The all-defaults result, with `reason` explaining why.
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            account_name: DEFAULT_ACCOUNT_NAME.to_string(),
            account_number: DEFAULT_ACCOUNT_NUMBER.to_string(),
            vat_type: VatType::None,
            vat_percent: Decimal::ZERO,
            reason: reason.into(),
            missing: Field::ALL.to_vec(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.missing.len() == Field::ALL.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedTransaction {
    pub transaction: Transaction,
    pub classification: ClassificationResult,
    pub vat_amount: Decimal,
}

impl ClassifiedTransaction {
    pub fn new(transaction: Transaction, classification: ClassificationResult) -> Self {
        Self::with_basis(transaction, classification, VatBasis::default())
    }

    pub fn with_basis(
        transaction: Transaction,
        classification: ClassificationResult,
        basis: VatBasis,
    ) -> Self {
        let vat_amount = vat_amount(
            transaction.value,
            classification.vat_type,
            classification.vat_percent,
            basis,
        );
        Self {
            transaction,
            classification,
            vat_amount,
        }
    }
}

/// How the VAT amount relates to the statement value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VatBasis {
    /// VAT = |value| x percent / 100.
    #[default]
    Exclusive,
    /// The statement value already includes VAT: |value| x percent / (100 + percent).
    Inclusive,
}

/// VAT for a transaction, rounded to cents and never more than |value|.
/// Zero unless the transaction is standard-rated.
pub fn vat_amount(
    value: Decimal,
    vat_type: VatType,
    vat_percent: Decimal,
    basis: VatBasis,
) -> Decimal {
    if vat_type != VatType::Standard || vat_percent <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let gross = value.abs();
    let divisor = match basis {
        VatBasis::Exclusive => Decimal::ONE_HUNDRED,
        VatBasis::Inclusive => Decimal::ONE_HUNDRED + vat_percent,
    };
    (gross * vat_percent / divisor).round_dp(2).min(gross)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub date: NaiveDate,
    pub description: String,
    pub account_name: String,
    pub account_number: String,
    pub debit: Decimal,
    pub credit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub account_number: String,
    pub account_name: String,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub balance: Decimal,
}
