// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns whatever the classifier said into a complete [`ClassificationResult`].
//!
//! Two answer shapes are accepted: a JSON object with the five fields under
//! loosely matching keys, or free text with one `Label: value` line per field.
//! Nothing here fails; absent or unreadable fields take their defaults.

use crate::classifier::ClassifierPayload;
use crate::error::ClassificationUnavailable;
use crate::models::{
    ClassificationResult, DEFAULT_ACCOUNT_NAME, DEFAULT_ACCOUNT_NUMBER, DEFAULT_REASON, Field,
    VatType,
};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

static JSON_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").expect("fence pattern compiles")
});

const ERROR_MARKER: &str = "Error:";

fn aliases(field: Field) -> &'static [&'static str] {
    match field {
        Field::AccountName => &[
            "general_ledger_account_name",
            "gl_account_name",
            "ledger_account_name",
            "account_name",
            "ledger_account",
            "account",
        ],
        Field::AccountNumber => &[
            "account_number",
            "gl_account_number",
            "account_no",
            "account_code",
            "gl_code",
            "number",
        ],
        Field::VatType => &["vat_type", "vat_category", "tax_type", "vat"],
        Field::VatPercentage => &[
            "vat_percentage",
            "vat_percent",
            "vat_rate",
            "tax_rate",
            "percentage",
            "rate",
        ],
        Field::Reason => &["reason", "one_line_reason", "explanation", "rationale"],
    }
}

/// Fields pulled out of a payload before defaults are applied.
#[derive(Debug, Default)]
struct Extracted {
    account_name: Option<String>,
    account_number: Option<String>,
    vat_type: Option<VatType>,
    vat_percent: Option<Decimal>,
    reason: Option<String>,
}

impl Extracted {
    fn finish(self) -> ClassificationResult {
        let mut missing = Vec::new();
        let mut take = |v: Option<String>, field: Field, default: &str| {
            v.unwrap_or_else(|| {
                missing.push(field);
                default.to_string()
            })
        };
        let account_name = take(self.account_name, Field::AccountName, DEFAULT_ACCOUNT_NAME);
        let account_number = take(
            self.account_number,
            Field::AccountNumber,
            DEFAULT_ACCOUNT_NUMBER,
        );
        if self.vat_type.is_none() {
            missing.push(Field::VatType);
        }
        if self.vat_percent.is_none() {
            missing.push(Field::VatPercentage);
        }
        if self.reason.is_none() {
            missing.push(Field::Reason);
        }
        let vat_type = self.vat_type.unwrap_or_default();
        let vat_percent = match vat_type {
            VatType::Standard => self.vat_percent.unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        };
        ClassificationResult {
            account_name,
            account_number,
            vat_type,
            vat_percent,
            reason: self.reason.unwrap_or_else(|| DEFAULT_REASON.to_string()),
            missing,
        }
    }
}

/// Parse the outcome of one classifier call. Never fails.
pub fn parse_classification(
    outcome: Result<ClassifierPayload, ClassificationUnavailable>,
) -> ClassificationResult {
    match outcome {
        Err(err) => unavailable(err),
        Ok(ClassifierPayload::Structured(value)) => match value {
            Value::String(text) => parse_text_payload(&text),
            other => parse_structured(&other),
        },
        Ok(ClassifierPayload::Text(text)) => parse_text_payload(&text),
    }
}

fn unavailable(cause: impl std::fmt::Display) -> ClassificationResult {
    ClassificationResult::fallback(format!("Classification unavailable: {}", cause))
}

fn parse_text_payload(text: &str) -> ClassificationResult {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return unavailable(ClassificationUnavailable::EmptyResponse);
    }
    if let Some(cause) = trimmed.strip_prefix(ERROR_MARKER) {
        return unavailable(cause.trim());
    }
    let candidate = JSON_FENCE
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);
    if candidate.starts_with('{') {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(candidate) {
            return parse_structured(&value);
        }
    }
    parse_free_text(trimmed)
}

/// Read the five fields from a JSON object with flexible key names.
/// A non-object yields the full default result.
pub fn parse_structured(value: &Value) -> ClassificationResult {
    let Some(obj) = value.as_object() else {
        return ClassificationResult::fallback(DEFAULT_REASON);
    };
    let normalized = normalize_keys(obj);
    let found_any = Field::ALL.iter().any(|f| lookup(&normalized, *f).is_some());
    let normalized = if found_any {
        normalized
    } else {
        // {"classification": {...}} style wrappers
        obj.values()
            .find_map(|v| v.as_object())
            .map(normalize_keys)
            .unwrap_or(normalized)
    };

    let text = |field| lookup(&normalized, field).and_then(text_value);
    Extracted {
        account_name: text(Field::AccountName),
        account_number: lookup(&normalized, Field::AccountNumber).and_then(code_value),
        vat_type: text(Field::VatType).map(|s| VatType::parse(&s)),
        vat_percent: lookup(&normalized, Field::VatPercentage).and_then(percent_value),
        reason: text(Field::Reason),
    }
    .finish()
}

/// Read `Label: value` lines. The first label contained in a line claims it;
/// a later line for the same label overrides an earlier one.
pub fn parse_free_text(text: &str) -> ClassificationResult {
    let mut ex = Extracted::default();
    for line in text.lines() {
        let Some(field) = Field::ALL.iter().copied().find(|f| line.contains(f.label())) else {
            continue;
        };
        let Some((_, raw)) = line.split_once(':') else {
            continue;
        };
        let value = clean_value(raw);
        match field {
            Field::VatPercentage => {
                ex.vat_percent = Some(parse_percent(&value).unwrap_or(Decimal::ZERO));
            }
            _ if value.is_empty() => {}
            Field::AccountName => ex.account_name = Some(value),
            Field::AccountNumber => ex.account_number = Some(value),
            Field::VatType => ex.vat_type = Some(VatType::parse(&value)),
            Field::Reason => ex.reason = Some(value),
        }
    }
    ex.finish()
}

/// `"15%"`, `"15 %"`, `"15"` → 15. Values outside 0..=100 are rejected.
pub fn parse_percent(raw: &str) -> Option<Decimal> {
    let s = raw.trim().trim_end_matches('%').trim();
    let d = Decimal::from_str(s).ok()?;
    (d >= Decimal::ZERO && d <= Decimal::ONE_HUNDRED).then_some(d)
}

fn clean_value(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '*' || c == '_' || c == '`' || c == '"')
        .trim()
        .to_string()
}

fn normalize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for c in key.trim().chars() {
        if c.is_ascii_alphanumeric() {
            // camelCase boundary
            if c.is_ascii_uppercase() && prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        }
    }
    out.trim_end_matches('_').to_string()
}

fn normalize_keys(obj: &Map<String, Value>) -> Map<String, Value> {
    obj.iter()
        .map(|(k, v)| (normalize_key(k), v.clone()))
        .collect()
}

fn lookup(obj: &Map<String, Value>, field: Field) -> Option<&Value> {
    aliases(field).iter().find_map(|k| obj.get(*k))
}

fn text_value(v: &Value) -> Option<String> {
    v.as_str().map(clean_value).filter(|s| !s.is_empty())
}

fn code_value(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => text_value(v),
    }
}

fn percent_value(v: &Value) -> Option<Decimal> {
    match v {
        Value::Number(n) => parse_percent(&n.to_string()),
        Value::String(s) => parse_percent(s),
        _ => None,
    }
}
