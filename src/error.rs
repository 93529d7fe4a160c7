// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookError {
    #[error("Missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Trial balance out of balance: debits {debits} != credits {credits}")]
    AggregationInconsistency { debits: Decimal, credits: Decimal },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BookError>;

/// A statement row that was dropped during import.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct RowParseError {
    pub line: u64,
    pub reason: String,
}

/// Why the external classifier produced no usable payload.
#[derive(Debug, Error)]
pub enum ClassificationUnavailable {
    #[error("classifier is offline")]
    Offline,

    #[error("no API key configured (set OPENAI_API_KEY)")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("empty response")]
    EmptyResponse,
}
