// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{ClassifierSection, ResponseFormat, RuleSpec};
use crate::error::ClassificationUnavailable;
use crate::utils::http_client;
use anyhow::{Context, Result, anyhow};
use regex::Regex;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Raw answer from a classifier, before any field extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierPayload {
    Text(String),
    Structured(serde_json::Value),
}

pub type ClassifierOutcome = std::result::Result<ClassifierPayload, ClassificationUnavailable>;

/// Classifies one transaction description. Implementations must be safe to
/// call from several threads at once.
pub trait Classifier: Sync {
    fn classify(&self, description: &str) -> ClassifierOutcome;
}

impl<F> Classifier for F
where
    F: Fn(&str) -> ClassifierOutcome + Sync,
{
    fn classify(&self, description: &str) -> ClassifierOutcome {
        self(description)
    }
}

/// Always unavailable; every transaction gets the default classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl Classifier for Offline {
    fn classify(&self, _description: &str) -> ClassifierOutcome {
        Err(ClassificationUnavailable::Offline)
    }
}

pub fn build_prompt(description: &str, format: ResponseFormat) -> String {
    let ask = format!(
        "Classify the following bank transaction for a South African SME accountant: '{}'.",
        description
    );
    match format {
        ResponseFormat::Json => format!(
            "{ask}\nAnswer with a single JSON object with the keys \
             general_ledger_account_name, account_number, \
             vat_type (one of Standard, Zero, Exempt, None), \
             vat_percentage (a number, 15 or 0) and reason (one line)."
        ),
        ResponseFormat::Text => format!(
            "{ask} Provide:\n1. General Ledger Account Name\n2. Account Number\n\
             3. VAT Type (Standard, Zero, Exempt, None)\n4. VAT Percentage (15% or 0%)\n\
             5. One-line reason\nWrite each item on its own line as 'Label: value'."
        ),
    }
}

/// Chat-completions backed classifier. The API key is passed in explicitly.
pub struct OpenAiClassifier {
    client: reqwest::blocking::Client,
    api_key: String,
    settings: ClassifierSection,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiClassifier {
    pub fn new(api_key: impl Into<String>, settings: ClassifierSection) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(anyhow!(ClassificationUnavailable::MissingApiKey));
        }
        let client = http_client(Duration::from_secs(settings.timeout_secs))?;
        Ok(Self {
            client,
            api_key,
            settings,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

impl Classifier for OpenAiClassifier {
    fn classify(&self, description: &str) -> ClassifierOutcome {
        let format = self.settings.response_format;
        let mut body = json!({
            "model": self.settings.model,
            "temperature": self.settings.temperature,
            "messages": [{
                "role": "user",
                "content": build_prompt(description, format),
            }],
        });
        if format == ResponseFormat::Json {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let resp = self
            .client
            .post(self.endpoint())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ClassificationUnavailable::Api {
                status: status.as_u16(),
                body,
            });
        }
        let out: ChatResponse = resp.json()?;
        let content = out
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ClassificationUnavailable::EmptyResponse)?;
        tracing::debug!(description, answer = %content, "classifier answered");
        Ok(ClassifierPayload::Text(content))
    }
}

struct CompiledRule {
    pattern: Regex,
    answer: serde_json::Value,
}

/// Regex keyword rules answered locally; unmatched descriptions go to
/// `fallback`. The first matching rule wins.
pub struct RuleClassifier {
    rules: Vec<CompiledRule>,
    fallback: Box<dyn Classifier>,
}

impl RuleClassifier {
    pub fn new(specs: &[RuleSpec], fallback: Box<dyn Classifier>) -> Result<Self> {
        let mut rules = Vec::with_capacity(specs.len());
        for spec in specs {
            let pattern = Regex::new(spec.pattern.trim())
                .with_context(|| format!("Invalid regex pattern '{}'", spec.pattern))?;
            let answer = json!({
                "general_ledger_account_name": spec.account_name,
                "account_number": spec.account_number,
                "vat_type": spec.vat_type,
                "vat_percentage": spec.vat_percentage,
                "reason": spec
                    .reason
                    .clone()
                    .unwrap_or_else(|| format!("Matched rule /{}/", spec.pattern.trim())),
            });
            rules.push(CompiledRule { pattern, answer });
        }
        Ok(Self { rules, fallback })
    }
}

impl Classifier for RuleClassifier {
    fn classify(&self, description: &str) -> ClassifierOutcome {
        match self.rules.iter().find(|r| r.pattern.is_match(description)) {
            Some(rule) => Ok(ClassifierPayload::Structured(rule.answer.clone())),
            None => self.fallback.classify(description),
        }
    }
}
