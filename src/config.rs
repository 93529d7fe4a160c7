// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::BookError;
use crate::models::VatBasis;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Bookkeeper", "bookkeeper"));

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub classifier: ClassifierSection,
    pub import: ImportSection,
    pub vat: VatSection,
    pub display: DisplaySection,
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSection {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Concurrent classifier calls.
    pub jobs: usize,
    pub response_format: ResponseFormat,
}

impl Default for ClassifierSection {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.2,
            timeout_secs: 30,
            jobs: 4,
            response_format: ResponseFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSection {
    pub delimiter: Option<String>,
}

impl ImportSection {
    pub fn delimiter_byte(&self) -> std::result::Result<Option<u8>, BookError> {
        self.delimiter.as_deref().map(parse_delimiter).transpose()
    }
}

pub fn parse_delimiter(raw: &str) -> std::result::Result<u8, BookError> {
    match raw.trim() {
        "," | "comma" => Ok(b','),
        ";" | "semicolon" => Ok(b';'),
        other => Err(BookError::Config(format!(
            "delimiter must be ',' or ';', got '{}'",
            other
        ))),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VatSection {
    pub basis: VatBasis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub currency_symbol: String,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            currency_symbol: "R".to_string(),
        }
    }
}

/// A keyword rule answered without calling the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub pattern: String,
    pub account_name: String,
    pub account_number: String,
    #[serde(default = "default_rule_vat_type")]
    pub vat_type: String,
    #[serde(default)]
    pub vat_percentage: Decimal,
    #[serde(default)]
    pub reason: Option<String>,
}

fn default_rule_vat_type() -> String {
    "None".to_string()
}

pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Load from `path` or the default location. A missing file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        if path.is_some() {
            anyhow::bail!("Config file {} not found", p.display());
        }
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("Read config {}", p.display()))?;
    let cfg: Config =
        toml::from_str(&s).with_context(|| format!("Parse config {}", p.display()))?;
    cfg.import.delimiter_byte()?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("Failed to create config dir")?;
    }
    let s = toml::to_string_pretty(cfg).context("Serialize config")?;
    fs::write(path, s).with_context(|| format!("Write config {}", path.display()))?;
    Ok(())
}

/// Read the classifier API key from the environment.
pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [classifier]
            model = "gpt-4o-mini"

            [vat]
            basis = "inclusive"

            [[rules]]
            pattern = "(?i)engen"
            account_name = "Fuel"
            account_number = "6200"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.classifier.model, "gpt-4o-mini");
        assert_eq!(cfg.classifier.jobs, 4);
        assert_eq!(cfg.vat.basis, VatBasis::Inclusive);
        assert_eq!(cfg.display.currency_symbol, "R");
        assert_eq!(cfg.rules[0].vat_type, "None");
        assert_eq!(cfg.rules[0].vat_percentage, Decimal::ZERO);
    }

    #[test]
    fn delimiter_must_be_comma_or_semicolon() {
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter(" comma ").unwrap(), b',');
        assert!(parse_delimiter("|").is_err());
    }
}
