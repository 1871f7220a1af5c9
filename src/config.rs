use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::section::CategoryLabels;

pub const DEFAULT_CONFIG_FILE: &str = "evaldraft.toml";
pub const DEFAULT_THRESHOLD: f64 = 0.80;
pub const DEFAULT_BYTE_LIMIT: usize = 4000;
pub const MIN_BYTE_LIMIT: usize = 500;
pub const MAX_BYTE_LIMIT: usize = 6000;
pub const DEFAULT_API_KEY_ENV: &str = "EVALDRAFT_API_KEY";
pub const DEFAULT_SUMMARIZER_TIMEOUT_SECS: u64 = 60;

pub fn default_keep_keywords() -> Vec<String> {
    ["핵심 기술", "사업모델", "매출", "시장", "검토", "조정", "보완", "승인"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_SUMMARIZER_TIMEOUT_SECS
}

/// Hosted model used to draft sections instead of the lexical pipeline.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SummarizerConfig {
    #[serde(default)]
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional prompt template replacing the built-in one.
    pub prompt_file: Option<String>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            model: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            prompt_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub similarity_threshold: Option<f64>,
    pub byte_limit: Option<usize>,
    pub required_phrases: Option<Vec<String>>,
    pub keep_keywords: Option<Vec<String>>,
    pub labels: Option<CategoryLabels>,
    pub summarizer: Option<SummarizerConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub similarity_threshold: f64,
    pub byte_limit: usize,
    pub required_phrases: Vec<String>,
    pub keep_keywords: Vec<String>,
    pub labels: CategoryLabels,
    pub summarizer: SummarizerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_THRESHOLD,
            byte_limit: DEFAULT_BYTE_LIMIT,
            required_phrases: Vec::new(),
            keep_keywords: default_keep_keywords(),
            labels: CategoryLabels::default(),
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl Config {
    /// Read the config file (if any), apply CLI overrides and validate.
    ///
    /// A missing default file means defaults; a missing file named with
    /// `--config` is an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let (config_path, explicit) = match cli.config {
            Some(ref p) => (PathBuf::from(p), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let file_config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            parse_config(&content)?
        } else if explicit {
            return Err(Error::ConfigNotFound(config_path));
        } else {
            ConfigFile::default()
        };

        let config = merge(file_config, cli);
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range settings before they reach the pipeline.
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.similarity_threshold)?;
        validate_byte_limit(self.byte_limit)?;
        if self.summarizer.enabled {
            validate_summarizer(&self.summarizer)?;
        }
        Ok(())
    }

    pub fn prompt_path(&self) -> Option<&Path> {
        self.summarizer.prompt_file.as_deref().map(Path::new)
    }
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    let config: ConfigFile = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ConfigFile) -> Result<()> {
    if let Some(threshold) = config.similarity_threshold {
        validate_threshold(threshold)?;
    }
    if let Some(limit) = config.byte_limit {
        validate_byte_limit(limit)?;
    }
    if let Some(ref summarizer) = config.summarizer
        && summarizer.enabled
    {
        validate_summarizer(summarizer)?;
    }
    Ok(())
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(Error::ConfigValidation(format!(
            "similarity_threshold must be in (0, 1], got {threshold}"
        )));
    }
    Ok(())
}

fn validate_byte_limit(limit: usize) -> Result<()> {
    if !(MIN_BYTE_LIMIT..=MAX_BYTE_LIMIT).contains(&limit) {
        return Err(Error::ConfigValidation(format!(
            "byte_limit must be between {MIN_BYTE_LIMIT} and {MAX_BYTE_LIMIT}, got {limit}"
        )));
    }
    Ok(())
}

fn validate_summarizer(summarizer: &SummarizerConfig) -> Result<()> {
    if summarizer.endpoint.as_deref().is_none_or(|e| e.trim().is_empty()) {
        return Err(Error::ConfigValidation(
            "summarizer.endpoint is required when the summarizer is enabled".to_string(),
        ));
    }
    if summarizer.model.as_deref().is_none_or(|m| m.trim().is_empty()) {
        return Err(Error::ConfigValidation(
            "summarizer.model is required when the summarizer is enabled".to_string(),
        ));
    }
    if summarizer.timeout_secs == 0 {
        return Err(Error::ConfigValidation(
            "summarizer.timeout_secs must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Trim list items and drop blanks.
fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty(items: &[String]) -> Option<Vec<String>> {
    if items.is_empty() {
        None
    } else {
        Some(items.to_vec())
    }
}

pub fn merge(file: ConfigFile, cli: &Cli) -> Config {
    let mut summarizer = file.summarizer.unwrap_or_default();
    summarizer.enabled = summarizer.enabled || cli.use_model;

    Config {
        similarity_threshold: cli
            .threshold
            .or(file.similarity_threshold)
            .unwrap_or(DEFAULT_THRESHOLD),
        byte_limit: cli
            .byte_limit
            .or(file.byte_limit)
            .unwrap_or(DEFAULT_BYTE_LIMIT),
        required_phrases: clean_list(
            non_empty(&cli.require)
                .or(file.required_phrases)
                .unwrap_or_default(),
        ),
        keep_keywords: clean_list(
            non_empty(&cli.keep)
                .or(file.keep_keywords)
                .unwrap_or_else(default_keep_keywords),
        ),
        labels: file.labels.unwrap_or_default(),
        summarizer,
    }
}
