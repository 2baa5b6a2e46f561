use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use thiserror::Error;

use crate::similarity::StopwordPolicy;

const APP_DIR: &str = "docsim";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("similarity_threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f64),

    #[error("max_parallel must be at least 1")]
    NoParallelism,

    #[error("invalid value for {key}: {value}")]
    InvalidOverride { key: String, value: String },
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Html,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Paths {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub trash_dir: PathBuf,
    /// Where duplicate reports go. Unset or empty means the trash folder.
    pub log_dir: Option<PathBuf>,
}

impl Default for Paths {
    fn default() -> Self {
        let base = Config::get_app_data_dir();
        Self {
            input_dir: base.join("01_InboxDocs"),
            output_dir: base.join("02_FinalDocs"),
            trash_dir: base.join("03_TrashDocs"),
            log_dir: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DocumentProcessing {
    pub max_file_size_mb: u64,
    pub similarity_threshold: f64,
}

impl Default for DocumentProcessing {
    fn default() -> Self {
        Self {
            max_file_size_mb: 20,
            similarity_threshold: 0.85,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DuplicateDetection {
    pub enabled: bool,
    pub check_in_output_dir: bool,
    /// Byte-identical files are duplicates before any text is compared.
    pub hash_check: bool,
    /// Incoming text shorter than this (in chars) is not compared at all.
    pub min_text_length: usize,
    pub max_parallel: usize,
    pub generate_report: bool,
    pub report_format: ReportFormat,
    pub stopwords: StopwordPolicy,
}

impl Default for DuplicateDetection {
    fn default() -> Self {
        Self {
            enabled: true,
            check_in_output_dir: true,
            hash_check: true,
            min_text_length: 0,
            max_parallel: 4,
            generate_report: false,
            report_format: ReportFormat::Text,
            stopwords: StopwordPolicy::Extended,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub paths: Paths,
    pub document_processing: DocumentProcessing,
    pub duplicate_detection: DuplicateDetection,
}

impl Config {
    /// Get the application data directory
    pub fn get_app_data_dir() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);

        if !path.exists() {
            let _ = std::fs::create_dir_all(&path);
        }
        path
    }

    pub fn default_path() -> PathBuf {
        Self::get_app_data_dir().join(CONFIG_FILE)
    }

    /// Read the config at `path`. A missing file yields the defaults; a file
    /// that exists but does not parse is an error.
    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path`, apply environment overrides, and validate.
    pub fn load(path: &Path) -> Result<Config> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `DOCSIM_*` variables win over the file.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("DOCSIM_INPUT_DIR") {
            self.paths.input_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("DOCSIM_OUTPUT_DIR") {
            self.paths.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("DOCSIM_TRASH_DIR") {
            self.paths.trash_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("DOCSIM_THRESHOLD") {
            self.document_processing.similarity_threshold =
                value.trim().parse().map_err(|_| ConfigError::InvalidOverride {
                    key: "DOCSIM_THRESHOLD".to_string(),
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup("DOCSIM_STOPWORDS") {
            self.duplicate_detection.stopwords =
                value.parse().map_err(|_| ConfigError::InvalidOverride {
                    key: "DOCSIM_STOPWORDS".to_string(),
                    value: value.clone(),
                })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.document_processing.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::ThresholdOutOfRange(threshold));
        }
        if self.duplicate_detection.max_parallel == 0 {
            return Err(ConfigError::NoParallelism);
        }
        Ok(())
    }

    /// Folder duplicate reports are written to.
    pub fn report_dir(&self) -> PathBuf {
        match &self.paths.log_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir.clone(),
            _ => self.paths.trash_dir.clone(),
        }
    }
}
