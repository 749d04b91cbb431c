//! Ensemble configuration
//!
//! Layering, lowest to highest precedence:
//!
//! 1. Built-in defaults (the three Hugging Face models plus the fallback)
//! 2. An optional TOML file
//! 3. Environment overrides ([`EnvOverrides`])
//!
//! ```toml
//! device = "cpu"
//! max_length = 512
//!
//! [slots.mental_health]
//! kind = "http"
//! model = "mental/mental-bert-base-uncased"
//!
//! [slots.treebank]
//! kind = "lexicon"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::device::{DevicePreference, DEVICE_ENV};
use crate::types::SlotId;

/// Bearer token sent to HTTP classifier endpoints.
pub const API_TOKEN_ENV: &str = "CLINICAL_SENTIMENT_API_TOKEN";

/// Base URL that model ids are appended to.
pub const ENDPOINT_ENV: &str = "CLINICAL_SENTIMENT_ENDPOINT";

pub const DEFAULT_ENDPOINT_BASE: &str = "https://api-inference.huggingface.co/models";

/// Longest input, in tokens, the classifiers are asked to consider.
pub const DEFAULT_MAX_LENGTH: usize = 512;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Which kind of capability a slot builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Remote text-classification endpoint
    Http {
        model: String,
        /// Full endpoint URL; defaults to `{endpoint_base}/{model}`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    /// Offline keyword classifier
    Lexicon,
}

impl BackendConfig {
    pub fn http(model: impl Into<String>) -> Self {
        BackendConfig::Http {
            model: model.into(),
            url: None,
        }
    }

    /// Endpoint URL for HTTP backends, `None` for local ones.
    pub fn endpoint(&self, endpoint_base: &str) -> Option<String> {
        match self {
            BackendConfig::Http { url: Some(url), .. } => Some(url.clone()),
            BackendConfig::Http { model, url: None } => Some(format!(
                "{}/{}",
                endpoint_base.trim_end_matches('/'),
                model
            )),
            BackendConfig::Lexicon => None,
        }
    }

    /// Short name used in logs and slot status
    pub fn describe(&self) -> String {
        match self {
            BackendConfig::Http { model, .. } => model.clone(),
            BackendConfig::Lexicon => "lexicon".to_string(),
        }
    }
}

/// Backend per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotsConfig {
    pub mental_health: BackendConfig,
    /// Used only when `mental_health` cannot be built
    pub mental_health_fallback: Option<BackendConfig>,
    pub social: BackendConfig,
    pub treebank: BackendConfig,
}

impl SlotsConfig {
    pub fn get(&self, slot: SlotId) -> &BackendConfig {
        match slot {
            SlotId::MentalHealth => &self.mental_health,
            SlotId::Social => &self.social,
            SlotId::Treebank => &self.treebank,
        }
    }

    /// Fallback backend for `slot`. Only the mental-health slot has one.
    pub fn fallback(&self, slot: SlotId) -> Option<&BackendConfig> {
        match slot {
            SlotId::MentalHealth => self.mental_health_fallback.as_ref(),
            SlotId::Social | SlotId::Treebank => None,
        }
    }
}

impl Default for SlotsConfig {
    fn default() -> Self {
        Self {
            mental_health: BackendConfig::http(SlotId::MentalHealth.default_model()),
            mental_health_fallback: Some(BackendConfig::http(SlotId::Social.default_model())),
            social: BackendConfig::http(SlotId::Social.default_model()),
            treebank: BackendConfig::http(SlotId::Treebank.default_model()),
        }
    }
}

/// Top-level ensemble configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    pub device: DevicePreference,
    /// Token limit passed to classifiers; longer input is truncated by them
    pub max_length: usize,
    /// Per-request timeout for HTTP backends
    pub timeout_secs: u64,
    pub endpoint_base: String,
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    pub slots: SlotsConfig,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            device: DevicePreference::Auto,
            max_length: DEFAULT_MAX_LENGTH,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            endpoint_base: DEFAULT_ENDPOINT_BASE.to_string(),
            api_token: None,
            slots: SlotsConfig::default(),
        }
    }
}

impl EnsembleConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(EnvOverrides::capture())
    }

    /// Parse a TOML file, then apply environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.with_overrides(EnvOverrides::capture()))
    }

    /// Parse TOML without consulting the environment.
    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Every slot served by the offline lexicon classifier.
    pub fn offline() -> Self {
        Self {
            slots: SlotsConfig {
                mental_health: BackendConfig::Lexicon,
                mental_health_fallback: None,
                social: BackendConfig::Lexicon,
                treebank: BackendConfig::Lexicon,
            },
            ..Self::default()
        }
    }

    pub fn with_overrides(mut self, overrides: EnvOverrides) -> Self {
        if overrides.device.is_cpu_forced() {
            self.device = DevicePreference::Cpu;
        }
        if let Some(token) = overrides.api_token {
            self.api_token = Some(token);
        }
        if let Some(base) = overrides.endpoint_base {
            self.endpoint_base = base;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Values read from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Only [`DevicePreference::Cpu`] overrides the configured device
    pub device: DevicePreference,
    pub api_token: Option<String>,
    pub endpoint_base: Option<String>,
}

impl EnvOverrides {
    pub fn capture() -> Self {
        Self {
            device: DevicePreference::from_value(std::env::var(DEVICE_ENV).ok().as_deref()),
            api_token: non_empty_var(API_TOKEN_ENV),
            endpoint_base: non_empty_var(ENDPOINT_ENV),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
