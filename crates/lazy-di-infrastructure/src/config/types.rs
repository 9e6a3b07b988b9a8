//! Configuration types

use crate::constants::*;
use lazy_di_core::{MissingBranchPolicy, RegisterOptions, RegistryOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiConfig {
    /// Logging output
    pub logging: LoggingConfig,

    /// Resolution behaviour
    pub resolution: ResolutionConfig,

    /// Manifest loading
    pub loader: LoaderConfig,

    /// Built-in provider families
    pub providers: ProvidersConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,

    /// Log to file in addition to stderr
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

/// Serialized form of [`MissingBranchPolicy`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingBranchMode {
    #[default]
    AutoCreate,
    Fail,
}

impl From<MissingBranchMode> for MissingBranchPolicy {
    fn from(mode: MissingBranchMode) -> Self {
        match mode {
            MissingBranchMode::AutoCreate => MissingBranchPolicy::AutoCreate,
            MissingBranchMode::Fail => MissingBranchPolicy::Fail,
        }
    }
}

/// Resolution configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// What happens when a requested namespace does not exist
    pub missing_branch: MissingBranchMode,
}

impl ResolutionConfig {
    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            missing_branch: self.missing_branch.into(),
        }
    }
}

/// Manifest loading configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directories scanned for manifests (non-recursive)
    pub dirs: Vec<PathBuf>,

    /// Individual manifest files
    pub files: Vec<PathBuf>,

    /// Regex a file name must match to be loaded from a directory
    pub file_pattern: String,

    /// Token in `provides` replaced by the file stem
    pub placeholder: String,

    /// Loaded manifests replace earlier registrations
    pub override_existing: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            files: Vec::new(),
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            override_existing: true,
        }
    }
}

impl LoaderConfig {
    pub fn register_options(&self) -> RegisterOptions {
        RegisterOptions {
            override_existing: self.override_existing,
        }
    }
}

/// Built-in provider families
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Register `env::*`, `env-optional::*`, `envint::*` and `envint-optional::*`
    pub env: bool,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self { env: true }
    }
}
