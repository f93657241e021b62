// crates/frontline-config/src/config.rs
// ============================================================================
// Module: Frontline Configuration
// Description: Configuration loading and validation for the classifier.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: frontline-core, frontline-probes, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is read from a TOML file with a strict size limit. The file
//! is located from an explicit path, then the `FRONTLINE_CONFIG` environment
//! variable, then `frontline.toml` in the working directory. Only the implicit
//! default file may be absent; every table falls back to built-in defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use frontline_core::ProbeId;
use frontline_core::SignatureTable;
use frontline_probes::BuiltinProbeConfigs;
use frontline_probes::DEFAULT_PROBE_TIMEOUT_MS;
use frontline_probes::ProbeNetworkConfig;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "frontline.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "FRONTLINE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Smallest accepted timeout in milliseconds.
pub const MIN_TIMEOUT_MS: u64 = 100;
/// Largest accepted timeout in milliseconds.
pub const MAX_TIMEOUT_MS: u64 = 60_000;
/// Smallest accepted response head limit in bytes.
pub const MIN_RESPONSE_HEAD_BYTES: usize = 1024;
/// Largest accepted response head limit in bytes.
pub const MAX_RESPONSE_HEAD_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrontlineConfig {
    /// Probe selection and limits.
    pub probes: ProbeSettings,
    /// Signature table for the classification rules.
    pub signatures: SignatureTable,
}

/// Probe selection and limits.
///
/// # Invariants
/// - `enabled` is non-empty and free of duplicates after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeSettings {
    /// Per-probe timeout in milliseconds.
    pub timeout_ms: u64,
    /// Probes to run.
    pub enabled: Vec<ProbeId>,
    /// Socket limits shared by the network probes.
    pub network: ProbeNetworkConfig,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            enabled: ProbeId::ALL.to_vec(),
            network: ProbeNetworkConfig::default(),
        }
    }
}

impl ProbeSettings {
    /// Returns the per-probe timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the registry configuration for the built-in probes.
    #[must_use]
    pub fn builtin_configs(&self) -> BuiltinProbeConfigs {
        BuiltinProbeConfigs {
            timeout: self.timeout(),
            network: self.network.clone(),
        }
    }

    /// Validates probe selection and limits.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout("probes.timeout_ms", self.timeout_ms)?;
        validate_timeout("probes.network.connect_timeout_ms", self.network.connect_timeout_ms)?;
        validate_timeout("probes.network.io_timeout_ms", self.network.io_timeout_ms)?;
        if self.network.https_port == 0 {
            return Err(ConfigError::Invalid("probes.network.https_port must be non-zero".to_string()));
        }
        let head = self.network.max_response_head_bytes;
        if !(MIN_RESPONSE_HEAD_BYTES ..= MAX_RESPONSE_HEAD_BYTES).contains(&head) {
            return Err(ConfigError::Invalid(format!(
                "probes.network.max_response_head_bytes must be between \
                 {MIN_RESPONSE_HEAD_BYTES} and {MAX_RESPONSE_HEAD_BYTES}"
            )));
        }
        if self.network.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "probes.network.user_agent must be non-empty".to_string(),
            ));
        }
        if self.enabled.is_empty() {
            return Err(ConfigError::Invalid("probes.enabled must list at least one probe".to_string()));
        }
        let mut seen = BTreeSet::new();
        for id in &self.enabled {
            if !seen.insert(*id) {
                return Err(ConfigError::Invalid(format!(
                    "probes.enabled lists {} more than once",
                    id.as_str()
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Resolved location of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    /// Path to read.
    pub path: PathBuf,
    /// Whether a missing file is an error.
    pub required: bool,
}

impl ConfigSource {
    /// Resolves the config location from an explicit path or an environment
    /// override, falling back to the optional default file.
    #[must_use]
    pub fn resolve(path: Option<&Path>, env_path: Option<String>) -> Self {
        if let Some(path) = path {
            return Self {
                path: path.to_path_buf(),
                required: true,
            };
        }
        match env_path.filter(|value| !value.trim().is_empty()) {
            Some(value) => Self {
                path: PathBuf::from(value),
                required: true,
            },
            None => Self {
                path: PathBuf::from(DEFAULT_CONFIG_NAME),
                required: false,
            },
        }
    }
}

impl FrontlineConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(&ConfigSource::resolve(path, env::var(CONFIG_ENV_VAR).ok()))
    }

    /// Loads configuration from a resolved source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required file is missing, the file is
    /// oversized or not UTF-8, parsing fails, or validation fails.
    pub fn load_from(source: &ConfigSource) -> Result<Self, ConfigError> {
        if source.path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        let bytes = match fs::read(&source.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound && !source.required => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(err) => {
                return Err(ConfigError::Io(format!("{}: {err}", source.path.display())));
            }
        };
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown keys, and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.probes.validate()?;
        self.signatures
            .validate()
            .map_err(|err| ConfigError::Invalid(format!("signatures: {err}")))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a millisecond timeout against the accepted range.
fn validate_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if (MIN_TIMEOUT_MS ..= MAX_TIMEOUT_MS).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{field} must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
        )))
    }
}
