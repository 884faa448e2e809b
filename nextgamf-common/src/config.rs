//! AMF security configuration
//!
//! Operator algorithm priority lists and logging settings, loaded from YAML:
//!
//! ```yaml
//! amfName: AMF
//! logLevel: debug
//! security:
//!   integrityOrder: [NIA2]
//!   cipheringOrder: [NEA0, NEA2]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;

use crate::error::Error;
use crate::logging::LogLevel;
use crate::types::{CipheringAlgorithm, IntegrityAlgorithm};

/// Operator-configured NAS security algorithm priorities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
    /// Integrity algorithms, most preferred first
    pub integrity_order: Vec<IntegrityAlgorithm>,
    /// Ciphering algorithms, most preferred first
    pub ciphering_order: Vec<CipheringAlgorithm>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            integrity_order: vec![
                IntegrityAlgorithm::Nia2,
                IntegrityAlgorithm::Nia1,
                IntegrityAlgorithm::Nia3,
            ],
            ciphering_order: vec![
                CipheringAlgorithm::Nea0,
                CipheringAlgorithm::Nea2,
                CipheringAlgorithm::Nea1,
                CipheringAlgorithm::Nea3,
            ],
        }
    }
}

impl SecurityConfig {
    /// Checks that both lists are non-empty and free of duplicates.
    pub fn validate(&self) -> Result<(), Error> {
        check_order("integrityOrder", &self.integrity_order)?;
        check_order("cipheringOrder", &self.ciphering_order)
    }
}

fn check_order<T: Eq + Hash + Copy + std::fmt::Display>(
    field: &str,
    order: &[T],
) -> Result<(), Error> {
    if order.is_empty() {
        return Err(Error::Config(format!("{field} must not be empty")));
    }
    let mut seen = HashSet::new();
    for alg in order {
        if !seen.insert(*alg) {
            return Err(Error::Config(format!("{field} lists {alg} more than once")));
        }
    }
    Ok(())
}

/// Top-level AMF configuration for the NAS security core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmfConfig {
    /// AMF instance name, used in log output
    pub amf_name: String,
    /// NAS security settings
    #[serde(default)]
    pub security: SecurityConfig,
    /// Default log level (overridden by `RUST_LOG`)
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for AmfConfig {
    fn default() -> Self {
        Self {
            amf_name: "AMF".to_string(),
            security: SecurityConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl AmfConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), Error> {
        if self.amf_name.trim().is_empty() {
            return Err(Error::Config("amfName must not be empty".to_string()));
        }
        self.security.validate()
    }
}

/// Loads and validates an AMF configuration file.
pub fn load_amf_config<P: AsRef<Path>>(path: P) -> Result<AmfConfig, Error> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    load_amf_config_from_str(&contents)
}

/// Parses and validates an AMF configuration from a YAML string.
pub fn load_amf_config_from_str(yaml: &str) -> Result<AmfConfig, Error> {
    let config: AmfConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}
