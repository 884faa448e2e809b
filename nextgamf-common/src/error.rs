//! Error types shared across nextgamf crates

use thiserror::Error;

/// Error types for configuration and shared value parsing.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration is syntactically valid but semantically wrong.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Numeric algorithm identifier outside the 0..=3 range.
    #[error("Unknown {kind} algorithm identifier: {value}")]
    UnknownAlgorithm {
        /// "ciphering" or "integrity"
        kind: &'static str,
        /// The offending identifier
        value: u8,
    },
}
