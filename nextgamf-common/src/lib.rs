//! Common types and utilities for nextgamf
//!
//! Shared algorithm identifiers, subscriber identity handling, the AMF
//! security configuration and logging setup used by the crypto and NAS
//! crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{load_amf_config, load_amf_config_from_str, AmfConfig, SecurityConfig};
pub use error::Error;
pub use logging::{
    init_logging, init_logging_with_filter, log_nas_message, Direction, HexDump, LogLevel,
};
pub use types::{AccessType, CipheringAlgorithm, IntegrityAlgorithm, RrcEstablishmentCause, Supi};
