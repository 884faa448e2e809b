//! Integration test framework for nextgamf
#![allow(missing_docs)]
//!
//! Drives the AMF-side NAS security core against a UE-side peer that
//! protects and unprotects messages independently of the codec.
//!
//! # Components
//!
//! - [`ue_peer`] - UE half of NAS security, built directly on the primitives
//! - [`test_fixtures`] - Subscriber data and sample NAS messages
//! - [`test_utils`] - Logging setup and AMF context helpers
//!
//! # Test Categories
//!
//! 1. **Security procedures** - registration, security mode control, AN key
//!    and NH derivation, teardown
//! 2. **Counter behaviour** - COUNT progression, wrap and replay handling
//! 3. **Config loading** - YAML policy through to algorithm negotiation

pub mod test_fixtures;
pub mod test_utils;
pub mod ue_peer;

pub use test_fixtures::TestSubscriber;
pub use test_utils::{activated_amf_context, init_test_logging, TestResult};
pub use ue_peer::UePeer;
