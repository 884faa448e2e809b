//! Test utility functions for integration tests

use nextgamf_nas::{NasSecurityContext, NasSecuritySelection};
use tracing_subscriber::{fmt, EnvFilter};

use crate::test_fixtures::TestSubscriber;

/// Result type for integration tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Initialize logging for tests
///
/// Uses RUST_LOG environment variable if set, otherwise defaults to "info"
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

/// AMF context taken through KSEAF, KAMF and algorithm key derivation and
/// activated, as after a successful Security Mode procedure.
pub fn activated_amf_context(
    subscriber: &TestSubscriber,
    selection: NasSecuritySelection,
) -> TestResult<NasSecurityContext> {
    let mut ctx = NasSecurityContext::with_access_type(subscriber.access_type);
    ctx.set_abba(subscriber.abba.clone());
    ctx.set_kseaf(&subscriber.kseaf)?;
    ctx.derive_kamf(&subscriber.supi)?;
    ctx.apply_algorithms(selection.ciphering, selection.integrity)?;
    ctx.activate()?;
    Ok(ctx)
}
