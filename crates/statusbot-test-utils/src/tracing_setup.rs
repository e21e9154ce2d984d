//! Tracing initialisation for tests.
//!
//! [`init_test_tracing`] routes `tracing` events from the statusbot crates to
//! the test-harness writer, so degraded identity sources show up in the output
//! of a failing test.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_TEST_FILTER: &str = "statusbot_core=debug,statusbot_config=debug";

/// Install a process-wide subscriber writing to the test harness.
///
/// Respects `RUST_LOG`. Idempotent; later calls are ignored.
///
/// # Example
///
/// ```ignore
/// #[tokio::test]
/// async fn my_test() {
///     statusbot_test_utils::tracing_setup::init_test_tracing();
///     tracing::debug!("visible in failing test output");
/// }
/// ```
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER)),
        )
        .with_test_writer()
        .try_init();
}
