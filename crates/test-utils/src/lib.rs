pub mod builders;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Route `prefix` logs through the test harness's captured output.
///
/// Defaults to `prefix=debug` so timer and relocation decisions show up next
/// to a failing assertion; override with `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("prefix=debug"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .init();
    });
}

/// Upper bound for a test that waits on `windows` debounce windows of length
/// `window`, plus one extra window of slack.
pub fn debounce_deadline(window: Duration, windows: u32) -> Duration {
    window * (windows + 1)
}

/// Await `f`, failing the test if it takes longer than `limit`.
///
/// Under `start_paused = true` the limit is virtual time, so it only trips
/// when the runtime is stuck rather than slow.
pub async fn with_timeout<F, T>(limit: Duration, f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, f).await {
        Ok(out) => out,
        Err(_) => panic!("timed out after {limit:?}"),
    }
}
