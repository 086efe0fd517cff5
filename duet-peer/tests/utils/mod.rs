
pub use loopback_relay::*;
pub use mock_engine::*;
pub use mock_observer::*;
pub use mock_signaling::*;

use std::future::Future;
use std::time::Duration;

/// Polls `check` every 20ms until it returns true or `timeout_ms` elapses.
pub async fn eventually<F, Fut>(timeout_ms: u64, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
