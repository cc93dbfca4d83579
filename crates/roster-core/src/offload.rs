// Thread-hop adapter for synchronous collaborators
//
// The persistence store is blocking and must never run on the cooperative
// scheduler's own thread; doing so stalls every other task scheduled
// there. All store access from async context goes through `run_blocking`.

use crate::error::BatchError;

/// Runs `f` on the blocking worker pool and awaits its result.
///
/// Join failure (the worker panicked or the runtime is shutting down)
/// surfaces as a systemic error; it is not attributable to any one item.
pub async fn run_blocking<T, F>(f: F) -> Result<T, BatchError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| BatchError::systemic(format!("blocking worker unavailable: {e}")))
}
