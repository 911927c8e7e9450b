//! Offloads synchronous filesystem work from the async executor.

use tokio::task::JoinError;

/// Runs blocking filesystem work on the blocking thread pool.
///
/// Join failures are mapped into the caller's error type with `map_err`.
pub(crate) async fn run_blocking<F, T, E, M>(work: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(JoinError) -> E,
{
    tokio::task::spawn_blocking(work).await.map_err(map_err)?
}
