use {
    crate::domain::error::DashboardError,
    std::{future::Future, time::Duration},
};

/// Run a fetch under `timeout`. Failures and timeouts degrade to the empty
/// value so the caller renders its empty state instead of an error.
pub async fn fetch_or_empty<T, F>(what: &'static str, timeout: Duration, fetch: F) -> T
where
    T: Default,
    F: Future<Output = Result<T, DashboardError>>,
{
    let err = match tokio::time::timeout(timeout, fetch).await {
        Ok(Ok(value)) => return value,
        Ok(Err(e)) => e,
        Err(_) => DashboardError::Timeout(format!("{what} after {}ms", timeout.as_millis())),
    };
    tracing::warn!(what, error = %err, "fetch failed, rendering empty");
    T::default()
}
