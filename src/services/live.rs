use {
    crate::domain::error::DashboardError,
    crate::domain::event::ActivityEvent,
    crate::domain::feed::EventFeed,
    crate::domain::health::{HealthBoard, HealthSnapshot},
    crate::domain::source::{InsertNotifier, Table},
    serde::de::DeserializeOwned,
    std::sync::Arc,
    tokio::{sync::RwLock, task::JoinHandle},
};

/// In-memory state a subscription keeps current.
pub trait LiveTarget: Send + Sync + 'static {
    type Record: DeserializeOwned + Send + 'static;

    fn receive(&mut self, record: Self::Record);
}

impl LiveTarget for EventFeed {
    type Record = ActivityEvent;

    fn receive(&mut self, event: ActivityEvent) {
        let event_id = event.id.clone();
        let outcome = self.insert(event);
        tracing::trace!(%event_id, ?outcome, "live event");
    }
}

impl LiveTarget for HealthBoard {
    type Record = HealthSnapshot;

    fn receive(&mut self, snapshot: HealthSnapshot) {
        let snapshot_id = snapshot.id.clone();
        let current = self.apply(snapshot);
        tracing::trace!(%snapshot_id, current, "live health snapshot");
    }
}

/// A running insert subscription. Dropping it aborts delivery; use
/// [`Subscription::close`] to also wait until the task has stopped.
pub struct Subscription {
    table: Table,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn table(&self) -> Table {
        self.table
    }

    /// Stop delivery. Once this returns the target is never touched again.
    pub async fn close(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
        tracing::debug!(table = %self.table, "subscription closed");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!(table = %self.table, "subscription dropped");
        }
    }
}

/// Listen for inserts on `table` and apply each decoded row to `target`.
/// Rows that do not decode are logged and skipped.
pub async fn subscribe<T: LiveTarget>(
    notifier: &dyn InsertNotifier,
    table: Table,
    target: Arc<RwLock<T>>,
) -> Result<Subscription, DashboardError> {
    let mut rows = notifier.listen(table).await?;

    let handle = tokio::spawn(async move {
        while let Some(row) = rows.recv().await {
            match serde_json::from_value::<T::Record>(row) {
                Ok(record) => target.write().await.receive(record),
                Err(e) => {
                    tracing::warn!(%table, error = %DashboardError::from(e), "malformed insert payload skipped");
                }
            }
        }
        tracing::debug!(%table, "insert stream ended");
    });

    Ok(Subscription {
        table,
        handle: Some(handle),
    })
}
