use {
    super::{activity_repo, health_repo},
    crate::domain::error::DashboardError,
    crate::domain::id::EventId,
    crate::domain::source::{InsertNotifier, SourceFuture, Table},
    sqlx::{PgPool, postgres::PgListener},
    std::time::Duration,
    tokio::sync::mpsc,
};

const CHANNEL_CAPACITY: usize = 256;

/// Insert notifications over `LISTEN/NOTIFY`. The insert trigger publishes
/// the new row's id on `{table}_insert`; the row itself is read back here so
/// the writer never hits the NOTIFY payload limit.
#[derive(Clone)]
pub struct PgNotifier {
    pool: PgPool,
}

impl PgNotifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl InsertNotifier for PgNotifier {
    fn listen(&self, table: Table) -> SourceFuture<'_, mpsc::Receiver<serde_json::Value>> {
        Box::pin(async move {
            let channel = table.channel();
            let mut listener = PgListener::connect_with(&self.pool).await?;
            listener.listen(&channel).await?;
            tracing::info!(%table, %channel, "listening for inserts");

            let pool = self.pool.clone();
            let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = tx.closed() => {
                            tracing::debug!(%table, "insert receiver dropped, unlistening");
                            return;
                        }
                        received = listener.recv() => match received {
                            Ok(notification) => {
                                let id = notification.payload();
                                match fetch_row(&pool, table, id).await {
                                    Ok(Some(row)) => {
                                        if tx.send(row).await.is_err() {
                                            return;
                                        }
                                    }
                                    Ok(None) => {
                                        tracing::warn!(%table, id, "notified row not found");
                                    }
                                    Err(e) => {
                                        tracing::warn!(%table, id, error = %e, "failed to read notified row");
                                    }
                                }
                            }
                            Err(e) => {
                                tracing::error!(%table, error = %e, "listener error, retrying");
                                tokio::time::sleep(Duration::from_secs(1)).await;
                            }
                        }
                    }
                }
            });

            Ok(rx)
        })
    }
}

/// Read a notified row back as the JSON document subscribers decode.
async fn fetch_row(
    pool: &PgPool,
    table: Table,
    id: &str,
) -> Result<Option<serde_json::Value>, DashboardError> {
    let row = match table {
        Table::Activity => activity_repo::find_event(pool, &EventId::new(id))
            .await?
            .map(serde_json::to_value),
        Table::Health => health_repo::find_snapshot(pool, id)
            .await?
            .map(serde_json::to_value),
    };
    Ok(row.transpose()?)
}
