use {
    crate::domain::error::DashboardError,
    crate::domain::event::scalar_text,
    crate::domain::health::HealthSnapshot,
    chrono::{DateTime, Utc},
    sqlx::PgPool,
    std::collections::BTreeMap,
};

#[derive(Debug, sqlx::FromRow)]
pub struct HealthRow {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub database: Option<String>,
    pub redis: Option<String>,
    pub circuit_breakers: Option<serde_json::Value>,
    pub orchestrator_last_run: Option<DateTime<Utc>>,
    pub orchestrator_ideas_processed: Option<i64>,
}

impl From<HealthRow> for HealthSnapshot {
    fn from(row: HealthRow) -> Self {
        // Breaker states are written by the pipeline; tolerate non-string values.
        let circuit_breakers = match row.circuit_breakers {
            Some(serde_json::Value::Object(map)) => map
                .into_iter()
                .filter_map(|(name, state)| scalar_text(&state).map(|s| (name, s)))
                .collect(),
            _ => BTreeMap::new(),
        };
        Self {
            id: row.id,
            timestamp: row.timestamp,
            database: row.database,
            redis: row.redis,
            circuit_breakers,
            orchestrator_last_run: row.orchestrator_last_run,
            orchestrator_ideas_processed: row.orchestrator_ideas_processed.unwrap_or(0),
        }
    }
}

pub async fn fetch_latest(pool: &PgPool) -> Result<Option<HealthSnapshot>, DashboardError> {
    let row = sqlx::query_as::<_, HealthRow>(
        r#"
        SELECT id, timestamp, database, redis, circuit_breakers,
               orchestrator_last_run, orchestrator_ideas_processed
        FROM dashboard_health
        ORDER BY timestamp DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.map(HealthSnapshot::from))
}

/// Newest first.
pub async fn fetch_history(pool: &PgPool, limit: i64) -> Result<Vec<HealthSnapshot>, DashboardError> {
    let rows = sqlx::query_as::<_, HealthRow>(
        r#"
        SELECT id, timestamp, database, redis, circuit_breakers,
               orchestrator_last_run, orchestrator_ideas_processed
        FROM dashboard_health
        ORDER BY timestamp DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(HealthSnapshot::from).collect())
}

pub async fn find_snapshot(pool: &PgPool, id: &str) -> Result<Option<HealthSnapshot>, DashboardError> {
    let row = sqlx::query_as::<_, HealthRow>(
        r#"
        SELECT id, timestamp, database, redis, circuit_breakers,
               orchestrator_last_run, orchestrator_ideas_processed
        FROM dashboard_health
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(HealthSnapshot::from))
}
