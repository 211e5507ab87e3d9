use {
    crate::domain::error::DashboardError,
    crate::domain::event::ActivityEvent,
    crate::domain::id::{EventId, IdeaId},
    crate::domain::source::EventQuery,
    chrono::{DateTime, Utc},
    sqlx::PgPool,
};

#[derive(Debug, sqlx::FromRow)]
pub struct ActivityRow {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub idea_id: Option<String>,
    pub idea_title: Option<String>,
    pub details: Option<serde_json::Value>,
    pub severity: String,
}

impl From<ActivityRow> for ActivityEvent {
    fn from(row: ActivityRow) -> Self {
        let details = match row.details {
            Some(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        Self {
            id: EventId::new(row.id),
            timestamp: row.timestamp,
            event_type: row.event_type,
            idea_id: row.idea_id.map(IdeaId::new),
            idea_title: row.idea_title,
            details,
            severity: row.severity.into(),
        }
    }
}

/// Newest-first activity, optionally restricted to a set of event types
/// and/or one idea.
pub async fn fetch_events(
    pool: &PgPool,
    query: &EventQuery,
) -> Result<Vec<ActivityEvent>, DashboardError> {
    let rows = sqlx::query_as::<_, ActivityRow>(
        r#"
        SELECT id, timestamp, event_type, idea_id, idea_title, details, severity
        FROM dashboard_activity
        WHERE ($1::text[] IS NULL OR event_type = ANY($1))
          AND ($2::text IS NULL OR idea_id = $2)
        ORDER BY timestamp DESC
        LIMIT $3
        "#,
    )
    .bind(query.event_types.clone())
    .bind(query.idea_id.as_ref().map(|id| id.as_str()))
    .bind(query.limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ActivityEvent::from).collect())
}

pub async fn find_event(pool: &PgPool, id: &EventId) -> Result<Option<ActivityEvent>, DashboardError> {
    let row = sqlx::query_as::<_, ActivityRow>(
        r#"
        SELECT id, timestamp, event_type, idea_id, idea_title, details, severity
        FROM dashboard_activity
        WHERE id = $1
        "#,
    )
    .bind(id.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ActivityEvent::from))
}
