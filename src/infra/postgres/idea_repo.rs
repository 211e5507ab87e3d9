use {
    crate::domain::error::DashboardError,
    crate::domain::id::IdeaId,
    crate::domain::idea::{Decision, IdeaSummary, Pivot, StudioProduct},
    chrono::{DateTime, Utc},
    sqlx::PgPool,
};

#[derive(Debug, sqlx::FromRow)]
struct IdeaRow {
    id: String,
    title: String,
    stage: String,
    status: String,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct DecisionRow {
    id: String,
    idea_id: String,
    decision_type: String,
    made_by: String,
    reasoning: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct PivotRow {
    id: String,
    idea_id: String,
    pivot_number: i32,
    pivot_type: String,
    new_direction: Option<String>,
    outcome: Option<String>,
    created_at: DateTime<Utc>,
}

pub async fn find_idea(pool: &PgPool, id: &IdeaId) -> Result<Option<IdeaSummary>, DashboardError> {
    let row = sqlx::query_as::<_, IdeaRow>(
        "SELECT id, title, stage, status, updated_at FROM dashboard_ideas WHERE id = $1",
    )
    .bind(id.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| IdeaSummary {
        id: IdeaId::new(r.id),
        title: r.title,
        stage: r.stage,
        status: r.status,
        updated_at: r.updated_at,
    }))
}

pub async fn fetch_decisions(pool: &PgPool, idea_id: &IdeaId) -> Result<Vec<Decision>, DashboardError> {
    let rows = sqlx::query_as::<_, DecisionRow>(
        r#"
        SELECT id, idea_id, decision_type, made_by, reasoning, created_at
        FROM dashboard_decisions
        WHERE idea_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(idea_id.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| Decision {
            id: r.id,
            idea_id: IdeaId::new(r.idea_id),
            decision_type: r.decision_type,
            made_by: r.made_by,
            reasoning: r.reasoning.unwrap_or_default(),
            created_at: r.created_at,
        })
        .collect())
}

pub async fn fetch_pivots(pool: &PgPool, idea_id: &IdeaId) -> Result<Vec<Pivot>, DashboardError> {
    let rows = sqlx::query_as::<_, PivotRow>(
        r#"
        SELECT id, idea_id, pivot_number, pivot_type, new_direction, outcome, created_at
        FROM dashboard_pivots
        WHERE idea_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(idea_id.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| Pivot {
            id: r.id,
            idea_id: IdeaId::new(r.idea_id),
            pivot_number: r.pivot_number,
            pivot_type: r.pivot_type,
            new_direction: r.new_direction.unwrap_or_default(),
            outcome: r.outcome.unwrap_or_default(),
            created_at: r.created_at,
        })
        .collect())
}

pub async fn find_studio_product(pool: &PgPool, id: &str) -> Result<Option<StudioProduct>, DashboardError> {
    let row = sqlx::query_as::<_, (String, String, String, Option<String>)>(
        "SELECT id, name, phase, kill_reason FROM dashboard_studio_products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name, phase, kill_reason)| StudioProduct {
        id,
        name,
        phase,
        kill_reason,
    }))
}
