use {
    super::{activity_repo, health_repo, idea_repo},
    crate::domain::event::ActivityEvent,
    crate::domain::health::HealthSnapshot,
    crate::domain::id::IdeaId,
    crate::domain::idea::{Decision, IdeaSummary, Pivot, StudioProduct},
    crate::domain::source::{DashboardSource, EventQuery, SourceFuture},
    sqlx::PgPool,
};

/// [`DashboardSource`] backed by the pipeline's Postgres tables.
#[derive(Clone)]
pub struct PgSource {
    pool: PgPool,
}

impl PgSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DashboardSource for PgSource {
    fn events(&self, query: &EventQuery) -> SourceFuture<'_, Vec<ActivityEvent>> {
        let query = query.clone();
        Box::pin(async move { activity_repo::fetch_events(&self.pool, &query).await })
    }

    fn latest_health(&self) -> SourceFuture<'_, Option<HealthSnapshot>> {
        Box::pin(health_repo::fetch_latest(&self.pool))
    }

    fn health_history(&self, limit: i64) -> SourceFuture<'_, Vec<HealthSnapshot>> {
        Box::pin(health_repo::fetch_history(&self.pool, limit))
    }

    fn idea(&self, id: &IdeaId) -> SourceFuture<'_, Option<IdeaSummary>> {
        let id = id.clone();
        Box::pin(async move { idea_repo::find_idea(&self.pool, &id).await })
    }

    fn decisions(&self, idea_id: &IdeaId) -> SourceFuture<'_, Vec<Decision>> {
        let idea_id = idea_id.clone();
        Box::pin(async move { idea_repo::fetch_decisions(&self.pool, &idea_id).await })
    }

    fn pivots(&self, idea_id: &IdeaId) -> SourceFuture<'_, Vec<Pivot>> {
        let idea_id = idea_id.clone();
        Box::pin(async move { idea_repo::fetch_pivots(&self.pool, &idea_id).await })
    }

    fn studio_product(&self, id: &str) -> SourceFuture<'_, Option<StudioProduct>> {
        let id = id.to_string();
        Box::pin(async move { idea_repo::find_studio_product(&self.pool, &id).await })
    }
}
