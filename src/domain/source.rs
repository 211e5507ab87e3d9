use {
    super::error::DashboardError,
    super::event::{ActivityEvent, HEALTH_EVENT_TYPES},
    super::health::HealthSnapshot,
    super::id::IdeaId,
    super::idea::{Decision, IdeaSummary, Pivot, StudioProduct},
    std::{fmt, future::Future, pin::Pin},
};

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, DashboardError>> + Send + 'a>>;

/// Filter + limit for an activity query. Always ordered newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub event_types: Option<Vec<String>>,
    pub idea_id: Option<IdeaId>,
    pub limit: i64,
}

impl EventQuery {
    pub fn recent(limit: i64) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn health(limit: i64) -> Self {
        Self {
            event_types: Some(HEALTH_EVENT_TYPES.iter().map(|t| t.to_string()).collect()),
            limit,
            ..Self::default()
        }
    }

    pub fn for_idea(idea_id: IdeaId, limit: i64) -> Self {
        Self {
            idea_id: Some(idea_id),
            limit,
            ..Self::default()
        }
    }
}

/// Tables that publish insert notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Activity,
    Health,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activity => "dashboard_activity",
            Self::Health => "dashboard_health",
        }
    }

    /// `NOTIFY` channel the insert trigger publishes on.
    pub fn channel(&self) -> String {
        format!("{}_insert", self.as_str())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read access to everything the pipeline writes.
pub trait DashboardSource: Send + Sync {
    fn events(&self, query: &EventQuery) -> SourceFuture<'_, Vec<ActivityEvent>>;

    fn latest_health(&self) -> SourceFuture<'_, Option<HealthSnapshot>>;

    /// Newest first.
    fn health_history(&self, limit: i64) -> SourceFuture<'_, Vec<HealthSnapshot>>;

    fn idea(&self, id: &IdeaId) -> SourceFuture<'_, Option<IdeaSummary>>;

    fn decisions(&self, idea_id: &IdeaId) -> SourceFuture<'_, Vec<Decision>>;

    fn pivots(&self, idea_id: &IdeaId) -> SourceFuture<'_, Vec<Pivot>>;

    fn studio_product(&self, id: &str) -> SourceFuture<'_, Option<StudioProduct>>;
}

/// Row-insert notifications, one JSON document per inserted row.
pub trait InsertNotifier: Send + Sync {
    /// Start listening. Delivery stops once the returned receiver is dropped.
    fn listen(
        &self,
        table: Table,
    ) -> SourceFuture<'_, tokio::sync::mpsc::Receiver<serde_json::Value>>;
}
