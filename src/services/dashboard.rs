use {
    super::live::{Subscription, subscribe},
    super::loader::fetch_or_empty,
    crate::config::Config,
    crate::domain::error::DashboardError,
    crate::domain::event::ActivityEvent,
    crate::domain::feed::{EventFeed, FeedConfig},
    crate::domain::format::{describe, describe_compact, icon, relative_time},
    crate::domain::health::{BreakerState, HealthBoard, HealthSnapshot, ServiceStatus, status_label},
    crate::domain::history::{HistoryItem, merge_history},
    crate::domain::id::IdeaId,
    crate::domain::source::{DashboardSource, EventQuery, InsertNotifier, Table},
    crate::domain::stage::{PipelineStage, Progression, StudioPhase, Timeline, timeline},
    chrono::{DateTime, Utc},
    serde::Serialize,
    std::sync::Arc,
    tokio::sync::RwLock,
};

pub const EMPTY_ACTIVITY: &str = "No activity yet. Events will appear here as the pipeline runs.";
pub const EMPTY_HEALTH_EVENTS: &str = "No health events recorded.";
pub const EMPTY_HISTORY: &str = "No history recorded for this idea.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wording {
    Full,
    /// Health surface: drops the prefix the section heading already gives.
    Compact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub when: String,
    pub icon: &'static str,
    pub text: String,
    pub severity: String,
    pub color: &'static str,
}

impl FeedEntry {
    pub fn render(event: &ActivityEvent, now: DateTime<Utc>, wording: Wording) -> Self {
        let text = match wording {
            Wording::Full => describe(event),
            Wording::Compact => describe_compact(event),
        };
        Self {
            id: event.id.to_string(),
            timestamp: event.timestamp,
            when: relative_time(event.timestamp, now),
            icon: icon(&event.event_type),
            text,
            severity: event.severity.to_string(),
            color: event.severity.color_class(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedView {
    pub entries: Vec<FeedEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

impl FeedView {
    fn render(feed: &EventFeed, now: DateTime<Utc>, wording: Wording, empty: &'static str) -> Self {
        let entries: Vec<FeedEntry> = feed
            .visible()
            .map(|e| FeedEntry::render(e, now, wording))
            .collect();
        let empty_message = entries.is_empty().then_some(empty);
        Self {
            entries,
            empty_message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCard {
    pub label: &'static str,
    pub status: ServiceStatus,
    pub status_label: String,
    pub dot: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StatusCard {
    fn service(label: &'static str, raw: Option<&str>) -> Self {
        let status = ServiceStatus::classify(raw);
        Self {
            label,
            status,
            status_label: status_label(raw),
            dot: status.dot_class(),
            detail: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakerView {
    pub service: String,
    pub state: String,
    pub tone: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub processed: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthView {
    pub cards: Vec<StatusCard>,
    pub api_status: ServiceStatus,
    pub breakers: Vec<BreakerView>,
    /// Oldest first.
    pub chart: Vec<ChartPoint>,
    pub events: FeedView,
    pub last_check: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub item: HistoryItem,
    pub when: String,
    pub border: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryView {
    pub items: Vec<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub id: String,
    pub name: String,
    pub current: String,
    pub timeline: Timeline,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kill_reason: Option<String>,
}

/// Held by `main` for the process lifetime; dropping them stops live updates.
pub struct LiveSubscriptions(pub Vec<Subscription>);

impl LiveSubscriptions {
    pub async fn close(self) {
        for subscription in self.0 {
            subscription.close().await;
        }
    }
}

/// Every dashboard surface. The activity feed, health feed and health board
/// are long-lived and kept current by subscriptions; the idea surfaces are
/// fetched per request.
pub struct Dashboard {
    source: Arc<dyn DashboardSource>,
    config: Config,
    activity: Arc<RwLock<EventFeed>>,
    health_events: Arc<RwLock<EventFeed>>,
    health: Arc<RwLock<HealthBoard>>,
}

impl Dashboard {
    /// Seed the long-lived surfaces from history, then attach live updates.
    /// The seed always completes before a subscription starts. A surface
    /// whose subscription fails stays on its seed.
    pub async fn start(
        source: Arc<dyn DashboardSource>,
        notifier: &dyn InsertNotifier,
        config: Config,
    ) -> (Self, LiveSubscriptions) {
        let dashboard = Self::seed(source, config).await;

        let mut subscriptions = Vec::new();
        let attempts = [
            subscribe(notifier, Table::Activity, dashboard.activity.clone()).await,
            subscribe(notifier, Table::Activity, dashboard.health_events.clone()).await,
            subscribe(notifier, Table::Health, dashboard.health.clone()).await,
        ];
        for attempt in attempts {
            match attempt {
                Ok(subscription) => subscriptions.push(subscription),
                Err(e) => tracing::error!(error = %e, "live updates unavailable"),
            }
        }

        (dashboard, LiveSubscriptions(subscriptions))
    }

    /// Seed only, without live updates.
    pub async fn seed(source: Arc<dyn DashboardSource>, config: Config) -> Self {
        let timeout = config.fetch_timeout;

        let activity_history = fetch_or_empty(
            "activity",
            timeout,
            source.events(&EventQuery::recent(config.activity_feed_limit as i64)),
        )
        .await;
        let health_history = fetch_or_empty(
            "health events",
            timeout,
            source.events(&EventQuery::health(config.health_event_limit as i64)),
        )
        .await;
        let latest = fetch_or_empty("latest health", timeout, source.latest_health()).await;

        tracing::info!(
            activity = activity_history.len(),
            health_events = health_history.len(),
            has_snapshot = latest.is_some(),
            "dashboard seeded"
        );

        let activity = EventFeed::seeded(FeedConfig::activity(config.activity_feed_limit), activity_history);
        let health_events = EventFeed::seeded(FeedConfig::health(config.health_event_limit), health_history);

        Self {
            source,
            config,
            activity: Arc::new(RwLock::new(activity)),
            health_events: Arc::new(RwLock::new(health_events)),
            health: Arc::new(RwLock::new(HealthBoard::new(latest))),
        }
    }

    pub async fn activity(&self, now: DateTime<Utc>) -> FeedView {
        let feed = self.activity.read().await;
        FeedView::render(&feed, now, Wording::Full, EMPTY_ACTIVITY)
    }

    pub async fn health(&self, now: DateTime<Utc>) -> HealthView {
        let history = fetch_or_empty(
            "health history",
            self.config.fetch_timeout,
            self.source.health_history(self.config.health_history_limit as i64),
        )
        .await;

        let snapshot = self.health.read().await.current().cloned();
        let events = {
            let feed = self.health_events.read().await;
            FeedView::render(&feed, now, Wording::Compact, EMPTY_HEALTH_EVENTS)
        };

        health_view(snapshot.as_ref(), &history, events, now)
    }

    pub async fn idea_activity(&self, idea_id: &IdeaId, now: DateTime<Utc>) -> FeedView {
        let limit = self.config.activity_feed_limit;
        let events = fetch_or_empty(
            "idea activity",
            self.config.fetch_timeout,
            self.source.events(&EventQuery::for_idea(idea_id.clone(), limit as i64)),
        )
        .await;
        let feed = EventFeed::seeded(FeedConfig::idea(idea_id.clone(), limit), events);
        FeedView::render(&feed, now, Wording::Full, EMPTY_ACTIVITY)
    }

    pub async fn idea_history(&self, idea_id: &IdeaId, now: DateTime<Utc>) -> HistoryView {
        let timeout = self.config.fetch_timeout;
        let (decisions, pivots, events) = tokio::join!(
            fetch_or_empty("decisions", timeout, self.source.decisions(idea_id)),
            fetch_or_empty("pivots", timeout, self.source.pivots(idea_id)),
            fetch_or_empty(
                "idea events",
                timeout,
                self.source.events(&EventQuery::for_idea(
                    idea_id.clone(),
                    self.config.activity_feed_limit as i64
                )),
            ),
        );

        let items: Vec<HistoryEntry> = merge_history(&decisions, &pivots, &events)
            .into_iter()
            .map(|item| HistoryEntry {
                when: relative_time(item.timestamp, now),
                border: item.kind.border(),
                item,
            })
            .collect();
        let empty_message = items.is_empty().then_some(EMPTY_HISTORY);
        HistoryView {
            items,
            empty_message,
        }
    }

    /// `NotFound` when the idea does not exist. A failed lookup is reported
    /// the same way, matching the fail-soft policy of the other surfaces.
    pub async fn idea_progress(&self, idea_id: &IdeaId) -> Result<ProgressView, DashboardError> {
        let idea = fetch_or_empty("idea", self.config.fetch_timeout, self.source.idea(idea_id))
            .await
            .ok_or_else(|| DashboardError::NotFound(format!("idea {idea_id}")))?;

        Ok(ProgressView {
            id: idea.id.to_string(),
            timeline: timeline::<PipelineStage>(&idea.stage),
            name: idea.title,
            current: idea.stage,
            kill_reason: None,
        })
    }

    pub async fn studio_progress(&self, product_id: &str) -> Result<ProgressView, DashboardError> {
        let product = fetch_or_empty(
            "studio product",
            self.config.fetch_timeout,
            self.source.studio_product(product_id),
        )
        .await
        .ok_or_else(|| DashboardError::NotFound(format!("studio product {product_id}")))?;

        let killed = StudioPhase::parse(&product.phase) == Some(StudioPhase::TERMINAL);
        Ok(ProgressView {
            id: product.id,
            timeline: timeline::<StudioPhase>(&product.phase),
            name: product.name,
            current: product.phase,
            kill_reason: product.kill_reason.filter(|_| killed),
        })
    }
}

/// Assemble the health overview from the current snapshot, the newest-first
/// snapshot history and the rendered health feed.
pub fn health_view(
    snapshot: Option<&HealthSnapshot>,
    history: &[HealthSnapshot],
    events: FeedView,
    now: DateTime<Utc>,
) -> HealthView {
    let database = snapshot.and_then(|s| s.database.as_deref());
    let redis = snapshot.and_then(|s| s.redis.as_deref());

    let orchestrator = match snapshot.and_then(|s| s.orchestrator_last_run) {
        Some(last_run) => StatusCard {
            label: "Orchestrator",
            status: ServiceStatus::Healthy,
            status_label: status_label(Some("healthy")),
            dot: ServiceStatus::Healthy.dot_class(),
            detail: Some(format!("Last run: {}", relative_time(last_run, now))),
        },
        None => StatusCard {
            label: "Orchestrator",
            status: ServiceStatus::Unknown,
            status_label: status_label(None),
            dot: ServiceStatus::Unknown.dot_class(),
            detail: Some("No runs recorded".to_string()),
        },
    };

    let breakers = snapshot
        .map(|s| {
            s.circuit_breakers
                .iter()
                .map(|(service, state)| BreakerView {
                    service: service.clone(),
                    state: state.clone(),
                    tone: BreakerState::parse(state).tone(),
                })
                .collect()
        })
        .unwrap_or_default();

    let chart = history
        .iter()
        .rev()
        .map(|h| ChartPoint {
            timestamp: h.timestamp,
            processed: h.orchestrator_ideas_processed,
        })
        .collect();

    HealthView {
        cards: vec![
            StatusCard::service("Database", database),
            StatusCard::service("Redis", redis),
            orchestrator,
        ],
        api_status: snapshot.map_or(ServiceStatus::Unknown, HealthSnapshot::api_status),
        breakers,
        chart,
        events,
        last_check: snapshot.map(|s| s.timestamp),
    }
}
