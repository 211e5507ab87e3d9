#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use incubator_watch::domain::error::DashboardError;
use incubator_watch::domain::event::{ActivityEvent, Severity};
use incubator_watch::domain::health::HealthSnapshot;
use incubator_watch::domain::id::{EventId, IdeaId};
use incubator_watch::domain::idea::{Decision, IdeaSummary, Pivot, StudioProduct};
use incubator_watch::domain::source::{DashboardSource, EventQuery, InsertNotifier, SourceFuture, Table};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Fixed reference instant so relative-time labels are deterministic.
pub fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

/// `base() + minutes`.
pub fn at(minutes: i64) -> DateTime<Utc> {
    base() + Duration::minutes(minutes)
}

pub fn event(id: &str, event_type: &str, minutes: i64) -> ActivityEvent {
    ActivityEvent {
        id: EventId::new(id),
        timestamp: at(minutes),
        event_type: event_type.to_string(),
        idea_id: None,
        idea_title: None,
        details: serde_json::Map::new(),
        severity: Severity::Info,
    }
}

pub fn event_with(
    id: &str,
    event_type: &str,
    title: Option<&str>,
    details: serde_json::Value,
) -> ActivityEvent {
    let mut e = event(id, event_type, 0);
    e.idea_title = title.map(str::to_string);
    e.details = match details {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    e
}

pub fn idea_event(id: &str, idea_id: &str, event_type: &str, minutes: i64) -> ActivityEvent {
    let mut e = event(id, event_type, minutes);
    e.idea_id = Some(IdeaId::new(idea_id));
    e.idea_title = Some(format!("Idea {idea_id}"));
    e
}

pub fn snapshot(id: &str, minutes: i64, processed: i64) -> HealthSnapshot {
    HealthSnapshot {
        id: id.to_string(),
        timestamp: at(minutes),
        database: Some("healthy".to_string()),
        redis: Some("healthy".to_string()),
        circuit_breakers: BTreeMap::new(),
        orchestrator_last_run: None,
        orchestrator_ideas_processed: processed,
    }
}

pub fn ids<'a>(events: impl IntoIterator<Item = &'a ActivityEvent>) -> Vec<String> {
    events.into_iter().map(|e| e.id.to_string()).collect()
}

// ── In-memory source ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemorySource {
    pub events: Vec<ActivityEvent>,
    pub health: Vec<HealthSnapshot>,
    pub ideas: Vec<IdeaSummary>,
    pub decisions: Vec<Decision>,
    pub pivots: Vec<Pivot>,
    pub studio: Vec<StudioProduct>,
    /// Every call fails, as with missing credentials.
    pub broken: bool,
    /// Every call stalls this long first.
    pub delay: Option<std::time::Duration>,
}

impl MemorySource {
    async fn check(&self) -> Result<(), DashboardError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.broken {
            Err(DashboardError::Config("no credentials".into()))
        } else {
            Ok(())
        }
    }
}

impl DashboardSource for MemorySource {
    fn events(&self, query: &EventQuery) -> SourceFuture<'_, Vec<ActivityEvent>> {
        let query = query.clone();
        Box::pin(async move {
            self.check().await?;
            let mut out: Vec<ActivityEvent> = self
                .events
                .iter()
                .filter(|e| {
                    query
                        .event_types
                        .as_ref()
                        .is_none_or(|types| types.iter().any(|t| *t == e.event_type))
                })
                .filter(|e| query.idea_id.is_none() || e.idea_id == query.idea_id)
                .cloned()
                .collect();
            out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            out.truncate(query.limit as usize);
            Ok(out)
        })
    }

    fn latest_health(&self) -> SourceFuture<'_, Option<HealthSnapshot>> {
        Box::pin(async move {
            self.check().await?;
            Ok(self.health.iter().max_by_key(|h| h.timestamp).cloned())
        })
    }

    fn health_history(&self, limit: i64) -> SourceFuture<'_, Vec<HealthSnapshot>> {
        Box::pin(async move {
            self.check().await?;
            let mut out = self.health.clone();
            out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            out.truncate(limit as usize);
            Ok(out)
        })
    }

    fn idea(&self, id: &IdeaId) -> SourceFuture<'_, Option<IdeaSummary>> {
        let id = id.clone();
        Box::pin(async move {
            self.check().await?;
            Ok(self.ideas.iter().find(|i| i.id == id).cloned())
        })
    }

    fn decisions(&self, idea_id: &IdeaId) -> SourceFuture<'_, Vec<Decision>> {
        let idea_id = idea_id.clone();
        Box::pin(async move {
            self.check().await?;
            Ok(self.decisions.iter().filter(|d| d.idea_id == idea_id).cloned().collect())
        })
    }

    fn pivots(&self, idea_id: &IdeaId) -> SourceFuture<'_, Vec<Pivot>> {
        let idea_id = idea_id.clone();
        Box::pin(async move {
            self.check().await?;
            Ok(self.pivots.iter().filter(|p| p.idea_id == idea_id).cloned().collect())
        })
    }

    fn studio_product(&self, id: &str) -> SourceFuture<'_, Option<StudioProduct>> {
        let id = id.to_string();
        Box::pin(async move {
            self.check().await?;
            Ok(self.studio.iter().find(|p| p.id == id).cloned())
        })
    }
}

// ── Channel-backed notifier ────────────────────────────────────────────────

#[derive(Default)]
pub struct ChannelNotifier {
    pub senders: Mutex<Vec<(Table, mpsc::Sender<serde_json::Value>)>>,
    pub broken: bool,
}

impl ChannelNotifier {
    /// Deliver `row` to every listener on `table`. Returns how many received it.
    pub async fn publish(&self, table: Table, row: serde_json::Value) -> usize {
        let targets: Vec<_> = self
            .senders
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == table)
            .map(|(_, tx)| tx.clone())
            .collect();
        let mut delivered = 0;
        for tx in targets {
            if tx.send(row.clone()).await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    pub fn listeners(&self, table: Table) -> usize {
        self.senders
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, tx)| *t == table && !tx.is_closed())
            .count()
    }
}

impl InsertNotifier for ChannelNotifier {
    fn listen(&self, table: Table) -> SourceFuture<'_, mpsc::Receiver<serde_json::Value>> {
        Box::pin(async move {
            if self.broken {
                return Err(DashboardError::Config("listener unavailable".into()));
            }
            let (tx, rx) = mpsc::channel(64);
            self.senders.lock().unwrap().push((table, tx));
            Ok(rx)
        })
    }
}

/// Poll `check` until it holds or ~1s elapses.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    false
}
