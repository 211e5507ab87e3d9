use {
    super::event::ActivityEvent,
    super::format::{history_label, icon},
    super::idea::{Decision, Pivot},
    chrono::{DateTime, Utc},
    serde::Serialize,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Decision,
    Pivot,
    Event,
}

impl HistoryKind {
    pub fn border(&self) -> &'static str {
        match self {
            Self::Decision => "border-l-status-blue",
            Self::Pivot => "border-l-status-amber",
            Self::Event => "border-l-zinc-700",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryItem {
    /// Prefixed by kind so ids from different tables cannot collide.
    pub id: String,
    pub kind: HistoryKind,
    pub timestamp: DateTime<Utc>,
    pub icon: &'static str,
    pub title: String,
    pub detail: Option<String>,
    /// Secondary badge: who decided, or the pivot outcome.
    pub badge: Option<String>,
    pub badge_tone: Option<&'static str>,
}

/// Merge an idea's decisions, pivots and events into one newest-first list.
pub fn merge_history(
    decisions: &[Decision],
    pivots: &[Pivot],
    events: &[ActivityEvent],
) -> Vec<HistoryItem> {
    let decisions = decisions.iter().map(|d| HistoryItem {
        id: format!("decision-{}", d.id),
        kind: HistoryKind::Decision,
        timestamp: d.created_at,
        icon: "==",
        title: d.decision_type.clone(),
        detail: Some(d.reasoning.clone()).filter(|r| !r.is_empty()),
        badge: Some(d.made_by.clone()),
        badge_tone: None,
    });

    let pivots = pivots.iter().map(|p| HistoryItem {
        id: format!("pivot-{}", p.id),
        kind: HistoryKind::Pivot,
        timestamp: p.created_at,
        icon: "<>",
        title: format!("Pivot #{}: {}", p.pivot_number, p.pivot_type),
        detail: Some(p.new_direction.clone()).filter(|d| !d.is_empty()),
        badge: Some(p.outcome.clone()),
        badge_tone: Some(p.outcome_tone()),
    });

    let events = events.iter().map(|e| HistoryItem {
        id: format!("event-{}", e.id),
        kind: HistoryKind::Event,
        timestamp: e.timestamp,
        icon: icon(&e.event_type),
        title: history_label(e),
        detail: None,
        badge: None,
        badge_tone: None,
    });

    let mut items: Vec<HistoryItem> = decisions.chain(pivots).chain(events).collect();
    // Stable, so same-instant items keep decision/pivot/event order.
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items
}
