use {
    super::event::ActivityEvent,
    super::id::{EventId, IdeaId},
    std::collections::{HashSet, VecDeque},
};

/// Which events a feed accepts. Applied to live inserts; the historical
/// query applies the same restriction server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedFilter {
    All,
    /// `health_check`, `circuit_breaker_change`, `orchestrator_run`.
    Health,
    Idea(IdeaId),
}

impl FeedFilter {
    pub fn matches(&self, event: &ActivityEvent) -> bool {
        match self {
            Self::All => true,
            Self::Health => event.is_health_event(),
            Self::Idea(id) => event.idea_id.as_ref() == Some(id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub filter: FeedFilter,
    /// Upper bound on the backing list. `None` keeps everything.
    pub cap: Option<usize>,
    /// How many entries a view shows, regardless of the backing length.
    pub display_limit: usize,
}

impl FeedConfig {
    /// Lives for the whole process, so it holds no more than it shows.
    pub fn activity(display_limit: usize) -> Self {
        Self {
            filter: FeedFilter::All,
            cap: Some(display_limit),
            display_limit,
        }
    }

    pub fn health(cap: usize) -> Self {
        Self {
            filter: FeedFilter::Health,
            cap: Some(cap),
            display_limit: cap,
        }
    }

    pub fn idea(id: IdeaId, display_limit: usize) -> Self {
        Self {
            filter: FeedFilter::Idea(id),
            cap: None,
            display_limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Newest event so far; went to the front.
    Prepended,
    /// Arrived out of order and was placed at `position`.
    Inserted { position: usize },
    /// An event with this id is already in the feed.
    Duplicate,
    /// Rejected by the feed's filter.
    Filtered,
    /// Older than everything the cap lets the feed hold.
    Expired,
}

impl InsertOutcome {
    pub fn accepted(&self) -> bool {
        matches!(self, Self::Prepended | Self::Inserted { .. })
    }
}

/// Newest-first list of events, unique by id.
///
/// Live events normally arrive after everything already held, so an insert is
/// a prepend. Redelivered ids are dropped, and late arrivals are placed by
/// timestamp instead of blindly going to the front.
#[derive(Debug, Clone)]
pub struct EventFeed {
    config: FeedConfig,
    events: VecDeque<ActivityEvent>,
    seen: HashSet<EventId>,
}

impl EventFeed {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            config,
            events: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    /// Build a feed from a historical batch (expected newest first).
    pub fn seeded(config: FeedConfig, history: Vec<ActivityEvent>) -> Self {
        let mut feed = Self::new(config);
        feed.seed(history);
        feed
    }

    /// Replace the contents with a historical batch. The batch goes through
    /// the same filter, dedup and cap as live inserts; an already ordered
    /// batch keeps its order.
    pub fn seed(&mut self, history: Vec<ActivityEvent>) {
        self.events.clear();
        self.seen.clear();
        for event in history {
            let position = self.events.len();
            if !self.config.filter.matches(&event) || self.seen.contains(&event.id) {
                continue;
            }
            if self.events.back().is_some_and(|last| last.timestamp >= event.timestamp) {
                if self.config.cap.is_some_and(|cap| position >= cap) {
                    continue;
                }
                self.seen.insert(event.id.clone());
                self.events.push_back(event);
            } else {
                self.insert(event);
            }
        }
    }

    pub fn insert(&mut self, event: ActivityEvent) -> InsertOutcome {
        if !self.config.filter.matches(&event) {
            return InsertOutcome::Filtered;
        }
        if self.seen.contains(&event.id) {
            tracing::debug!(event_id = %event.id, "duplicate delivery, ignored");
            return InsertOutcome::Duplicate;
        }

        // Equal timestamps go ahead of what is already held.
        let position = match self.events.front() {
            None => 0,
            Some(front) if event.timestamp >= front.timestamp => 0,
            Some(_) => self
                .events
                .partition_point(|held| held.timestamp > event.timestamp),
        };

        if self.config.cap.is_some_and(|cap| position >= cap) {
            tracing::debug!(event_id = %event.id, position, "event older than feed window, dropped");
            return InsertOutcome::Expired;
        }

        if position > 0 {
            tracing::debug!(event_id = %event.id, position, "out-of-order delivery");
        }

        self.seen.insert(event.id.clone());
        self.events.insert(position, event);
        self.truncate();

        if position == 0 {
            InsertOutcome::Prepended
        } else {
            InsertOutcome::Inserted { position }
        }
    }

    /// Entries a view shows: the first `display_limit`.
    pub fn visible(&self) -> impl Iterator<Item = &ActivityEvent> {
        self.events.iter().take(self.config.display_limit)
    }

    pub fn events(&self) -> impl Iterator<Item = &ActivityEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.seen.contains(id)
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    fn truncate(&mut self) {
        let Some(cap) = self.config.cap else {
            return;
        };
        while self.events.len() > cap {
            if let Some(evicted) = self.events.pop_back() {
                self.seen.remove(&evicted.id);
            }
        }
    }
}
