use {
    super::event::scalar_text,
    chrono::{DateTime, Utc},
    serde::{Deserialize, Deserializer, Serialize},
    std::collections::BTreeMap,
    std::fmt,
};

/// One row of `dashboard_health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub redis: Option<String>,
    #[serde(default, deserialize_with = "breaker_map")]
    pub circuit_breakers: BTreeMap<String, String>,
    #[serde(default)]
    pub orchestrator_last_run: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "gauge")]
    pub orchestrator_ideas_processed: i64,
}

fn breaker_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .filter_map(|(name, state)| scalar_text(&state).map(|s| (name, s)))
            .collect()),
        _ => Ok(BTreeMap::new()),
    }
}

fn gauge<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(0))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    HalfOpen,
    Open,
    Unknown(String),
}

impl BreakerState {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "CLOSED" => Self::Closed,
            "HALF_OPEN" => Self::HalfOpen,
            "OPEN" => Self::Open,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn tone(&self) -> &'static str {
        match self {
            Self::Closed => "bg-status-green",
            Self::HalfOpen => "bg-status-amber",
            Self::Open | Self::Unknown(_) => "bg-status-red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
    Down,
    Unknown,
}

impl ServiceStatus {
    /// Classify a free-form connectivity string from the pipeline.
    pub fn classify(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::Unknown,
            Some("healthy") => Self::Healthy,
            Some("down") => Self::Down,
            Some(s) if s.starts_with("error") => Self::Down,
            Some(_) => Self::Degraded,
        }
    }

    pub fn dot_class(&self) -> &'static str {
        match self {
            Self::Healthy => "bg-status-green animate-pulse-dot",
            Self::Degraded => "bg-status-amber animate-pulse-dot",
            Self::Down => "bg-status-red animate-pulse-dot",
            Self::Unknown => "bg-zinc-700",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Down => "down",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// `"healthy"` -> `"Healthy"`; absent -> `"Unknown"`.
pub fn status_label(raw: Option<&str>) -> String {
    match raw.filter(|s| !s.is_empty()) {
        None => "Unknown".to_string(),
        Some(s) => {
            let mut chars = s.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

impl HealthSnapshot {
    /// Degraded as soon as any breaker is not closed.
    pub fn api_status(&self) -> ServiceStatus {
        let tripped = self
            .circuit_breakers
            .values()
            .any(|state| BreakerState::parse(state) != BreakerState::Closed);
        if tripped {
            ServiceStatus::Degraded
        } else {
            ServiceStatus::Healthy
        }
    }
}

/// The latest known snapshot. Live snapshots only replace it when they are
/// not older than what is held.
#[derive(Debug, Clone, Default)]
pub struct HealthBoard {
    current: Option<HealthSnapshot>,
}

impl HealthBoard {
    pub fn new(initial: Option<HealthSnapshot>) -> Self {
        Self { current: initial }
    }

    /// Returns whether the snapshot became current.
    pub fn apply(&mut self, snapshot: HealthSnapshot) -> bool {
        if let Some(current) = &self.current {
            if snapshot.timestamp < current.timestamp {
                tracing::debug!(
                    snapshot_id = %snapshot.id,
                    current_id = %current.id,
                    "stale health snapshot ignored"
                );
                return false;
            }
        }
        self.current = Some(snapshot);
        true
    }

    pub fn current(&self) -> Option<&HealthSnapshot> {
        self.current.as_ref()
    }
}
