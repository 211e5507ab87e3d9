use {
    super::id::{EventId, IdeaId},
    chrono::{DateTime, Utc},
    serde::{Deserialize, Deserializer, Serialize},
    serde_json::{Map, Value},
    std::fmt,
};

/// Event types shown on the health surface.
pub const HEALTH_EVENT_TYPES: [&str; 3] = ["health_check", "circuit_breaker_change", "orchestrator_run"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    /// Anything the pipeline wrote that we don't recognise. Kept verbatim.
    Other(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Other(raw) => raw,
        }
    }

    pub fn color_class(&self) -> &'static str {
        match self {
            Self::Info => "text-stone",
            Self::Warning => "text-status-yellow",
            Self::Error => "text-status-red",
            Self::Other(_) => "text-graphite",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        match s.as_str() {
            "info" => Self::Info,
            "warning" => Self::Warning,
            "error" => Self::Error,
            _ => Self::Other(s),
        }
    }
}

impl From<Severity> for String {
    fn from(s: Severity) -> Self {
        s.as_str().to_string()
    }
}

/// One row of `dashboard_activity`. Immutable once written by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    #[serde(default)]
    pub idea_id: Option<IdeaId>,
    #[serde(default)]
    pub idea_title: Option<String>,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub details: Map<String, Value>,
    #[serde(default)]
    pub severity: Severity,
}

impl ActivityEvent {
    pub fn is_health_event(&self) -> bool {
        HEALTH_EVENT_TYPES.contains(&self.event_type.as_str())
    }

    /// Title if present and non-empty.
    pub fn title(&self) -> Option<&str> {
        self.idea_title.as_deref().filter(|t| !t.is_empty())
    }

    pub fn kind(&self) -> EventKind {
        let text = |key: &str| self.details.get(key).and_then(scalar_text);
        let count = |key: &str| self.details.get(key).map(count_value).unwrap_or(0);

        match self.event_type.as_str() {
            "idea_advanced" => EventKind::IdeaAdvanced {
                old_stage: text("old_stage"),
                new_stage: text("new_stage"),
            },
            "idea_killed" => EventKind::IdeaKilled {
                stage: text("stage"),
            },
            "idea_created" => EventKind::IdeaCreated,
            "review_completed" => EventKind::ReviewCompleted {
                decision: text("decision"),
                score: text("score"),
            },
            "orchestrator_run" => EventKind::OrchestratorRun {
                advanced: count("advanced"),
                killed: count("killed"),
                scanned: count("scanned"),
            },
            "health_check" => EventKind::HealthCheck {
                database: text("database"),
                redis: text("redis"),
            },
            "circuit_breaker_change" => EventKind::CircuitBreakerChange {
                service: text("service"),
                old_state: text("old_state"),
                new_state: text("new_state"),
            },
            "mvp_deployed" => EventKind::MvpDeployed,
            "landing_page_deployed" => EventKind::LandingPageDeployed,
            "social_post_created" => EventKind::SocialPostCreated,
            other => EventKind::Other {
                event_type: other.to_string(),
                details: self.details.clone(),
            },
        }
    }
}

/// Typed view over `event_type` + `details`. Every field is optional because
/// the pipeline does not guarantee the bag's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    IdeaAdvanced {
        old_stage: Option<String>,
        new_stage: Option<String>,
    },
    IdeaKilled {
        stage: Option<String>,
    },
    IdeaCreated,
    ReviewCompleted {
        decision: Option<String>,
        score: Option<String>,
    },
    OrchestratorRun {
        advanced: u64,
        killed: u64,
        scanned: u64,
    },
    HealthCheck {
        database: Option<String>,
        redis: Option<String>,
    },
    CircuitBreakerChange {
        service: Option<String>,
        old_state: Option<String>,
        new_state: Option<String>,
    },
    MvpDeployed,
    LandingPageDeployed,
    SocialPostCreated,
    Other {
        event_type: String,
        details: Map<String, Value>,
    },
}

/// Render a detail value the way it reads in a sentence: strings raw,
/// numbers in shortest form, containers as compact JSON.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// `8.0` reads as `8`. Integers and fractional floats keep serde_json's form.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

fn count_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn object_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}
