use {
    crate::domain::error::DashboardError,
    std::{env, str::FromStr, time::Duration},
};

/// Used when `DATABASE_URL` is absent. The pool connects lazily, so every
/// query fails and the dashboard renders its empty states.
pub const PLACEHOLDER_DATABASE_URL: &str = "postgres://placeholder@localhost:5432/placeholder";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub fetch_timeout: Duration,
    /// Rows fetched for, and shown by, the activity feed.
    pub activity_feed_limit: usize,
    /// Cap of the health event feed.
    pub health_event_limit: usize,
    /// Snapshots behind the processed-ideas chart.
    pub health_history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: "0.0.0.0:3000".to_string(),
            fetch_timeout: Duration::from_secs(5),
            activity_feed_limit: 50,
            health_event_limit: 20,
            health_history_limit: 48,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DashboardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            fetch_timeout: parse(&lookup, "FETCH_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.fetch_timeout),
            activity_feed_limit: parse(&lookup, "ACTIVITY_FEED_LIMIT")?
                .unwrap_or(defaults.activity_feed_limit),
            health_event_limit: parse(&lookup, "HEALTH_EVENT_LIMIT")?
                .unwrap_or(defaults.health_event_limit),
            health_history_limit: parse(&lookup, "HEALTH_HISTORY_LIMIT")?
                .unwrap_or(defaults.health_history_limit),
        })
    }

    pub fn database_url(&self) -> &str {
        self.database_url
            .as_deref()
            .unwrap_or(PLACEHOLDER_DATABASE_URL)
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>, DashboardError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| DashboardError::Config(format!("{key}={raw}: {e}")))
        })
        .transpose()
}
