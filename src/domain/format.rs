use {
    super::event::{ActivityEvent, EventKind},
    chrono::{DateTime, Utc},
};

/// Placeholder for a detail field the pipeline left out.
pub const MISSING: &str = "unknown";

const FALLBACK_DETAIL_CHARS: usize = 80;

/// One-line description of an event. Never fails: unknown types and
/// malformed details fall back to a raw dump rather than dropping the event.
pub fn describe(event: &ActivityEvent) -> String {
    let title = event.title().unwrap_or(MISSING);

    match event.kind() {
        EventKind::IdeaAdvanced {
            old_stage,
            new_stage,
        } => format!("{title} advanced {} → {}", or_missing(&old_stage), or_missing(&new_stage)),
        EventKind::IdeaKilled { stage } => format!("{title} killed at {}", or_missing(&stage)),
        EventKind::IdeaCreated => format!("New idea: {title}"),
        EventKind::OrchestratorRun {
            advanced,
            killed,
            scanned,
        } => format!("Orchestrator: {advanced} advanced, {killed} killed, {scanned} scanned"),
        EventKind::HealthCheck { database, redis } => {
            format!("Health: DB={}, Redis={}", or_missing(&database), or_missing(&redis))
        }
        EventKind::ReviewCompleted { decision, score } => {
            format!("{title} reviewed: {} ({})", or_missing(&decision), or_missing(&score))
        }
        EventKind::CircuitBreakerChange {
            service,
            old_state,
            new_state,
        } => format!(
            "Circuit breaker {}: {} → {}",
            or_missing(&service),
            or_missing(&old_state),
            or_missing(&new_state)
        ),
        EventKind::MvpDeployed | EventKind::LandingPageDeployed | EventKind::SocialPostCreated => {
            fallback(event)
        }
        EventKind::Other { .. } => fallback(event),
    }
}

/// Shorter wording used on the health surface, where the context already
/// says what kind of event it is.
pub fn describe_compact(event: &ActivityEvent) -> String {
    match event.kind() {
        EventKind::CircuitBreakerChange {
            service,
            old_state,
            new_state,
        } => format!(
            "{}: {} → {}",
            or_missing(&service),
            or_missing(&old_state),
            or_missing(&new_state)
        ),
        EventKind::HealthCheck { .. } | EventKind::OrchestratorRun { .. } => describe(event),
        _ => event.event_type.clone(),
    }
}

/// Label for an event on an idea's history timeline.
pub fn history_label(event: &ActivityEvent) -> String {
    let kind = event.event_type.replace('_', " ");
    match event.title() {
        Some(title) => format!("{kind}: {title}"),
        None => kind,
    }
}

pub fn icon(event_type: &str) -> &'static str {
    match event_type {
        "idea_advanced" => ">>",
        "idea_killed" => "xx",
        "idea_created" => "++",
        "review_completed" => "**",
        "orchestrator_run" => "~~",
        "health_check" => "ok",
        "mvp_deployed" | "landing_page_deployed" => "->",
        "circuit_breaker_change" => "!!",
        "social_post_created" => ">>",
        _ => "..",
    }
}

/// Coarse "how long ago" label. `now` is passed in so callers re-evaluate it
/// on every render.
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes();

    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

fn fallback(event: &ActivityEvent) -> String {
    match event.title() {
        Some(title) => format!("{}: {title}", event.event_type),
        None => {
            let dump = serde_json::to_string(&event.details).unwrap_or_default();
            let head: String = dump.chars().take(FALLBACK_DETAIL_CHARS).collect();
            format!("{}: {head}", event.event_type)
        }
    }
}

fn or_missing(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(MISSING)
}
