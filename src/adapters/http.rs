use {
    crate::{
        AppState,
        adapters::api_errors::ApiError,
        domain::id::IdeaId,
        services::dashboard::{FeedView, HealthView, HistoryView, ProgressView},
    },
    axum::{
        Json, Router,
        extract::{Path, State},
        http::StatusCode,
        routing::get,
    },
    chrono::Utc,
    std::time::Duration,
    tower_http::timeout::TimeoutLayer,
};

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/activity", get(activity))
        .route("/health", get(health))
        .route("/ideas/{id}/activity", get(idea_activity))
        .route("/ideas/{id}/history", get(idea_history))
        .route("/ideas/{id}/progress", get(idea_progress))
        .route("/studio/{id}/progress", get(studio_progress))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}

#[tracing::instrument(name = "activity", skip_all)]
pub async fn activity(State(state): State<AppState>) -> Json<FeedView> {
    Json(state.dashboard.activity(Utc::now()).await)
}

#[tracing::instrument(name = "health", skip_all)]
pub async fn health(State(state): State<AppState>) -> Json<HealthView> {
    Json(state.dashboard.health(Utc::now()).await)
}

#[tracing::instrument(name = "idea_activity", skip(state))]
pub async fn idea_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<FeedView> {
    Json(state.dashboard.idea_activity(&IdeaId::new(id), Utc::now()).await)
}

#[tracing::instrument(name = "idea_history", skip(state))]
pub async fn idea_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<HistoryView> {
    Json(state.dashboard.idea_history(&IdeaId::new(id), Utc::now()).await)
}

#[tracing::instrument(name = "idea_progress", skip(state))]
pub async fn idea_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProgressView>, ApiError> {
    Ok(Json(state.dashboard.idea_progress(&IdeaId::new(id)).await?))
}

#[tracing::instrument(name = "studio_progress", skip(state))]
pub async fn studio_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProgressView>, ApiError> {
    Ok(Json(state.dashboard.studio_progress(&id).await?))
}
